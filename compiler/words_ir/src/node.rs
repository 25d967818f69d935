//! Syntax tree nodes.
//!
//! The tree is a single tagged sum type. Each `NodeKind` variant carries
//! exactly the children its evaluation rule needs, so the evaluator is one
//! `match` with no runtime type inspection.
//!
//! # Sharing
//!
//! Children are `SharedNode` (`Arc<Node>`). Listener predicates, queued move
//! distances and custom action bodies outlive the statement that created them,
//! and statements cross from the producer thread to the simulation thread, so
//! the handle must be both cheap to clone and `Send`.

use std::sync::Arc;

use crate::{BinaryOp, Direction};

/// Shared handle to a syntax tree node.
pub type SharedNode = Arc<Node>;

/// A syntax tree node with its source line.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// 1-based source line, `0` for synthesized nodes.
    pub line: u32,
}

impl Node {
    /// Allocate a shared node.
    pub fn new(kind: NodeKind, line: u32) -> SharedNode {
        Arc::new(Node { kind, line })
    }

    /// Short, stable name of the node kind, used in diagnostics and dumps.
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Render the tree as an indented outline, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(0, &mut out);
        out
    }

    fn dump_into(&self, level: usize, out: &mut String) {
        for _ in 0..level {
            out.push_str("  ");
        }
        out.push_str(self.kind_name());
        match &self.kind {
            NodeKind::Num(n) => out.push_str(&format!(" {n}")),
            NodeKind::Str(s) => out.push_str(&format!(" {s:?}")),
            NodeKind::Direction(d) => out.push_str(&format!(" {d}")),
            NodeKind::Identifier(name) | NodeKind::Parameter(name) => {
                out.push(' ');
                out.push_str(name);
            }
            NodeKind::Binary { op, .. } => {
                out.push(' ');
                out.push_str(op.as_symbol());
            }
            _ => {}
        }
        out.push('\n');
        for child in self.kind.children() {
            child.dump_into(level + 1, out);
        }
    }
}

/// Whether a listener survives once its predicate stops holding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Persistence {
    /// Stays registered for the rest of the run.
    Permanent,
    /// Deregistered the first frame its predicate is false.
    Temporary,
}

/// Left-hand side of an assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum AssignTarget {
    /// A scope variable.
    Variable(String),
    /// An object's own property.
    Property {
        subject: SharedNode,
        property: String,
    },
}

/// Node kinds, one per evaluation rule.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    // Leaves
    Num(f64),
    Str(String),
    Direction(Direction),
    Nothing,
    Now,
    Identifier(String),
    /// The object whose custom action is currently being expanded.
    Subject,

    // Expressions
    Negate(SharedNode),
    Not(SharedNode),
    Binary {
        op: BinaryOp,
        left: SharedNode,
        right: SharedNode,
    },
    Position {
        row: SharedNode,
        col: SharedNode,
    },
    RetrieveProperty {
        subject: SharedNode,
        property: String,
    },

    // Predicates over the last action an object executed
    Moves {
        subject: SharedNode,
    },
    Says {
        subject: SharedNode,
        message: Option<SharedNode>,
    },
    Waits {
        subject: SharedNode,
    },
    Touches {
        subject: SharedNode,
        other: SharedNode,
    },

    // Statements
    StatementList(Vec<SharedNode>),
    Assign {
        target: AssignTarget,
        value: SharedNode,
    },
    Remove {
        subject: SharedNode,
    },
    Reset,
    Exit,

    // Class definitions (need the class being defined as context)
    CreateClass {
        name: String,
        parent: String,
        body: Option<SharedNode>,
    },
    ClassStatementList(Vec<SharedNode>),
    DefineProperty {
        name: String,
        value: SharedNode,
    },
    DefineAction {
        name: String,
        parameters: Option<SharedNode>,
        body: SharedNode,
    },
    ParameterList(Vec<SharedNode>),
    Parameter(String),

    // Object creation (property list needs the new object as context)
    CreateObject {
        name: String,
        class: String,
        properties: Option<SharedNode>,
        position: SharedNode,
    },
    PropertyAssignList(Vec<SharedNode>),
    PropertyAssign {
        name: String,
        value: SharedNode,
    },

    // Control flow
    If {
        predicate: SharedNode,
        then: SharedNode,
        otherwise: Option<SharedNode>,
    },
    Repeat {
        count: SharedNode,
        body: SharedNode,
    },
    While {
        predicate: SharedNode,
        body: SharedNode,
    },

    // Listeners
    Listener {
        predicate: SharedNode,
        body: SharedNode,
        persistence: Persistence,
    },

    // Action queueing; `now` puts the action at the front of the queue
    QueueMove {
        subject: SharedNode,
        direction: Direction,
        distance: SharedNode,
        now: bool,
    },
    QueueSay {
        subject: SharedNode,
        message: SharedNode,
        now: bool,
    },
    QueueWait {
        subject: SharedNode,
        frames: SharedNode,
        now: bool,
    },
    QueueStop {
        subject: SharedNode,
        now: bool,
    },
    QueueAssign {
        subject: SharedNode,
        assignments: SharedNode,
        now: bool,
    },
    QueueAction {
        subject: SharedNode,
        action: String,
        arguments: Option<SharedNode>,
        now: bool,
    },
    ArgumentList(Vec<SharedNode>),
    Argument {
        name: String,
        value: SharedNode,
    },
}

impl NodeKind {
    /// Short, stable name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Num(_) => "num",
            Self::Str(_) => "string",
            Self::Direction(_) => "direction",
            Self::Nothing => "nothing",
            Self::Now => "now",
            Self::Identifier(_) => "identifier",
            Self::Subject => "subject",
            Self::Negate(_) => "negate",
            Self::Not(_) => "not",
            Self::Binary { .. } => "binary",
            Self::Position { .. } => "position",
            Self::RetrieveProperty { .. } => "retrieve property",
            Self::Moves { .. } => "moves predicate",
            Self::Says { .. } => "says predicate",
            Self::Waits { .. } => "waits predicate",
            Self::Touches { .. } => "touches predicate",
            Self::StatementList(_) => "statement list",
            Self::Assign { .. } => "assign",
            Self::Remove { .. } => "remove",
            Self::Reset => "reset",
            Self::Exit => "exit",
            Self::CreateClass { .. } => "create class",
            Self::ClassStatementList(_) => "class statement list",
            Self::DefineProperty { .. } => "define property",
            Self::DefineAction { .. } => "define action",
            Self::ParameterList(_) => "parameter list",
            Self::Parameter(_) => "parameter",
            Self::CreateObject { .. } => "create object",
            Self::PropertyAssignList(_) => "property assignment list",
            Self::PropertyAssign { .. } => "property assignment",
            Self::If { .. } => "if",
            Self::Repeat { .. } => "repeat",
            Self::While { .. } => "while",
            Self::Listener {
                persistence: Persistence::Permanent,
                ..
            } => "permanent listener",
            Self::Listener {
                persistence: Persistence::Temporary,
                ..
            } => "temporary listener",
            Self::QueueMove { .. } => "queue move",
            Self::QueueSay { .. } => "queue say",
            Self::QueueWait { .. } => "queue wait",
            Self::QueueStop { .. } => "queue stop",
            Self::QueueAssign { .. } => "queue assign",
            Self::QueueAction { .. } => "queue action",
            Self::ArgumentList(_) => "argument list",
            Self::Argument { .. } => "argument",
        }
    }

    /// Direct children in positional order.
    pub fn children(&self) -> Vec<&SharedNode> {
        match self {
            Self::Num(_)
            | Self::Str(_)
            | Self::Direction(_)
            | Self::Nothing
            | Self::Now
            | Self::Identifier(_)
            | Self::Subject
            | Self::Reset
            | Self::Exit
            | Self::Parameter(_) => Vec::new(),
            Self::Negate(inner) | Self::Not(inner) => vec![inner],
            Self::Binary { left, right, .. } => vec![left, right],
            Self::Position { row, col } => vec![row, col],
            Self::RetrieveProperty { subject, .. }
            | Self::Moves { subject }
            | Self::Waits { subject }
            | Self::Remove { subject }
            | Self::QueueStop { subject, .. } => vec![subject],
            Self::Says { subject, message } => {
                let mut out = vec![subject];
                out.extend(message);
                out
            }
            Self::Touches { subject, other } => vec![subject, other],
            Self::StatementList(items)
            | Self::ClassStatementList(items)
            | Self::ParameterList(items)
            | Self::PropertyAssignList(items)
            | Self::ArgumentList(items) => items.iter().collect(),
            Self::Assign { target, value } => match target {
                AssignTarget::Variable(_) => vec![value],
                AssignTarget::Property { subject, .. } => vec![subject, value],
            },
            Self::CreateClass { body, .. } => body.iter().collect(),
            Self::DefineProperty { value, .. }
            | Self::PropertyAssign { value, .. }
            | Self::Argument { value, .. } => vec![value],
            Self::DefineAction {
                parameters, body, ..
            } => {
                let mut out: Vec<&SharedNode> = parameters.iter().collect();
                out.push(body);
                out
            }
            Self::CreateObject {
                properties,
                position,
                ..
            } => {
                let mut out: Vec<&SharedNode> = properties.iter().collect();
                out.push(position);
                out
            }
            Self::If {
                predicate,
                then,
                otherwise,
            } => {
                let mut out = vec![predicate, then];
                out.extend(otherwise);
                out
            }
            Self::Repeat { count, body } => vec![count, body],
            Self::While { predicate, body } | Self::Listener {
                predicate, body, ..
            } => vec![predicate, body],
            Self::QueueMove {
                subject, distance, ..
            } => vec![subject, distance],
            Self::QueueSay {
                subject, message, ..
            } => vec![subject, message],
            Self::QueueWait {
                subject, frames, ..
            } => vec![subject, frames],
            Self::QueueAssign {
                subject,
                assignments,
                ..
            } => vec![subject, assignments],
            Self::QueueAction {
                subject, arguments, ..
            } => {
                let mut out = vec![subject];
                out.extend(arguments);
                out
            }
        }
    }
}

#[cfg(test)]
mod tests;
