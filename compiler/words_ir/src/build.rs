//! Constructors for common nodes.
//!
//! Producers that synthesize statements (the demo driver, tests) use these
//! instead of spelling out `Node::new(NodeKind::..., line)` by hand. Every
//! helper produces a node at line `0`; statements that should carry a real
//! line use [`at`].

use crate::{AssignTarget, BinaryOp, Direction, Node, NodeKind, Persistence, SharedNode};

/// Wrap `kind` in a node at `line`.
pub fn at(line: u32, kind: NodeKind) -> SharedNode {
    Node::new(kind, line)
}

pub fn num(value: f64) -> SharedNode {
    Node::new(NodeKind::Num(value), 0)
}

pub fn string(value: &str) -> SharedNode {
    Node::new(NodeKind::Str(value.to_string()), 0)
}

pub fn ident(name: &str) -> SharedNode {
    Node::new(NodeKind::Identifier(name.to_string()), 0)
}

pub fn nothing() -> SharedNode {
    Node::new(NodeKind::Nothing, 0)
}

pub fn subject() -> SharedNode {
    Node::new(NodeKind::Subject, 0)
}

pub fn binary(op: BinaryOp, left: SharedNode, right: SharedNode) -> SharedNode {
    Node::new(NodeKind::Binary { op, left, right }, 0)
}

pub fn position(row: f64, col: f64) -> SharedNode {
    Node::new(
        NodeKind::Position {
            row: num(row),
            col: num(col),
        },
        0,
    )
}

pub fn property(subject: SharedNode, name: &str) -> SharedNode {
    Node::new(
        NodeKind::RetrieveProperty {
            subject,
            property: name.to_string(),
        },
        0,
    )
}

pub fn statements(items: Vec<SharedNode>) -> SharedNode {
    Node::new(NodeKind::StatementList(items), 0)
}

pub fn assign(name: &str, value: SharedNode) -> SharedNode {
    Node::new(
        NodeKind::Assign {
            target: AssignTarget::Variable(name.to_string()),
            value,
        },
        0,
    )
}

pub fn create_object(name: &str, class: &str, row: f64, col: f64) -> SharedNode {
    Node::new(
        NodeKind::CreateObject {
            name: name.to_string(),
            class: class.to_string(),
            properties: None,
            position: position(row, col),
        },
        0,
    )
}

pub fn create_class(name: &str, parent: &str, body: Vec<SharedNode>) -> SharedNode {
    let body = if body.is_empty() {
        None
    } else {
        Some(Node::new(NodeKind::ClassStatementList(body), 0))
    };
    Node::new(
        NodeKind::CreateClass {
            name: name.to_string(),
            parent: parent.to_string(),
            body,
        },
        0,
    )
}

pub fn define_property(name: &str, value: SharedNode) -> SharedNode {
    Node::new(
        NodeKind::DefineProperty {
            name: name.to_string(),
            value,
        },
        0,
    )
}

pub fn define_action(name: &str, parameters: &[&str], body: Vec<SharedNode>) -> SharedNode {
    let parameters = if parameters.is_empty() {
        None
    } else {
        Some(Node::new(
            NodeKind::ParameterList(
                parameters
                    .iter()
                    .map(|p| Node::new(NodeKind::Parameter((*p).to_string()), 0))
                    .collect(),
            ),
            0,
        ))
    };
    Node::new(
        NodeKind::DefineAction {
            name: name.to_string(),
            parameters,
            body: statements(body),
        },
        0,
    )
}

pub fn queue_move(subject: SharedNode, direction: Direction, distance: SharedNode) -> SharedNode {
    Node::new(
        NodeKind::QueueMove {
            subject,
            direction,
            distance,
            now: false,
        },
        0,
    )
}

pub fn queue_say(subject: SharedNode, message: SharedNode) -> SharedNode {
    Node::new(
        NodeKind::QueueSay {
            subject,
            message,
            now: false,
        },
        0,
    )
}

pub fn queue_wait(subject: SharedNode, frames: SharedNode) -> SharedNode {
    Node::new(
        NodeKind::QueueWait {
            subject,
            frames,
            now: false,
        },
        0,
    )
}

pub fn queue_action(subject: SharedNode, action: &str, arguments: Vec<(&str, SharedNode)>) -> SharedNode {
    let arguments = if arguments.is_empty() {
        None
    } else {
        Some(Node::new(
            NodeKind::ArgumentList(
                arguments
                    .into_iter()
                    .map(|(name, value)| {
                        Node::new(
                            NodeKind::Argument {
                                name: name.to_string(),
                                value,
                            },
                            0,
                        )
                    })
                    .collect(),
            ),
            0,
        ))
    };
    Node::new(
        NodeKind::QueueAction {
            subject,
            action: action.to_string(),
            arguments,
            now: false,
        },
        0,
    )
}

pub fn listener(predicate: SharedNode, body: Vec<SharedNode>, persistence: Persistence) -> SharedNode {
    Node::new(
        NodeKind::Listener {
            predicate,
            body: statements(body),
            persistence,
        },
        0,
    )
}
