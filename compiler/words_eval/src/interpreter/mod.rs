//! Tree-walking evaluator for Words.
//!
//! Every `NodeKind` has exactly one evaluation rule, chosen by a single
//! `match` in [`Interpreter::eval_with`]. Definition and queueing rules live
//! in their own modules:
//!
//! - `declarations` - classes, properties, custom actions, objects
//! - `queueing` - move/say/wait/stop/assign/custom action enqueueing
//!
//! # Inherited context
//!
//! A few nodes only make sense inside a parent: a `DefineProperty` needs the
//! class being defined, a `Parameter` needs the action being defined, and so
//! on. The parent passes that down as an [`Inherited`] value; evaluating
//! such a node without it is a `MissingContext` error.
//!
//! # Statement boundaries
//!
//! Errors propagate with `?` up to the nearest statement list, which reports
//! them on the environment's output and carries on with the next statement.
//! The innermost node that knows its source line stamps it on the error.

mod declarations;
mod queueing;
mod scope_guard;

pub use scope_guard::ScopedInterpreter;

use rustc_hash::FxHashMap;
use words_ir::{AssignTarget, Node, NodeKind, Persistence, Position, SharedNode};

use crate::action::ActionKind;
use crate::class::ClassId;
use crate::environment::Environment;
use crate::errors::{invalid_type, object_not_found, EvalError, EvalResult};
use crate::object::ObjectId;
use crate::operators::{evaluate_binary, evaluate_negate, evaluate_not};
use crate::value::{to_count, Property, Value, ValueKind};

/// Context a parent node hands to children that cannot stand alone.
#[derive(Debug)]
pub enum Inherited<'ctx> {
    None,
    /// Property and action definitions inside a class body.
    ClassBeingDefined(ClassId),
    /// Parameters of a custom action definition.
    ActionBeingDefined(&'ctx mut Vec<String>),
    /// Property assignments in an object creation.
    ObjectBeingCreated(ObjectId),
    /// Property assignments in a queued assignment.
    PropertiesBeingQueued(&'ctx mut Vec<(String, Property)>),
    /// Named arguments of a queued custom action.
    ArgumentsBeingBound(&'ctx mut FxHashMap<String, Property>),
}

impl Inherited<'_> {
    /// Borrow the same context for another child.
    fn reborrow(&mut self) -> Inherited<'_> {
        match self {
            Self::None => Inherited::None,
            Self::ClassBeingDefined(id) => Inherited::ClassBeingDefined(*id),
            Self::ActionBeingDefined(parameters) => Inherited::ActionBeingDefined(&mut **parameters),
            Self::ObjectBeingCreated(id) => Inherited::ObjectBeingCreated(*id),
            Self::PropertiesBeingQueued(properties) => {
                Inherited::PropertiesBeingQueued(&mut **properties)
            }
            Self::ArgumentsBeingBound(arguments) => Inherited::ArgumentsBeingBound(&mut **arguments),
        }
    }
}

/// Evaluates nodes against an environment.
pub struct Interpreter<'env> {
    pub env: &'env mut Environment,
}

impl<'env> Interpreter<'env> {
    pub fn new(env: &'env mut Environment) -> Self {
        Interpreter { env }
    }

    /// Evaluate a node that needs no inherited context.
    pub fn eval(&mut self, node: &Node) -> EvalResult {
        self.eval_with(node, Inherited::None)
    }

    /// Evaluate a top-level statement, reporting any error instead of returning it.
    pub fn execute_statement(&mut self, node: &Node) -> Value {
        match self.eval(node) {
            Ok(value) => value,
            Err(err) => {
                self.env.report(&err);
                Value::Nothing
            }
        }
    }

    pub fn eval_with(&mut self, node: &Node, inherited: Inherited<'_>) -> EvalResult {
        self.eval_node(node, inherited)
            .map_err(|err| err.with_line(node.line))
    }

    fn eval_node(&mut self, node: &Node, inherited: Inherited<'_>) -> EvalResult {
        match &node.kind {
            // Leaves
            NodeKind::Num(n) => Ok(Value::Num(*n)),
            NodeKind::Str(s) => Ok(Value::Str(s.clone())),
            NodeKind::Direction(d) => Ok(Value::Direction(*d)),
            NodeKind::Nothing => Ok(Value::Nothing),
            NodeKind::Now => Ok(Value::Now),
            NodeKind::Identifier(name) => Ok(self.env.lookup(name).into()),
            NodeKind::Subject => self
                .env
                .current_subject()
                .map(Value::Object)
                .ok_or_else(|| EvalError::new("there is no subject outside a custom action")),

            // Expressions
            NodeKind::Negate(inner) => {
                let value = self.eval(inner)?;
                evaluate_negate(value)
            }
            NodeKind::Not(inner) => {
                let value = self.eval(inner)?;
                evaluate_not(value)
            }
            NodeKind::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                evaluate_binary(left, right, *op)
            }
            NodeKind::Position { row, col } => {
                let row = self.eval(row)?.into_number()?;
                let col = self.eval(col)?.into_number()?;
                Ok(Value::Position(Position::new(row, col)))
            }
            NodeKind::RetrieveProperty { subject, property } => {
                self.eval_retrieve_property(subject, property)
            }

            // Predicates
            NodeKind::Moves { subject } => self.last_action_is(subject, ActionKind::Move),
            NodeKind::Waits { subject } => self.last_action_is(subject, ActionKind::Wait),
            NodeKind::Says { subject, message } => self.eval_says(subject, message.as_ref()),
            NodeKind::Touches { subject, other } => {
                let a = self.eval_subject(subject)?;
                let b = self.eval_subject(other)?;
                let a = self.env.object(a)?.position();
                let b = self.env.object(b)?.position();
                Ok(Value::Bool(a.touches(b)))
            }

            // Statements
            NodeKind::StatementList(items) => Ok(self.eval_statement_list(items)),
            NodeKind::Assign { target, value } => self.eval_assign(target, value),
            NodeKind::Remove { subject } => {
                let id = self.eval_subject(subject)?;
                self.env.remove_object(id)?;
                Ok(Value::Nothing)
            }
            NodeKind::Reset => {
                self.env.reset();
                Ok(Value::Nothing)
            }
            NodeKind::Exit => {
                self.env.request_exit();
                Ok(Value::Nothing)
            }

            // Definitions
            NodeKind::CreateClass { name, parent, body } => {
                self.eval_create_class(name, parent, body.as_ref())
            }
            NodeKind::ClassStatementList(items) => self.eval_class_statements(items, inherited),
            NodeKind::DefineProperty { name, value } => {
                self.eval_define_property(name, value, inherited)
            }
            NodeKind::DefineAction {
                name,
                parameters,
                body,
            } => self.eval_define_action(name, parameters.as_ref(), body, inherited),
            NodeKind::ParameterList(items) => self.eval_parameter_list(items, inherited),
            NodeKind::Parameter(name) => self.eval_parameter(name, inherited),
            NodeKind::CreateObject {
                name,
                class,
                properties,
                position,
            } => self.eval_create_object(name, class, properties.as_ref(), position),
            NodeKind::PropertyAssignList(items) => self.eval_property_assign_list(items, inherited),
            NodeKind::PropertyAssign { name, value } => {
                self.eval_property_assign(name, value, inherited)
            }

            // Control flow
            NodeKind::If {
                predicate,
                then,
                otherwise,
            } => {
                if self.eval(predicate)?.into_bool("if")? {
                    self.eval(then)?;
                } else if let Some(otherwise) = otherwise {
                    self.eval(otherwise)?;
                }
                Ok(Value::Nothing)
            }
            NodeKind::Repeat { count, body } => self.eval_repeat(count, body),
            NodeKind::While { predicate, body } => self.eval_while(predicate, body),
            NodeKind::Listener {
                predicate,
                body,
                persistence,
            } => self.eval_listener(predicate, body, *persistence),

            // Queueing
            NodeKind::QueueMove {
                subject,
                direction,
                distance,
                now,
            } => self.eval_queue_move(subject, *direction, distance, *now),
            NodeKind::QueueSay {
                subject,
                message,
                now,
            } => self.eval_queue_say(subject, message, *now),
            NodeKind::QueueWait {
                subject,
                frames,
                now,
            } => self.eval_queue_wait(subject, frames, *now),
            NodeKind::QueueStop { subject, now } => self.eval_queue_stop(subject, *now),
            NodeKind::QueueAssign {
                subject,
                assignments,
                now,
            } => self.eval_queue_assign(subject, assignments, *now),
            NodeKind::QueueAction {
                subject,
                action,
                arguments,
                now,
            } => self.eval_queue_action(subject, action, arguments.as_ref(), *now),
            NodeKind::ArgumentList(items) => self.eval_argument_list(items, inherited),
            NodeKind::Argument { name, value } => self.eval_argument(name, value, inherited),
        }
    }

    /// Evaluate a node that must name a live object.
    pub fn eval_subject(&mut self, node: &Node) -> Result<ObjectId, EvalError> {
        match self.eval(node)? {
            Value::Object(id) if self.env.objects().contains(id) => Ok(id),
            Value::Object(id) => Err(object_not_found(&id.to_string())),
            Value::Nothing => Err(object_not_found(match &node.kind {
                NodeKind::Identifier(name) => name.as_str(),
                other => other.name(),
            })),
            other => Err(invalid_type(ValueKind::Object, other.kind())),
        }
    }

    /// Run each statement, reporting failures; the value is the last
    /// statement's that wasn't `nothing`.
    fn eval_statement_list(&mut self, items: &[SharedNode]) -> Value {
        let mut last = Value::Nothing;
        for item in items {
            match self.eval(item) {
                Ok(value) if !value.is_nothing() => last = value,
                Ok(_) => {}
                Err(err) => self.env.report(&err),
            }
        }
        last
    }

    fn eval_assign(&mut self, target: &AssignTarget, value: &Node) -> EvalResult {
        match target {
            AssignTarget::Variable(name) => {
                let value = Property::try_from(self.eval(value)?)?;
                self.env.assign(name, value);
            }
            AssignTarget::Property { subject, property } => {
                let id = self.eval_subject(subject)?;
                let value = Property::try_from(self.eval(value)?)?;
                self.env.object_mut(id)?.set_property(property, value);
            }
        }
        Ok(Value::Nothing)
    }

    /// User properties first; otherwise a few read-only facts about the object.
    fn eval_retrieve_property(&mut self, subject: &Node, property: &str) -> EvalResult {
        let id = self.eval_subject(subject)?;
        let value = self.env.resolve_property(id, property)?;
        if !value.is_nothing() {
            return Ok(value.into());
        }
        let object = self.env.object(id)?;
        Ok(match property {
            "row" => Value::Num(object.position().row),
            "column" => Value::Num(object.position().col),
            "position" => Value::Position(object.position()),
            "name" => Value::string(object.name()),
            "class" => Value::string(object.class_name()),
            _ => Value::Nothing,
        })
    }

    fn last_action_is(&mut self, subject: &Node, kind: ActionKind) -> EvalResult {
        let id = self.eval_subject(subject)?;
        Ok(Value::Bool(self.env.object(id)?.last_action() == Some(kind)))
    }

    fn eval_says(&mut self, subject: &Node, message: Option<&SharedNode>) -> EvalResult {
        let id = self.eval_subject(subject)?;
        let expected = match message {
            Some(node) => Some(self.eval(node)?.into_string()?),
            None => None,
        };
        let object = self.env.object(id)?;
        if object.last_action() != Some(ActionKind::Say) {
            return Ok(Value::Bool(false));
        }
        Ok(Value::Bool(match expected {
            Some(text) => object.message() == Some(text.as_str()),
            None => true,
        }))
    }

    /// Runs the body a whole number of times, in the current scope.
    fn eval_repeat(&mut self, count: &Node, body: &Node) -> EvalResult {
        let trips = to_count(self.eval(count)?.into_number()?.floor());
        for _ in 0..trips {
            self.eval(body)?;
        }
        Ok(Value::Nothing)
    }

    /// Re-checks the predicate before every iteration; each iteration gets
    /// a fresh scope.
    fn eval_while(&mut self, predicate: &Node, body: &Node) -> EvalResult {
        while self.eval(predicate)?.into_bool("while")? {
            self.with_scope(|scoped| scoped.eval(body))?;
        }
        Ok(Value::Nothing)
    }

    /// A temporary listener is only registered if its predicate holds now.
    fn eval_listener(
        &mut self,
        predicate: &SharedNode,
        body: &SharedNode,
        persistence: Persistence,
    ) -> EvalResult {
        if persistence == Persistence::Temporary && !self.eval(predicate)?.into_bool("listener")? {
            return Ok(Value::Nothing);
        }
        self.env
            .create_listener(SharedNode::clone(predicate), SharedNode::clone(body), persistence);
        Ok(Value::Nothing)
    }
}
