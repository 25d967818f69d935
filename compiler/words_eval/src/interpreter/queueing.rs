//! Enqueueing actions on objects.
//!
//! Move distances, wait lengths and say messages stay unevaluated until the
//! action engine reaches them, except inside a custom action body, where
//! they are evaluated on the spot while the parameters are bound. Queued
//! assignments and custom action arguments are always evaluated here, in
//! the scope of the queueing statement.

use rustc_hash::FxHashMap;
use words_ir::{Direction, Node, SharedNode};

use super::{Inherited, Interpreter};
use crate::action::{Action, CustomAction, MoveAction, SayAction, WaitAction};
use crate::errors::{action_not_found, missing_context, EvalResult};
use crate::object::ObjectId;
use crate::value::{Property, Value};

const IN_QUEUED_ACTION: &str = "a queued custom action";

impl Interpreter<'_> {
    /// Append `action` to the object's queue, or put it first when `now`.
    fn enqueue(&mut self, subject: ObjectId, mut action: Action, now: bool) -> EvalResult {
        // The target may be any object, not just the one being expanded.
        if self.env.current_subject().is_some() {
            action.settle(self)?;
        }
        let object = self.env.object_mut(subject)?;
        tracing::trace!(object = object.name(), action = %action.kind(), now, "action queued");
        if now {
            object.enqueue_front(action);
        } else {
            object.enqueue(action);
        }
        Ok(Value::Nothing)
    }

    pub(super) fn eval_queue_move(
        &mut self,
        subject: &Node,
        direction: Direction,
        distance: &SharedNode,
        now: bool,
    ) -> EvalResult {
        let subject = self.eval_subject(subject)?;
        let action =
            MoveAction::from_expression(direction, SharedNode::clone(distance), self.env.rng_mut());
        self.enqueue(subject, Action::Move(action), now)
    }

    pub(super) fn eval_queue_say(
        &mut self,
        subject: &Node,
        message: &SharedNode,
        now: bool,
    ) -> EvalResult {
        let subject = self.eval_subject(subject)?;
        let action = SayAction::from_expression(SharedNode::clone(message));
        self.enqueue(subject, Action::Say(action), now)
    }

    pub(super) fn eval_queue_wait(
        &mut self,
        subject: &Node,
        frames: &SharedNode,
        now: bool,
    ) -> EvalResult {
        let subject = self.eval_subject(subject)?;
        let action = WaitAction::from_expression(SharedNode::clone(frames));
        self.enqueue(subject, Action::Wait(action), now)
    }

    pub(super) fn eval_queue_stop(&mut self, subject: &Node, now: bool) -> EvalResult {
        let subject = self.eval_subject(subject)?;
        self.enqueue(subject, Action::Stop, now)
    }

    pub(super) fn eval_queue_assign(
        &mut self,
        subject: &Node,
        assignments: &Node,
        now: bool,
    ) -> EvalResult {
        let subject = self.eval_subject(subject)?;
        let mut properties = Vec::new();
        self.eval_with(assignments, Inherited::PropertiesBeingQueued(&mut properties))?;
        self.enqueue(subject, Action::Assign(properties), now)
    }

    /// The action must exist on the subject's class chain when queued.
    pub(super) fn eval_queue_action(
        &mut self,
        subject: &Node,
        action: &str,
        arguments: Option<&SharedNode>,
        now: bool,
    ) -> EvalResult {
        let subject = self.eval_subject(subject)?;
        let class = self.env.object(subject)?.class();
        if self.env.resolve_custom_action(class, action).is_none() {
            return Err(action_not_found(self.env.classes().get(class).name(), action));
        }
        let mut bound = FxHashMap::default();
        if let Some(arguments) = arguments {
            self.eval_with(arguments, Inherited::ArgumentsBeingBound(&mut bound))?;
        }
        self.enqueue(subject, Action::Custom(CustomAction::new(action, bound)), now)
    }

    pub(super) fn eval_argument_list(
        &mut self,
        items: &[SharedNode],
        inherited: Inherited<'_>,
    ) -> EvalResult {
        let Inherited::ArgumentsBeingBound(bound) = inherited else {
            return Err(missing_context("argument list", IN_QUEUED_ACTION));
        };
        for item in items {
            self.eval_with(item, Inherited::ArgumentsBeingBound(&mut *bound))?;
        }
        Ok(Value::Nothing)
    }

    pub(super) fn eval_argument(
        &mut self,
        name: &str,
        value: &Node,
        inherited: Inherited<'_>,
    ) -> EvalResult {
        let Inherited::ArgumentsBeingBound(bound) = inherited else {
            return Err(missing_context("argument", IN_QUEUED_ACTION));
        };
        let value = Property::try_from(self.eval(value)?)?;
        bound.insert(name.to_string(), value);
        Ok(Value::Nothing)
    }
}
