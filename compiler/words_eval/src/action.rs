//! Queued actions and the expand-then-execute protocol.
//!
//! Every object owns a FIFO of `Action`s. An action is either *compound*
//! (it still has to be expanded against the world) or *primitive* (it can
//! run in a single frame). On its turn an object expands compound actions at
//! the head of its queue in place until the head is primitive, then executes
//! exactly that one primitive.
//!
//! Moves and waits peel off one unit per expansion and leave the remainder
//! queued behind it, so a long distance never materializes all at once. A
//! resolved move of zero becomes a unit wait, a wait of zero becomes nothing,
//! and custom actions are bounded by [`EXPANSION_LIMIT`] per turn.

use std::fmt;

use rand::Rng;
use rustc_hash::FxHashMap;
use words_ir::{Direction, SharedNode};

use crate::environment::Environment;
use crate::errors::{action_not_found, expansion_limit, invalid_type, invariant, EvalError};
use crate::interpreter::Interpreter;
use crate::object::ObjectId;
use crate::value::{to_count, Property};

/// Maximum number of expansions a single object may perform in one turn.
pub const EXPANSION_LIMIT: usize = 1000;

/// Discriminant of an executed primitive, kept for predicates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Move,
    Say,
    Wait,
    Stop,
    Assign,
    Custom,
}

impl ActionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Say => "say",
            Self::Wait => "wait",
            Self::Stop => "stop",
            Self::Assign => "assign",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distance of a move, from unevaluated to a single grid unit.
#[derive(Clone, Debug, PartialEq)]
enum Distance {
    Expression(SharedNode),
    Steps(u64),
    Unit,
}

/// A move in a cardinal direction.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveAction {
    direction: Direction,
    distance: Distance,
}

impl MoveAction {
    /// Move whose distance is evaluated when the action is first expanded.
    ///
    /// `Anywhere` is resolved here, once, to a uniformly random cardinal.
    pub fn from_expression(direction: Direction, distance: SharedNode, rng: &mut impl Rng) -> Self {
        MoveAction {
            direction: resolve_direction(direction, rng),
            distance: Distance::Expression(distance),
        }
    }

    /// Move by an already known distance.
    ///
    /// Negative distances flip the direction; the magnitude is rounded to the
    /// nearest whole number of units.
    pub fn new(direction: Direction, distance: f64, rng: &mut impl Rng) -> Result<Self, EvalError> {
        let (direction, steps) = normalize_move(resolve_direction(direction, rng), distance)?;
        Ok(MoveAction {
            direction,
            distance: Distance::Steps(steps),
        })
    }

    /// A single-unit move; primitive.
    pub fn unit(direction: Direction) -> Self {
        MoveAction {
            direction,
            distance: Distance::Unit,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Resolved whole distance, if the expression has been evaluated.
    pub fn steps(&self) -> Option<u64> {
        match self.distance {
            Distance::Expression(_) => None,
            Distance::Steps(n) => Some(n),
            Distance::Unit => Some(1),
        }
    }

    fn settle(&mut self, interpreter: &mut Interpreter<'_>) -> Result<(), EvalError> {
        if let Distance::Expression(node) = &self.distance {
            let distance = interpreter.eval(node)?.into_number()?;
            let (direction, steps) = normalize_move(self.direction, distance)?;
            self.direction = direction;
            self.distance = Distance::Steps(steps);
        }
        Ok(())
    }

    fn expand(mut self, interpreter: &mut Interpreter<'_>) -> Result<Vec<Action>, EvalError> {
        self.settle(interpreter)?;
        let steps = self.steps().unwrap_or(0);
        tracing::trace!(direction = %self.direction, steps, "expanding move");
        let unit = Action::Move(MoveAction::unit(self.direction));
        Ok(match steps {
            0 => vec![Action::Wait(WaitAction::unit())],
            1 => vec![unit],
            _ => vec![
                unit,
                Action::Move(MoveAction {
                    direction: self.direction,
                    distance: Distance::Steps(steps - 1),
                }),
            ],
        })
    }
}

/// Frames to wait.
#[derive(Clone, Debug, PartialEq)]
enum Frames {
    Expression(SharedNode),
    Count(u64),
    Unit,
}

/// Hold still for some number of frames.
#[derive(Clone, Debug, PartialEq)]
pub struct WaitAction {
    frames: Frames,
}

impl WaitAction {
    pub fn from_expression(frames: SharedNode) -> Self {
        WaitAction {
            frames: Frames::Expression(frames),
        }
    }

    pub fn frames(count: u64) -> Self {
        WaitAction {
            frames: Frames::Count(count),
        }
    }

    pub fn unit() -> Self {
        WaitAction { frames: Frames::Unit }
    }

    fn settle(&mut self, interpreter: &mut Interpreter<'_>) -> Result<(), EvalError> {
        if let Frames::Expression(node) = &self.frames {
            let frames = interpreter.eval(node)?.into_number()?;
            self.frames = Frames::Count(whole_units(frames.max(0.0))?);
        }
        Ok(())
    }

    fn expand(mut self, interpreter: &mut Interpreter<'_>) -> Result<Vec<Action>, EvalError> {
        self.settle(interpreter)?;
        let count = match self.frames {
            Frames::Count(n) => n,
            Frames::Expression(_) | Frames::Unit => 1,
        };
        let unit = Action::Wait(WaitAction::unit());
        Ok(match count {
            0 => Vec::new(),
            1 => vec![unit],
            _ => vec![unit, Action::wait_frames(count - 1)],
        })
    }
}

/// Text an object will say.
#[derive(Clone, Debug, PartialEq)]
enum Message {
    Expression(SharedNode),
    Text(String),
}

/// Replace the object's display message.
#[derive(Clone, Debug, PartialEq)]
pub struct SayAction {
    message: Message,
}

impl SayAction {
    pub fn from_expression(message: SharedNode) -> Self {
        SayAction {
            message: Message::Expression(message),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        SayAction {
            message: Message::Text(text.into()),
        }
    }

    fn settle(&mut self, interpreter: &mut Interpreter<'_>) -> Result<(), EvalError> {
        if let Message::Expression(node) = &self.message {
            let text = interpreter.eval(node)?.into_string()?;
            self.message = Message::Text(text);
        }
        Ok(())
    }
}

/// Invoke a custom action defined on the object's class chain.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomAction {
    name: String,
    arguments: FxHashMap<String, Property>,
}

impl CustomAction {
    pub fn new(name: impl Into<String>, arguments: FxHashMap<String, Property>) -> Self {
        CustomAction {
            name: name.into(),
            arguments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the action body with the subject set and the parameters bound.
    ///
    /// Whatever the body queues on the subject becomes the expansion; the
    /// rest of the subject's queue is set aside meanwhile and put back after.
    fn expand(self, env: &mut Environment, subject: ObjectId) -> Result<Vec<Action>, EvalError> {
        let class = env.object(subject)?.class();
        let Some(definition) = env.classes().resolve_custom_action(class, &self.name).cloned() else {
            let class_name = env.classes().get(class).name().to_string();
            return Err(action_not_found(&class_name, &self.name));
        };
        tracing::trace!(action = %self.name, %subject, "expanding custom action");

        let mut arguments = self.arguments;
        let bindings: Vec<(String, Property)> = definition
            .parameters
            .iter()
            .map(|name| (name.clone(), arguments.remove(name).unwrap_or_default()))
            .collect();

        let rest = env.object_mut(subject)?.take_queue();
        let mut interpreter = Interpreter::new(env);
        let result = interpreter.with_bindings(bindings, |scoped| {
            scoped.env.push_subject(subject);
            // Queueing settles pending expressions while a subject is set,
            // so nothing produced here still refers to the parameters.
            let result = scoped.eval(&definition.body).map(|_| {
                scoped
                    .env
                    .objects_mut()
                    .get_mut(subject)
                    .map(|object| Vec::from(object.take_queue()))
                    .unwrap_or_default()
            });
            scoped.env.pop_subject();
            result
        });

        if let Some(object) = env.objects_mut().get_mut(subject) {
            // Anything left behind by a failed body is dropped with the action.
            let queue = object.queue_mut();
            queue.clear();
            queue.extend(rest);
        }
        result
    }
}

/// A queued action.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Move(MoveAction),
    Say(SayAction),
    Wait(WaitAction),
    /// Clear the rest of the queue.
    Stop,
    /// Set own properties on the object.
    Assign(Vec<(String, Property)>),
    Custom(CustomAction),
}

impl Action {
    pub fn wait_frames(count: u64) -> Self {
        Action::Wait(WaitAction::frames(count))
    }

    pub fn say(text: impl Into<String>) -> Self {
        Action::Say(SayAction::text(text))
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Move(_) => ActionKind::Move,
            Action::Say(_) => ActionKind::Say,
            Action::Wait(_) => ActionKind::Wait,
            Action::Stop => ActionKind::Stop,
            Action::Assign(_) => ActionKind::Assign,
            Action::Custom(_) => ActionKind::Custom,
        }
    }

    /// Whether the action can be executed without further expansion.
    pub fn is_primitive(&self) -> bool {
        match self {
            Action::Move(m) => m.distance == Distance::Unit,
            Action::Wait(w) => w.frames == Frames::Unit,
            Action::Say(_) | Action::Stop | Action::Assign(_) => true,
            Action::Custom(_) => false,
        }
    }

    /// Evaluate any pending expression in the current scope.
    pub(crate) fn settle(&mut self, interpreter: &mut Interpreter<'_>) -> Result<(), EvalError> {
        match self {
            Action::Move(m) => m.settle(interpreter),
            Action::Wait(w) => w.settle(interpreter),
            Action::Say(s) => s.settle(interpreter),
            Action::Stop | Action::Assign(_) | Action::Custom(_) => Ok(()),
        }
    }

    /// Expand a compound action into the actions that replace it.
    pub fn expand(self, env: &mut Environment, subject: ObjectId) -> Result<Vec<Action>, EvalError> {
        match self {
            Action::Move(m) => m.expand(&mut Interpreter::new(env)),
            Action::Wait(w) => w.expand(&mut Interpreter::new(env)),
            Action::Custom(c) => c.expand(env, subject),
            primitive @ (Action::Say(_) | Action::Stop | Action::Assign(_)) => Ok(vec![primitive]),
        }
    }

    /// Execute a primitive action against its object.
    pub fn execute(self, env: &mut Environment, subject: ObjectId) -> Result<(), EvalError> {
        let kind = self.kind();
        match self {
            Action::Move(m) => env.object_mut(subject)?.step(m.direction),
            Action::Say(mut s) => {
                s.settle(&mut Interpreter::new(env))?;
                if let Message::Text(text) = s.message {
                    env.object_mut(subject)?.set_message(Some(text));
                }
            }
            Action::Wait(_) => {}
            Action::Stop => env.object_mut(subject)?.queue_mut().clear(),
            Action::Assign(properties) => {
                let object = env.object_mut(subject)?;
                for (name, value) in properties {
                    object.set_property(&name, value);
                }
            }
            Action::Custom(c) => {
                return Err(invariant(format!(
                    "custom action {} executed without expansion",
                    c.name
                )))
            }
        }
        if let Some(object) = env.objects_mut().get_mut(subject) {
            object.set_last_action(Some(kind));
        }
        Ok(())
    }
}

/// Give one object its turn: expand the head of its queue until it is
/// primitive, then execute that primitive.
///
/// A failing expansion or execution discards the action involved; the rest
/// of the queue is untouched and proceeds next frame.
pub fn advance_object(env: &mut Environment, subject: ObjectId) -> Result<(), EvalError> {
    let Some(object) = env.objects_mut().get_mut(subject) else {
        return Ok(());
    };
    object.set_last_action(None);

    let mut expansions = 0;
    loop {
        let Some(object) = env.objects_mut().get_mut(subject) else {
            return Ok(());
        };
        let queue = object.queue_mut();
        let Some(action) = queue.pop_front() else {
            return Ok(());
        };
        if action.is_primitive() {
            return action.execute(env, subject);
        }
        if expansions == EXPANSION_LIMIT {
            return Err(expansion_limit(EXPANSION_LIMIT));
        }
        expansions += 1;

        let expansion = action.expand(env, subject)?;
        let Some(object) = env.objects_mut().get_mut(subject) else {
            return Ok(());
        };
        let queue = object.queue_mut();
        for action in expansion.into_iter().rev() {
            queue.push_front(action);
        }
    }
}

fn resolve_direction(direction: Direction, rng: &mut impl Rng) -> Direction {
    if direction.is_cardinal() {
        direction
    } else {
        Direction::CARDINAL[rng.gen_range(0..Direction::CARDINAL.len())]
    }
}

fn normalize_move(direction: Direction, distance: f64) -> Result<(Direction, u64), EvalError> {
    let direction = if distance < 0.0 {
        direction.opposite()
    } else {
        direction
    };
    Ok((direction, whole_units(distance.abs())?))
}

/// Round a magnitude to whole units, half away from zero.
fn whole_units(magnitude: f64) -> Result<u64, EvalError> {
    if !magnitude.is_finite() {
        return Err(invalid_type("a finite number", magnitude));
    }
    Ok(to_count(magnitude.round()))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
