//! Words Eval - evaluator and world model for the Words grid-world language.
//!
//! # Architecture
//!
//! - `Value`/`Property`: runtime values and their coercion rules
//! - `ClassTable`: single-inheritance classes in an append-only arena
//! - `ObjectStore`: world objects keyed by `ObjectId`, never reused
//! - `Environment`: scope stack plus the class, object and listener registries
//! - `Interpreter`: one evaluation rule per `NodeKind`
//! - `action`: queued actions and the expand-then-execute protocol
//! - `listener`: predicate-guarded callbacks run once per frame
//!
//! A frame driver (see `wordsc`) feeds top-level statements to
//! [`Interpreter::execute_statement`], calls [`advance_object`] for every
//! live object, then [`run_listeners`].

pub mod action;
mod class;
mod environment;
pub mod errors;
pub mod interpreter;
pub mod listener;
mod object;
mod operators;
mod output;
mod value;

pub use action::{advance_object, Action, ActionKind, MoveAction, EXPANSION_LIMIT};
pub use class::{Class, ClassId, ClassTable, CustomActionDefinition, ROOT_CLASS};
pub use environment::Environment;
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{Inherited, Interpreter, ScopedInterpreter};
pub use listener::{run_listeners, EventListener};
pub use object::{ObjectId, ObjectStore, WorldObject};
pub use operators::{evaluate_binary, evaluate_negate, evaluate_not};
pub use output::{
    buffer_handler, silent_handler, stderr_handler, stdout_handler, BufferOutput, OutputHandler,
    SharedOutput, Stream, StreamOutput,
};
pub use value::{compare_values, format_number, parse_number, values_equal, Property, Value, ValueKind};
