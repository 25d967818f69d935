//! Words IR - syntax tree types for the Words grid-world language.
//!
//! This crate contains the data structures produced by the (external) parser
//! and consumed by the evaluator:
//! - `Node`/`NodeKind`: the tagged syntax tree, one variant per evaluation rule
//! - `SharedNode`: cheaply cloneable handle used wherever the evaluator keeps
//!   a subtree alive past a single statement (listeners, queued actions,
//!   custom action bodies)
//! - `Direction` and `Position` for grid coordinates
//! - `BinaryOp` for arithmetic, relational and logical operators
//!
//! Every node carries the source line it came from so runtime errors can be
//! reported against user input.

pub mod build;
mod grid;
mod node;
mod operators;

pub use grid::{Direction, Position};
pub use node::{AssignTarget, Node, NodeKind, Persistence, SharedNode};
pub use operators::BinaryOp;
