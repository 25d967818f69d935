//! Event listeners re-checked once per frame.
//!
//! A permanent listener fires its body on every frame its predicate holds.
//! A temporary listener is only registered while its predicate already
//! holds, keeps firing while it holds, and is dropped on the first frame it
//! doesn't. A listener whose predicate or body fails is kept.

use words_ir::{Persistence, SharedNode};

use crate::environment::Environment;
use crate::errors::EvalError;
use crate::interpreter::Interpreter;

/// A predicate-guarded statement list.
#[derive(Clone, Debug)]
pub struct EventListener {
    predicate: SharedNode,
    body: SharedNode,
    persistence: Persistence,
}

impl EventListener {
    pub fn new(predicate: SharedNode, body: SharedNode, persistence: Persistence) -> Self {
        EventListener {
            predicate,
            body,
            persistence,
        }
    }

    /// Run the body if the predicate holds; returns whether to stay registered.
    pub fn execute(&self, env: &mut Environment) -> Result<bool, EvalError> {
        let mut interpreter = Interpreter::new(env);
        let holds = interpreter
            .eval(&self.predicate)?
            .into_bool("listener")
            .map_err(|e| e.with_line(self.predicate.line))?;
        if holds {
            interpreter.eval(&self.body)?;
        }
        Ok(match self.persistence {
            Persistence::Permanent => true,
            Persistence::Temporary => holds,
        })
    }
}

/// Evaluate every listener once, in registration order.
///
/// Listeners registered during the pass wait for the next frame. If a body
/// resets the world, the remaining listeners of the old world are dropped.
pub fn run_listeners(env: &mut Environment) {
    let epoch = env.epoch();
    let listeners = env.take_listeners();
    let mut kept = Vec::with_capacity(listeners.len());
    for listener in listeners {
        if env.epoch() != epoch {
            break;
        }
        match listener.execute(env) {
            Ok(true) => kept.push(listener),
            Ok(false) => tracing::debug!("temporary listener expired"),
            Err(err) => {
                env.report(&err);
                kept.push(listener);
            }
        }
    }
    if env.epoch() == epoch {
        env.restore_listeners(kept);
    }
}
