//! The statement queue between a producer and the frame loop.
//!
//! Producers (a console, a network listener, tests) may live on any thread
//! and push parsed top-level statements through an [`InputSender`]. The frame
//! loop is the only consumer and drains the queue at the start of a frame.

use crossbeam::channel::{self, Receiver, Sender};
use words_ir::SharedNode;

/// Cloneable producer end of the statement queue.
#[derive(Clone, Debug)]
pub struct InputSender {
    tx: Sender<SharedNode>,
}

impl InputSender {
    /// Queue a statement for the next frame.
    ///
    /// Returns `false` once the frame loop has gone away.
    pub fn send(&self, statement: SharedNode) -> bool {
        self.tx.send(statement).is_ok()
    }
}

/// Create an unbounded statement queue.
pub(crate) fn input_queue() -> (InputSender, Receiver<SharedNode>) {
    let (tx, rx) = channel::unbounded();
    (InputSender { tx }, rx)
}
