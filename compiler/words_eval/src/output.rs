//! Output handlers for the user-visible channels.
//!
//! Reported runtime errors and the frame log go through an `OutputHandler`
//! rather than straight to a stream, so the same world can write to the
//! terminal in the binary and into a buffer in tests.
//!
//! Enum dispatch instead of a trait object: there are exactly three
//! destinations and the set is closed.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Which standard stream a `StreamOutput` writes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Writes lines to a standard stream.
#[derive(Debug)]
pub struct StreamOutput {
    stream: Stream,
}

impl StreamOutput {
    pub fn new(stream: Stream) -> Self {
        StreamOutput { stream }
    }

    pub fn println(&self, msg: &str) {
        // A closed pipe is not worth failing a frame over.
        let _ = match self.stream {
            Stream::Stdout => writeln!(std::io::stdout().lock(), "{msg}"),
            Stream::Stderr => writeln!(std::io::stderr().lock(), "{msg}"),
        };
    }
}

/// Captures lines into a buffer.
#[derive(Debug, Default)]
pub struct BufferOutput {
    buffer: Mutex<String>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn println(&self, msg: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    pub fn get_output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

/// Output destination.
#[derive(Debug)]
pub enum OutputHandler {
    Stream(StreamOutput),
    /// Captures to a buffer (testing).
    Buffer(BufferOutput),
    /// Discards everything.
    Silent,
}

impl OutputHandler {
    /// Write one line.
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stream(h) => h.println(msg),
            Self::Buffer(h) => h.println(msg),
            Self::Silent => {}
        }
    }

    /// Everything captured so far; empty for handlers that don't capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(h) => h.get_output(),
            Self::Stream(_) | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Output handler shared between the environment and the frame loop.
pub type SharedOutput = Arc<OutputHandler>;

pub fn stdout_handler() -> SharedOutput {
    Arc::new(OutputHandler::Stream(StreamOutput::new(Stream::Stdout)))
}

pub fn stderr_handler() -> SharedOutput {
    Arc::new(OutputHandler::Stream(StreamOutput::new(Stream::Stderr)))
}

pub fn buffer_handler() -> SharedOutput {
    Arc::new(OutputHandler::Buffer(BufferOutput::new()))
}

pub fn silent_handler() -> SharedOutput {
    Arc::new(OutputHandler::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn buffer_collects_lines() {
        let out = buffer_handler();
        out.println("frame #: 1");
        out.println("alex (0, 1)");
        assert_eq!(out.get_output(), "frame #: 1\nalex (0, 1)\n");
        out.clear();
        assert_eq!(out.get_output(), "");
    }

    #[test]
    fn non_capturing_handlers_report_nothing() {
        let silent = silent_handler();
        silent.println("dropped");
        assert_eq!(silent.get_output(), "");
        assert_eq!(stderr_handler().get_output(), "");
    }

    #[test]
    fn clones_share_the_buffer() {
        let out = buffer_handler();
        let other = Arc::clone(&out);
        other.println("hello");
        assert_eq!(out.get_output(), "hello\n");
    }
}
