//! Words runtime driver.
//!
//! Wires the evaluator to the outside world:
//! - [`FrameLoop`]: the real-time scheduler that owns the world
//! - [`InputSender`]: how producers on other threads hand it statements
//! - [`RenderSurface`] and [`FrameLog`]: where each frame's snapshot goes
//! - [`FrameConfig`]: pacing and frame-limit knobs
//!
//! # Tracing
//!
//! Set `RUST_LOG` to see scheduler internals, e.g. `RUST_LOG=wordsc=debug`
//! for frame phases or `RUST_LOG=words_eval=trace` for action expansion.

use std::sync::Once;

pub mod config;
pub mod demo;
pub mod frame_loop;
pub mod input;
pub mod sink;

pub use config::{ConfigError, FrameConfig};
pub use frame_loop::{FrameLoop, FrameLoopHandle, FrameOutcome};
pub use input::InputSender;
pub use sink::{snapshot, FrameLog, ObjectSnapshot, RenderSurface};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber, once.
///
/// Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
