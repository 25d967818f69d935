//! The frame scheduler.
//!
//! A frame runs four phases in a fixed order:
//!
//! 1. drain every statement queued since the last frame into the evaluator
//! 2. advance each live object's action queue by one primitive
//! 3. re-check every listener
//! 4. hand a snapshot to the render surface, or write it to the frame log
//!
//! Statements only enter the world in phase 1, so nothing a producer sends
//! can interleave with action or listener processing. Errors from a single
//! statement, object or listener are reported and never end the frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::Receiver;
use words_eval::{advance_object, run_listeners, stdout_handler, Environment, Interpreter, SharedOutput};
use words_ir::SharedNode;

use crate::config::FrameConfig;
use crate::input::{input_queue, InputSender};
use crate::sink::{snapshot, FrameLog, RenderSurface};

/// Whether the scheduler should keep going after a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// `exit` ran, or the frame limit was reached.
    Finished,
}

/// Asks a running [`FrameLoop`] to stop before its next frame.
#[derive(Clone, Debug)]
pub struct FrameLoopHandle {
    stop: Arc<AtomicBool>,
}

impl FrameLoopHandle {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// Owns the world and drives it one frame at a time.
pub struct FrameLoop {
    env: Environment,
    config: FrameConfig,
    input: Receiver<SharedNode>,
    sender: InputSender,
    surface: Option<Box<dyn RenderSurface + Send>>,
    log: FrameLog,
    frames: u64,
    finished: bool,
    stop: Arc<AtomicBool>,
}

impl FrameLoop {
    /// A loop over an empty world, logging frames to stdout.
    pub fn new(config: FrameConfig) -> Self {
        Self::with_environment(Environment::new(), config)
    }

    pub fn with_environment(env: Environment, config: FrameConfig) -> Self {
        let (sender, input) = input_queue();
        FrameLoop {
            env,
            config,
            input,
            sender,
            surface: None,
            log: FrameLog::new(stdout_handler()),
            frames: 0,
            finished: false,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Render frames to `surface` instead of the log. Disables the frame limit.
    #[must_use]
    pub fn with_surface(mut self, surface: impl RenderSurface + Send + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Write the frame log somewhere other than stdout.
    #[must_use]
    pub fn with_log_output(mut self, output: SharedOutput) -> Self {
        self.log = FrameLog::new(output);
        self
    }

    /// A producer end of the input queue.
    pub fn sender(&self) -> InputSender {
        self.sender.clone()
    }

    /// Queue a statement for the next frame.
    pub fn enqueue(&self, statement: SharedNode) {
        // The loop holds its own receiver, so this cannot fail.
        let _ = self.sender.send(statement);
    }

    pub fn handle(&self) -> FrameLoopHandle {
        FrameLoopHandle {
            stop: Arc::clone(&self.stop),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Frames executed so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Run paced frames until finished or stopped. Returns the frame count.
    pub fn run(&mut self) -> u64 {
        tracing::debug!(config = ?self.config, "frame loop starting");
        while !self.finished {
            if self.stop.load(Ordering::Acquire) {
                tracing::debug!(frames = self.frames, "frame loop stopped");
                break;
            }
            if let Some(delay) = self.config.frame_delay() {
                sleep_for(delay);
            }
            self.execute_single_frame();
        }
        self.frames
    }

    /// Run `frames` frames back to back, without pacing.
    pub fn fast_forward(&mut self, frames: u64) {
        for _ in 0..frames {
            self.execute_single_frame();
        }
    }

    /// Run exactly one frame.
    #[tracing::instrument(level = "debug", skip_all, fields(frame = self.frames + 1))]
    pub fn execute_single_frame(&mut self) -> FrameOutcome {
        self.frames += 1;

        let mut statements = 0usize;
        while let Ok(statement) = self.input.try_recv() {
            Interpreter::new(&mut self.env).execute_statement(&statement);
            statements += 1;
        }
        tracing::debug!(statements, "input drained");

        for id in self.env.get_objects() {
            // An earlier object's turn may have removed this one.
            if !self.env.objects().contains(id) {
                continue;
            }
            if let Err(err) = advance_object(&mut self.env, id) {
                tracing::debug!(object = %id, "action discarded");
                self.env.report(&err);
            }
        }

        run_listeners(&mut self.env);

        let objects = snapshot(&self.env);
        let limit_reached = match self.surface.as_mut() {
            Some(surface) => {
                surface.clear();
                for object in &objects {
                    object.draw(&mut **surface);
                }
                surface.render();
                false
            }
            None => {
                self.log.write_frame(self.frames, &objects);
                self.config
                    .frame_limit()
                    .is_some_and(|limit| self.frames >= limit)
            }
        };

        if limit_reached || self.env.exit_requested() {
            tracing::debug!(limit_reached, "frame loop finished");
            self.finished = true;
            FrameOutcome::Finished
        } else {
            FrameOutcome::Continue
        }
    }
}

/// Sleep until `delay` has elapsed, resuming with the remainder after an
/// early wake-up rather than starting over.
fn sleep_for(delay: Duration) {
    let deadline = Instant::now() + delay;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep(deadline - now);
    }
}
