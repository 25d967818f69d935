//! Frame scheduler configuration.

use std::time::Duration;

/// Default target time between frames.
pub const DEFAULT_FRAME_DELAY_MS: u64 = 250;

/// Knobs recognised by the frame scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameConfig {
    /// Target inter-frame delay; `0` disables pacing.
    pub frame_delay_ms: u64,
    /// Stop after `max_frames` when no render surface is attached.
    pub frame_limit_enabled: bool,
    pub max_frames: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        FrameConfig {
            frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
            frame_limit_enabled: false,
            max_frames: 0,
        }
    }
}

/// Error from parsing a command-line option.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("invalid value `{value}` for {option}")]
    InvalidValue { option: &'static str, value: String },
}

impl FrameConfig {
    /// Configuration for batch and test runs: no pacing, no limit.
    pub fn unpaced() -> Self {
        FrameConfig {
            frame_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Build a configuration from command-line style options.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        for arg in args {
            config.apply_arg(arg.as_ref())?;
        }
        Ok(config)
    }

    /// Apply one `--delay=<ms>`, `--frames=<n>` or `--no-pacing` option.
    pub fn apply_arg(&mut self, arg: &str) -> Result<(), ConfigError> {
        if arg == "--no-pacing" {
            self.frame_delay_ms = 0;
        } else if let Some(value) = arg.strip_prefix("--delay=") {
            self.frame_delay_ms = parse_count("--delay", value)?;
        } else if let Some(value) = arg.strip_prefix("--frames=") {
            self.max_frames = parse_count("--frames", value)?;
            self.frame_limit_enabled = true;
        } else {
            return Err(ConfigError::UnknownOption(arg.to_string()));
        }
        Ok(())
    }

    /// Sleep between frames, or `None` when pacing is off.
    pub fn frame_delay(&self) -> Option<Duration> {
        (self.frame_delay_ms > 0).then(|| Duration::from_millis(self.frame_delay_ms))
    }

    /// Frame count after which an unrendered run stops.
    pub fn frame_limit(&self) -> Option<u64> {
        self.frame_limit_enabled.then_some(self.max_frames)
    }
}

fn parse_count(option: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        option,
        value: value.to_string(),
    })
}
