//! Configuration types for decoding sessions.
//!
//! | Config Type | Purpose | Key Presets |
//! |-------------|---------|-------------|
//! | `SessionConfig` | Version policy, polling, replay chunking | `legacy()`, `strict()` |
//! | `PollingMode` | Whether sources may block | `Blocking`, `NonBlocking` |
//!
//! # Example
//!
//! ```
//! use slippstream::{PollingMode, SessionBuilder, SessionConfig};
//!
//! let builder = SessionBuilder::new().with_config(SessionConfig {
//!     polling: PollingMode::NonBlocking,
//!     ..SessionConfig::legacy()
//! });
//! ```

use crate::StreamError;

/// How a session asks its source for the next message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PollingMode {
    /// The source may wait until a message arrives.
    #[default]
    Blocking,
    /// The source returns immediately, with or without a message.
    NonBlocking,
}

/// Default number of raw bytes per message when replaying a file.
pub const DEFAULT_REPLAY_CHUNK_SIZE: usize = 4096;

/// Default bound on source messages read by one non-blocking step.
pub const DEFAULT_MAX_EVENTS_PER_STEP: usize = 10_000;

/// Settings for a [`Session`](crate::Session).
///
/// # Forward Compatibility
///
/// New fields may be added to this struct in future versions. Construct it with the
/// `..SessionConfig::default()` pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "SessionConfig has no effect unless passed to SessionBuilder::with_config()"]
pub struct SessionConfig {
    /// Decode streams older than [`SlippiVersion::MIN_SUPPORTED`](crate::SlippiVersion::MIN_SUPPORTED)
    /// in legacy mode instead of failing.
    ///
    /// Default: `false`
    pub allow_old_version: bool,

    /// Whether the source may block.
    ///
    /// Default: [`PollingMode::Blocking`]
    pub polling: PollingMode,

    /// Bytes per message when replaying a file. Must be nonzero.
    ///
    /// Default: 4096
    pub replay_chunk_size: usize,

    /// Source messages a non-blocking step reads before giving up with
    /// [`StepResult::Pending`](crate::StepResult::Pending).
    ///
    /// Default: 10 000
    pub max_events_per_step: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            allow_old_version: false,
            polling: PollingMode::Blocking,
            replay_chunk_size: DEFAULT_REPLAY_CHUNK_SIZE,
            max_events_per_step: DEFAULT_MAX_EVENTS_PER_STEP,
        }
    }
}

impl SessionConfig {
    /// Creates a new `SessionConfig` with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for old replays: legacy streams are decoded.
    pub fn legacy() -> Self {
        Self {
            allow_old_version: true,
            ..Self::default()
        }
    }

    /// Preset that only accepts streams with frame bookends. Same as the defaults.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// [`StreamError::InvalidRequest`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), StreamError> {
        if self.replay_chunk_size == 0 {
            return Err(StreamError::InvalidRequest {
                info: "replay_chunk_size must be at least 1".to_owned(),
            });
        }
        if self.max_events_per_step == 0 {
            return Err(StreamError::InvalidRequest {
                info: "max_events_per_step must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert!(SessionConfig::legacy().allow_old_version);
        assert_eq!(SessionConfig::strict(), SessionConfig::default());
        assert_eq!(SessionConfig::new().replay_chunk_size, 4096);
        assert_eq!(SessionConfig::new().polling, PollingMode::Blocking);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let config = SessionConfig {
            replay_chunk_size: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
        let config = SessionConfig {
            max_events_per_step: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(SessionConfig::default().validate().is_ok());
    }
}
