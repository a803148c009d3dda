use std::path::Path;
use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::sessions::stream_session::Session;
use crate::source::{EventSource, ReplayFileSource};
use crate::report_violation_to;
use crate::telemetry::{ViolationKind, ViolationObserver, ViolationSeverity};
use crate::zero_index::ZeroIndexTable;
use crate::{ReplayFile, StreamError};

// Re-export config types for code that imports them from the builder
pub use crate::sessions::config::{PollingMode, SessionConfig};

/// The [`SessionBuilder`] builds decoding sessions.
///
/// After setting all appropriate values, use [`SessionBuilder::start_session`] or
/// [`SessionBuilder::start_replay_session`] to consume the builder.
///
/// ```no_run
/// use slippstream::{SessionBuilder, ZeroIndexTable};
///
/// # fn main() -> Result<(), slippstream::StreamError> {
/// let session = SessionBuilder::new()
///     .with_zero_index_table(ZeroIndexTable::from_path("zero_index.csv")?)
///     .with_replay_chunk_size(1024)?
///     .start_replay_session("game.slp")?;
/// # Ok(())
/// # }
/// ```
#[must_use = "SessionBuilder must be consumed by calling a start_*_session method"]
pub struct SessionBuilder {
    config: SessionConfig,
    zero_index: ZeroIndexTable,
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

impl std::fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("config", &self.config)
            .field("zero_index", &self.zero_index.len())
            .field("violation_observer", &self.violation_observer.is_some())
            .finish()
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// Construct a new builder with all values set to their defaults.
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            zero_index: ZeroIndexTable::builtin(),
            violation_observer: None,
        }
    }

    /// Replaces every [`SessionConfig`] setting at once.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Decode streams that predate frame bookends instead of failing on them.
    pub fn with_allow_old_version(mut self, allow: bool) -> Self {
        self.config.allow_old_version = allow;
        self
    }

    /// Sets how the session polls its source.
    pub fn with_polling_mode(mut self, mode: PollingMode) -> Self {
        self.config.polling = mode;
        self
    }

    /// Sets the table of zero-indexed `(character, action)` pairs.
    ///
    /// The default table is empty. Starting a session with an empty table reports a
    /// [`ViolationKind::Configuration`] warning, since action frames are then left
    /// exactly as the console sent them.
    pub fn with_zero_index_table(mut self, table: ZeroIndexTable) -> Self {
        self.zero_index = table;
        self
    }

    /// Sets a custom observer for absorbed problems.
    ///
    /// Without one, problems are logged through `tracing`.
    ///
    /// ```
    /// use slippstream::SessionBuilder;
    /// use slippstream::telemetry::CollectingObserver;
    /// use std::sync::Arc;
    ///
    /// let observer = Arc::new(CollectingObserver::new());
    /// let builder = SessionBuilder::new().with_violation_observer(observer.clone());
    /// // After decoding, inspect observer.violations()
    /// ```
    pub fn with_violation_observer(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.violation_observer = Some(observer);
        self
    }

    /// Sets how many raw bytes each replay message carries.
    ///
    /// # Errors
    ///
    /// [`StreamError::InvalidRequest`] if `size` is 0.
    pub fn with_replay_chunk_size(mut self, size: usize) -> Result<Self, StreamError> {
        if size == 0 {
            return Err(StreamError::InvalidRequest {
                info: "replay chunk size must be at least 1".to_owned(),
            });
        }
        self.config.replay_chunk_size = size;
        Ok(self)
    }

    /// Connects `source` and starts a session reading from it.
    ///
    /// # Errors
    ///
    /// [`StreamError::InvalidRequest`] for an invalid configuration, or whatever the
    /// source's `connect` returns.
    pub fn start_session<S: EventSource>(self, mut source: S) -> Result<Session<S>, StreamError> {
        self.config.validate()?;
        source.connect()?;

        if self.zero_index.is_empty() {
            report_violation_to!(
                &self.violation_observer,
                ViolationSeverity::Warning,
                ViolationKind::Configuration,
                "zero-index table is empty; action frames will not be normalized"
            );
        }

        let mut dispatcher = Dispatcher::new(self.config.allow_old_version)
            .with_zero_index_table(self.zero_index);
        if let Some(observer) = &self.violation_observer {
            dispatcher = dispatcher.with_violation_observer(Arc::clone(observer));
        }
        Ok(Session::new(source, dispatcher, self.config))
    }

    /// Reads the replay at `path` and starts a session over its event stream.
    ///
    /// # Errors
    ///
    /// [`StreamError::Io`] or [`StreamError::MalformedReplay`] if the file cannot be
    /// read, otherwise as [`SessionBuilder::start_session`]. Metadata entries that
    /// could not be read are reported as [`ViolationKind::Replay`] warnings.
    pub fn start_replay_session(
        self,
        path: impl AsRef<Path>,
    ) -> Result<Session<ReplayFileSource>, StreamError> {
        let replay = ReplayFile::from_path(path)?;
        for warning in &replay.warnings {
            report_violation_to!(
                &self.violation_observer,
                ViolationSeverity::Warning,
                ViolationKind::Replay,
                "{}",
                warning
            );
        }
        let source = ReplayFileSource::new(replay, self.config.replay_chunk_size)?;
        self.start_session(source)
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
    use crate::source::QueuedSource;
    use crate::telemetry::CollectingObserver;
    use crate::{assert_no_violations, assert_violation};

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(matches!(
            SessionBuilder::new().with_replay_chunk_size(0),
            Err(StreamError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn invalid_config_fails_at_start() {
        let config = SessionConfig {
            max_events_per_step: 0,
            ..SessionConfig::default()
        };
        let result = SessionBuilder::new()
            .with_config(config)
            .start_session(QueuedSource::new());
        assert!(result.is_err());
    }

    #[test]
    fn builder_settings_reach_the_session() {
        let session = SessionBuilder::new()
            .with_allow_old_version(true)
            .with_polling_mode(PollingMode::NonBlocking)
            .start_session(QueuedSource::new())
            .unwrap();
        assert!(session.config().allow_old_version);
        assert_eq!(session.config().polling, PollingMode::NonBlocking);
    }

    #[test]
    fn missing_replay_is_an_io_error() {
        assert!(matches!(
            SessionBuilder::new().start_replay_session("/nonexistent/replay.slp"),
            Err(StreamError::Io { .. })
        ));
    }

    #[test]
    fn empty_zero_index_table_is_reported() {
        let observer = Arc::new(CollectingObserver::new());
        SessionBuilder::new()
            .with_violation_observer(observer.clone())
            .start_session(QueuedSource::new())
            .unwrap();
        assert_violation!(observer, ViolationKind::Configuration);
        assert_eq!(observer.len(), 1);

        let observer = Arc::new(CollectingObserver::new());
        let table = ZeroIndexTable::from_csv("character,action,zeroindex\n2,20,True\n").unwrap();
        SessionBuilder::new()
            .with_zero_index_table(table)
            .with_violation_observer(observer.clone())
            .start_session(QueuedSource::new())
            .unwrap();
        assert_no_violations!(observer);
    }
}
