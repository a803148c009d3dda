use tracing::{debug, trace};
use web_time::{Duration, Instant};

use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::gamestate::GameState;
use crate::replay::ReplayMetadata;
use crate::sessions::config::{PollingMode, SessionConfig};
use crate::source::{EventSource, SourceMessage};
use crate::{Frame, SlippiVersion, StreamError};

/// The result of one [`Session::next_frame`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// A completed frame or a menu snapshot.
    Frame(Box<GameState>),
    /// No frame yet. Call again.
    Pending,
    /// The stream is over.
    Ended,
}

/// The handshake a live source sent, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerInfo {
    /// The console's nickname.
    pub nick: String,
    /// The console's Slippi version string.
    pub version: String,
    /// Stream position the console resumes from.
    pub cursor: u32,
}

/// A [`Session`] pulls messages from an [`EventSource`] and turns them into
/// [`GameState`] snapshots.
///
/// Build one with [`SessionBuilder`](crate::SessionBuilder).
pub struct Session<S: EventSource> {
    source: S,
    dispatcher: Dispatcher,
    config: SessionConfig,
    metadata: Option<ReplayMetadata>,
    peer: Option<PeerInfo>,
    ended: bool,
    last_delivery: Option<Instant>,
    processing_time: Duration,
}

impl<S: EventSource> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("dispatcher", &self.dispatcher)
            .field("config", &self.config)
            .field("peer", &self.peer)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

impl<S: EventSource> Session<S> {
    pub(crate) fn new(source: S, dispatcher: Dispatcher, config: SessionConfig) -> Self {
        let metadata = source.metadata().cloned();
        Self {
            source,
            dispatcher,
            config,
            metadata,
            peer: None,
            ended: false,
            last_delivery: None,
            processing_time: Duration::ZERO,
        }
    }

    /// Returns the next frame, [`StepResult::Pending`] if none is available yet, or
    /// [`StepResult::Ended`] once the stream is over.
    ///
    /// In blocking mode this reads until a frame completes or the source runs dry. In
    /// non-blocking mode it reads at most
    /// [`max_events_per_step`](SessionConfig::max_events_per_step) messages.
    ///
    /// # Errors
    ///
    /// - [`StreamError::VersionTooLow`] for an old stream without legacy support.
    /// - [`StreamError::UnknownCommand`] if the stream cannot be framed.
    /// - Anything the source's `poll` returns.
    pub fn next_frame(&mut self) -> Result<StepResult, StreamError> {
        if let Some(last) = self.last_delivery {
            self.processing_time = last.elapsed();
        }
        if self.ended {
            return Ok(StepResult::Ended);
        }
        if let Some(step) = self.drain()? {
            return Ok(step);
        }

        let mut budget = match self.config.polling {
            PollingMode::Blocking => usize::MAX,
            PollingMode::NonBlocking => self.config.max_events_per_step,
        };
        while budget > 0 {
            budget -= 1;
            let Some(message) = self.source.poll(self.config.polling)? else {
                if self.source.is_exhausted() {
                    debug!(
                        unconsumed = self.dispatcher.pending_bytes(),
                        "source exhausted"
                    );
                    self.ended = true;
                    return Ok(StepResult::Ended);
                }
                return Ok(StepResult::Pending);
            };

            match message {
                SourceMessage::ConnectReply {
                    nick,
                    version,
                    cursor,
                } => {
                    debug!(nick = %nick, version = %version, cursor, "connected");
                    self.peer = Some(PeerInfo {
                        nick,
                        version,
                        cursor,
                    });
                },
                SourceMessage::GameEvent(bytes) => {
                    self.dispatcher.push_game_event(&bytes);
                    if let Some(step) = self.drain()? {
                        return Ok(step);
                    }
                },
                SourceMessage::MenuEvent(bytes) => {
                    let state = self.dispatcher.apply_menu_event(&bytes);
                    return Ok(StepResult::Frame(self.deliver(state)));
                },
            }
        }
        trace!("step budget spent");
        Ok(StepResult::Pending)
    }

    fn drain(&mut self) -> Result<Option<StepResult>, StreamError> {
        match self.dispatcher.poll()? {
            DispatchOutcome::Frame(state) => Ok(Some(StepResult::Frame(self.deliver(state)))),
            DispatchOutcome::Incomplete => Ok(None),
            DispatchOutcome::GameEnded => {
                self.ended = true;
                Ok(Some(StepResult::Ended))
            },
        }
    }

    fn deliver(&mut self, mut state: Box<GameState>) -> Box<GameState> {
        if let Some(metadata) = &self.metadata {
            metadata.apply_to(&mut state);
        }
        self.last_delivery = Some(Instant::now());
        state
    }

    /// Wall-clock time between the previous delivery and the start of the latest
    /// [`Session::next_frame`] call. Zero before the second call.
    #[must_use]
    pub fn processing_time(&self) -> Duration {
        self.processing_time
    }

    /// The stream's protocol version, once a game start has been decoded.
    #[must_use]
    pub fn version(&self) -> Option<SlippiVersion> {
        self.dispatcher.version()
    }

    /// The last game frame delivered, or [`Frame::NONE`].
    #[must_use]
    pub fn last_frame(&self) -> Frame {
        self.dispatcher.last_delivered()
    }

    /// The handshake reply, if the source sent one.
    #[must_use]
    pub fn peer(&self) -> Option<&PeerInfo> {
        self.peer.as_ref()
    }

    /// Replay metadata copied onto every delivered frame.
    #[must_use]
    pub fn metadata(&self) -> Option<&ReplayMetadata> {
        self.metadata.as_ref()
    }

    /// The settings this session was built with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// `true` once [`StepResult::Ended`] has been returned.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// The underlying source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The underlying source, mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the session and returns its source.
    pub fn into_source(self) -> S {
        self.source
    }
}
