//! The event framing state machine.
//!
//! A [`Dispatcher`] owns the byte buffer, the payload size table and the frame under
//! construction. Callers push raw chunks in with [`Dispatcher::push_game_event`] and
//! pull completed frames out with [`Dispatcher::poll`]. Chunks may split events
//! anywhere: an event that does not fit yet stays buffered, unconsumed, until the
//! next push.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::derived::{apply_derived_fields, InvulnerabilityTracker};
use crate::events::payload_sizes::PayloadSizes;
use crate::events::{game_start, item_update, menu, post_frame, pre_frame, Command, GameStartInfo};
use crate::gamestate::GameState;
use crate::telemetry::{ViolationKind, ViolationObserver, ViolationSeverity};
use crate::zero_index::ZeroIndexTable;
use crate::{debug_check_invariants, report_violation_to};
use crate::{Frame, Menu, SlippiVersion, StreamError};

/// What a call to [`Dispatcher::poll`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A frame completed and is newer than every frame delivered before it.
    Frame(Box<GameState>),
    /// The buffered bytes hold no further complete frame. Push more and poll again.
    Incomplete,
    /// The game is over. Nothing more will be decoded from this stream.
    GameEnded,
}

/// Decodes a game event stream into frames.
pub struct Dispatcher {
    buffer: Vec<u8>,
    cursor: usize,
    consumed: usize,
    sizes: PayloadSizes,
    in_progress: GameState,
    previous: Option<GameState>,
    last_delivered: Frame,
    last_seen: Frame,
    start: GameStartInfo,
    version: Option<SlippiVersion>,
    legacy: bool,
    allow_old_version: bool,
    ended: bool,
    rejected: Option<SlippiVersion>,
    tracker: InvulnerabilityTracker,
    zero_index: ZeroIndexTable,
    short_payload_reported: [bool; 256],
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pending_bytes", &self.pending_bytes())
            .field("consumed", &self.consumed)
            .field("version", &self.version)
            .field("legacy", &self.legacy)
            .field("last_delivered", &self.last_delivered)
            .field("ended", &self.ended)
            .field("rejected", &self.rejected)
            .finish_non_exhaustive()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Dispatcher {
    /// Creates a dispatcher. With `allow_old_version`, streams older than
    /// [`SlippiVersion::MIN_SUPPORTED`] are decoded in legacy mode instead of rejected.
    #[must_use]
    pub fn new(allow_old_version: bool) -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            consumed: 0,
            sizes: PayloadSizes::new(),
            in_progress: GameState::default(),
            previous: None,
            last_delivered: Frame::NONE,
            last_seen: Frame::NONE,
            start: GameStartInfo::default(),
            version: None,
            legacy: false,
            allow_old_version,
            ended: false,
            rejected: None,
            tracker: InvulnerabilityTracker::new(),
            zero_index: ZeroIndexTable::builtin(),
            short_payload_reported: [false; 256],
            violation_observer: None,
        }
    }

    /// Uses `table` for action frame normalization.
    #[must_use]
    pub fn with_zero_index_table(mut self, table: ZeroIndexTable) -> Self {
        self.zero_index = table;
        self
    }

    /// Reports absorbed problems to `observer` instead of the default tracing observer.
    #[must_use]
    pub fn with_violation_observer(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.violation_observer = Some(observer);
        self
    }

    /// The stream's protocol version, once a game start has been seen.
    #[must_use]
    pub fn version(&self) -> Option<SlippiVersion> {
        self.version
    }

    /// `true` when frames are completed by frame number changes instead of bookends.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    /// Buffered bytes not yet consumed.
    #[must_use]
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Stream bytes consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// The last frame number delivered, or [`Frame::NONE`].
    #[must_use]
    pub fn last_delivered(&self) -> Frame {
        self.last_delivered
    }

    /// Appends a chunk of game event bytes.
    pub fn push_game_event(&mut self, chunk: &[u8]) {
        if self.cursor > 0 {
            self.buffer.drain(..self.cursor);
            self.cursor = 0;
        }
        self.buffer.extend_from_slice(chunk);
        self.in_progress.menu_state = Menu::InGame;
    }

    /// Decodes a menu event and returns the resulting snapshot.
    ///
    /// Menu snapshots skip derived fields and frame ordering.
    pub fn apply_menu_event(&mut self, event: &[u8]) -> Box<GameState> {
        menu::decode(event, &mut self.in_progress);
        Box::new(self.in_progress.clone())
    }

    /// Consumes buffered events until a frame completes, the buffer runs dry, or the
    /// game ends.
    ///
    /// # Errors
    ///
    /// - [`StreamError::UnknownCommand`] for a command byte with no registered length.
    ///   The offending event is not consumed.
    /// - [`StreamError::VersionTooLow`] for an old stream without legacy support.
    ///   The rejection is final: every later call returns the same error.
    pub fn poll(&mut self) -> Result<DispatchOutcome, StreamError> {
        loop {
            if let Some(version) = self.rejected {
                return Err(StreamError::VersionTooLow {
                    version,
                    minimum: SlippiVersion::MIN_SUPPORTED,
                });
            }
            if self.ended {
                return Ok(DispatchOutcome::GameEnded);
            }
            let start = self.cursor;
            let Some(&command) = self.buffer.get(start) else {
                return Ok(DispatchOutcome::Incomplete);
            };

            if command == Command::Padding.byte() {
                self.skip_padding();
                continue;
            }

            let len = if command == Command::Payloads.byte() {
                match PayloadSizes::payloads_event_len(&self.buffer[start..]) {
                    Some(len) => len,
                    None => return Ok(DispatchOutcome::Incomplete),
                }
            } else {
                self.sizes
                    .event_len(command)
                    .ok_or(StreamError::UnknownCommand {
                        command,
                        offset: self.consumed,
                    })?
            };
            let end = start + len;
            if self.buffer.len() < end {
                return Ok(DispatchOutcome::Incomplete);
            }

            let command = Command::from_byte(command);
            if self.legacy && matches!(command, Some(Command::PreFrame | Command::PostFrame)) {
                if let Some(frame) = post_frame::event_frame(&self.buffer[start..end]) {
                    let boundary = !self.last_seen.is_none() && frame > self.last_seen;
                    self.last_seen = frame;
                    if boundary {
                        debug!(frame = %frame, "legacy frame boundary");
                        if let Some(state) = self.complete_frame() {
                            return Ok(DispatchOutcome::Frame(state));
                        }
                        continue;
                    }
                }
            }

            if let Some(command) = command {
                self.note_short_payload(command, len);
            }
            self.cursor = end;
            self.consumed += len;
            let event = &self.buffer[start..end];

            match command {
                Some(Command::Payloads) => {
                    let installed = self.sizes.install(event);
                    debug!(commands = installed.registered, "payload sizes installed");
                    if installed.ragged {
                        report_violation_to!(
                            &self.violation_observer,
                            ViolationSeverity::Warning,
                            ViolationKind::Framing,
                            "payload size table has a partial entry; kept {} whole entries",
                            installed.registered
                        );
                    }
                },
                Some(Command::GameStart) => {
                    let info = game_start::decode(event);
                    self.begin_game(info)?;
                },
                Some(Command::PreFrame) => {
                    pre_frame::decode(event, &mut self.in_progress, &self.start);
                },
                Some(Command::PostFrame) => {
                    post_frame::decode(event, &mut self.in_progress, &self.start);
                },
                Some(Command::ItemUpdate) => {
                    item_update::decode(event, &mut self.in_progress);
                },
                Some(Command::FrameBookend) => {
                    if let Some(state) = self.complete_frame() {
                        return Ok(DispatchOutcome::Frame(state));
                    }
                },
                Some(Command::GameEnd) => {
                    if self.legacy {
                        self.ended = true;
                        if let Some(state) = self.complete_frame() {
                            return Ok(DispatchOutcome::Frame(state));
                        }
                    }
                },
                Some(Command::FrameStart | Command::GeckoCodes | Command::Padding) | None => {},
            }
        }
    }

    fn skip_padding(&mut self) {
        let trailing = self.pending_bytes() - 1;
        if self.buffer[self.cursor + 1..].iter().any(|&b| b != 0) {
            report_violation_to!(
                &self.violation_observer,
                ViolationSeverity::Warning,
                ViolationKind::Framing,
                "padding followed by {} non-padding bytes; dropped",
                trailing
            );
        }
        self.consumed += trailing + 1;
        self.cursor = self.buffer.len();
    }

    fn note_short_payload(&mut self, command: Command, len: usize) {
        let full = command.full_len();
        let slot = &mut self.short_payload_reported[command.byte() as usize];
        if len < full && !*slot {
            *slot = true;
            report_violation_to!(
                &self.violation_observer,
                ViolationSeverity::Warning,
                ViolationKind::Decoding,
                "{} payload is {} bytes, decoder reads {}; trailing fields use defaults",
                command,
                len,
                full
            );
        }
    }

    fn begin_game(&mut self, info: GameStartInfo) -> Result<(), StreamError> {
        let version = info.version;
        if version.major < SlippiVersion::MIN_SUPPORTED.major && !self.allow_old_version {
            self.rejected = Some(version);
            return Err(StreamError::VersionTooLow {
                version,
                minimum: SlippiVersion::MIN_SUPPORTED,
            });
        }
        self.legacy = self.allow_old_version && !version.has_frame_bookends();
        if self.legacy {
            report_violation_to!(
                &self.violation_observer,
                ViolationSeverity::Warning,
                ViolationKind::Version,
                "stream version {} predates frame bookends; completing frames on frame number changes",
                version
            );
        }
        debug!(version = %version, stage = ?info.stage, is_teams = info.is_teams, "game start");

        self.version = Some(version);
        self.start = info;
        self.last_delivered = Frame::NONE;
        self.last_seen = Frame::NONE;
        self.previous = None;
        self.tracker.reset();
        self.in_progress = GameState {
            stage: info.stage,
            is_teams: info.is_teams,
            ..GameState::default()
        };
        Ok(())
    }

    /// Finishes the frame under construction and starts the next one from it.
    ///
    /// Returns the finished frame unless it is not newer than the last one delivered.
    fn complete_frame(&mut self) -> Option<Box<GameState>> {
        let next = self.in_progress.successor();
        let mut completed = std::mem::replace(&mut self.in_progress, next);
        apply_derived_fields(
            &mut completed,
            self.previous.as_ref(),
            &self.zero_index,
            &mut self.tracker,
        );
        self.previous = Some(completed.clone());

        let frame = completed.frame;
        if frame <= self.last_delivered {
            debug!(frame = %frame, last = %self.last_delivered, "dropping stale frame");
            report_violation_to!(
                &self.violation_observer,
                ViolationSeverity::Warning,
                ViolationKind::FrameOrdering,
                "frame {} is not newer than delivered frame {}; dropped",
                frame,
                self.last_delivered
            );
            return None;
        }

        self.last_delivered = frame;
        debug_check_invariants!(completed, "completed frame");
        trace!(
            frame = %frame,
            players = completed.players.len(),
            projectiles = completed.projectiles.len(),
            "frame complete"
        );
        Some(Box::new(completed))
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
    use crate::telemetry::CollectingObserver;
    use crate::Port;

    fn payloads(entries: &[(u8, u16)]) -> Vec<u8> {
        let mut bytes = vec![0x35, (entries.len() * 3 + 1) as u8];
        for (command, len) in entries {
            bytes.push(*command);
            bytes.extend_from_slice(&len.to_be_bytes());
        }
        bytes
    }

    fn post(frame: i32, slot: u8, x: f32) -> Vec<u8> {
        let mut bytes = vec![0u8; post_frame::FULL_LEN];
        bytes[0] = 0x38;
        bytes[1..5].copy_from_slice(&frame.to_be_bytes());
        bytes[5] = slot;
        bytes[0x0A..0x0E].copy_from_slice(&x.to_be_bytes());
        bytes
    }

    fn game_start(major: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; game_start::FULL_LEN];
        bytes[0] = 0x36;
        bytes[1] = major;
        bytes
    }

    fn table() -> Vec<u8> {
        payloads(&[
            (0x36, (game_start::FULL_LEN - 1) as u16),
            (0x38, (post_frame::FULL_LEN - 1) as u16),
            (0x39, 1),
            (0x3a, 4),
            (0x3c, 8),
        ])
    }

    fn bookend(frame: i32) -> Vec<u8> {
        let mut bytes = vec![0x3c];
        bytes.extend_from_slice(&frame.to_be_bytes());
        bytes.extend_from_slice(&frame.to_be_bytes());
        bytes
    }

    #[test]
    fn unknown_command_is_fatal_and_not_consumed() {
        let mut dispatcher = Dispatcher::new(false);
        dispatcher.push_game_event(&[0x38, 0x00]);
        assert_eq!(
            dispatcher.poll(),
            Err(StreamError::UnknownCommand {
                command: 0x38,
                offset: 0
            })
        );
        assert_eq!(dispatcher.pending_bytes(), 2);
    }

    #[test]
    fn split_events_resume_across_chunks() {
        let mut stream = table();
        stream.extend(game_start(3));
        stream.extend(post(-123, 0, 1.0));
        stream.extend(bookend(-123));

        let mut dispatcher = Dispatcher::new(false);
        let mut delivered = Vec::new();
        for chunk in stream.chunks(7) {
            dispatcher.push_game_event(chunk);
            while let DispatchOutcome::Frame(state) = dispatcher.poll().unwrap() {
                delivered.push(state.frame);
            }
        }
        assert_eq!(delivered, vec![Frame::FIRST]);
        assert_eq!(dispatcher.consumed(), stream.len());
        assert_eq!(dispatcher.pending_bytes(), 0);
    }

    #[test]
    fn stale_frames_are_dropped_and_reported() {
        let observer = Arc::new(CollectingObserver::new());
        let mut dispatcher = Dispatcher::new(false).with_violation_observer(observer.clone());
        let mut stream = table();
        stream.extend(game_start(3));
        for frame in [5, 5, 4, 6] {
            stream.extend(post(frame, 0, 0.0));
            stream.extend(bookend(frame));
        }
        dispatcher.push_game_event(&stream);

        let mut delivered = Vec::new();
        while let DispatchOutcome::Frame(state) = dispatcher.poll().unwrap() {
            delivered.push(state.frame.as_i32());
        }
        assert_eq!(delivered, vec![5, 6]);
        assert_eq!(observer.violations_of_kind(ViolationKind::FrameOrdering).len(), 2);
    }

    #[test]
    fn old_versions_need_opt_in() {
        let mut stream = table();
        stream.extend(game_start(2));

        let mut strict = Dispatcher::new(false);
        strict.push_game_event(&stream);
        assert!(matches!(
            strict.poll(),
            Err(StreamError::VersionTooLow { .. })
        ));

        let mut lenient = Dispatcher::new(true);
        lenient.push_game_event(&stream);
        assert_eq!(lenient.poll(), Ok(DispatchOutcome::Incomplete));
        assert!(lenient.is_legacy());
        assert_eq!(lenient.version(), Some(SlippiVersion::new(2, 0, 0)));
    }

    #[test]
    fn version_rejection_is_final() {
        let mut stream = table();
        stream.extend(game_start(2));
        for frame in 1..=2 {
            stream.extend(post(frame, 0, 0.0));
            stream.extend(bookend(frame));
        }

        let mut dispatcher = Dispatcher::new(false);
        dispatcher.push_game_event(&stream);
        let rejected = Err(StreamError::VersionTooLow {
            version: SlippiVersion::new(2, 0, 0),
            minimum: SlippiVersion::MIN_SUPPORTED,
        });
        assert_eq!(dispatcher.poll(), rejected);
        assert_eq!(dispatcher.poll(), rejected);

        // A fresh, valid game does not lift the rejection either.
        let mut modern = game_start(3);
        modern[2] = 9;
        dispatcher.push_game_event(&modern);
        assert_eq!(dispatcher.poll(), rejected);
        assert_eq!(dispatcher.last_delivered(), Frame::NONE);
        assert_eq!(dispatcher.version(), None);
    }

    #[test]
    fn legacy_game_end_flushes_then_ends() {
        let mut stream = table();
        stream.extend(game_start(2));
        stream.extend(post(-123, 0, 0.0));
        stream.extend([0x39, 0x02]);

        let mut dispatcher = Dispatcher::new(true);
        dispatcher.push_game_event(&stream);
        match dispatcher.poll().unwrap() {
            DispatchOutcome::Frame(state) => assert_eq!(state.frame, Frame::FIRST),
            other => panic!("expected a frame, got {other:?}"),
        }
        assert_eq!(dispatcher.poll(), Ok(DispatchOutcome::GameEnded));
    }

    #[test]
    fn modern_game_end_is_consumed_only() {
        let mut stream = table();
        stream.extend(game_start(3));
        stream.extend([0x39, 0x02]);
        let mut dispatcher = Dispatcher::new(false);
        dispatcher.push_game_event(&stream);
        assert_eq!(dispatcher.poll(), Ok(DispatchOutcome::Incomplete));
        assert_eq!(dispatcher.pending_bytes(), 0);
    }

    #[test]
    fn padding_drops_the_rest_of_the_chunk() {
        let observer = Arc::new(CollectingObserver::new());
        let mut dispatcher = Dispatcher::new(false).with_violation_observer(observer.clone());
        let mut stream = table();
        stream.extend([0x00, 0x00, 0x3c, 0x01]);
        dispatcher.push_game_event(&stream);
        assert_eq!(dispatcher.poll(), Ok(DispatchOutcome::Incomplete));
        assert_eq!(dispatcher.pending_bytes(), 0);
        assert!(observer.has_violation(ViolationKind::Framing));
    }

    #[test]
    fn players_carry_over_but_partners_do_not() {
        let mut stream = table();
        stream.extend(game_start(3));
        let mut nana = post(1, 0, 4.0);
        nana[6] = 1;
        stream.extend(post(1, 0, 3.0));
        stream.extend(nana);
        stream.extend(bookend(1));
        stream.extend(bookend(2));

        let mut dispatcher = Dispatcher::new(false);
        dispatcher.push_game_event(&stream);
        let DispatchOutcome::Frame(first) = dispatcher.poll().unwrap() else {
            panic!("expected a frame");
        };
        assert!(first.players[&Port::new(1)].partner.is_some());

        // Frame 2 carries no post-frame, so its number is still 1 and it is stale.
        assert_eq!(dispatcher.poll(), Ok(DispatchOutcome::Incomplete));
    }

    #[test]
    fn short_payloads_are_reported_once() {
        let observer = Arc::new(CollectingObserver::new());
        let mut dispatcher = Dispatcher::new(false).with_violation_observer(observer.clone());
        let mut stream = payloads(&[(0x36, (game_start::FULL_LEN - 1) as u16), (0x38, 0x20), (0x3c, 8)]);
        stream.extend(game_start(3));
        for frame in [1, 2] {
            stream.extend(&post(frame, 0, 0.0)[..0x21]);
            stream.extend(bookend(frame));
        }
        dispatcher.push_game_event(&stream);
        while let DispatchOutcome::Frame(_) = dispatcher.poll().unwrap() {}
        assert_eq!(observer.violations_of_kind(ViolationKind::Decoding).len(), 1);
    }
}
