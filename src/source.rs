//! Where raw Slippi messages come from.
//!
//! A [`Session`](crate::Session) pulls [`SourceMessage`]s from an [`EventSource`].
//! Two sources ship with the crate:
//!
//! - [`QueuedSource`], an in-memory queue that another thread (a network bridge, a
//!   test) feeds through a [`QueueHandle`].
//! - [`ReplayFileSource`], which unwraps a `.slp` replay and hands out its raw event
//!   bytes in fixed-size chunks.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::replay::{ReplayFile, ReplayMetadata};
use crate::sessions::config::{PollingMode, DEFAULT_REPLAY_CHUNK_SIZE};
use crate::StreamError;

/// One message from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMessage {
    /// Handshake reply from a live connection.
    ConnectReply {
        /// The console's nickname.
        nick: String,
        /// The console's Slippi version string.
        version: String,
        /// Stream position the console will resume from.
        cursor: u32,
    },
    /// Raw game event bytes. Events may be split across messages.
    GameEvent(Vec<u8>),
    /// Exactly one menu event.
    MenuEvent(Vec<u8>),
}

/// A supplier of [`SourceMessage`]s.
///
/// `poll` returning `Ok(None)` means no message is available right now. Once
/// [`EventSource::is_exhausted`] is `true` no message will ever arrive again.
#[cfg(feature = "sync-send")]
pub trait EventSource: Send + Sync {
    /// Prepares the source. Called once, before the first `poll`.
    fn connect(&mut self) -> Result<(), StreamError> {
        Ok(())
    }

    /// Returns the next message. With [`PollingMode::Blocking`] the source may wait
    /// for one.
    fn poll(&mut self, mode: PollingMode) -> Result<Option<SourceMessage>, StreamError>;

    /// `true` once the source has nothing left to deliver.
    fn is_exhausted(&self) -> bool;

    /// Session metadata, if the source has any.
    fn metadata(&self) -> Option<&ReplayMetadata> {
        None
    }
}

/// A supplier of [`SourceMessage`]s.
///
/// `poll` returning `Ok(None)` means no message is available right now. Once
/// [`EventSource::is_exhausted`] is `true` no message will ever arrive again.
#[cfg(not(feature = "sync-send"))]
pub trait EventSource {
    /// Prepares the source. Called once, before the first `poll`.
    fn connect(&mut self) -> Result<(), StreamError> {
        Ok(())
    }

    /// Returns the next message. With [`PollingMode::Blocking`] the source may wait
    /// for one.
    fn poll(&mut self, mode: PollingMode) -> Result<Option<SourceMessage>, StreamError>;

    /// `true` once the source has nothing left to deliver.
    fn is_exhausted(&self) -> bool;

    /// Session metadata, if the source has any.
    fn metadata(&self) -> Option<&ReplayMetadata> {
        None
    }
}

#[derive(Debug, Default)]
struct Queue {
    messages: VecDeque<SourceMessage>,
    closed: bool,
    handles: usize,
}

#[derive(Debug, Default)]
struct Shared {
    queue: Mutex<Queue>,
    ready: Condvar,
}

/// An in-memory FIFO source.
///
/// In blocking mode, `poll` waits until a message is pushed or the queue is closed.
/// Waiting on an open queue with no live [`QueueHandle`] fails with
/// [`StreamError::SourceDisconnected`].
///
/// ```
/// use slippstream::{EventSource, PollingMode, QueuedSource, SourceMessage};
///
/// let mut source = QueuedSource::new();
/// let handle = source.handle();
/// handle.push(SourceMessage::GameEvent(vec![0x00]));
/// handle.close();
///
/// assert!(source.poll(PollingMode::Blocking)?.is_some());
/// assert!(source.poll(PollingMode::Blocking)?.is_none());
/// assert!(source.is_exhausted());
/// # Ok::<(), slippstream::StreamError>(())
/// ```
#[derive(Debug, Default)]
pub struct QueuedSource {
    shared: Arc<Shared>,
}

/// The feeding end of a [`QueuedSource`]. Cheap to clone.
#[derive(Debug)]
pub struct QueueHandle {
    shared: Arc<Shared>,
}

impl QueueHandle {
    fn attach(shared: &Arc<Shared>) -> Self {
        shared.queue.lock().handles += 1;
        Self {
            shared: Arc::clone(shared),
        }
    }

    /// Appends a message. Messages pushed after [`QueueHandle::close`] are dropped.
    pub fn push(&self, message: SourceMessage) {
        let mut queue = self.shared.queue.lock();
        if queue.closed {
            return;
        }
        queue.messages.push_back(message);
        self.shared.ready.notify_one();
    }

    /// Marks the end of the stream. Queued messages are still delivered.
    pub fn close(&self) {
        self.shared.queue.lock().closed = true;
        self.shared.ready.notify_all();
    }
}

impl Clone for QueueHandle {
    fn clone(&self) -> Self {
        Self::attach(&self.shared)
    }
}

impl Drop for QueueHandle {
    fn drop(&mut self) {
        let mut queue = self.shared.queue.lock();
        queue.handles = queue.handles.saturating_sub(1);
        drop(queue);
        self.shared.ready.notify_all();
    }
}

impl QueuedSource {
    /// Creates an empty, open queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a closed queue holding `messages`.
    #[must_use]
    pub fn from_messages(messages: impl IntoIterator<Item = SourceMessage>) -> Self {
        let source = Self::new();
        let handle = source.handle();
        for message in messages {
            handle.push(message);
        }
        handle.close();
        source
    }

    /// A handle for feeding this queue, possibly from another thread.
    #[must_use]
    pub fn handle(&self) -> QueueHandle {
        QueueHandle::attach(&self.shared)
    }

    /// Appends a message, like [`QueueHandle::push`].
    pub fn push(&self, message: SourceMessage) {
        let mut queue = self.shared.queue.lock();
        if !queue.closed {
            queue.messages.push_back(message);
        }
    }

    /// Messages waiting to be polled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.queue.lock().messages.len()
    }

    /// `true` when no message is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSource for QueuedSource {
    fn poll(&mut self, mode: PollingMode) -> Result<Option<SourceMessage>, StreamError> {
        let mut queue = self.shared.queue.lock();
        if mode == PollingMode::Blocking {
            while queue.messages.is_empty() && !queue.closed {
                if queue.handles == 0 {
                    return Err(StreamError::SourceDisconnected);
                }
                self.shared.ready.wait(&mut queue);
            }
        }
        Ok(queue.messages.pop_front())
    }

    fn is_exhausted(&self) -> bool {
        let queue = self.shared.queue.lock();
        queue.closed && queue.messages.is_empty()
    }
}

/// Replays the raw event stream of a `.slp` file.
///
/// Chunks do not line up with event boundaries.
#[derive(Debug, Clone)]
pub struct ReplayFileSource {
    replay: ReplayFile,
    offset: usize,
    chunk_size: usize,
}

impl ReplayFileSource {
    /// Wraps a parsed replay.
    ///
    /// # Errors
    ///
    /// [`StreamError::InvalidRequest`] if `chunk_size` is 0.
    pub fn new(replay: ReplayFile, chunk_size: usize) -> Result<Self, StreamError> {
        if chunk_size == 0 {
            return Err(StreamError::InvalidRequest {
                info: "replay chunk size must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            replay,
            offset: 0,
            chunk_size,
        })
    }

    /// Reads and parses the replay at `path`, using the default chunk size.
    ///
    /// # Errors
    ///
    /// See [`ReplayFile::from_path`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        Self::new(ReplayFile::from_path(path)?, DEFAULT_REPLAY_CHUNK_SIZE)
    }

    /// Parses a replay from memory, using the default chunk size.
    ///
    /// # Errors
    ///
    /// See [`ReplayFile::from_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StreamError> {
        Self::new(ReplayFile::from_bytes(bytes)?, DEFAULT_REPLAY_CHUNK_SIZE)
    }

    /// The replay being played back.
    #[must_use]
    pub fn replay(&self) -> &ReplayFile {
        &self.replay
    }

    /// Raw bytes not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replay.raw.len() - self.offset
    }
}

impl EventSource for ReplayFileSource {
    fn poll(&mut self, _mode: PollingMode) -> Result<Option<SourceMessage>, StreamError> {
        let Some(rest) = self.replay.raw.get(self.offset..).filter(|rest| !rest.is_empty()) else {
            return Ok(None);
        };
        let chunk = &rest[..rest.len().min(self.chunk_size)];
        self.offset += chunk.len();
        Ok(Some(SourceMessage::GameEvent(chunk.to_vec())))
    }

    fn is_exhausted(&self) -> bool {
        self.offset >= self.replay.raw.len()
    }

    fn metadata(&self) -> Option<&ReplayMetadata> {
        Some(&self.replay.metadata)
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
    fn non_blocking_poll_on_open_queue_returns_none() {
        let mut source = QueuedSource::new();
        assert_eq!(source.poll(PollingMode::NonBlocking).unwrap(), None);
        assert!(!source.is_exhausted());
    }

    #[test]
    fn blocking_poll_without_handles_is_a_disconnect() {
        let mut source = QueuedSource::new();
        let handle = source.handle();
        let clone = handle.clone();
        drop(handle);
        clone.push(SourceMessage::GameEvent(vec![0x00]));
        drop(clone);

        assert!(source.poll(PollingMode::Blocking).unwrap().is_some());
        assert!(matches!(
            source.poll(PollingMode::Blocking),
            Err(StreamError::SourceDisconnected)
        ));
        assert!(!source.is_exhausted());
    }

    #[test]
    fn blocking_poll_waits_for_another_thread() {
        let mut source = QueuedSource::new();
        let handle = source.handle();
        let feeder = std::thread::spawn(move || {
            handle.push(SourceMessage::MenuEvent(vec![1, 2]));
            handle.close();
        });
        assert_eq!(
            source.poll(PollingMode::Blocking).unwrap(),
            Some(SourceMessage::MenuEvent(vec![1, 2]))
        );
        feeder.join().unwrap();
        assert_eq!(source.poll(PollingMode::Blocking).unwrap(), None);
        assert!(source.is_exhausted());
    }

    #[test]
    fn pushes_after_close_are_dropped() {
        let source = QueuedSource::from_messages([SourceMessage::GameEvent(vec![1])]);
        source.push(SourceMessage::GameEvent(vec![2]));
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn replay_source_chunks_the_raw_stream() {
        let replay = ReplayFile {
            raw: (0..10).collect(),
            ..ReplayFile::default()
        };
        let mut source = ReplayFileSource::new(replay, 4).unwrap();
        let mut sizes = Vec::new();
        while let Some(SourceMessage::GameEvent(chunk)) = source.poll(PollingMode::Blocking).unwrap() {
            sizes.push(chunk.len());
        }
        assert_eq!(sizes, vec![4, 4, 2]);
        assert!(source.is_exhausted());
        assert_eq!(source.remaining(), 0);
        assert!(source.metadata().is_some());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(matches!(
            ReplayFileSource::new(ReplayFile::default(), 0),
            Err(StreamError::InvalidRequest { .. })
        ));
    }
}
