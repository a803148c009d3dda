//! Common test infrastructure shared across integration tests.
//!
//! - `events`: byte-level builders for game event streams and replay envelopes
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::events::{PostFrame, StreamBuilder};
//! ```

pub mod events;

use slippstream::{DispatchOutcome, Dispatcher, GameState};

/// Feeds `stream` to a fresh dispatcher in chunks of `chunk` bytes and collects
/// every delivered frame.
#[allow(dead_code)]
pub fn decode_all(stream: &[u8], chunk: usize, allow_old_version: bool) -> Vec<GameState> {
    let mut dispatcher = Dispatcher::new(allow_old_version);
    decode_with(&mut dispatcher, stream, chunk)
}

/// Like [`decode_all`], with a caller-configured dispatcher.
#[allow(dead_code)]
pub fn decode_with(dispatcher: &mut Dispatcher, stream: &[u8], chunk: usize) -> Vec<GameState> {
    let mut frames = Vec::new();
    for piece in stream.chunks(chunk.max(1)) {
        dispatcher.push_game_event(piece);
        loop {
            match dispatcher.poll().expect("stream should decode") {
                DispatchOutcome::Frame(state) => frames.push(*state),
                DispatchOutcome::Incomplete | DispatchOutcome::GameEnded => break,
            }
        }
    }
    frames
}
