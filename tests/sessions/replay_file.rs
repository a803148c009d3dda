//! Sessions over replay files.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use std::path::PathBuf;
use std::sync::Arc;

use crate::common::events::{replay_document, PostFrame, StreamBuilder, FINAL_DESTINATION};
use slippstream::telemetry::{CollectingObserver, ViolationKind};
use slippstream::{
    assert_violation, EventSource, Port, ReplayFileSource, SessionBuilder, Stage, StepResult,
    StreamError,
};

fn raw_game() -> Vec<u8> {
    let mut builder = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 14, 0), FINAL_DESTINATION);
    for frame in -123..-100 {
        builder = builder.frame(frame, &[PostFrame::at(0, 0), PostFrame::at(0, 2)]);
    }
    builder.game_end().build()
}

/// Writes `bytes` to a file unique to this test and returns its path.
fn write_replay(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "slippstream-{}-{}.slp",
        name,
        std::process::id()
    ));
    std::fs::write(&path, bytes).unwrap();
    path
}

fn collect(mut session: slippstream::Session<ReplayFileSource>) -> Vec<Box<slippstream::GameState>> {
    let mut frames = Vec::new();
    loop {
        match session.next_frame().unwrap() {
            StepResult::Frame(state) => frames.push(state),
            StepResult::Pending => {},
            StepResult::Ended => return frames,
        }
    }
}

#[test]
fn replay_session_decodes_every_frame_with_metadata() {
    let document = replay_document(
        &raw_game(),
        "living room",
        &[(0, "alice", "ALI#1"), (2, "carol", "CAR#3")],
    );
    let path = write_replay("metadata", &document);
    let session = SessionBuilder::new()
        .with_replay_chunk_size(100)
        .unwrap()
        .start_replay_session(&path)
        .unwrap();
    assert_eq!(session.metadata().unwrap().last_frame, Some(100));
    let frames = collect(session);
    std::fs::remove_file(&path).ok();

    assert_eq!(frames.len(), 23);
    for frame in &frames {
        assert_eq!(frame.stage, Stage::FinalDestination);
        assert_eq!(frame.console_nick, "living room");
        assert_eq!(frame.played_on, "dolphin");
        assert_eq!(frame.start_at, "2020-01-01T00:00:00Z");
        assert_eq!(frame.players[&Port::new(1)].primary.nickname, "alice");
        assert_eq!(frame.players[&Port::new(3)].primary.connect_code, "CAR#3");
    }
}

#[test]
fn unreadable_player_entries_are_reported_and_skipped() {
    let document = replay_document(&raw_game(), "tv", &[(0, "alice", "ALI#1"), (7, "ghost", "BOO#7")]);
    let path = write_replay("odd-players", &document);
    let observer = Arc::new(CollectingObserver::new());
    let session = SessionBuilder::new()
        .with_violation_observer(observer.clone())
        .start_replay_session(&path)
        .unwrap();
    std::fs::remove_file(&path).ok();

    assert_violation!(observer, ViolationKind::Replay);
    let replay = observer.violations_of_kind(ViolationKind::Replay);
    assert_eq!(replay.len(), 1);
    assert!(replay[0].message.contains("\"7\""));
    assert_eq!(session.metadata().unwrap().players.len(), 1);
    assert_eq!(collect(session).len(), 23);
}

#[test]
fn chunk_size_is_invisible_to_the_caller() {
    let document = replay_document(&raw_game(), "tv", &[]);
    let frames_for = |chunk: usize| {
        let mut replay = ReplayFileSource::from_bytes(&document).unwrap().replay().clone();
        replay.metadata.console_nick.clear();
        let source = ReplayFileSource::new(replay, chunk).unwrap();
        let session = SessionBuilder::new().start_session(source).unwrap();
        collect(session)
    };
    let reference = frames_for(4096);
    for chunk in [1, 13, 250] {
        assert_eq!(frames_for(chunk), reference, "chunk size {chunk}");
    }
}

#[test]
fn a_file_that_is_not_an_object_is_malformed() {
    let path = write_replay("malformed", b"[i\x01]");
    let result = SessionBuilder::new().start_replay_session(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(StreamError::MalformedReplay { .. })));
}

#[test]
fn an_empty_raw_blob_ends_immediately() {
    let mut source = ReplayFileSource::from_bytes(&replay_document(&[], "", &[])).unwrap();
    assert!(source.is_exhausted());
    let session = SessionBuilder::new().start_session(source.clone()).unwrap();
    assert!(collect(session).is_empty());
    assert!(source
        .poll(slippstream::PollingMode::NonBlocking)
        .unwrap()
        .is_none());
}
