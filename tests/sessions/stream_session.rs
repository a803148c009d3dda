//! Sessions fed from a [`QueuedSource`].

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use std::sync::Arc;
use std::thread;

use crate::common::events::{PostFrame, StreamBuilder, BATTLEFIELD};
use slippstream::telemetry::{CollectingObserver, ViolationKind};
use slippstream::{
    PeerInfo, PollingMode, QueuedSource, SessionBuilder, SessionConfig,
    SlippiVersion, SourceMessage, StepResult, StreamError,
};

fn game(frames: std::ops::Range<i32>) -> Vec<u8> {
    let mut builder = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 9, 0), BATTLEFIELD);
    for frame in frames {
        builder = builder.frame(frame, &[PostFrame::at(0, 0), PostFrame::at(0, 1)]);
    }
    builder.build()
}

#[test]
fn three_outcomes_are_distinct() {
    let source = QueuedSource::new();
    let handle = source.handle();
    let mut session = SessionBuilder::new()
        .with_polling_mode(PollingMode::NonBlocking)
        .start_session(source)
        .unwrap();

    assert_eq!(session.next_frame().unwrap(), StepResult::Pending);

    handle.push(SourceMessage::GameEvent(game(-123..-122)));
    assert!(matches!(session.next_frame().unwrap(), StepResult::Frame(_)));
    assert_eq!(session.next_frame().unwrap(), StepResult::Pending);

    handle.close();
    assert_eq!(session.next_frame().unwrap(), StepResult::Ended);
    assert!(session.is_ended());
    assert_eq!(session.next_frame().unwrap(), StepResult::Ended);
}

#[test]
fn frames_split_across_messages_are_reassembled() {
    let stream = game(-123..-113);
    let source = QueuedSource::from_messages(
        stream
            .chunks(11)
            .map(|chunk| SourceMessage::GameEvent(chunk.to_vec())),
    );
    let mut session = SessionBuilder::new().start_session(source).unwrap();

    let mut numbers = Vec::new();
    loop {
        match session.next_frame().unwrap() {
            StepResult::Frame(state) => numbers.push(state.frame.as_i32()),
            StepResult::Pending => {},
            StepResult::Ended => break,
        }
    }
    assert_eq!(numbers, (-123..-113).collect::<Vec<_>>());
    assert_eq!(session.version(), Some(SlippiVersion::new(3, 9, 0)));
    assert_eq!(session.last_frame().as_i32(), -114);
}

#[test]
fn handshake_is_recorded() {
    let source = QueuedSource::from_messages([SourceMessage::ConnectReply {
        nick: "Station 1".into(),
        version: "1.11.0".into(),
        cursor: 42,
    }]);
    let mut session = SessionBuilder::new().start_session(source).unwrap();
    assert!(session.peer().is_none());
    assert_eq!(session.next_frame().unwrap(), StepResult::Ended);
    assert_eq!(
        session.peer(),
        Some(&PeerInfo {
            nick: "Station 1".into(),
            version: "1.11.0".into(),
            cursor: 42,
        })
    );
}

#[test]
fn blocking_session_waits_for_a_feeder_thread() {
    let source = QueuedSource::new();
    let handle = source.handle();
    let mut session = SessionBuilder::new().start_session(source).unwrap();

    let stream = game(-123..-121);
    let feeder = thread::spawn(move || {
        for chunk in stream.chunks(16) {
            handle.push(SourceMessage::GameEvent(chunk.to_vec()));
        }
        handle.close();
    });

    let mut delivered = 0;
    while session.next_frame().unwrap() != StepResult::Ended {
        delivered += 1;
    }
    feeder.join().unwrap();
    assert_eq!(delivered, 2);
}

#[test]
fn non_blocking_steps_are_bounded() {
    // Frame start events only: the source never completes a frame.
    let mut builder = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 0, 0), BATTLEFIELD);
    for frame in 0..50 {
        builder = builder.frame_start(frame);
    }
    let bytes = builder.build();
    let source =
        QueuedSource::from_messages(bytes.chunks(9).map(|c| SourceMessage::GameEvent(c.to_vec())));
    let config = SessionConfig {
        polling: PollingMode::NonBlocking,
        max_events_per_step: 5,
        ..SessionConfig::default()
    };
    let mut session = SessionBuilder::new().with_config(config).start_session(source).unwrap();

    assert_eq!(session.next_frame().unwrap(), StepResult::Pending);
    assert!(!session.source().is_empty());
}

#[test]
fn fatal_errors_surface_from_next_frame() {
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((1, 0, 0), BATTLEFIELD)
        .build();
    let source = QueuedSource::from_messages([SourceMessage::GameEvent(stream)]);
    let mut session = SessionBuilder::new().start_session(source).unwrap();
    assert!(matches!(
        session.next_frame(),
        Err(StreamError::VersionTooLow { .. })
    ));
}

#[test]
fn rejected_sessions_stay_rejected() {
    let mut builder = StreamBuilder::new()
        .standard_payloads()
        .game_start((2, 0, 0), BATTLEFIELD);
    for frame in 1..=3 {
        builder = builder.frame(frame, &[PostFrame::at(0, 0)]);
    }
    let source = QueuedSource::new();
    let handle = source.handle();
    handle.push(SourceMessage::GameEvent(builder.build()));
    let mut session = SessionBuilder::new()
        .with_polling_mode(PollingMode::NonBlocking)
        .start_session(source)
        .unwrap();

    let expected = StreamError::VersionTooLow {
        version: SlippiVersion::new(2, 0, 0),
        minimum: SlippiVersion::MIN_SUPPORTED,
    };
    for _ in 0..3 {
        assert_eq!(session.next_frame(), Err(expected.clone()));
    }

    // More input changes nothing.
    handle.push(SourceMessage::GameEvent(game(-123..-120)));
    handle.close();
    assert_eq!(session.next_frame(), Err(expected));
    assert_eq!(session.last_frame(), slippstream::Frame::NONE);
}

#[test]
fn legacy_sessions_need_the_flag() {
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((2, 0, 0), BATTLEFIELD)
        .post(PostFrame::at(-123, 0))
        .post(PostFrame::at(-122, 0))
        .game_end()
        .build();

    let observer = Arc::new(CollectingObserver::new());
    let source = QueuedSource::from_messages([SourceMessage::GameEvent(stream)]);
    let mut session = SessionBuilder::new()
        .with_config(SessionConfig::legacy())
        .with_violation_observer(observer.clone())
        .start_session(source)
        .unwrap();

    let mut numbers = Vec::new();
    while let StepResult::Frame(state) = session.next_frame().unwrap() {
        numbers.push(state.frame.as_i32());
    }
    // The legacy game end flushes the last frame.
    assert_eq!(numbers, vec![-123, -122]);
    assert!(observer.has_violation(ViolationKind::Version));
}

#[test]
fn processing_time_is_measured_between_calls() {
    let source = QueuedSource::from_messages([SourceMessage::GameEvent(game(-123..-121))]);
    let mut session = SessionBuilder::new().start_session(source).unwrap();
    assert!(session.processing_time().is_zero());
    session.next_frame().unwrap();
    thread::sleep(std::time::Duration::from_millis(5));
    session.next_frame().unwrap();
    assert!(session.processing_time() >= std::time::Duration::from_millis(5));
}
