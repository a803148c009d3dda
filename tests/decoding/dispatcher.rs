//! Framing behavior of the dispatcher.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use std::sync::Arc;

use crate::common::events::{PostFrame, StreamBuilder, BATTLEFIELD, FRAME_BOOKEND, POST_FRAME};
use crate::common::{decode_all, decode_with};
use slippstream::telemetry::{CollectingObserver, ViolationKind};
use slippstream::{DispatchOutcome, Dispatcher, SlippiVersion, StreamError};

fn three_frames() -> Vec<u8> {
    StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 7, 0), BATTLEFIELD)
        .frame(-123, &[PostFrame::at(0, 0), PostFrame::at(0, 1)])
        .frame(-122, &[PostFrame::at(0, 0), PostFrame::at(0, 1)])
        .frame(-121, &[PostFrame::at(0, 0), PostFrame::at(0, 1)])
        .build()
}

#[test]
fn chunk_size_does_not_change_the_result() {
    let stream = three_frames();
    let whole = decode_all(&stream, stream.len(), false);
    assert_eq!(whole.len(), 3);
    for chunk in [1, 2, 3, 7, 64, 333] {
        assert_eq!(decode_all(&stream, chunk, false), whole, "chunk size {chunk}");
    }
}

#[test]
fn version_is_known_after_game_start() {
    let mut dispatcher = Dispatcher::new(false);
    assert_eq!(dispatcher.version(), None);
    decode_with(&mut dispatcher, &three_frames(), 4096);
    assert_eq!(dispatcher.version(), Some(SlippiVersion::new(3, 7, 0)));
    assert!(!dispatcher.is_legacy());
    assert_eq!(dispatcher.last_delivered().as_i32(), -121);
}

#[test]
fn command_without_registered_length_is_fatal() {
    let stream = StreamBuilder::new()
        .payloads(&[(POST_FRAME, 0x78)])
        .raw(&[FRAME_BOOKEND, 0, 0, 0, 0])
        .build();
    let mut dispatcher = Dispatcher::new(false);
    dispatcher.push_game_event(&stream);
    let err = dispatcher.poll().unwrap_err();
    assert_eq!(
        err,
        StreamError::UnknownCommand {
            command: FRAME_BOOKEND,
            offset: 5,
        }
    );
    assert!(err.to_string().contains("0x3c"));
}

#[test]
fn events_before_any_payload_table_are_fatal() {
    let mut dispatcher = Dispatcher::new(false);
    dispatcher.push_game_event(&PostFrame::default().bytes());
    assert!(matches!(
        dispatcher.poll(),
        Err(StreamError::UnknownCommand { command: 0x38, offset: 0 })
    ));
}

#[test]
fn old_stream_without_opt_in_is_rejected() {
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((2, 0, 1), BATTLEFIELD)
        .build();
    let mut dispatcher = Dispatcher::new(false);
    dispatcher.push_game_event(&stream);
    assert_eq!(
        dispatcher.poll(),
        Err(StreamError::VersionTooLow {
            version: SlippiVersion::new(2, 0, 1),
            minimum: SlippiVersion::MIN_SUPPORTED,
        })
    );
}

#[test]
fn legacy_mode_is_reported() {
    let observer = Arc::new(CollectingObserver::new());
    let mut dispatcher = Dispatcher::new(true).with_violation_observer(observer.clone());
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((2, 0, 1), BATTLEFIELD)
        .build();
    decode_with(&mut dispatcher, &stream, 4096);
    assert!(dispatcher.is_legacy());
    assert_eq!(observer.violations_of_kind(ViolationKind::Version).len(), 1);
}

#[test]
fn repeated_and_retrograde_frames_are_dropped() {
    let observer = Arc::new(CollectingObserver::new());
    let mut dispatcher = Dispatcher::new(false).with_violation_observer(observer.clone());
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 0, 0), BATTLEFIELD)
        .frame(10, &[PostFrame::default()])
        .frame(10, &[PostFrame::default()])
        .frame(3, &[PostFrame::default()])
        .frame(11, &[PostFrame::default()])
        .build();
    let frames = decode_with(&mut dispatcher, &stream, 4096);
    let numbers: Vec<i32> = frames.iter().map(|f| f.frame.as_i32()).collect();
    assert_eq!(numbers, vec![10, 11]);
    assert_eq!(observer.violations_of_kind(ViolationKind::FrameOrdering).len(), 2);
}

#[test]
fn payload_tables_can_be_replaced_mid_stream() {
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 0, 0), BATTLEFIELD)
        .payloads(&[(0x42, 2)])
        .raw(&[0x42, 0xAA, 0xBB])
        .frame(1, &[PostFrame::default()])
        .build();
    let frames = decode_all(&stream, 5, false);
    assert_eq!(frames.len(), 1);
}

#[test]
fn ragged_payload_table_is_reported() {
    let observer = Arc::new(CollectingObserver::new());
    let mut dispatcher = Dispatcher::new(false).with_violation_observer(observer.clone());
    // Declared size 3 covers one byte of the entry list: one partial entry.
    dispatcher.push_game_event(&[0x35, 0x03, 0x38, 0x00]);
    assert_eq!(dispatcher.poll(), Ok(DispatchOutcome::Incomplete));
    assert!(observer.has_violation(ViolationKind::Framing));
}

#[test]
fn short_events_are_reported_once_per_command() {
    let observer = Arc::new(CollectingObserver::new());
    let mut dispatcher = Dispatcher::new(false).with_violation_observer(observer.clone());
    let mut builder = StreamBuilder::new()
        .payloads(&[(0x36, 0x40), (POST_FRAME, 0x30), (FRAME_BOOKEND, 8)])
        .raw(&{
            let mut start = vec![0u8; 0x41];
            start[0] = 0x36;
            start[1] = 3;
            start
        });
    for frame in 0..5 {
        builder = builder.raw(&PostFrame::at(frame, 0).bytes()[..0x31]).bookend(frame);
    }
    let frames = decode_with(&mut dispatcher, &builder.build(), 4096);
    assert_eq!(frames.len(), 5);
    // Game start and post-frame are each short.
    assert_eq!(observer.violations_of_kind(ViolationKind::Decoding).len(), 2);
    // Fields past the end fall back to defaults.
    let body = &frames[4].players.values().next().unwrap().primary;
    assert!(body.on_ground);
    assert_eq!(body.ecb, slippstream::Ecb::default());
}

#[test]
fn padding_ends_the_chunk() {
    let observer = Arc::new(CollectingObserver::new());
    let mut dispatcher = Dispatcher::new(false).with_violation_observer(observer.clone());
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 0, 0), BATTLEFIELD)
        .raw(&[0, 0, 0, 0])
        .build();
    decode_with(&mut dispatcher, &stream, 4096);
    assert_eq!(dispatcher.pending_bytes(), 0);
    assert_eq!(dispatcher.consumed(), stream.len());
    assert!(observer.is_empty(), "all-zero padding is not reported");
}
