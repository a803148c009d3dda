//! Invariant tests for decoded snapshots.
//!
//! Every frame the dispatcher delivers must pass `InvariantChecker`, and a
//! well-formed stream must not raise any violation on the observer.
//!
//! # Invariants Tested
//!
//! - No player is keyed by port 0
//! - Projectile owners are ports 1 through 4, or absent
//! - Spent items never reach the projectile list
//! - Partners exist only on the frame their post event arrived

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use std::sync::Arc;

use crate::common::decode_with;
use crate::common::events::{PostFrame, StreamBuilder, FINAL_DESTINATION};
use slippstream::telemetry::{CollectingObserver, InvariantChecker};
use slippstream::{assert_no_violations, Dispatcher, Port};

const FOX_LASER: u16 = 0x36;
const SAMUS_BOMB: u16 = 0x5D;

fn checked_frames(stream: &[u8], chunk: usize) -> (Vec<slippstream::GameState>, Arc<CollectingObserver>) {
    let observer = Arc::new(CollectingObserver::new());
    let mut dispatcher = Dispatcher::new(false).with_violation_observer(observer.clone());
    let frames = decode_with(&mut dispatcher, stream, chunk);
    (frames, observer)
}

#[test]
fn every_delivered_frame_passes_its_checker() {
    let mut builder = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 5, 0), FINAL_DESTINATION);
    for frame in -123..-80 {
        builder = builder
            .frame_start(frame)
            .post(PostFrame::at(frame, 0))
            .post(PostFrame::at(frame, 3))
            .item(FOX_LASER, 0, 0)
            .item(SAMUS_BOMB, 3, 3)
            .item(SAMUS_BOMB, 1, 9)
            .bookend(frame);
    }
    let (frames, observer) = checked_frames(&builder.build(), 37);

    assert_eq!(frames.len(), 43);
    for state in &frames {
        state.check_invariants().unwrap();
        assert_eq!(state.players.len(), 2);
        // The spent bomb is dropped; the unowned one is kept with no owner.
        assert_eq!(state.projectiles.len(), 2);
        assert_eq!(state.projectiles[0].owner, Some(Port::new(1)));
        assert_eq!(state.projectiles[1].owner, None);
    }
    assert_no_violations!(observer);
}

#[test]
fn partners_do_not_outlive_their_frame() {
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 5, 0), FINAL_DESTINATION)
        .frame(
            -123,
            &[
                PostFrame::at(0, 0),
                PostFrame {
                    partner: true,
                    ..PostFrame::at(0, 0)
                },
            ],
        )
        .frame(-122, &[PostFrame::at(0, 0)])
        .build();
    let (frames, observer) = checked_frames(&stream, 5);

    assert_eq!(frames.len(), 2);
    assert!(frames[0].players[&Port::new(1)].partner.is_some());
    assert!(frames[1].players[&Port::new(1)].partner.is_none());
    for state in &frames {
        state.check_invariants().unwrap();
    }
    assert_no_violations!(observer, "partner bookkeeping");
}
