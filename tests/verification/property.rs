//! Property-based tests for the decoder.
//!
//! These use proptest and the `__internal` module to drive components directly.
//!
//! # Properties Tested
//!
//! - Arbitrary bytes after a payload table never panic the dispatcher, and an error
//!   never consumes the offending event
//! - Delivered frame numbers are strictly increasing whatever order frames arrive in
//! - The stick remap round-trips on `-1.0..=1.0`
//! - Action frame normalization touches exactly the listed pairs
//! - Field reads never succeed past the end of an event

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::events::{PostFrame, StreamBuilder, BATTLEFIELD};
use proptest::prelude::*;
use slippstream::__internal::{normalize_action_frame, remap_stick, unmap_stick, FieldReader};
use slippstream::{Action, Character, DispatchOutcome, Dispatcher, PlayerState, ZeroIndexTable};

// ============================================================================
// Strategies
// ============================================================================

fn frame_numbers() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-123i32..200, 1..40)
}

fn chunk_size() -> impl Strategy<Value = usize> {
    1usize..300
}

proptest! {
    /// Random bytes behind a valid table either decode or fail cleanly.
    #[test]
    fn prop_garbage_never_panics(
        garbage in prop::collection::vec(any::<u8>(), 0..512),
        chunk in chunk_size(),
    ) {
        let mut stream = StreamBuilder::new().standard_payloads().build();
        stream.extend(garbage);

        let mut dispatcher = Dispatcher::new(true);
        'feed: for piece in stream.chunks(chunk) {
            dispatcher.push_game_event(piece);
            loop {
                let before = dispatcher.pending_bytes();
                match dispatcher.poll() {
                    Ok(DispatchOutcome::Frame(_)) => {},
                    Ok(DispatchOutcome::Incomplete) => break,
                    Ok(DispatchOutcome::GameEnded) => break 'feed,
                    Err(_) => {
                        prop_assert!(dispatcher.pending_bytes() <= before);
                        prop_assert!(dispatcher.pending_bytes() > 0);
                        break 'feed;
                    },
                }
            }
        }
        prop_assert!(dispatcher.consumed() <= stream.len());
    }

    /// Whatever order frames arrive in, deliveries strictly increase.
    #[test]
    fn prop_delivered_frames_strictly_increase(
        numbers in frame_numbers(),
        chunk in chunk_size(),
    ) {
        let mut builder = StreamBuilder::new()
            .standard_payloads()
            .game_start((3, 0, 0), BATTLEFIELD);
        for number in &numbers {
            builder = builder.frame(*number, &[PostFrame::default()]);
        }
        let frames = crate::common::decode_all(&builder.build(), chunk, false);

        prop_assert!(frames.windows(2).all(|w| w[0].frame < w[1].frame));
        // Each delivered frame is a running maximum of the input.
        let mut best = i32::MIN;
        let expected: Vec<i32> = numbers
            .iter()
            .filter(|&&n| {
                let fresh = n > best;
                best = best.max(n);
                fresh
            })
            .copied()
            .collect();
        let delivered: Vec<i32> = frames.iter().map(|f| f.frame.as_i32()).collect();
        prop_assert_eq!(delivered, expected);
    }

    /// The stick remap inverts cleanly.
    #[test]
    fn prop_stick_remap_round_trips(raw in -1.0f32..=1.0) {
        let mapped = remap_stick(raw);
        prop_assert!((0.0..=1.0).contains(&mapped));
        prop_assert!((unmap_stick(mapped) - raw).abs() < 1e-6);
    }

    /// Only listed pairs are shifted.
    #[test]
    fn prop_normalization_only_touches_listed_pairs(
        character in 0u8..0x1a,
        action in 0u16..0x180,
        listed_action in 0u16..0x180,
        action_frame in -5i32..500,
    ) {
        let character = Character::from_wire_or_unknown(character);
        let action = Action::from_wire_or_unknown(action);
        let listed = Action::from_wire_or_unknown(listed_action);

        let mut table = ZeroIndexTable::default();
        table.insert(Character::Fox, listed);

        let mut body = PlayerState {
            character,
            action,
            action_frame,
            ..PlayerState::default()
        };
        normalize_action_frame(&mut body, &table);

        let shifted = character == Character::Fox && action == listed;
        prop_assert_eq!(body.action_frame, if shifted { action_frame + 1 } else { action_frame });
    }

    /// Reads past the end of an event fall back instead of panicking.
    #[test]
    fn prop_reader_respects_event_length(
        event in prop::collection::vec(any::<u8>(), 0..64),
        offset in 0usize..80,
    ) {
        let reader = FieldReader::new(&event);
        prop_assert_eq!(reader.u8(offset).is_some(), offset < event.len());
        prop_assert_eq!(reader.u16(offset).is_some(), offset + 2 <= event.len());
        prop_assert_eq!(reader.i32(offset).is_some(), offset + 4 <= event.len());
        if offset + 4 > event.len() {
            prop_assert_eq!(reader.f32_or(offset, 7.5), 7.5);
        }
    }
}
