//! Determinism tests.
//!
//! Two decoders fed the same bytes must produce snapshots that encode to
//! identical bytes, however the input was chunked.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::decode_all;
use crate::common::events::{PostFrame, PreFrame, StreamBuilder, BATTLEFIELD};
use slippstream::codec::{decode_state, encode_state};

const STANDING: u16 = 0x0E;
const DASHING: u16 = 0x14;
const ON_HALO_DESCENT: u16 = 0x0C;

/// A short game with inputs, movement, a projectile and a respawn.
fn busy_game() -> Vec<u8> {
    let mut builder = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 12, 0), BATTLEFIELD);
    for frame in -123..-60 {
        let step = (frame + 123) as f32;
        builder = builder
            .frame_start(frame)
            .pre(PreFrame {
                frame,
                slot: 0,
                main_x: (step / 63.0).min(1.0),
                buttons: 0x0100,
                ..PreFrame::default()
            })
            .post(PostFrame {
                x: -30.0 + step,
                action: if frame < -100 { STANDING } else { DASHING },
                ..PostFrame::at(frame, 0)
            })
            .post(PostFrame {
                x: 30.0,
                action: if frame == -90 { ON_HALO_DESCENT } else { STANDING },
                percent: step,
                ..PostFrame::at(frame, 1)
            });
        if frame % 7 == 0 {
            builder = builder.item(0x36, 0, 1);
        }
        builder = builder.bookend(frame);
    }
    builder.game_end().build()
}

fn encoded(frames: &[slippstream::GameState]) -> Vec<Vec<u8>> {
    frames.iter().map(|state| encode_state(state).unwrap()).collect()
}

#[test]
fn independent_decoders_agree_byte_for_byte() {
    let stream = busy_game();
    let first = encoded(&decode_all(&stream, 4096, false));
    let second = encoded(&decode_all(&stream, 4096, false));
    assert_eq!(first.len(), 63);
    assert_eq!(first, second);
}

#[test]
fn chunking_does_not_change_any_snapshot() {
    let stream = busy_game();
    let reference = encoded(&decode_all(&stream, stream.len(), false));
    for chunk in [1, 2, 3, 9, 64, 121, 1000] {
        assert_eq!(
            encoded(&decode_all(&stream, chunk, false)),
            reference,
            "chunk size {chunk}"
        );
    }
}

#[test]
fn snapshots_survive_the_codec() {
    let stream = busy_game();
    for state in decode_all(&stream, 512, false) {
        let bytes = encode_state(&state).unwrap();
        assert_eq!(decode_state(&bytes).unwrap(), state);
    }
}
