//! Rebuilding the action frame indexing table from observed games.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::decode_with;
use crate::common::events::{PostFrame, StreamBuilder, BATTLEFIELD};
use slippstream::{
    port_detector, Action, Character, Dispatcher, Port, ZeroIndexRecorder, ZeroIndexTable,
};

const FOX: u8 = 0x01;
const MARTH: u8 = 0x12;
const TURNING: u16 = 0x12;

fn game() -> Vec<u8> {
    StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 7, 0), BATTLEFIELD)
        .frame(
            -123,
            &[
                PostFrame {
                    character: MARTH,
                    action: TURNING,
                    action_frame: 0.0,
                    ..PostFrame::at(0, 0)
                },
                PostFrame::at(0, 1),
            ],
        )
        .frame(
            -122,
            &[
                PostFrame {
                    character: MARTH,
                    action: TURNING,
                    action_frame: 1.0,
                    ..PostFrame::at(0, 0)
                },
                PostFrame {
                    character: FOX,
                    ..PostFrame::at(0, 1)
                },
            ],
        )
        .build()
}

#[test]
fn recorded_table_normalizes_a_second_pass() {
    let mut raw = Dispatcher::new(false).with_zero_index_table(ZeroIndexTable::default());
    let mut recorder = ZeroIndexRecorder::new();
    for state in decode_with(&mut raw, &game(), 64) {
        recorder.record(&state);
    }
    assert_eq!(recorder.len(), 2);

    let csv = recorder.to_csv();
    let table = ZeroIndexTable::from_csv(&csv).unwrap();
    assert!(table.contains(Character::Marth, Action::Turning));
    assert!(!table.contains(Character::Fox, Action::Standing));
    assert_eq!(table, recorder.into_table());

    let mut normalized = Dispatcher::new(false).with_zero_index_table(table);
    let frames = decode_with(&mut normalized, &game(), 64);
    assert_eq!(frames[0].players[&Port::new(1)].primary.action_frame, 1);
    assert_eq!(frames[1].players[&Port::new(1)].primary.action_frame, 2);
    assert_eq!(frames[0].players[&Port::new(2)].primary.action_frame, 1);
}

#[test]
fn port_detector_finds_the_unique_match() {
    let frames = decode_with(&mut Dispatcher::new(false), &game(), 4096);
    let last = &frames[1];
    assert_eq!(port_detector(last, Character::Marth, 0), Some(Port::new(1)));
    assert_eq!(port_detector(last, Character::Fox, 0), Some(Port::new(2)));
    assert_eq!(port_detector(last, Character::Falco, 0), None);

    // Two Foxes in the same costume are ambiguous.
    let mirror = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 7, 0), BATTLEFIELD)
        .frame(-123, &[PostFrame::at(0, 0), PostFrame::at(0, 1)])
        .build();
    let frames = decode_with(&mut Dispatcher::new(false), &mirror, 4096);
    assert_eq!(port_detector(&frames[0], Character::Fox, 0), None);
}
