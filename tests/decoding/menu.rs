//! Menu snapshots delivered through a session.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::events::{PostFrame, StreamBuilder, BATTLEFIELD};
use slippstream::{
    Character, ControllerStatus, Menu, PollingMode, Port, QueuedSource, SessionBuilder,
    SourceMessage, Stage, StepResult,
};

const MENU_EVENT_LEN: usize = 0x49;

fn menu_event(scene: u16, frame: i32) -> Vec<u8> {
    let mut bytes = vec![0u8; MENU_EVENT_LEN];
    bytes[0x01..0x03].copy_from_slice(&scene.to_be_bytes());
    bytes[0x39..0x3D].copy_from_slice(&frame.to_be_bytes());
    bytes
}

fn frame(step: StepResult) -> Box<slippstream::GameState> {
    match step {
        StepResult::Frame(state) => state,
        other => panic!("expected a frame, got {other:?}"),
    }
}

#[test]
fn every_menu_event_yields_a_snapshot() {
    let mut css = menu_event(0x0002, 50);
    css[0x25] = 1; // port 1 is a CPU
    css[0x29] = 0x0a; // Fox on the select screen
    css[0x41] = 7;

    let source = QueuedSource::from_messages([
        SourceMessage::MenuEvent(css.clone()),
        SourceMessage::MenuEvent(css),
        SourceMessage::MenuEvent(menu_event(0x0102, 10)),
    ]);
    let mut session = SessionBuilder::new().start_session(source).unwrap();

    let first = frame(session.next_frame().unwrap());
    assert_eq!(first.menu_state, Menu::CharacterSelect);
    let p1 = &first.players[&Port::new(1)].primary;
    assert_eq!(p1.controller_status, ControllerStatus::Cpu);
    assert_eq!(p1.cpu_level, 7);
    assert_eq!(p1.character, Character::Fox);

    // Identical menu frames are not deduplicated.
    let second = frame(session.next_frame().unwrap());
    assert_eq!(second, first);

    // Nor ordered: a lower frame number still comes through.
    let third = frame(session.next_frame().unwrap());
    assert_eq!(third.menu_state, Menu::StageSelect);
    assert_eq!(third.frame.as_i32(), 10);

    assert_eq!(session.next_frame().unwrap(), StepResult::Ended);
}

#[test]
fn game_events_switch_back_to_in_game() {
    let game = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 0, 0), BATTLEFIELD)
        .frame(-123, &[PostFrame::default()])
        .build();
    let source = QueuedSource::from_messages([
        SourceMessage::MenuEvent(menu_event(0x0102, 3)),
        SourceMessage::GameEvent(game),
    ]);
    let mut session = SessionBuilder::new()
        .with_polling_mode(PollingMode::NonBlocking)
        .start_session(source)
        .unwrap();

    assert_eq!(frame(session.next_frame().unwrap()).menu_state, Menu::StageSelect);
    let in_game = frame(session.next_frame().unwrap());
    assert_eq!(in_game.menu_state, Menu::InGame);
    assert_eq!(in_game.stage, Stage::Battlefield);
}
