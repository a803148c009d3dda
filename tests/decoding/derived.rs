//! Fields computed after a frame completes.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::decode_with;
use crate::common::events::{PostFrame, StreamBuilder, BATTLEFIELD};
use slippstream::__internal::FIRST_DESCENT_EXEMPT_UNTIL;
use slippstream::{Action, Character, Dispatcher, GameState, Port, ZeroIndexTable};

fn decode(frames: &[(i32, PostFrame)]) -> Vec<GameState> {
    decode_table(frames, ZeroIndexTable::builtin())
}

fn decode_table(frames: &[(i32, PostFrame)], table: ZeroIndexTable) -> Vec<GameState> {
    let mut builder = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 0, 0), BATTLEFIELD);
    for (frame, body) in frames {
        builder = builder.frame(*frame, &[*body]);
    }
    let mut dispatcher = Dispatcher::new(false).with_zero_index_table(table);
    decode_with(&mut dispatcher, &builder.build(), 4096)
}

fn acting(action: Action) -> PostFrame {
    PostFrame {
        action: action.value(),
        ..PostFrame::default()
    }
}

fn p1(state: &GameState) -> &slippstream::PlayerState {
    &state.players[&Port::new(1)].primary
}

#[test]
fn respawn_platform_counts_down() {
    let frames = decode(&[
        (400, acting(Action::OnHaloWait)),
        (401, acting(Action::Falling)),
        (402, acting(Action::Falling)),
    ]);
    let left: Vec<i32> = frames.iter().map(|f| p1(f).invulnerability_left).collect();
    assert_eq!(left, vec![120, 119, 118]);
    assert!(frames.iter().all(|f| p1(f).invulnerable));
}

#[test]
fn first_descent_is_exempt() {
    let early = decode(&[(FIRST_DESCENT_EXEMPT_UNTIL, acting(Action::OnHaloDescent))]);
    assert_eq!(p1(&early[0]).invulnerability_left, 0);
    assert!(!p1(&early[0]).invulnerable);

    let late = decode(&[(FIRST_DESCENT_EXEMPT_UNTIL + 1, acting(Action::OnHaloDescent))]);
    assert_eq!(p1(&late[0]).invulnerability_left, 120);
}

#[test]
fn ledge_grab_arms_on_its_first_frame() {
    let frames = decode(&[
        (1000, acting(Action::EdgeCatching)),
        (1001, PostFrame {
            action_frame: 2.0,
            ..acting(Action::EdgeCatching)
        }),
    ]);
    assert_eq!(p1(&frames[0]).invulnerability_left, 36);
    assert_eq!(p1(&frames[1]).invulnerability_left, 35);
}

#[test]
fn countdown_bottoms_out_at_zero() {
    let mut script = vec![(300, acting(Action::OnHaloWait))];
    script.extend((1..=130).map(|n| (300 + n, acting(Action::Falling))));
    let frames = decode(&script);
    assert_eq!(p1(frames.last().unwrap()).invulnerability_left, 0);
    assert!(!p1(frames.last().unwrap()).invulnerable);
}

#[test]
fn moonwalk_warning_follows_dash_entry() {
    let frames = decode(&[
        (10, acting(Action::Dashing)),
        (11, acting(Action::Standing)),
        (12, acting(Action::Dashing)),
        (13, acting(Action::Dashing)),
        (14, acting(Action::Turning)),
        (15, acting(Action::Dashing)),
    ]);
    let warnings: Vec<bool> = frames.iter().map(|f| p1(f).moonwalk_warning).collect();
    assert_eq!(warnings, vec![false, false, true, true, false, false]);
}

#[test]
fn off_stage_needs_airborne_and_past_the_edge() {
    let frames = decode(&[
        (20, PostFrame {
            x: 100.0,
            airborne: 1,
            ..PostFrame::default()
        }),
        (21, PostFrame {
            x: 100.0,
            airborne: 0,
            ..PostFrame::default()
        }),
        (22, PostFrame {
            x: 0.0,
            y: -20.0,
            airborne: 1,
            ..PostFrame::default()
        }),
        (23, PostFrame {
            x: 10.0,
            y: 10.0,
            airborne: 1,
            ..PostFrame::default()
        }),
    ]);
    let off: Vec<bool> = frames.iter().map(|f| p1(f).off_stage).collect();
    assert_eq!(off, vec![true, false, true, false]);
}

#[test]
fn zero_indexed_pairs_shift_by_one() {
    let mut table = ZeroIndexTable::default();
    table.insert(Character::Fox, Action::Dashing);
    let script = [
        (1, PostFrame {
            action_frame: 0.0,
            ..acting(Action::Dashing)
        }),
        (2, PostFrame {
            action_frame: 0.0,
            ..acting(Action::Standing)
        }),
    ];
    let frames = decode_table(&script, table);
    assert_eq!(p1(&frames[0]).action_frame, 1);
    assert_eq!(p1(&frames[1]).action_frame, 0);

    let untouched = decode(&script);
    assert_eq!(p1(&untouched[0]).action_frame, 0);
}

#[test]
fn decoded_bodies_never_claim_iasa() {
    let frames = decode(&[
        (10, acting(Action::Dair)),
        (11, acting(Action::Dair)),
        (12, acting(Action::LandingSpecial)),
    ]);
    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(|f| !p1(f).iasa));
}
