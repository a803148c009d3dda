//! End-to-end byte streams with hand-checked expectations.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::decode_all;
use crate::common::events::{PostFrame, PreFrame, StreamBuilder, BATTLEFIELD, POST_FRAME};
use slippstream::{Character, DispatchOutcome, Dispatcher, Frame, Port, ProjectileType, Stage};

#[test]
fn post_frame_exactly_as_long_as_registered_decodes() {
    let mut post = PostFrame::at(10, 0).bytes();
    post.truncate(0x43);
    let table = StreamBuilder::new().payloads(&[(POST_FRAME, 0x42)]).build();

    let mut dispatcher = Dispatcher::new(false);
    dispatcher.push_game_event(&table);
    dispatcher.push_game_event(&post);
    assert_eq!(dispatcher.poll(), Ok(DispatchOutcome::Incomplete));
    assert_eq!(dispatcher.pending_bytes(), 0);
    assert_eq!(dispatcher.consumed(), table.len() + 0x43);
}

#[test]
fn post_frame_one_byte_short_waits() {
    let mut post = PostFrame::at(10, 0).bytes();
    post.truncate(0x42);
    let table = StreamBuilder::new().payloads(&[(POST_FRAME, 0x42)]).build();

    let mut dispatcher = Dispatcher::new(false);
    dispatcher.push_game_event(&table);
    dispatcher.push_game_event(&post);
    assert_eq!(dispatcher.poll(), Ok(DispatchOutcome::Incomplete));
    assert_eq!(dispatcher.pending_bytes(), 0x42);
    assert_eq!(dispatcher.consumed(), table.len());

    // The last byte completes it.
    dispatcher.push_game_event(&[0]);
    assert_eq!(dispatcher.poll(), Ok(DispatchOutcome::Incomplete));
    assert_eq!(dispatcher.pending_bytes(), 0);
}

#[test]
fn airborne_byte_inverts_into_on_ground() {
    for (airborne, on_ground) in [(1, false), (0, true)] {
        let stream = StreamBuilder::new()
            .standard_payloads()
            .game_start((3, 0, 0), BATTLEFIELD)
            .frame(1, &[PostFrame {
                airborne,
                ..PostFrame::default()
            }])
            .build();
        let frames = decode_all(&stream, 64, false);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].players[&Port::new(1)].primary.on_ground, on_ground);
    }
}

#[test]
fn distance_between_two_ports_ignores_port_order() {
    let p1 = PostFrame {
        x: -30.0,
        y: 0.0,
        ..PostFrame::at(0, 0)
    };
    let p2 = PostFrame {
        x: 10.0,
        y: 30.0,
        ..PostFrame::at(0, 1)
    };

    for bodies in [[p1, p2], [p2, p1]] {
        let stream = StreamBuilder::new()
            .standard_payloads()
            .game_start((3, 0, 0), BATTLEFIELD)
            .frame(5, &bodies)
            .build();
        let frames = decode_all(&stream, 4096, false);
        assert_eq!(frames.len(), 1);
        assert!((frames[0].distance - 50.0).abs() < 1e-4);
    }
}

#[test]
fn legacy_streams_deliver_one_frame_behind() {
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((2, 0, 0), BATTLEFIELD)
        .post(PostFrame {
            x: 1.0,
            ..PostFrame::at(-123, 0)
        })
        .post(PostFrame {
            x: 2.0,
            ..PostFrame::at(-122, 0)
        })
        .build();
    let frames = decode_all(&stream, 4096, true);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].frame, Frame::FIRST);
    assert_eq!(frames[0].players[&Port::new(1)].primary.position.x, 1.0);
}

#[test]
fn legacy_frames_collect_every_body_of_a_frame() {
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((2, 0, 0), BATTLEFIELD)
        .pre(PreFrame {
            frame: 7,
            slot: 0,
            ..PreFrame::default()
        })
        .post(PostFrame::at(7, 0))
        .post(PostFrame::at(7, 1))
        .post(PostFrame::at(8, 0))
        .post(PostFrame::at(8, 1))
        .post(PostFrame::at(9, 0))
        .build();
    let frames = decode_all(&stream, 4096, true);
    let numbers: Vec<i32> = frames.iter().map(|f| f.frame.as_i32()).collect();
    assert_eq!(numbers, vec![7, 8]);
    assert!(frames.iter().all(|f| f.players.len() == 2));
}

#[test]
fn spent_items_never_reach_the_snapshot() {
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 0, 0), BATTLEFIELD)
        .frame_start(1)
        .post(PostFrame::at(1, 0))
        .item(ProjectileType::SamusBomb.value(), 3, 0)
        .item(ProjectileType::FoxLaser.value(), 0, 0)
        .bookend(1)
        .build();
    let frames = decode_all(&stream, 4096, false);
    assert_eq!(frames.len(), 1);
    let kinds: Vec<_> = frames[0].projectiles.iter().map(|p| p.kind).collect();
    assert_eq!(kinds, vec![ProjectileType::FoxLaser]);
    assert_eq!(frames[0].projectiles[0].owner, Some(Port::new(1)));
}

#[test]
fn projectiles_last_one_frame() {
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 0, 0), BATTLEFIELD)
        .frame_start(1)
        .post(PostFrame::at(1, 0))
        .item(ProjectileType::FoxLaser.value(), 0, 0)
        .bookend(1)
        .frame(2, &[PostFrame::default()])
        .build();
    let frames = decode_all(&stream, 4096, false);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].projectiles.len(), 1);
    assert!(frames[1].projectiles.is_empty());
}

#[test]
fn game_start_fields_reach_every_frame() {
    let stream = StreamBuilder::new()
        .standard_payloads()
        .game_start((3, 12, 0), BATTLEFIELD)
        .frame(-123, &[PostFrame {
            character: Character::Marth.value(),
            ..PostFrame::default()
        }])
        .frame(-122, &[PostFrame::default()])
        .build();
    let frames = decode_all(&stream, 4096, false);
    assert_eq!(frames.len(), 2);
    for frame in &frames {
        assert_eq!(frame.stage, Stage::Battlefield);
        assert!(!frame.is_teams);
    }
    assert_eq!(frames[0].players[&Port::new(1)].primary.character, Character::Marth);
}

#[test]
fn a_second_game_restarts_frame_numbering() {
    let game = |builder: StreamBuilder| {
        builder
            .game_start((3, 0, 0), BATTLEFIELD)
            .frame(-123, &[PostFrame::default()])
            .frame(-122, &[PostFrame::default()])
            .game_end()
    };
    let stream = game(game(StreamBuilder::new().standard_payloads())).build();
    let frames = decode_all(&stream, 100, false);
    let numbers: Vec<i32> = frames.iter().map(|f| f.frame.as_i32()).collect();
    assert_eq!(numbers, vec![-123, -122, -123, -122]);
}
