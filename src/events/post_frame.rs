//! Post-Frame Update (0x38): the authoritative simulation result for one body.
//!
//! Fields were appended to this event over many protocol revisions. Everything from
//! the powershield byte onward may be missing and falls back to a per-field default.

use crate::events::reader::FieldReader;
use crate::events::GameStartInfo;
use crate::gamestate::{Ecb, GameState, Position};
use crate::{Action, Character, Frame, Port};

/// Bytes read by [`decode`], command byte included.
pub const FULL_LEN: usize = FOD_RIGHT + 4;

/// Offset of the frame number, shared with pre-frame events.
pub const FRAME: usize = 0x01;
const PORT: usize = 0x05;
const IS_PARTNER: usize = 0x06;
const CHARACTER: usize = 0x07;
const ACTION: usize = 0x08;
const X: usize = 0x0A;
const Y: usize = 0x0E;
const FACING: usize = 0x12;
const PERCENT: usize = 0x16;
const SHIELD: usize = 0x1A;
const STOCK: usize = 0x21;
const ACTION_FRAME: usize = 0x22;
const STATE_BITS_4: usize = 0x29;
const HITSTUN: usize = 0x2B;
const AIRBORNE: usize = 0x2F;
const JUMPS: usize = 0x32;
const INVULNERABLE: usize = 0x34;
const SPEED_AIR_X_SELF: usize = 0x35;
const SPEED_Y_SELF: usize = 0x39;
const SPEED_X_ATTACK: usize = 0x3D;
const SPEED_Y_ATTACK: usize = 0x41;
const SPEED_GROUND_X_SELF: usize = 0x45;
const HITLAG: usize = 0x49;
const ECB_TOP: usize = 0x51;
const ECB_BOTTOM: usize = 0x59;
const ECB_LEFT: usize = 0x61;
const ECB_RIGHT: usize = 0x69;
const FOD_LEFT: usize = 0x71;
const FOD_RIGHT: usize = 0x75;

const POWERSHIELD_BIT: u8 = 0x20;

/// Reads the frame number of a pre- or post-frame event.
#[must_use]
pub fn event_frame(event: &[u8]) -> Option<Frame> {
    FieldReader::new(event).i32(FRAME).map(Frame::new)
}

fn point(reader: &FieldReader<'_>, offset: usize) -> Position {
    Position::new(reader.f32_or(offset, 0.0), reader.f32_or(offset + 4, 0.0))
}

/// Decodes a Post-Frame Update into `state`.
pub fn decode(event: &[u8], state: &mut GameState, start: &GameStartInfo) {
    let reader = FieldReader::new(event);

    state.stage = start.stage;
    state.is_teams = start.is_teams;
    state.frame = Frame::new(reader.i32_or(FRAME, state.frame.as_i32()));
    state.fod_platform_left = reader.f32_or(FOD_LEFT, 0.0);
    state.fod_platform_right = reader.f32_or(FOD_RIGHT, 0.0);

    let port = Port::from_wire(reader.u8_or(PORT, 0));
    let partner = reader.u8(IS_PARTNER) == Some(1);
    let body = state.player_mut(port).body_mut(partner);

    body.position = point(&reader, X);
    body.character = Character::from_wire_or_unknown(reader.u8_or(CHARACTER, u8::MAX));
    body.action = Action::from_wire_or_unknown(reader.u16_or(ACTION, u16::MAX));
    // Facing is a float on the wire: positive means right.
    body.facing = reader.f32_or(FACING, 1.0) > 0.0;
    body.percent = reader.f32_truncated_or(PERCENT, 0);
    body.shield_strength = reader.f32_or(SHIELD, 60.0);
    body.stock = reader.u8_or(STOCK, 0);
    body.action_frame = reader.f32_truncated_or(ACTION_FRAME, 0);

    body.is_powershield = reader.u8_or(STATE_BITS_4, 0) & POWERSHIELD_BIT == POWERSHIELD_BIT;
    body.hitstun_frames_left = reader.f32_truncated_or(HITSTUN, 0);
    body.on_ground = reader.u8(AIRBORNE).map_or(true, |airborne| airborne == 0);
    body.jumps_left = reader.u8_or(JUMPS, 1);
    body.invulnerable = reader.u8_or(INVULNERABLE, 0) != 0;

    body.speed_air_x_self = reader.f32_or(SPEED_AIR_X_SELF, 0.0);
    body.speed_y_self = reader.f32_or(SPEED_Y_SELF, 0.0);
    body.speed_x_attack = reader.f32_or(SPEED_X_ATTACK, 0.0);
    body.speed_y_attack = reader.f32_or(SPEED_Y_ATTACK, 0.0);
    body.speed_ground_x_self = reader.f32_or(SPEED_GROUND_X_SELF, 0.0);
    body.hitlag_left = reader.f32_truncated_or(HITLAG, 0);

    body.ecb = Ecb {
        top: point(&reader, ECB_TOP),
        bottom: point(&reader, ECB_BOTTOM),
        left: point(&reader, ECB_LEFT),
        right: point(&reader, ECB_RIGHT),
    };
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::Stage;

    fn put_f32(bytes: &mut [u8], offset: usize, value: f32) {
        bytes[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }

    fn event() -> Vec<u8> {
        let mut bytes = vec![0u8; FULL_LEN];
        bytes[0] = 0x38;
        bytes[FRAME..FRAME + 4].copy_from_slice(&42i32.to_be_bytes());
        bytes[PORT] = 1;
        bytes[CHARACTER] = Character::Fox.value();
        bytes[ACTION..ACTION + 2].copy_from_slice(&Action::Dashing.value().to_be_bytes());
        put_f32(&mut bytes, X, -12.5);
        put_f32(&mut bytes, Y, 3.0);
        put_f32(&mut bytes, FACING, -1.0);
        put_f32(&mut bytes, PERCENT, 37.9);
        put_f32(&mut bytes, SHIELD, 45.5);
        bytes[STOCK] = 3;
        put_f32(&mut bytes, ACTION_FRAME, 4.0);
        bytes[STATE_BITS_4] = 0x21;
        put_f32(&mut bytes, HITSTUN, 10.0);
        bytes[AIRBORNE] = 1;
        bytes[JUMPS] = 2;
        put_f32(&mut bytes, SPEED_Y_SELF, -2.5);
        put_f32(&mut bytes, HITLAG, 4.0);
        put_f32(&mut bytes, ECB_LEFT + 4, 6.0);
        put_f32(&mut bytes, FOD_RIGHT, 20.25);
        bytes
    }

    #[test]
    fn decodes_every_field() {
        let mut state = GameState::default();
        let start = GameStartInfo {
            stage: Stage::FountainOfDreams,
            is_teams: true,
            ..GameStartInfo::default()
        };
        decode(&event(), &mut state, &start);

        assert_eq!(state.frame, 42);
        assert_eq!(state.stage, Stage::FountainOfDreams);
        assert!(state.is_teams);
        assert_eq!(state.fod_platform_right, 20.25);

        let body = &state.players[&Port::new(2)].primary;
        assert_eq!(body.character, Character::Fox);
        assert_eq!(body.action, Action::Dashing);
        assert_eq!(body.position, Position::new(-12.5, 3.0));
        assert!(!body.facing);
        assert_eq!(body.percent, 37);
        assert_eq!(body.shield_strength, 45.5);
        assert_eq!(body.stock, 3);
        assert_eq!(body.action_frame, 4);
        assert!(body.is_powershield);
        assert_eq!(body.hitstun_frames_left, 10);
        assert!(!body.on_ground);
        assert_eq!(body.jumps_left, 2);
        assert_eq!(body.speed_y_self, -2.5);
        assert_eq!(body.hitlag_left, 4);
        assert_eq!(body.ecb.left, Position::new(0.0, 6.0));
    }

    #[test]
    fn short_events_use_field_defaults() {
        let mut bytes = event();
        bytes.truncate(STATE_BITS_4);
        let mut state = GameState::default();
        decode(&bytes, &mut state, &GameStartInfo::default());

        let body = &state.players[&Port::new(2)].primary;
        assert_eq!(body.percent, 37);
        assert!(!body.is_powershield);
        assert_eq!(body.hitstun_frames_left, 0);
        assert!(body.on_ground);
        assert_eq!(body.jumps_left, 1);
        assert!(!body.invulnerable);
        assert_eq!(body.ecb, Ecb::default());
    }

    #[test]
    fn unknown_action_becomes_sentinel() {
        let mut bytes = event();
        bytes[ACTION..ACTION + 2].copy_from_slice(&0x7777u16.to_be_bytes());
        let mut state = GameState::default();
        decode(&bytes, &mut state, &GameStartInfo::default());
        assert_eq!(
            state.players[&Port::new(2)].primary.action,
            Action::UnknownAnimation
        );
    }

    #[test]
    fn event_frame_reads_the_shared_offset() {
        assert_eq!(event_frame(&event()), Some(Frame::new(42)));
        assert_eq!(event_frame(&[0x38, 0, 0]), None);
    }
}
