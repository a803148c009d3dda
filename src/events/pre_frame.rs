//! Pre-Frame Update (0x37): the controller input a body acts on this frame.

use crate::events::reader::FieldReader;
use crate::events::GameStartInfo;
use crate::gamestate::{ButtonState, GameState};
use crate::Port;

/// Bytes read by [`decode`], command byte included.
pub const FULL_LEN: usize = RAW_MAIN_Y + 1;

const PORT: usize = 0x05;
const IS_PARTNER: usize = 0x06;
const MAIN_X: usize = 0x19;
const MAIN_Y: usize = 0x1D;
const C_X: usize = 0x21;
const C_Y: usize = 0x25;
const TRIGGER: usize = 0x29;
const BUTTONS: usize = 0x31;
const RAW_MAIN_X: usize = 0x3B;
const RAW_MAIN_Y: usize = 0x40;

/// Maps a stick axis from the wire's centered `-1.0..=1.0` to `0.0..=1.0`.
#[inline]
#[must_use]
pub fn remap_stick(raw: f32) -> f32 {
    raw / 2.0 + 0.5
}

/// Inverse of [`remap_stick`].
#[inline]
#[must_use]
pub fn unmap_stick(value: f32) -> f32 {
    (value - 0.5) * 2.0
}

/// Decodes a Pre-Frame Update into `state`.
///
/// Costume, CPU level and team come from the game start, since the event does not
/// restate them.
pub fn decode(event: &[u8], state: &mut GameState, start: &GameStartInfo) {
    let reader = FieldReader::new(event);
    let port = Port::from_wire(reader.u8_or(PORT, 0));
    let partner = reader.u8(IS_PARTNER) == Some(1);
    let body = state.player_mut(port).body_mut(partner);

    (body.costume, body.cpu_level, body.team_id) = start.slot(port.index());

    let controller = &mut body.controller_state;
    controller.main_stick = (
        remap_stick(reader.f32_or(MAIN_X, 0.0)),
        remap_stick(reader.f32_or(MAIN_Y, 0.0)),
    );
    controller.c_stick = (
        remap_stick(reader.f32_or(C_X, 0.0)),
        remap_stick(reader.f32_or(C_Y, 0.0)),
    );
    controller.raw_main_stick = (reader.i8_or(RAW_MAIN_X, 0), reader.i8_or(RAW_MAIN_Y, 0));

    // One physical trigger value, reported on both shoulders.
    let trigger = reader.f32_or(TRIGGER, 0.0);
    controller.l_shoulder = trigger;
    controller.r_shoulder = trigger;

    controller.buttons = ButtonState::from_bits(reader.u16_or(BUTTONS, 0));
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
    use crate::Button;

    fn put_f32(bytes: &mut [u8], offset: usize, value: f32) {
        bytes[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }

    fn event(slot: u8, partner: bool) -> Vec<u8> {
        let mut bytes = vec![0u8; FULL_LEN];
        bytes[0] = 0x37;
        bytes[PORT] = slot;
        bytes[IS_PARTNER] = u8::from(partner);
        put_f32(&mut bytes, MAIN_X, 1.0);
        put_f32(&mut bytes, MAIN_Y, -1.0);
        put_f32(&mut bytes, C_X, 0.5);
        put_f32(&mut bytes, TRIGGER, 0.75);
        bytes[BUTTONS..BUTTONS + 2].copy_from_slice(&0x0300u16.to_be_bytes());
        bytes[RAW_MAIN_X] = 0x50;
        bytes[RAW_MAIN_Y] = 0xb0;
        bytes
    }

    #[test]
    fn decodes_controller_state() {
        let mut state = GameState::default();
        let start = GameStartInfo {
            costumes: [0, 3, 0, 0],
            cpu_levels: [0, 9, 0, 0],
            team_ids: [0, 1, 0, 0],
            ..GameStartInfo::default()
        };
        decode(&event(1, false), &mut state, &start);

        let body = &state.players[&Port::new(2)].primary;
        let controller = body.controller_state;
        assert_eq!(controller.main_stick, (1.0, 0.0));
        assert_eq!(controller.c_stick, (0.75, 0.5));
        assert_eq!(controller.raw_main_stick, (80, -80));
        assert_eq!(controller.l_shoulder, 0.75);
        assert_eq!(controller.r_shoulder, 0.75);
        assert!(controller.buttons.is_pressed(Button::A));
        assert!(controller.buttons.is_pressed(Button::B));
        assert!(!controller.buttons.is_pressed(Button::Z));
        assert_eq!((body.costume, body.cpu_level, body.team_id), (3, 9, 1));
    }

    #[test]
    fn partner_flag_routes_to_partner() {
        let mut state = GameState::default();
        decode(&event(0, true), &mut state, &GameStartInfo::default());
        let player = &state.players[&Port::new(1)];
        assert!(player.partner.is_some());
        assert_eq!(player.primary.controller_state.main_stick, (0.5, 0.5));
    }

    #[test]
    fn missing_raw_stick_defaults_to_zero() {
        let mut bytes = event(0, false);
        bytes.truncate(RAW_MAIN_X);
        let mut state = GameState::default();
        decode(&bytes, &mut state, &GameStartInfo::default());
        assert_eq!(
            state.players[&Port::new(1)].primary.controller_state.raw_main_stick,
            (0, 0)
        );
    }

    #[test]
    fn stick_remap_inverts() {
        for raw in [-1.0f32, -0.25, 0.0, 0.6, 1.0] {
            assert!((unmap_stick(remap_stick(raw)) - raw).abs() < 1e-6);
        }
    }
}
