//! Menu events: a fixed-layout snapshot of the select screens and menus.
//!
//! Unlike game events these are not framed by the payload size table. Each message
//! carries exactly one menu event.

use crate::events::reader::FieldReader;
use crate::gamestate::{GameState, Player, Position};
use crate::{Character, ControllerStatus, Frame, Menu, Port, Stage, SubMenu};

const SCENE: usize = 0x01;
const CURSORS: usize = 0x03;
const READY_TO_START: usize = 0x23;
const STAGE: usize = 0x24;
const CONTROLLER_STATUS: usize = 0x25;
const CSS_CHARACTER: usize = 0x29;
const COIN_STATE: usize = 0x2D;
const SSS_CURSOR_X: usize = 0x31;
const SSS_CURSOR_Y: usize = 0x35;
const FRAME: usize = 0x39;
const SUBMENU: usize = 0x3D;
const MENU_SELECTION: usize = 0x3E;
const ONLINE_COSTUME: usize = 0x3F;
const NAMETAG: usize = 0x40;
const CPU_LEVEL: usize = 0x41;
const HOLDING_CPU_SLIDER: usize = 0x45;

const COIN_DOWN: u8 = 2;
const NAMETAG_ENTRY: u8 = 0x05;
const NAMETAG_NONE: u8 = 0x00;

/// Decodes a menu event into `state`.
pub fn decode(event: &[u8], state: &mut GameState) {
    let reader = FieldReader::new(event);

    state.menu_state = reader
        .u16(SCENE)
        .map_or(Menu::UnknownMenu, Menu::from_scene);
    if state.menu_state.activates_all_ports() {
        for port in Port::ALL {
            state.players.insert(port, Player::default());
        }
    }

    if state.menu_state.is_character_select() {
        decode_character_select(&reader, state);
    }
    if state.menu_state == Menu::StageSelect {
        decode_stage_select(&reader, state);
    }

    state.frame = Frame::new(reader.i32_or(FRAME, state.frame.as_i32()));
    state.submenu = reader
        .u8(SUBMENU)
        .map_or(SubMenu::Unknown, SubMenu::from_wire_or_unknown);
    state.menu_selection = reader.u8_or(MENU_SELECTION, 0);

    if state.menu_state == Menu::SlippiOnlineCss {
        if let Some(costume) = reader.u8(ONLINE_COSTUME) {
            for port in Port::ALL {
                state.player_mut(port).primary.costume = costume;
            }
        }
        match reader.u8(NAMETAG) {
            Some(NAMETAG_ENTRY) => state.submenu = SubMenu::NameEntry,
            Some(NAMETAG_NONE) => state.submenu = SubMenu::OnlineCss,
            _ => {},
        }
    }

    for (port, player) in &mut state.players {
        if !port.is_player_slot() {
            continue;
        }
        let slot = port.index();
        let body = &mut player.primary;
        if let Some(level) = reader.u8(CPU_LEVEL + slot) {
            body.cpu_level = level;
        }
        if let Some(holding) = reader.u8(HOLDING_CPU_SLIDER + slot) {
            body.is_holding_cpu_slider = holding != 0;
        }
        if body.controller_status != ControllerStatus::Cpu {
            body.cpu_level = 0;
        }
    }
}

fn decode_character_select(reader: &FieldReader<'_>, state: &mut GameState) {
    state.ready_to_start = reader.u8_or(READY_TO_START, 0) != 0;
    for port in Port::ALL {
        let slot = port.index();
        let body = &mut state.player_mut(port).primary;
        body.controller_status = reader
            .u8(CONTROLLER_STATUS + slot)
            .map_or(ControllerStatus::Unknown, ControllerStatus::from_wire_or_unknown);
        body.cursor = Position::new(
            reader.f32_or(CURSORS + slot * 8, 0.0),
            reader.f32_or(CURSORS + slot * 8 + 4, 0.0),
        );
        body.character = reader
            .u8(CSS_CHARACTER + slot)
            .map_or(Character::UnknownCharacter, Character::from_css_id);
        body.character_selected = body.character;
        body.coin_down = reader.u8(COIN_STATE + slot) == Some(COIN_DOWN);
    }
}

fn decode_stage_select(reader: &FieldReader<'_>, state: &mut GameState) {
    state.stage = reader
        .u8(STAGE)
        .map_or(Stage::NoStage, Stage::from_wire_or_unknown);
    let cursor = Position::new(
        reader.f32_or(SSS_CURSOR_X, 0.0),
        reader.f32_or(SSS_CURSOR_Y, 0.0),
    );
    for player in state.players.values_mut() {
        player.primary.cursor = cursor;
    }
    state.stage_select_cursor = cursor;
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

    const FULL_LEN: usize = HOLDING_CPU_SLIDER + 4;

    fn event(scene: u16) -> Vec<u8> {
        let mut bytes = vec![0u8; FULL_LEN];
        bytes[SCENE..SCENE + 2].copy_from_slice(&scene.to_be_bytes());
        bytes[FRAME..FRAME + 4].copy_from_slice(&900i32.to_be_bytes());
        bytes
    }

    #[test]
    fn character_select_decodes_every_port() {
        let mut bytes = event(0x0002);
        bytes[CONTROLLER_STATUS] = 0;
        bytes[CONTROLLER_STATUS + 1] = 1;
        bytes[CONTROLLER_STATUS + 2] = 3;
        bytes[CONTROLLER_STATUS + 3] = 0x42;
        bytes[CURSORS + 8..CURSORS + 12].copy_from_slice(&(-20.5f32).to_be_bytes());
        bytes[CSS_CHARACTER] = 0x0a;
        bytes[COIN_STATE] = COIN_DOWN;
        bytes[READY_TO_START] = 1;
        bytes[CPU_LEVEL] = 5;
        bytes[CPU_LEVEL + 1] = 9;

        let mut state = GameState::default();
        decode(&bytes, &mut state);

        assert_eq!(state.menu_state, Menu::CharacterSelect);
        assert_eq!(state.frame, 900);
        assert!(state.ready_to_start);
        assert_eq!(state.players.len(), 4);

        let p1 = &state.players[&Port::new(1)].primary;
        assert_eq!(p1.character, Character::Fox);
        assert_eq!(p1.character_selected, Character::Fox);
        assert!(p1.coin_down);
        assert_eq!(p1.cpu_level, 0, "humans never keep a CPU level");

        let p2 = &state.players[&Port::new(2)].primary;
        assert_eq!(p2.controller_status, ControllerStatus::Cpu);
        assert_eq!(p2.cpu_level, 9);
        assert_eq!(p2.cursor.x, -20.5);

        let p4 = &state.players[&Port::new(4)].primary;
        assert_eq!(p4.controller_status, ControllerStatus::Unknown);
    }

    #[test]
    fn stage_select_mirrors_the_cursor() {
        let mut bytes = event(0x0102);
        bytes[STAGE] = Stage::Dreamland.value();
        bytes[SSS_CURSOR_X..SSS_CURSOR_X + 4].copy_from_slice(&7.0f32.to_be_bytes());

        let mut state = GameState::default();
        decode(&bytes, &mut state);

        assert_eq!(state.stage, Stage::Dreamland);
        assert_eq!(state.stage_select_cursor, Position::new(7.0, 0.0));
        assert!(state
            .players
            .values()
            .all(|p| p.primary.cursor == Position::new(7.0, 0.0)));
    }

    #[test]
    fn online_css_nametag_overrides_submenu() {
        let mut bytes = event(0x0008);
        bytes[SUBMENU] = SubMenu::OnlinePlay.value();
        bytes[ONLINE_COSTUME] = 2;
        bytes[NAMETAG] = NAMETAG_ENTRY;

        let mut state = GameState::default();
        decode(&bytes, &mut state);
        assert_eq!(state.submenu, SubMenu::NameEntry);
        assert!(state.players.values().all(|p| p.primary.costume == 2));

        bytes[NAMETAG] = 0x09;
        decode(&bytes, &mut state);
        assert_eq!(state.submenu, SubMenu::OnlinePlay);
    }

    #[test]
    fn unknown_scenes_keep_players() {
        let mut state = GameState::default();
        state.player_mut(Port::new(3)).primary.percent = 12;
        decode(&event(0x0303), &mut state);
        assert_eq!(state.menu_state, Menu::UnknownMenu);
        assert_eq!(state.players[&Port::new(3)].primary.percent, 12);
    }

    #[test]
    fn short_events_degrade_per_field() {
        let mut state = GameState::default();
        decode(&[0x00, 0x00, 0x02], &mut state);
        assert_eq!(state.menu_state, Menu::CharacterSelect);
        assert_eq!(state.submenu, SubMenu::Unknown);
        let p1 = &state.players[&Port::new(1)].primary;
        assert_eq!(p1.controller_status, ControllerStatus::Unknown);
        assert_eq!(p1.character, Character::UnknownCharacter);
        assert!(!p1.coin_down);
    }
}
