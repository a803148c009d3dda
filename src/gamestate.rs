//! The snapshot types delivered for every completed frame.
//!
//! A [`GameState`] owns one [`Player`] per occupied port. A player's simulation state
//! lives in [`Player::primary`]; characters that control a second body (the Ice
//! Climbers) also carry a [`Player::partner`] of the same shape. Partners never have
//! partners of their own.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::enums::{Action, Button, Character, ControllerStatus, Menu, ProjectileType, Stage, SubMenu};
use crate::telemetry::{InvariantChecker, InvariantViolation};
use crate::{Frame, Port};

/// A 2-D point or vector in stage units.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal component. Positive is right.
    pub x: f32,
    /// Vertical component. Positive is up.
    pub y: f32,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The environmental collision box: a diamond described by its four corners,
/// relative to the character's position.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Ecb {
    pub top: Position,
    pub bottom: Position,
    pub left: Position,
    pub right: Position,
}

/// Pressed state of every digital button.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonState([bool; 12]);

impl ButtonState {
    /// Unpacks a processed button word.
    #[must_use]
    pub fn from_bits(bits: u16) -> Self {
        let mut pressed = [false; 12];
        for button in Button::ALL {
            pressed[button.index()] = bits & button.mask() != 0;
        }
        Self(pressed)
    }

    /// Packs the pressed buttons back into a button word.
    #[must_use]
    pub fn to_bits(self) -> u16 {
        Button::ALL
            .iter()
            .filter(|b| self.is_pressed(**b))
            .fold(0, |bits, b| bits | b.mask())
    }

    /// Returns `true` if `button` is held.
    #[must_use]
    pub fn is_pressed(self, button: Button) -> bool {
        self.0[button.index()]
    }

    /// Sets whether `button` is held.
    pub fn set(&mut self, button: Button, pressed: bool) {
        self.0[button.index()] = pressed;
    }
}

/// The controller input a character acted on this frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    /// Main stick, each axis in `0.0..=1.0` with 0.5 centered.
    pub main_stick: (f32, f32),
    /// C stick, each axis in `0.0..=1.0` with 0.5 centered.
    pub c_stick: (f32, f32),
    /// Unprocessed main stick bytes.
    pub raw_main_stick: (i8, i8),
    /// Left analog shoulder, `0.0..=1.0`.
    pub l_shoulder: f32,
    /// Right analog shoulder, `0.0..=1.0`.
    pub r_shoulder: f32,
    /// Digital buttons.
    pub buttons: ButtonState,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            main_stick: (0.5, 0.5),
            c_stick: (0.5, 0.5),
            raw_main_stick: (0, 0),
            l_shoulder: 0.0,
            r_shoulder: 0.0,
            buttons: ButtonState::default(),
        }
    }
}

/// The state of one character body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// The character currently in play.
    pub character: Character,
    /// The character picked on the select screen. Differs from `character` for
    /// characters that transform mid-match.
    pub character_selected: Character,
    /// Position on stage.
    pub position: Position,
    /// Damage percent, truncated.
    pub percent: i32,
    /// Shield strength. 60 is full.
    pub shield_strength: f32,
    /// `true` while the current shield is a powershield.
    pub is_powershield: bool,
    /// Stocks remaining.
    pub stock: u8,
    /// `true` when facing right.
    pub facing: bool,
    /// Current action state.
    pub action: Action,
    /// Frame within the current action, 1-indexed.
    pub action_frame: i32,
    /// `true` while the character cannot be hit.
    pub invulnerable: bool,
    /// Frames of respawn or ledge invulnerability remaining.
    pub invulnerability_left: i32,
    /// Frames of hitlag remaining.
    pub hitlag_left: i32,
    /// Frames of hitstun remaining.
    pub hitstun_frames_left: i32,
    /// Jumps remaining, including the ground jump.
    pub jumps_left: u8,
    /// `true` when standing on ground.
    pub on_ground: bool,
    /// Self-induced horizontal air speed.
    pub speed_air_x_self: f32,
    /// Self-induced vertical speed.
    pub speed_y_self: f32,
    /// Attack-induced horizontal speed.
    pub speed_x_attack: f32,
    /// Attack-induced vertical speed.
    pub speed_y_attack: f32,
    /// Self-induced horizontal ground speed.
    pub speed_ground_x_self: f32,
    /// Select screen cursor.
    pub cursor: Position,
    /// `true` when the select screen coin is placed.
    pub coin_down: bool,
    /// How the port is occupied on the select screen.
    pub controller_status: ControllerStatus,
    /// Derived: airborne and beyond the ledge or below the stage.
    pub off_stage: bool,
    /// Interruptible-as-soon-as flag. Only meaningful during standard attacks.
    ///
    /// The event stream does not carry this flag, so decoded frames always hold
    /// `false`. Hosts that know the flag from another source may set it; the next
    /// derived pass clears it outside the standard attacks.
    pub iasa: bool,
    /// Derived: dashing back now would moonwalk.
    pub moonwalk_warning: bool,
    /// Controller input for this frame.
    pub controller_state: ControllerState,
    /// Collision box corners.
    pub ecb: Ecb,
    /// Costume index.
    pub costume: u8,
    /// CPU level, or 0 for a human or unplugged port.
    pub cpu_level: u8,
    /// `true` while the select screen CPU level slider is held.
    pub is_holding_cpu_slider: bool,
    /// Netplay display name, from replay metadata. May be empty.
    pub nickname: String,
    /// Netplay connect code, from replay metadata. May be empty.
    pub connect_code: String,
    /// Team id. Only meaningful in team games.
    pub team_id: u8,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            character: Character::UnknownCharacter,
            character_selected: Character::UnknownCharacter,
            position: Position::default(),
            percent: 0,
            shield_strength: 60.0,
            is_powershield: false,
            stock: 0,
            facing: true,
            action: Action::UnknownAnimation,
            action_frame: 0,
            invulnerable: false,
            invulnerability_left: 0,
            hitlag_left: 0,
            hitstun_frames_left: 0,
            jumps_left: 0,
            on_ground: true,
            speed_air_x_self: 0.0,
            speed_y_self: 0.0,
            speed_x_attack: 0.0,
            speed_y_attack: 0.0,
            speed_ground_x_self: 0.0,
            cursor: Position::default(),
            coin_down: false,
            controller_status: ControllerStatus::Unplugged,
            off_stage: false,
            iasa: false,
            moonwalk_warning: false,
            controller_state: ControllerState::default(),
            ecb: Ecb::default(),
            costume: 0,
            cpu_level: 0,
            is_holding_cpu_slider: false,
            nickname: String::new(),
            connect_code: String::new(),
            team_id: 0,
        }
    }
}

/// Everything known about one port.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Player {
    /// The main body.
    pub primary: PlayerState,
    /// The second body, for characters that control two.
    pub partner: Option<PlayerState>,
}

impl Player {
    /// Returns the record for the main body or, if `partner` is set, the second
    /// body, creating the second body on first use.
    pub fn body_mut(&mut self, partner: bool) -> &mut PlayerState {
        if partner {
            self.partner.get_or_insert_with(PlayerState::default)
        } else {
            &mut self.primary
        }
    }

    /// Iterates over the main body and, if present, the second body.
    pub fn bodies(&self) -> impl Iterator<Item = &PlayerState> {
        std::iter::once(&self.primary).chain(self.partner.as_ref())
    }
}

/// An item or projectile alive during one frame.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Projectile {
    /// Position on stage.
    pub position: Position,
    /// Velocity.
    pub speed: Position,
    /// Owning port, if the item has an owner.
    pub owner: Option<Port>,
    /// What the item is.
    pub kind: ProjectileType,
    /// Frames the item has existed, or -1 when the wire value is not a number.
    pub frame: i32,
    /// Kind-specific state. Its meaning differs per kind.
    pub subtype: u8,
}

/// Inline capacity for the projectile list.
pub const INLINE_PROJECTILES: usize = 8;

/// A snapshot of the whole game for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// The frame number. See [`Frame`].
    pub frame: Frame,
    /// The stage being played.
    pub stage: Stage,
    /// The scene the game is in.
    pub menu_state: Menu,
    /// The highlighted sub-menu.
    pub submenu: SubMenu,
    /// Occupied ports, in the order their first event arrived.
    pub players: IndexMap<Port, Player>,
    /// Items alive this frame.
    pub projectiles: SmallVec<[Projectile; INLINE_PROJECTILES]>,
    /// `true` while the select screen "ready to fight" banner shows.
    pub ready_to_start: bool,
    /// `true` in team games.
    pub is_teams: bool,
    /// Distance between the first two players.
    pub distance: f32,
    /// Highlighted menu entry.
    pub menu_selection: u8,
    /// Stage select cursor.
    pub stage_select_cursor: Position,
    /// Height of the left Fountain of Dreams platform.
    pub fod_platform_left: f32,
    /// Height of the right Fountain of Dreams platform.
    pub fod_platform_right: f32,
    /// When the game started, from replay metadata. May be empty.
    pub start_at: String,
    /// Platform the game was played on, from replay metadata. May be empty.
    pub played_on: String,
    /// Name of the console that recorded the game. May be empty.
    pub console_nick: String,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            frame: Frame::NONE,
            stage: Stage::NoStage,
            menu_state: Menu::InGame,
            submenu: SubMenu::Unknown,
            players: IndexMap::new(),
            projectiles: SmallVec::new(),
            ready_to_start: false,
            is_teams: false,
            distance: 0.0,
            menu_selection: 0,
            stage_select_cursor: Position::default(),
            fod_platform_left: 0.0,
            fod_platform_right: 0.0,
            start_at: String::new(),
            played_on: String::new(),
            console_nick: String::new(),
        }
    }
}

impl GameState {
    /// Returns the player on `port`, if any.
    #[must_use]
    pub fn player(&self, port: Port) -> Option<&Player> {
        self.players.get(&port)
    }

    /// Returns the player on `port`, creating an empty record if the port was unseen.
    pub fn player_mut(&mut self, port: Port) -> &mut Player {
        self.players.entry(port).or_default()
    }

    /// Starts the next frame from this one: players carry over, while partners and
    /// projectiles are rebuilt from the next frame's events.
    #[must_use]
    pub fn successor(&self) -> Self {
        let mut next = self.clone();
        next.projectiles.clear();
        for player in next.players.values_mut() {
            player.partner = None;
        }
        next
    }

    /// Recomputes [`GameState::distance`] from the first two players in insertion order.
    ///
    /// A missing player counts as standing at the origin.
    pub fn update_distance(&mut self) {
        let mut positions = self.players.values().map(|p| p.primary.position);
        let first = positions.next().unwrap_or_default();
        let second = positions.next().unwrap_or_default();
        self.distance = first.distance_to(second);
    }
}

impl InvariantChecker for GameState {
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if let Some(port) = self.players.keys().find(|port| port.as_u8() == 0) {
            return Err(InvariantViolation::new("GameState", "player keyed by port 0")
                .with_details(format!("port={port}")));
        }
        for projectile in &self.projectiles {
            if let Some(owner) = projectile.owner {
                if !owner.is_player_slot() {
                    return Err(InvariantViolation::new(
                        "GameState",
                        "projectile owner outside ports 1..=4",
                    )
                    .with_details(format!("owner={owner}")));
                }
            }
            if projectile.kind.is_spent(projectile.subtype) {
                return Err(InvariantViolation::new(
                    "GameState",
                    "spent item kept in projectile list",
                )
                .with_details(format!("kind={:?} subtype={}", projectile.kind, projectile.subtype)));
            }
        }
        Ok(())
    }
}

/// Finds the port playing `character` in `costume`.
///
/// Slippi online assigns ports at random, so a bot uses this to learn its own port.
/// Returns `None` if no port matches, or if more than one does.
#[must_use]
pub fn port_detector(state: &GameState, character: Character, costume: u8) -> Option<Port> {
    let mut matches = state.players.iter().filter(|(_, player)| {
        player.primary.character == character && player.primary.costume == costume
    });
    let (port, _) = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Some(*port)
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

    #[test]
    fn buttons_round_trip_through_bits() {
        let state = ButtonState::from_bits(0x0100 | 0x0040 | 0x0008);
        assert!(state.is_pressed(Button::A));
        assert!(state.is_pressed(Button::L));
        assert!(state.is_pressed(Button::DUp));
        assert!(!state.is_pressed(Button::B));
        assert_eq!(state.to_bits(), 0x0148);
    }

    #[test]
    fn successor_drops_partners_and_projectiles() {
        let mut state = GameState::default();
        state.player_mut(Port::new(1)).body_mut(true).percent = 30;
        state.projectiles.push(Projectile::default());

        let next = state.successor();
        assert!(next.projectiles.is_empty());
        assert!(next.players[&Port::new(1)].partner.is_none());
        assert_eq!(next.players.len(), 1);
    }

    #[test]
    fn distance_uses_insertion_order() {
        let mut state = GameState::default();
        state.player_mut(Port::new(3)).primary.position = Position::new(3.0, 0.0);
        state.player_mut(Port::new(1)).primary.position = Position::new(0.0, 4.0);
        state.player_mut(Port::new(2)).primary.position = Position::new(100.0, 100.0);
        state.update_distance();
        assert!((state.distance - 5.0).abs() < 1e-6);
    }

    #[test]
    fn distance_with_one_player_measures_to_origin() {
        let mut state = GameState::default();
        state.player_mut(Port::new(2)).primary.position = Position::new(-6.0, 8.0);
        state.update_distance();
        assert!((state.distance - 10.0).abs() < 1e-6);
    }

    #[test]
    fn port_detector_requires_a_unique_match() {
        let mut state = GameState::default();
        for port in [1, 2] {
            let primary = &mut state.player_mut(Port::new(port)).primary;
            primary.character = Character::Fox;
            primary.costume = port;
        }
        assert_eq!(port_detector(&state, Character::Fox, 2), Some(Port::new(2)));
        assert_eq!(port_detector(&state, Character::Falco, 2), None);

        state.player_mut(Port::new(1)).primary.costume = 2;
        assert_eq!(port_detector(&state, Character::Fox, 2), None);
    }

    #[test]
    fn spent_projectiles_break_invariants() {
        let mut state = GameState::default();
        state.projectiles.push(Projectile {
            kind: ProjectileType::SamusBomb,
            subtype: 3,
            ..Projectile::default()
        });
        assert!(state.check_invariants().is_err());
    }
}
