//! Fields computed once a frame is complete.
//!
//! The wire leaves some bookkeeping to the reader. [`apply_derived_fields`] runs
//! these steps over every body, in order:
//!
//! 1. Action frame normalization against the [`ZeroIndexTable`].
//! 2. IASA correction outside standard attacks.
//! 3. Respawn and ledge invulnerability countdown.
//! 4. Moonwalk warning.
//! 5. Off-stage flag.
//!
//! It then recomputes the distance between the first two players.

use std::collections::BTreeMap;

use crate::enums::OFF_STAGE_FLOOR;
use crate::gamestate::{GameState, PlayerState};
use crate::zero_index::ZeroIndexTable;
use crate::{Action, Frame, Port, Stage, FIRST_FRAME};

/// Respawn platform descents up to this frame are the initial spawn and grant no
/// invulnerability.
pub const FIRST_DESCENT_EXEMPT_UNTIL: i32 = 150;

/// Invulnerability granted while waiting on, or descending from, the respawn platform.
pub const RESPAWN_INVULNERABILITY: i32 = 120;

/// Invulnerability granted on the first frame of a ledge grab.
pub const LEDGE_INVULNERABILITY: i32 = 36;

/// Adds 1 to the action frame of zero-indexed `(character, action)` pairs.
pub fn normalize_action_frame(body: &mut PlayerState, table: &ZeroIndexTable) {
    if table.contains(body.character, body.action) {
        body.action_frame = body.action_frame.saturating_add(1);
    }
}

/// Clears IASA outside the standard attacks, where the game never resets it.
///
/// The decoder itself never sets the flag; this only matters for values a host
/// filled in.
pub fn fix_iasa(body: &mut PlayerState) {
    if !body.action.is_standard_attack() {
        body.iasa = false;
    }
}

/// Returns `true` when the body is airborne and past the ledge or below the stage.
///
/// Always `false` on stages without a known ledge position.
#[must_use]
pub fn off_stage(body: &PlayerState, stage: Stage) -> bool {
    let Some(edge) = stage.edge_ground_position() else {
        return false;
    };
    (body.position.x.abs() > edge || body.position.y < OFF_STAGE_FLOOR) && !body.on_ground
}

/// Returns the moonwalk warning for a body given its previous-frame record.
///
/// The warning is raised on entering a dash from anything but a dash or a turn,
/// held while the dash continues and dropped as soon as the action changes. With no
/// previous record there is no warning.
#[must_use]
pub fn moonwalk_warning(action: Action, previous: Option<&PlayerState>) -> bool {
    if action != Action::Dashing {
        return false;
    }
    match previous.map(|p| p.action) {
        None | Some(Action::Turning) => false,
        Some(Action::Dashing) => previous.is_some_and(|p| p.moonwalk_warning),
        Some(_) => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Arming {
    armed_at: i32,
    duration: i32,
}

/// Tracks when each body's invulnerability was last armed.
///
/// Primary and partner bodies of a port are tracked separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvulnerabilityTracker {
    armings: BTreeMap<(Port, bool), Arming>,
}

impl InvulnerabilityTracker {
    /// Creates a tracker with nothing armed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every arming. Called when a new game starts.
    pub fn reset(&mut self) {
        self.armings.clear();
    }

    fn arm(&mut self, key: (Port, bool), body: &mut PlayerState, frame: i32, duration: i32) {
        body.invulnerability_left = duration;
        self.armings.insert(
            key,
            Arming {
                armed_at: frame,
                duration,
            },
        );
    }

    /// Updates `body`'s remaining invulnerability for `frame`.
    ///
    /// `seen_before` says whether this body existed in the previous completed frame;
    /// the countdown only carries across frames the body was part of.
    pub fn update(
        &mut self,
        port: Port,
        partner: bool,
        body: &mut PlayerState,
        frame: Frame,
        seen_before: bool,
    ) {
        let key = (port, partner);
        let frame = frame.as_i32();

        if seen_before {
            let Arming { armed_at, duration } = self.armings.get(&key).copied().unwrap_or(Arming {
                armed_at: frame,
                duration: 0,
            });
            body.invulnerability_left = duration
                .saturating_sub(frame.saturating_sub(armed_at))
                .max(0);
        }

        match body.action {
            Action::OnHaloWait => self.arm(key, body, frame, RESPAWN_INVULNERABILITY),
            Action::OnHaloDescent if frame > FIRST_DESCENT_EXEMPT_UNTIL => {
                self.arm(key, body, frame, RESPAWN_INVULNERABILITY);
            },
            Action::EdgeCatching if body.action_frame == 1 => {
                self.arm(key, body, frame, LEDGE_INVULNERABILITY);
            },
            _ => {},
        }
        if frame == FIRST_FRAME {
            self.arm(key, body, frame, 0);
        }

        if body.invulnerability_left > 0 {
            body.invulnerable = true;
        }
    }
}

/// Applies every derived field to a completed frame.
///
/// `previous` is the last completed frame, if any.
pub fn apply_derived_fields(
    state: &mut GameState,
    previous: Option<&GameState>,
    table: &ZeroIndexTable,
    tracker: &mut InvulnerabilityTracker,
) {
    let frame = state.frame;
    let stage = state.stage;
    for (port, player) in &mut state.players {
        let before = previous.and_then(|p| p.players.get(port));

        let primary_before = before.map(|p| &p.primary);
        apply_to_body(
            &mut player.primary,
            primary_before,
            (*port, false),
            frame,
            stage,
            table,
            tracker,
        );

        if let Some(partner) = player.partner.as_mut() {
            let partner_before = before.and_then(|p| p.partner.as_ref());
            apply_to_body(partner, partner_before, (*port, true), frame, stage, table, tracker);
        }
    }
    state.update_distance();
}

fn apply_to_body(
    body: &mut PlayerState,
    before: Option<&PlayerState>,
    (port, partner): (Port, bool),
    frame: Frame,
    stage: Stage,
    table: &ZeroIndexTable,
    tracker: &mut InvulnerabilityTracker,
) {
    normalize_action_frame(body, table);
    fix_iasa(body);
    tracker.update(port, partner, body, frame, before.is_some());
    body.moonwalk_warning = moonwalk_warning(body.action, before);
    body.off_stage = off_stage(body, stage);
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
    use crate::gamestate::Position;
    use crate::Character;

    fn body(action: Action) -> PlayerState {
        PlayerState {
            action,
            ..PlayerState::default()
        }
    }

    #[test]
    fn normalization_only_touches_listed_pairs() {
        let mut table = ZeroIndexTable::default();
        table.insert(Character::Fox, Action::Dashing);

        let mut fox = body(Action::Dashing);
        fox.character = Character::Fox;
        normalize_action_frame(&mut fox, &table);
        assert_eq!(fox.action_frame, 1);

        let mut falco = body(Action::Dashing);
        falco.character = Character::Falco;
        normalize_action_frame(&mut falco, &table);
        assert_eq!(falco.action_frame, 0);
    }

    #[test]
    fn iasa_survives_only_standard_attacks() {
        let mut attack = body(Action::Dair);
        attack.iasa = true;
        fix_iasa(&mut attack);
        assert!(attack.iasa);

        let mut special = body(Action::LandingSpecial);
        special.iasa = true;
        fix_iasa(&mut special);
        assert!(!special.iasa);
    }

    #[test]
    fn off_stage_needs_an_airborne_body() {
        let mut b = body(Action::Dashing);
        b.position = Position::new(90.0, 0.0);
        b.on_ground = false;
        assert!(off_stage(&b, Stage::FinalDestination));
        assert!(!off_stage(&b, Stage::NoStage));

        b.on_ground = true;
        assert!(!off_stage(&b, Stage::FinalDestination));

        b.on_ground = false;
        b.position = Position::new(0.0, -6.5);
        assert!(off_stage(&b, Stage::Battlefield));
    }

    #[test]
    fn moonwalk_warning_tracks_dash_entry() {
        let standing = body(Action::Standing);
        let turning = body(Action::Turning);
        assert!(moonwalk_warning(Action::Dashing, Some(&standing)));
        assert!(!moonwalk_warning(Action::Dashing, Some(&turning)));
        assert!(!moonwalk_warning(Action::Dashing, None));
        assert!(!moonwalk_warning(Action::Standing, Some(&standing)));

        let mut dashing = body(Action::Dashing);
        dashing.moonwalk_warning = true;
        assert!(moonwalk_warning(Action::Dashing, Some(&dashing)));
        dashing.moonwalk_warning = false;
        assert!(!moonwalk_warning(Action::Dashing, Some(&dashing)));
    }

    #[test]
    fn respawn_arms_and_counts_down() {
        let mut tracker = InvulnerabilityTracker::new();
        let port = Port::new(1);

        let mut b = body(Action::OnHaloWait);
        tracker.update(port, false, &mut b, Frame::new(1000), true);
        assert_eq!(b.invulnerability_left, 120);
        assert!(b.invulnerable);

        let mut b = body(Action::Falling);
        tracker.update(port, false, &mut b, Frame::new(1030), true);
        assert_eq!(b.invulnerability_left, 90);
        assert!(b.invulnerable);

        let mut b = body(Action::Falling);
        tracker.update(port, false, &mut b, Frame::new(1200), true);
        assert_eq!(b.invulnerability_left, 0);
        assert!(!b.invulnerable);
    }

    #[test]
    fn first_descent_is_exempt() {
        let mut tracker = InvulnerabilityTracker::new();
        let mut b = body(Action::OnHaloDescent);
        tracker.update(Port::new(1), false, &mut b, Frame::new(FIRST_DESCENT_EXEMPT_UNTIL), true);
        assert_eq!(b.invulnerability_left, 0);

        let mut b = body(Action::OnHaloDescent);
        tracker.update(
            Port::new(1),
            false,
            &mut b,
            Frame::new(FIRST_DESCENT_EXEMPT_UNTIL + 1),
            true,
        );
        assert_eq!(b.invulnerability_left, 120);
    }

    #[test]
    fn ledge_grab_arms_on_its_first_frame_only() {
        let mut tracker = InvulnerabilityTracker::new();
        let mut b = body(Action::EdgeCatching);
        b.action_frame = 2;
        tracker.update(Port::new(2), false, &mut b, Frame::new(500), true);
        assert_eq!(b.invulnerability_left, 0);

        b.action_frame = 1;
        tracker.update(Port::new(2), false, &mut b, Frame::new(501), true);
        assert_eq!(b.invulnerability_left, 36);
    }

    #[test]
    fn first_frame_clears_invulnerability() {
        let mut tracker = InvulnerabilityTracker::new();
        let mut b = body(Action::OnHaloWait);
        tracker.update(Port::new(1), false, &mut b, Frame::FIRST, false);
        assert_eq!(b.invulnerability_left, 0);
    }

    #[test]
    fn partners_are_tracked_separately() {
        let mut tracker = InvulnerabilityTracker::new();
        let mut popo = body(Action::OnHaloWait);
        tracker.update(Port::new(1), false, &mut popo, Frame::new(400), true);

        let mut nana = body(Action::Falling);
        tracker.update(Port::new(1), true, &mut nana, Frame::new(401), true);
        assert_eq!(nana.invulnerability_left, 0);
    }

    #[test]
    fn apply_derived_fields_sets_distance_and_flags() {
        let mut state = GameState::default();
        state.frame = Frame::new(10);
        state.stage = Stage::FinalDestination;
        let p1 = &mut state.player_mut(Port::new(1)).primary;
        p1.position = Position::new(100.0, 0.0);
        p1.on_ground = false;
        state.player_mut(Port::new(2)).primary.position = Position::new(100.0, 10.0);

        let mut tracker = InvulnerabilityTracker::new();
        apply_derived_fields(&mut state, None, &ZeroIndexTable::default(), &mut tracker);

        assert!(state.players[&Port::new(1)].primary.off_stage);
        assert!(!state.players[&Port::new(2)].primary.off_stage);
        assert!((state.distance - 10.0).abs() < 1e-6);
    }
}
