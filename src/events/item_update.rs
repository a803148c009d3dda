//! Item Update (0x3B): one item or projectile alive this frame.

use crate::events::reader::FieldReader;
use crate::gamestate::{GameState, Position, Projectile};
use crate::{Port, ProjectileType};

/// Bytes read by [`decode`], command byte included.
pub const FULL_LEN: usize = OWNER + 1;

const TYPE: usize = 0x05;
const SUBTYPE: usize = 0x07;
const SPEED_X: usize = 0x0C;
const SPEED_Y: usize = 0x10;
const X: usize = 0x14;
const Y: usize = 0x18;
const FRAME: usize = 0x1E;
const OWNER: usize = 0x2A;

/// Decodes an Item Update. Items already spent are dropped.
///
/// Returns the projectile, or `None` if it was dropped.
pub fn decode(event: &[u8], state: &mut GameState) -> Option<Projectile> {
    let reader = FieldReader::new(event);

    let owner = reader
        .u8(OWNER)
        .map(Port::from_wire)
        .filter(|port| port.is_player_slot());
    let projectile = Projectile {
        position: Position::new(reader.f32_or(X, 0.0), reader.f32_or(Y, 0.0)),
        speed: Position::new(reader.f32_or(SPEED_X, 0.0), reader.f32_or(SPEED_Y, 0.0)),
        owner,
        kind: ProjectileType::from_wire_or_unknown(reader.u16_or(TYPE, u16::MAX)),
        frame: reader.f32_truncated_or(FRAME, -1),
        subtype: reader.u8_or(SUBTYPE, 0),
    };

    if projectile.kind.is_spent(projectile.subtype) {
        return None;
    }
    state.projectiles.push(projectile);
    Some(projectile)
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

    fn event(kind: ProjectileType, subtype: u8, owner: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; FULL_LEN];
        bytes[0] = 0x3b;
        bytes[TYPE..TYPE + 2].copy_from_slice(&kind.value().to_be_bytes());
        bytes[SUBTYPE] = subtype;
        bytes[X..X + 4].copy_from_slice(&10.0f32.to_be_bytes());
        bytes[SPEED_Y..SPEED_Y + 4].copy_from_slice(&(-1.5f32).to_be_bytes());
        bytes[FRAME..FRAME + 4].copy_from_slice(&12.0f32.to_be_bytes());
        bytes[OWNER] = owner;
        bytes
    }

    #[test]
    fn live_items_are_appended() {
        let mut state = GameState::default();
        let projectile = decode(&event(ProjectileType::FoxLaser, 0, 1), &mut state).unwrap();
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(projectile.owner, Some(Port::new(2)));
        assert_eq!(projectile.position, Position::new(10.0, 0.0));
        assert_eq!(projectile.speed, Position::new(0.0, -1.5));
        assert_eq!(projectile.frame, 12);
    }

    #[test]
    fn spent_items_are_dropped() {
        let mut state = GameState::default();
        assert!(decode(&event(ProjectileType::SamusBomb, 3, 0), &mut state).is_none());
        assert!(decode(&event(ProjectileType::SamusMissle, 2, 0), &mut state).is_none());
        assert!(decode(&event(ProjectileType::SamusChargeBeam, 0, 0), &mut state).is_none());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn owners_outside_player_slots_mean_none() {
        let mut state = GameState::default();
        let projectile = decode(&event(ProjectileType::FoxLaser, 0, 4), &mut state).unwrap();
        assert_eq!(projectile.owner, None);
        let projectile = decode(&event(ProjectileType::FoxLaser, 0, 255), &mut state).unwrap();
        assert_eq!(projectile.owner, None);
    }

    #[test]
    fn nan_age_becomes_minus_one() {
        let mut bytes = event(ProjectileType::FoxLaser, 0, 0);
        bytes[FRAME..FRAME + 4].copy_from_slice(&f32::NAN.to_be_bytes());
        let mut state = GameState::default();
        assert_eq!(decode(&bytes, &mut state).unwrap().frame, -1);
    }
}
