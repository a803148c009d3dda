//! Game Start (0x36): match parameters that stay fixed for the whole game.

use serde::{Deserialize, Serialize};

use crate::events::reader::FieldReader;
use crate::{SlippiVersion, Stage};

/// Bytes read by [`decode`], command byte included.
pub const FULL_LEN: usize = CPU_LEVEL + SLOT_STRIDE * 3 + 1;

const IS_TEAMS: usize = 0x0D;
const STAGE: usize = 0x13;
const SLOT_STRIDE: usize = 0x24;
const PLAYER_TYPE: usize = 0x66;
const COSTUME: usize = 0x68;
const TEAM: usize = 0x6E;
const CPU_LEVEL: usize = 0x74;

/// Player type byte for a CPU-controlled slot.
const PLAYER_TYPE_CPU: u8 = 1;

/// What a Game Start event establishes for the rest of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameStartInfo {
    /// Protocol version of the stream.
    pub version: SlippiVersion,
    /// Stage, translated from the in-match numbering.
    pub stage: Stage,
    /// `true` in team games.
    pub is_teams: bool,
    /// Costume per slot.
    pub costumes: [u8; 4],
    /// CPU level per slot, 0 for slots not controlled by a CPU.
    pub cpu_levels: [u8; 4],
    /// Team id per slot.
    pub team_ids: [u8; 4],
}

impl GameStartInfo {
    /// Values a pre-frame event copies onto the body of the given 0-based slot.
    ///
    /// Returns zeros for slots beyond the four fixed ones.
    #[must_use]
    pub fn slot(&self, index: usize) -> (u8, u8, u8) {
        (
            self.costumes.get(index).copied().unwrap_or(0),
            self.cpu_levels.get(index).copied().unwrap_or(0),
            self.team_ids.get(index).copied().unwrap_or(0),
        )
    }
}

/// Decodes a Game Start event.
#[must_use]
pub fn decode(event: &[u8]) -> GameStartInfo {
    let reader = FieldReader::new(event);
    let version = SlippiVersion::new(reader.u8_or(1, 0), reader.u8_or(2, 0), reader.u8_or(3, 0));

    let mut info = GameStartInfo {
        version,
        stage: reader
            .u16(STAGE)
            .map_or(Stage::NoStage, Stage::from_in_match_id),
        is_teams: reader.u16_or(IS_TEAMS, 0) != 0,
        ..GameStartInfo::default()
    };

    for slot in 0..4 {
        let base = SLOT_STRIDE * slot;
        info.costumes[slot] = reader.u8_or(COSTUME + base, 0);
        info.team_ids[slot] = reader.u8_or(TEAM + base, 0);
        info.cpu_levels[slot] = if reader.u8(PLAYER_TYPE + base) == Some(PLAYER_TYPE_CPU) {
            reader.u8_or(CPU_LEVEL + base, 0)
        } else {
            0
        };
    }
    info
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

    fn event() -> Vec<u8> {
        let mut bytes = vec![0u8; FULL_LEN];
        bytes[0] = 0x36;
        bytes[1..4].copy_from_slice(&[3, 12, 0]);
        bytes[IS_TEAMS + 1] = 1;
        bytes[STAGE..STAGE + 2].copy_from_slice(&0x1fu16.to_be_bytes());
        bytes[COSTUME + SLOT_STRIDE] = 4;
        bytes[TEAM + SLOT_STRIDE] = 2;
        bytes[PLAYER_TYPE + SLOT_STRIDE] = PLAYER_TYPE_CPU;
        bytes[CPU_LEVEL + SLOT_STRIDE] = 9;
        bytes[CPU_LEVEL + SLOT_STRIDE * 2] = 7;
        bytes
    }

    #[test]
    fn decodes_match_parameters() {
        let info = decode(&event());
        assert_eq!(info.version, SlippiVersion::new(3, 12, 0));
        assert_eq!(info.stage, Stage::Battlefield);
        assert!(info.is_teams);
        assert_eq!(info.slot(1), (4, 9, 2));
    }

    #[test]
    fn cpu_level_requires_cpu_player_type() {
        let info = decode(&event());
        assert_eq!(info.cpu_levels[2], 0);
    }

    #[test]
    fn short_events_default_per_field() {
        let info = decode(&[0x36, 2, 0, 1]);
        assert_eq!(info.version, SlippiVersion::new(2, 0, 1));
        assert_eq!(info.stage, Stage::NoStage);
        assert!(!info.is_teams);
        assert_eq!(info.costumes, [0; 4]);
        assert_eq!(info.slot(7), (0, 0, 0));
    }
}
