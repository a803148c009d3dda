//! Per-event decoders.
//!
//! Each decoder receives the bytes of one event, starting at its command byte,
//! and mutates the frame under construction. Decoders read through
//! [`FieldReader`](reader::FieldReader), so a field beyond the registered payload
//! falls back to its default instead of failing.

pub mod game_start;
pub mod item_update;
pub mod menu;
pub mod payload_sizes;
pub mod post_frame;
pub mod pre_frame;
pub mod reader;

use serde::{Deserialize, Serialize};

pub use game_start::GameStartInfo;

/// The command byte that tags each event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Command {
    /// Marks the rest of a chunk as padding.
    Padding = 0x00,
    /// Gecko code list. Skipped.
    GeckoCodes = 0x10,
    /// The payload size table.
    Payloads = 0x35,
    /// Match parameters.
    GameStart = 0x36,
    /// Controller input for one body.
    PreFrame = 0x37,
    /// Simulation result for one body.
    PostFrame = 0x38,
    /// End of match.
    GameEnd = 0x39,
    /// Start of a frame. Advisory.
    FrameStart = 0x3a,
    /// One item or projectile.
    ItemUpdate = 0x3b,
    /// Frame completion marker.
    FrameBookend = 0x3c,
}

impl Command {
    /// Looks up the command for a byte. Unlisted bytes are still framed by the
    /// payload size table; they simply have no decoder.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x00 => Self::Padding,
            0x10 => Self::GeckoCodes,
            0x35 => Self::Payloads,
            0x36 => Self::GameStart,
            0x37 => Self::PreFrame,
            0x38 => Self::PostFrame,
            0x39 => Self::GameEnd,
            0x3a => Self::FrameStart,
            0x3b => Self::ItemUpdate,
            0x3c => Self::FrameBookend,
            _ => return None,
        })
    }

    /// The command byte.
    #[must_use]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Bytes the decoder for this command reads, command byte included.
    ///
    /// A registered length shorter than this means some trailing fields decode to
    /// their defaults.
    #[must_use]
    pub const fn full_len(self) -> usize {
        match self {
            Self::GameStart => game_start::FULL_LEN,
            Self::PreFrame => pre_frame::FULL_LEN,
            Self::PostFrame => post_frame::FULL_LEN,
            Self::ItemUpdate => item_update::FULL_LEN,
            _ => 1,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}(0x{:02x})", self, self.byte())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_bytes_round_trip() {
        for byte in 0..=u8::MAX {
            if let Some(command) = Command::from_byte(byte) {
                assert_eq!(command.byte(), byte);
            }
        }
        assert_eq!(Command::from_byte(0x3c), Some(Command::FrameBookend));
        assert_eq!(Command::from_byte(0x3d), None);
    }
}
