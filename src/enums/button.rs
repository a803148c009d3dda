//! Controller buttons and their bit positions in a pre-frame update.

use serde::{Deserialize, Serialize};

/// A digital button on the controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Button {
    A,
    B,
    X,
    Y,
    Z,
    L,
    R,
    Start,
    DUp,
    DDown,
    DLeft,
    DRight,
}

impl Button {
    /// Every button, in the order [`ButtonState`](crate::ButtonState) lays them out.
    pub const ALL: [Self; 12] = [
        Self::A,
        Self::B,
        Self::X,
        Self::Y,
        Self::Z,
        Self::L,
        Self::R,
        Self::Start,
        Self::DUp,
        Self::DDown,
        Self::DLeft,
        Self::DRight,
    ];

    /// The bit this button occupies in the processed button word.
    #[must_use]
    pub const fn mask(self) -> u16 {
        match self {
            Self::A => 0x0100,
            Self::B => 0x0200,
            Self::X => 0x0400,
            Self::Y => 0x0800,
            Self::Start => 0x1000,
            Self::Z => 0x0010,
            Self::R => 0x0020,
            Self::L => 0x0040,
            Self::DLeft => 0x0001,
            Self::DRight => 0x0002,
            Self::DDown => 0x0004,
            Self::DUp => 0x0008,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}
