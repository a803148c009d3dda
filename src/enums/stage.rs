//! Stages and their geometry.

use super::wire_enum;

wire_enum! {
    /// A legal stage, numbered as the stage select screen reports it.
    pub enum Stage: u8 {
        /// No stage, or a stage this crate does not model.
        NoStage = 0x00,
        /// Final Destination.
        FinalDestination = 0x19,
        /// Battlefield.
        Battlefield = 0x18,
        /// Pokémon Stadium.
        PokemonStadium = 0x12,
        /// Dream Land.
        Dreamland = 0x1a,
        /// Fountain of Dreams.
        FountainOfDreams = 0x08,
        /// Yoshi's Story.
        YoshisStory = 0x06,
        /// The random stage slot. Not a real stage.
        RandomStage = 0x1d,
    }
    unknown = NoStage;
}

/// Height below which a character is considered off stage regardless of x.
pub const OFF_STAGE_FLOOR: f32 = -6.0;

impl Stage {
    /// Maps the in-match stage id from a game start event to a stage.
    ///
    /// The in-match numbering is unrelated to the stage select numbering used
    /// by [`Stage::from_wire`]. Unmodelled ids map to [`Stage::NoStage`].
    ///
    /// # Examples
    ///
    /// ```
    /// use slippstream::Stage;
    ///
    /// assert_eq!(Stage::from_in_match_id(0x1f), Stage::Battlefield);
    /// assert_eq!(Stage::from_wire_or_unknown(0x18), Stage::Battlefield);
    /// assert_eq!(Stage::from_in_match_id(0x18), Stage::NoStage);
    /// ```
    #[must_use]
    pub const fn from_in_match_id(stage_id: u16) -> Self {
        match stage_id {
            0x03 => Self::PokemonStadium,
            0x08 => Self::YoshisStory,
            0x02 => Self::FountainOfDreams,
            0x1f => Self::Battlefield,
            0x20 => Self::FinalDestination,
            0x1c => Self::Dreamland,
            _ => Self::NoStage,
        }
    }

    /// Horizontal distance from the stage center to the ledge, if known.
    #[allow(clippy::excessive_precision)]
    #[must_use]
    pub const fn edge_ground_position(self) -> Option<f32> {
        match self {
            Self::Battlefield => Some(68.400_001_525_9),
            Self::FinalDestination => Some(85.565_696_716_3),
            Self::Dreamland => Some(77.271_301_269_5),
            Self::FountainOfDreams => Some(63.347_549_438_5),
            Self::PokemonStadium => Some(87.75),
            Self::YoshisStory => Some(56.0),
            Self::NoStage | Self::RandomStage => None,
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::NoStage
    }
}
