//! Menu scenes, sub-menus and select-screen controller status.

use super::wire_enum;

wire_enum! {
    /// The top-level scene the game is in.
    pub enum Menu: u8 {
        /// The character select screen.
        CharacterSelect = 0,
        /// The stage select screen.
        StageSelect = 1,
        /// A match is running.
        InGame = 2,
        /// Sudden death.
        SuddenDeath = 3,
        /// The post-game results screen.
        PostgameScores = 4,
        /// The main menu.
        MainMenu = 5,
        /// The Slippi online character select screen.
        SlippiOnlineCss = 6,
        /// The title screen.
        PressStart = 7,
        /// A scene this crate does not recognize.
        UnknownMenu = 0xff,
    }
    unknown = UnknownMenu;
}

impl Menu {
    /// Maps the scene code of a menu event to a menu.
    ///
    /// # Examples
    ///
    /// ```
    /// use slippstream::Menu;
    ///
    /// assert_eq!(Menu::from_scene(0x0002), Menu::CharacterSelect);
    /// assert_eq!(Menu::from_scene(0x0108), Menu::StageSelect);
    /// assert_eq!(Menu::from_scene(0x0303), Menu::UnknownMenu);
    /// ```
    #[must_use]
    pub const fn from_scene(scene: u16) -> Self {
        match scene {
            0x0002 => Self::CharacterSelect,
            0x0102 | 0x0108 => Self::StageSelect,
            0x0202 => Self::InGame,
            0x0001 => Self::MainMenu,
            0x0008 => Self::SlippiOnlineCss,
            0x0000 => Self::PressStart,
            0x0402 => Self::PostgameScores,
            _ => Self::UnknownMenu,
        }
    }

    /// Returns `true` for both character select screens.
    #[must_use]
    pub const fn is_character_select(self) -> bool {
        matches!(self, Self::CharacterSelect | Self::SlippiOnlineCss)
    }

    /// Returns `true` for the scenes on which every controller port is active.
    #[must_use]
    pub const fn activates_all_ports(self) -> bool {
        matches!(
            self,
            Self::CharacterSelect | Self::StageSelect | Self::SlippiOnlineCss
        )
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::InGame
    }
}

wire_enum! {
    /// The sub-menu highlighted within a menu scene.
    #[allow(missing_docs)]
    pub enum SubMenu: u8 {
        MainMenu = 0,
        OnePMode = 1,
        VsMode = 2,
        Trophies = 3,
        Options = 4,
        Data = 5,
        RegularMatch = 6,
        EventMatch = 7,
        OnlinePlay = 8,
        Stadium = 9,
        SpecialMelee = 12,
        CustomRules = 13,
        NameEntry = 18,
        Rumble = 19,
        Sound = 20,
        ScreenDisplay = 21,
        LanguageSelect = 23,
        EraseData = 24,
        MultimanMelee = 33,
        OnlineCss = 0xfe,
        Unknown = 0xff,
    }
    unknown = Unknown;
}

impl Default for SubMenu {
    fn default() -> Self {
        Self::Unknown
    }
}

wire_enum! {
    /// How a port is occupied on the character select screen.
    pub enum ControllerStatus: u8 {
        /// A human player.
        Human = 0,
        /// A CPU player.
        Cpu = 1,
        /// Nobody.
        Unplugged = 3,
        /// A status byte this crate does not recognize.
        Unknown = 0xff,
    }
    unknown = Unknown;
}

impl Default for ControllerStatus {
    fn default() -> Self {
        Self::Unplugged
    }
}
