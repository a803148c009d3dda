//! Character action (animation) states.

use super::wire_enum;

wire_enum! {
    /// The action state a character is in, as reported by post-frame updates.
    ///
    /// Several ids are reused by different characters for unrelated moves. The
    /// variant carries the first name given to an id; the other names are
    /// available as associated constants (for example [`Action::FOX_ILLUSION`]).
    #[allow(missing_docs)]
    pub enum Action: u16 {
        DeadDown = 0x0000,
        DeadLeft = 0x0001,
        DeadRight = 0x0002,
        DeadUp = 0x0003,
        DeadFlyStar = 0x0004,
        DeadFlyStarIce = 0x0005,
        DeadFly = 0x0006,
        DeadFlySplatter = 0x0007,
        DeadFlySplatterFlat = 0x0008,
        DeadFlySplatterIce = 0x0009,
        DeadFlySplatterFlatIce = 0x000A,
        NothingState = 0x000B,
        OnHaloDescent = 0x000C,
        OnHaloWait = 0x000D,
        Standing = 0x000E,
        WalkSlow = 0x000F,
        WalkMiddle = 0x0010,
        WalkFast = 0x0011,
        Turning = 0x0012,
        TurningRun = 0x0013,
        Dashing = 0x0014,
        Running = 0x0015,
        RunDirect = 0x0016,
        RunBrake = 0x0017,
        KneeBend = 0x0018,
        JumpingForward = 0x0019,
        JumpingBackward = 0x001A,
        JumpingArialForward = 0x001B,
        JumpingArialBackward = 0x001C,
        Falling = 0x001D,
        FallingForward = 0x001E,
        FallingBackward = 0x001F,
        FallingAerial = 0x0020,
        FallingAerialForward = 0x0021,
        FallingAerialBackward = 0x0022,
        DeadFall = 0x0023,
        SpecialFallForward = 0x0024,
        SpecialFallBack = 0x0025,
        Tumbling = 0x0026,
        CrouchStart = 0x0027,
        Crouching = 0x0028,
        CrouchEnd = 0x0029,
        Landing = 0x002A,
        LandingSpecial = 0x002B,
        NeutralAttack1 = 0x002C,
        NeutralAttack2 = 0x002D,
        NeutralAttack3 = 0x002E,
        LoopingAttackStart = 0x002F,
        LoopingAttackMiddle = 0x0030,
        LoopingAttackEnd = 0x0031,
        DashAttack = 0x0032,
        FtiltHigh = 0x0033,
        FtiltHighMid = 0x0034,
        FtiltMid = 0x0035,
        FtiltLowMid = 0x0036,
        FtiltLow = 0x0037,
        Uptilt = 0x0038,
        Downtilt = 0x0039,
        FsmashHigh = 0x003A,
        FsmashMidHigh = 0x003B,
        FsmashMid = 0x003C,
        FsmashMidLow = 0x003D,
        FsmashLow = 0x003E,
        Upsmash = 0x003F,
        Downsmash = 0x0040,
        Nair = 0x0041,
        Fair = 0x0042,
        Bair = 0x0043,
        Uair = 0x0044,
        Dair = 0x0045,
        NairLanding = 0x0046,
        FairLanding = 0x0047,
        BairLanding = 0x0048,
        UairLanding = 0x0049,
        DairLanding = 0x004A,
        DamageHigh1 = 0x004B,
        DamageHigh2 = 0x004C,
        DamageHigh3 = 0x004D,
        DamageNeutral1 = 0x004E,
        DamageNeutral2 = 0x004F,
        DamageNeutral3 = 0x0050,
        DamageLow1 = 0x0051,
        DamageLow2 = 0x0052,
        DamageLow3 = 0x0053,
        DamageAir1 = 0x0054,
        DamageAir2 = 0x0055,
        DamageAir3 = 0x0056,
        DamageFlyHigh = 0x0057,
        DamageFlyNeutral = 0x0058,
        DamageFlyLow = 0x0059,
        DamageFlyTop = 0x005A,
        DamageFlyRoll = 0x005B,
        ItemPickupLight = 0x005C,
        ItemPickupHeavy = 0x005D,
        ItemThrowLightForward = 0x005E,
        ItemThrowLightBack = 0x005F,
        ItemThrowLightHigh = 0x0060,
        ItemThrowLightLow = 0x0061,
        ItemThrowLightDash = 0x0062,
        ItemThrowLightDrop = 0x0063,
        ItemThrowLightAirForward = 0x0064,
        ItemThrowLightAirBack = 0x0065,
        ItemThrowLightAirHigh = 0x0066,
        ItemThrowLightAirLow = 0x0067,
        ItemThrowHeavyForward = 0x0068,
        ItemThrowHeavyBack = 0x0069,
        ItemThrowHeavyHigh = 0x006A,
        ItemThrowHeavyLow = 0x006B,
        ItemThrowLightSmashForward = 0x006C,
        ItemThrowLightSmashBack = 0x006D,
        ItemThrowLightSmashUp = 0x006E,
        ItemThrowLightSmashDown = 0x006F,
        ItemThrowLightAirSmashForward = 0x0070,
        ItemThrowLightAirSmashBack = 0x0071,
        ItemThrowLightAirSmashHigh = 0x0072,
        ItemThrowLightAirSmashLow = 0x0073,
        ItemThrowHeavyAirSmashForward = 0x0074,
        ItemThrowHeavyAirSmashBack = 0x0075,
        ItemThrowHeavyAirSmashHigh = 0x0076,
        ItemThrowHeavyAirSmashLow = 0x0077,
        BeamSwordSwing1 = 0x0078,
        BeamSwordSwing2 = 0x0079,
        BeamSwordSwing3 = 0x007A,
        BeamSwordSwing4 = 0x007B,
        BatSwing1 = 0x007C,
        BatSwing2 = 0x007D,
        BatSwing3 = 0x007E,
        BatSwing4 = 0x007F,
        ParasolSwing1 = 0x0080,
        ParasolSwing2 = 0x0081,
        ParasolSwing3 = 0x0082,
        ParasolSwing4 = 0x0083,
        FanSwing1 = 0x0084,
        FanSwing2 = 0x0085,
        FanSwing3 = 0x0086,
        FanSwing4 = 0x0087,
        StarRodSwing1 = 0x0088,
        StarRodSwing2 = 0x0089,
        StarRodSwing3 = 0x008A,
        StarRodSwing4 = 0x008B,
        LipStickSwing1 = 0x008C,
        LipStickSwing2 = 0x008D,
        LipStickSwing3 = 0x008E,
        LipStickSwing4 = 0x008F,
        ItemParasolOpen = 0x0090,
        ItemParasolFall = 0x0091,
        ItemParasolFallSpecial = 0x0092,
        ItemParasolDamageFall = 0x0093,
        GunShoot = 0x0094,
        GunShootAir = 0x0095,
        GunShootEmpty = 0x0096,
        GunShootAirEmpty = 0x0097,
        FireFlowerShoot = 0x0098,
        FireFlowerShootAir = 0x0099,
        ItemScrew = 0x009A,
        ItemScrewAir = 0x009B,
        DamageScrew = 0x009C,
        DamageScrewAir = 0x009D,
        ItemScopeStart = 0x009E,
        ItemScopeRapid = 0x009F,
        ItemScopeFire = 0x00A0,
        ItemScopeEnd = 0x00A1,
        ItemScopeAirStart = 0x00A2,
        ItemScopeAirRapid = 0x00A3,
        ItemScopeAirFire = 0x00A4,
        ItemScopeAirEnd = 0x00A5,
        ItemScopeStartEmpty = 0x00A6,
        ItemScopeRapidEmpty = 0x00A7,
        ItemScopeFireEmpty = 0x00A8,
        ItemScopeEndEmpty = 0x00A9,
        ItemScopeAirStartEmpty = 0x00AA,
        ItemScopeAirRapidEmpty = 0x00AB,
        ItemScopeAirFireEmpty = 0x00AC,
        ItemScopeAirEndEmpty = 0x00AD,
        LiftWait = 0x00AE,
        LiftWalk1 = 0x00AF,
        LiftWalk2 = 0x00B0,
        LiftTurn = 0x00B1,
        ShieldStart = 0x00B2,
        Shield = 0x00B3,
        ShieldRelease = 0x00B4,
        ShieldStun = 0x00B5,
        ShieldReflect = 0x00B6,
        TechMissUp = 0x00B7,
        LyingGroundUp = 0x00B8,
        LyingGroundUpHit = 0x00B9,
        GroundGetup = 0x00BA,
        GroundAttackUp = 0x00BB,
        GroundRollForwardUp = 0x00BC,
        GroundRollBackwardUp = 0x00BD,
        GroundSpotUp = 0x00BE,
        TechMissDown = 0x00BF,
        LyingGroundDown = 0x00C0,
        DamageGround = 0x00C1,
        NeutralGetup = 0x00C2,
        GetupAttack = 0x00C3,
        GroundRollForwardDown = 0x00C4,
        GroundRollBackwardDown = 0x00C5,
        GroundRollSpotDown = 0x00C6,
        NeutralTech = 0x00C7,
        ForwardTech = 0x00C8,
        BackwardTech = 0x00C9,
        WallTech = 0x00CA,
        WallTechJump = 0x00CB,
        CeilingTech = 0x00CC,
        ShieldBreakFly = 0x00CD,
        ShieldBreakFall = 0x00CE,
        ShieldBreakDownU = 0x00CF,
        ShieldBreakDownD = 0x00D0,
        ShieldBreakStandU = 0x00D1,
        ShieldBreakStandD = 0x00D2,
        ShieldBreakTeeter = 0x00D3,
        Grab = 0x00D4,
        GrabPulling = 0x00D5,
        GrabRunning = 0x00D6,
        GrabRunningPulling = 0x00D7,
        GrabWait = 0x00D8,
        GrabPummel = 0x00D9,
        GrabBreak = 0x00DA,
        ThrowForward = 0x00DB,
        ThrowBack = 0x00DC,
        ThrowUp = 0x00DD,
        ThrowDown = 0x00DE,
        GrabPullingHigh = 0x00DF,
        GrabbedWaitHigh = 0x00E0,
        PummeledHigh = 0x00E1,
        GrabPull = 0x00E2,
        Grabbed = 0x00E3,
        GrabPummeled = 0x00E4,
        GrabEscape = 0x00E5,
        GrabJump = 0x00E6,
        GrabNeck = 0x00E7,
        GrabFoot = 0x00E8,
        RollForward = 0x00E9,
        RollBackward = 0x00EA,
        Spotdodge = 0x00EB,
        Airdodge = 0x00EC,
        ReboundStop = 0x00ED,
        Rebound = 0x00EE,
        ThrownForward = 0x00EF,
        ThrownBack = 0x00F0,
        ThrownUp = 0x00F1,
        ThrownDown = 0x00F2,
        ThrownDown2 = 0x00F3,
        PlatformDrop = 0x00F4,
        EdgeTeeteringStart = 0x00F5,
        EdgeTeetering = 0x00F6,
        BounceWall = 0x00F7,
        BounceCeiling = 0x00F8,
        BumpWall = 0x00F9,
        BumpCieling = 0x00FA,
        SlidingOffEdge = 0x00FB,
        EdgeCatching = 0x00FC,
        EdgeHanging = 0x00FD,
        EdgeGetupSlow = 0x00FE,
        EdgeGetupQuick = 0x00FF,
        EdgeAttackSlow = 0x0100,
        EdgeAttackQuick = 0x0101,
        EdgeRollSlow = 0x0102,
        EdgeRollQuick = 0x0103,
        EdgeJump1Slow = 0x0104,
        EdgeJump2Slow = 0x0105,
        EdgeJump1Quick = 0x0106,
        EdgeJump2Quick = 0x0107,
        TauntRight = 0x0108,
        TauntLeft = 0x0109,
        ShoulderedWait = 0x010A,
        ShoulderedWalkSlow = 0x010B,
        ShoulderedWalkMiddle = 0x010C,
        ShoulderedWalkFast = 0x010D,
        ShoulderedTurn = 0x010E,
        ThrownFf = 0x010F,
        ThrownFb = 0x0110,
        ThrownFHigh = 0x0111,
        ThrownFLow = 0x0112,
        CaptureCaptain = 0x0113,
        CaptureYoshi = 0x0114,
        YoshiEgg = 0x0115,
        CaptureKoopa = 0x0116,
        CaptureDamageKoopa = 0x0117,
        CaptureWaitKoopa = 0x0118,
        ThrownKoopaF = 0x0119,
        ThrownKoopaB = 0x011A,
        CaptureKoopaAir = 0x011B,
        CaptureDamageKoopaAir = 0x011C,
        CaptureWaitKoopaAir = 0x011D,
        ThrownKoopaAirF = 0x011E,
        ThrownKoopaAirB = 0x011F,
        CaptureKirby = 0x0120,
        CaptureWaitKirby = 0x0121,
        ThrownKirbyStar = 0x0122,
        ThrownCopyStar = 0x0123,
        ThrownKirby = 0x0124,
        BarrelWait = 0x0125,
        Bury = 0x0126,
        BuryWait = 0x0127,
        BuryJump = 0x0128,
        DamageSong = 0x0129,
        DamageSongWait = 0x012A,
        DamageSongRv = 0x012B,
        DamageBind = 0x012C,
        CaptureMewtwo = 0x012D,
        CaptureMewtwoAir = 0x012E,
        ThrownMewtwo = 0x012F,
        ThrownMewtwoAir = 0x0130,
        WarpStarJump = 0x0131,
        WarpStapFall = 0x0132,
        HammerWait = 0x0133,
        HammerWalk = 0x0134,
        HammerTurn = 0x0135,
        HammerKneeBend = 0x0136,
        HammerFall = 0x0137,
        HammerJump = 0x0138,
        HammerLanding = 0x0139,
        KinokoGiantStart = 0x013A,
        KinokoGiantStartAir = 0x013B,
        KinokoGiantEnd = 0x013C,
        KinokoGiantEndAir = 0x013D,
        KinokoSmallStart = 0x013E,
        KinokoSmallStartAir = 0x013F,
        KinokoSmallEnd = 0x0140,
        KinokoSmallEndAir = 0x0141,
        Entry = 0x0142,
        EntryStart = 0x0143,
        EntryEnd = 0x0144,
        DamageIce = 0x0145,
        DamageIceJump = 0x0146,
        CaptureMasterhand = 0x0147,
        CaptureDamageMasterhand = 0x0148,
        CaptureWaitMasterhand = 0x0149,
        ThrownMasterhand = 0x014A,
        CaptureKirbyYoshi = 0x014B,
        KirbyYoshiEgg = 0x014C,
        CaptureLeaDead = 0x014D,
        CaptureLikeLike = 0x014E,
        DownReflect = 0x014F,
        CaptureCrazyhand = 0x0150,
        CaptureDamageCrazyhand = 0x0151,
        CaptureWaitCrazyhand = 0x0152,
        ThrownCrazyHand = 0x0153,
        BarrelCannonWait = 0x0154,
        LaserGunPull = 0x0155,
        NeutralBCharging = 0x0156,
        NeutralBAttacking = 0x0157,
        NeutralBFullCharge = 0x0158,
        WaitItem = 0x0159,
        NeutralBChargingAir = 0x015A,
        NeutralBAttackingAir = 0x015B,
        NeutralBFullChargeAir = 0x015C,
        DownBGroundStart = 0x0168,
        DownBGround = 0x0169,
        ShineTurn = 0x016C,
        DownBStun = 0x016D,
        DownBAir = 0x016E,
        UpBGround = 0x016F,
        ShineReleaseAir = 0x0170,
        SwordDance1 = 0x015D,
        SwordDance2High = 0x015E,
        SwordDance2Mid = 0x015F,
        SwordDance3High = 0x0160,
        SwordDance3Mid = 0x0161,
        SwordDance3Low = 0x0162,
        SwordDance4High = 0x0163,
        SwordDance4Mid = 0x0164,
        SwordDance4Low = 0x0165,
        SwordDance1Air = 0x0166,
        SwordDance2HighAir = 0x0167,
        SwordDance3MidAir = 0x016A,
        SwordDance3LowAir = 0x016B,
        MarthCounter = 0x0171,
        ParasolFalling = 0x0172,
        MarthCounterFalling = 0x0173,
        NessSheildStart = 0x0174,
        NessSheildAir = 0x0175,
        Zitabata = 0x0176,
        NessSheildAirEnd = 0x0177,
        ThrownKoopaEndF = 0x0178,
        ThrownKoopaEndB = 0x0179,
        CaptureKoopaAirHit = 0x017A,
        ThrownKoopaAirEndF = 0x017B,
        ThrownKoopaAirEndB = 0x017C,
        ThrownKirbyDrinkSShot = 0x017D,
        ThrownKirbySpitSShot = 0x017E,
        DkGroundPoundStart = 0x017F,
        DkGroundPound = 0x0180,
        DkGroundPoundEnd = 0x0181,
        KirbyBladeGround = 0x0184,
        KirbyBladeUp = 0x0185,
        KirbyBladeApex = 0x0186,
        KirbyBladeDown = 0x0187,
        KirbyStoneFormingGround = 0x0189,
        KirbyStoneResting = 0x018A,
        KirbyStoneRelease = 0x018B,
        KirbyStoneFormingAir = 0x018C,
        KirbyStoneFalling = 0x018D,
        UnknownAnimation = 0xFFFF,
    }
    unknown = UnknownAnimation;
}

#[allow(missing_docs)]
impl Action {
    pub const SWORD_DANCE_2_MID_AIR: Self = Self::DownBGroundStart;
    pub const SWORD_DANCE_3_HIGH_AIR: Self = Self::DownBGround;
    pub const SWORD_DANCE_4_HIGH_AIR: Self = Self::ShineTurn;
    pub const SWORD_DANCE_4_MID_AIR: Self = Self::DownBStun;
    pub const SWORD_DANCE_4_LOW_AIR: Self = Self::DownBAir;
    pub const FOX_ILLUSION_START: Self = Self::SwordDance2High;
    pub const FOX_ILLUSION: Self = Self::SwordDance2Mid;
    pub const FOX_ILLUSION_SHORTENED: Self = Self::SwordDance3High;
    pub const FIREFOX_WAIT_GROUND: Self = Self::SwordDance3Mid;
    pub const FIREFOX_WAIT_AIR: Self = Self::SwordDance3Low;
    pub const FIREFOX_GROUND: Self = Self::SwordDance4High;
    pub const FIREFOX_AIR: Self = Self::SwordDance4Mid;
    pub const UP_B_AIR: Self = Self::ShineReleaseAir;
    pub const NESS_SHEILD: Self = Self::NessSheildStart;
    pub const KIRBY_STONE_UNFORMING: Self = Self::KirbyStoneFalling;
}

impl Action {
    /// Returns `true` for the contiguous block of standard ground and aerial
    /// attacks, from the first jab through down-air.
    #[inline]
    #[must_use]
    pub const fn is_standard_attack(self) -> bool {
        let value = self.value();
        value >= Self::NeutralAttack1.value() && value <= Self::Dair.value()
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::UnknownAnimation
    }
}
