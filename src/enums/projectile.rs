//! Item and projectile kinds.

use super::wire_enum;

wire_enum! {
    /// The kind of an item or projectile carried by an item update.
    #[allow(missing_docs)]
    pub enum ProjectileType: u16 {
        BobOmb = 0x06,
        MrSaturn = 0x07,
        Beamsword = 0x0C,
        MarioFireball = 0x30,
        DrMarioCapsule = 0x31,
        KirbyCutter = 0x32,
        KirbyHammer = 0x33,
        FoxLaser = 0x36,
        FalcoLaser = 0x37,
        FoxShadow = 0x38,
        FalcoShadow = 0x39,
        LinkBomb = 0x3A,
        YlinkBomb = 0x3B,
        LinkBoomerang = 0x3C,
        YlinkBoomerang = 0x3D,
        LinkHookshot = 0x3E,
        YlinkHookshot = 0x3F,
        Arrow = 0x40,
        FireArrow = 0x41,
        PkFire = 0x42,
        PkFlash1 = 0x43,
        PkFlash2 = 0x44,
        PkThunderHead = 0x45,
        PkThunderTail1 = 0x46,
        PkThunderTail2 = 0x47,
        PkThunderTail3 = 0x48,
        PkThunderTail4 = 0x49,
        LinkArrow = 0x4C,
        YlinkArrow = 0x4D,
        PkFlashExplosion = 0x4E,
        NeedleThrown = 0x4F,
        PikachuThunder = 0x51,
        PichuThunder = 0x52,
        MarioCape = 0x53,
        DrMarioCape = 0x54,
        SheikSmoke = 0x55,
        YoshiEggThrown = 0x56,
        YoshiTongue = 0x57,
        YoshiStar = 0x58,
        PikachuThunderjolt1 = 0x59,
        PikachuThunderjolt2 = 0x5A,
        PichuThunderjolt1 = 0x5B,
        PichuThunderjolt2 = 0x5C,
        SamusBomb = 0x5D,
        SamusChargeBeam = 0x5E,
        SamusMissle = 0x5F,
        SamusGrappleBeam = 0x60,
        SheikChain = 0x61,
        Turnip = 0x63,
        BowserFlame = 0x64,
        NessBatt = 0x65,
        NessYoyo = 0x66,
        PeachParasol = 0x67,
        LuigiFire = 0x69,
        IceBlock = 0x6A,
        IcBlizzard = 0x6B,
        ZeldaFire = 0x6C,
        ZeldaFireExplosion = 0x6D,
        MewtoDisable = 0x6E,
        ToadSpore = 0x6F,
        Shadowball = 0x70,
        IcUpB = 0x71,
        Pesticide = 0x72,
        Manhole = 0x73,
        GwFire = 0x74,
        Parachute = 0x75,
        Turtle = 0x76,
        Sperky = 0x77,
        Judge = 0x78,
        Sausage = 0x7A,
        YlinkMilk = 0x7B,
        Firefighter = 0x7C,
        KirbyMarioFire = 0x82,
        KirbyDrMarioFire = 0x83,
        KirbyLuigiFire = 0x84,
        KirbyIcBlock = 0x85,
        KirbyToadSpore = 0x87,
        KirbyFoxLaser = 0x88,
        KirbyFalcoLaser = 0x89,
        KirbyLinkArrow = 0x8C,
        KirbyYlinkArrow = 0x8D,
        KirbyLinkArrow2 = 0x8E,
        KirbyYlinkArrow2 = 0x8F,
        KirbyShadowball = 0x90,
        KirbyPkFlash = 0x91,
        KirbyPkFlashExplosion = 0x92,
        KirbyPikachuThunderjolt1 = 0x93,
        KirbyPikachuThunderjolt2 = 0x94,
        KirbyPichuThunderjolt1 = 0x95,
        KirbyPichuThunderjolt2 = 0x96,
        KirbySamusChargeshot = 0x97,
        KirbySheikNeedleThrown = 0x98,
        KirbySheikNeedleGround = 0x99,
        KirbyBowserFlame = 0x9A,
        KirbySausage = 0x9B,
        KirbyYoshiTongue = 0x9D,
        UnknownProjectile = 0xFF,
    }
    unknown = UnknownProjectile;
}

impl ProjectileType {
    /// Returns `true` when an item of this kind with `subtype` is already spent:
    /// an exploded bomb or missile, or a charge shot that is still charging.
    ///
    /// Such items are reported by the game but are not live projectiles.
    #[must_use]
    pub const fn is_spent(self, subtype: u8) -> bool {
        match self {
            Self::SamusBomb => subtype == 3,
            Self::SamusMissle => matches!(subtype, 2 | 3),
            Self::SamusChargeBeam => subtype == 0,
            _ => false,
        }
    }
}

impl Default for ProjectileType {
    fn default() -> Self {
        Self::UnknownProjectile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spent_items_are_recognized() {
        assert!(ProjectileType::SamusBomb.is_spent(3));
        assert!(!ProjectileType::SamusBomb.is_spent(1));
        assert!(ProjectileType::SamusMissle.is_spent(2));
        assert!(ProjectileType::SamusMissle.is_spent(3));
        assert!(!ProjectileType::SamusMissle.is_spent(0));
        assert!(ProjectileType::SamusChargeBeam.is_spent(0));
        assert!(!ProjectileType::SamusChargeBeam.is_spent(1));
        assert!(!ProjectileType::FoxLaser.is_spent(3));
    }
}
