//! Enumerations for every identifier that appears on the wire.
//!
//! Each enum is generated by [`wire_enum!`] and offers two lookups:
//!
//! - `from_wire(value)` returns `None` for values the enum does not name.
//! - `from_wire_or_unknown(value)` maps those values to the enum's explicit
//!   "unknown" sentinel instead. Decoders always use this form, so an
//!   unrecognized identifier never aborts decoding.

mod action;
mod button;
mod character;
mod menu;
mod projectile;
mod stage;

pub use action::Action;
pub use button::Button;
pub use character::Character;
pub use menu::{ControllerStatus, Menu, SubMenu};
pub use projectile::ProjectileType;
pub use stage::{Stage, OFF_STAGE_FLOOR};

/// Declares a fieldless `#[repr]` enum whose discriminants are wire values.
///
/// Discriminants must be unique literals. The `unknown` clause names the
/// variant that unrecognized wire values collapse into.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $repr:ty {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal
            ),+ $(,)?
        }
        unknown = $unknown:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[repr($repr)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Looks up the variant carrying `value`, if any.
            #[inline]
            #[must_use]
            pub const fn from_wire(value: $repr) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Looks up the variant carrying `value`, falling back to the
            /// unknown sentinel.
            #[inline]
            #[must_use]
            pub const fn from_wire_or_unknown(value: $repr) -> Self {
                match Self::from_wire(value) {
                    Some(variant) => variant,
                    None => Self::$unknown,
                }
            }

            /// Returns the wire value of this variant.
            #[inline]
            #[must_use]
            pub const fn value(self) -> $repr {
                self as $repr
            }

            /// Returns `true` for the unknown sentinel.
            #[inline]
            #[must_use]
            pub const fn is_unknown(self) -> bool {
                matches!(self, Self::$unknown)
            }
        }
    };
}

pub(crate) use wire_enum;

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
    fn wire_values_round_trip_through_lookup() {
        for action in Action::ALL {
            assert_eq!(Action::from_wire(action.value()), Some(*action));
        }
        for character in Character::ALL {
            assert_eq!(Character::from_wire(character.value()), Some(*character));
        }
        for projectile in ProjectileType::ALL {
            assert_eq!(ProjectileType::from_wire(projectile.value()), Some(*projectile));
        }
    }

    #[test]
    fn unknown_values_collapse_to_sentinels() {
        assert_eq!(Action::from_wire_or_unknown(0x0182), Action::UnknownAnimation);
        assert_eq!(Action::from_wire_or_unknown(0x4000), Action::UnknownAnimation);
        assert_eq!(
            ProjectileType::from_wire_or_unknown(0x62),
            ProjectileType::UnknownProjectile
        );
        assert_eq!(Character::from_wire_or_unknown(0x1b), Character::UnknownCharacter);
        assert_eq!(SubMenu::from_wire_or_unknown(0x50), SubMenu::Unknown);
        assert!(Stage::from_wire_or_unknown(0x42).is_unknown());
    }

    #[test]
    fn aliases_share_wire_values() {
        assert_eq!(Action::FOX_ILLUSION.value(), 0x15f);
        assert_eq!(Action::UP_B_AIR, Action::ShineReleaseAir);
        assert_eq!(Action::KIRBY_STONE_UNFORMING.value(), 0x18d);
    }
}
