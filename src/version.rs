//! Slippi protocol versions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A `major.minor.revision` protocol version, as carried by game start events.
///
/// Versions order lexicographically by component, so `2.10.0 > 2.9.9`.
///
/// # Examples
///
/// ```
/// use slippstream::SlippiVersion;
///
/// let version: SlippiVersion = "3.6.1".parse().unwrap();
/// assert!(version >= SlippiVersion::MIN_SUPPORTED);
/// assert_eq!(version.to_string(), "3.6.1");
/// ```
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SlippiVersion {
    /// Major component.
    pub major: u8,
    /// Minor component.
    pub minor: u8,
    /// Revision component.
    pub revision: u8,
}

impl SlippiVersion {
    /// Oldest version decoded without opting into legacy support.
    pub const MIN_SUPPORTED: Self = Self::new(3, 0, 0);

    /// First version that marks frame completion with a frame bookend event.
    pub const FRAME_BOOKEND: Self = Self::new(3, 0, 0);

    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u8, minor: u8, revision: u8) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }

    /// Returns `true` if streams of this version carry frame bookend events.
    #[must_use]
    pub fn has_frame_bookends(self) -> bool {
        self >= Self::FRAME_BOOKEND
    }
}

impl fmt::Display for SlippiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

/// Error returned when parsing a [`SlippiVersion`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError {
    input: String,
}

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version string '{}'", self.input)
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for SlippiVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError {
            input: s.to_owned(),
        };
        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u8, ParseVersionError> {
            parts.next().ok_or_else(err)?.parse().map_err(|_| err())
        };
        let version = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(version)
    }
}
