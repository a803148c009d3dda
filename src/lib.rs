//! # slippstream
//!
//! A decoder and game-state reconstruction engine for the Slippi event stream.
//!
//! Slippi describes a running game as a stream of small, command-tagged binary events:
//! controller inputs, per-character simulation results, item updates and frame markers.
//! This crate frames those events with the stream's self-describing payload-size table,
//! folds them into a per-frame [`GameState`] snapshot, and applies the bookkeeping the
//! wire format leaves out (invulnerability countdowns, off-stage detection, action frame
//! normalization). Both the modern protocol, which marks frame completion explicitly, and
//! legacy streams, which do not, are supported.
//!
//! Snapshots are pulled by the caller: a [`Session`] reads messages from an
//! [`EventSource`] until a frame completes and returns it.
//!
//! ```no_run
//! use slippstream::{SessionBuilder, StepResult};
//!
//! # fn main() -> Result<(), slippstream::StreamError> {
//! let mut session = SessionBuilder::new()
//!     .with_allow_old_version(true)
//!     .start_replay_session("game.slp")?;
//!
//! loop {
//!     match session.next_frame()? {
//!         StepResult::Frame(state) => println!("frame {} distance {}", state.frame, state.distance),
//!         StepResult::Pending => continue,
//!         StepResult::Ended => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)] // let us try
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use enums::{
    Action, Button, Character, ControllerStatus, Menu, ProjectileType, Stage, SubMenu,
};
pub use error::{ReplayErrorKind, StreamError};
pub use gamestate::{
    port_detector, ButtonState, ControllerState, Ecb, GameState, Player, PlayerState, Position,
    Projectile,
};
pub use replay::{PlayerNames, ReplayFile, ReplayMetadata};
pub use sessions::builder::{PollingMode, SessionBuilder, SessionConfig};
pub use sessions::stream_session::{PeerInfo, Session, StepResult};
pub use smallvec::SmallVec;
pub use source::{EventSource, QueueHandle, QueuedSource, ReplayFileSource, SourceMessage};
pub use version::SlippiVersion;
pub use zero_index::{ZeroIndexRecorder, ZeroIndexTable};

/// Binary snapshot codec for decoded game states.
///
/// Provides deterministic encoding and decoding of [`GameState`] values using bincode.
pub mod codec;
#[doc(hidden)]
pub mod derived;
#[doc(hidden)]
pub mod dispatcher;
pub mod enums;
#[doc(hidden)]
pub mod error;
pub mod events;
pub mod gamestate;
pub mod prelude;
pub mod replay;
pub mod source;
pub mod telemetry;
#[doc(hidden)]
pub mod version;
pub mod zero_index;
#[doc(hidden)]
pub mod sessions {
    #[doc(hidden)]
    pub mod builder;
    #[doc(hidden)]
    pub mod config;
    #[doc(hidden)]
    pub mod stream_session;
}

/// Internal module exposing implementation details for testing and benchmarking.
///
/// # ⚠️ WARNING: No Stability Guarantees
///
/// **This module is NOT part of the public API.** Everything here is subject to change
/// without notice and is intended only for property tests, benchmarks and integration
/// tests in this repository.
#[doc(hidden)]
pub mod __internal {
    pub use crate::derived::{
        apply_derived_fields, fix_iasa, normalize_action_frame, off_stage, InvulnerabilityTracker,
        FIRST_DESCENT_EXEMPT_UNTIL,
    };
    pub use crate::events::payload_sizes::PayloadSizes;
    pub use crate::events::reader::FieldReader;
    pub use crate::events::{pre_frame::remap_stick, pre_frame::unmap_stick, GameStartInfo};
    pub use crate::replay::ubjson::{parse as parse_ubjson, Value as UbjsonValue};
}

// #############
// # CONSTANTS #
// #############

/// The frame number meaning "no frame delivered yet".
///
/// Real frame numbers start at [`FIRST_FRAME`] and never reach this value.
pub const NO_FRAME: i32 = -10000;

/// The frame number of the first frame of a match.
pub const FIRST_FRAME: i32 = -123;

/// A frame is a single tick of the game simulation.
///
/// Frame numbers begin deeply negative during the pre-match countdown
/// ([`FIRST_FRAME`]) and count up by one per tick. The special value [`Frame::NONE`]
/// ([`NO_FRAME`]) stands for "no frame yet".
///
/// # Examples
///
/// ```
/// use slippstream::{Frame, FIRST_FRAME};
///
/// let first = Frame::FIRST;
/// assert_eq!(first.as_i32(), FIRST_FRAME);
/// assert!(Frame::NONE.is_none());
/// assert!(first + 1 > first);
/// assert_eq!((first + 10) - first, 10);
/// ```
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
pub struct Frame(i32);

impl Frame {
    /// The "no frame yet" constant, equivalent to [`NO_FRAME`].
    pub const NONE: Frame = Frame(NO_FRAME);

    /// The first frame of a match, equivalent to [`FIRST_FRAME`].
    pub const FIRST: Frame = Frame(FIRST_FRAME);

    /// Creates a new `Frame` from an `i32` value.
    #[inline]
    #[must_use]
    pub const fn new(frame: i32) -> Self {
        Frame(frame)
    }

    /// Returns the underlying `i32` value.
    #[inline]
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Returns `true` if this is [`Frame::NONE`].
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == NO_FRAME
    }

    /// Returns `Some(self)` unless this is [`Frame::NONE`].
    #[inline]
    #[must_use]
    pub const fn to_option(self) -> Option<Frame> {
        if self.is_none() {
            None
        } else {
            Some(self)
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Frame::NONE
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NO_FRAME")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl std::ops::Add<i32> for Frame {
    type Output = Frame;

    #[inline]
    fn add(self, rhs: i32) -> Self::Output {
        Frame(self.0 + rhs)
    }
}

impl std::ops::Sub<i32> for Frame {
    type Output = Frame;

    #[inline]
    fn sub(self, rhs: i32) -> Self::Output {
        Frame(self.0 - rhs)
    }
}

impl std::ops::Sub<Frame> for Frame {
    type Output = i32;

    #[inline]
    fn sub(self, rhs: Frame) -> Self::Output {
        self.0 - rhs.0
    }
}

impl From<i32> for Frame {
    #[inline]
    fn from(value: i32) -> Self {
        Frame(value)
    }
}

impl From<Frame> for i32 {
    #[inline]
    fn from(frame: Frame) -> Self {
        frame.0
    }
}

impl PartialEq<i32> for Frame {
    #[inline]
    fn eq(&self, other: &i32) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<i32> for Frame {
    #[inline]
    fn partial_cmp(&self, other: &i32) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

/// A numbered controller port.
///
/// Ports are 1-based: port 1 is the leftmost controller slot. The wire carries a
/// 0-based slot index, which [`Port::from_wire`] converts. Ports above 4 can appear
/// on the wire for observers and are kept as-is.
///
/// # Examples
///
/// ```
/// use slippstream::Port;
///
/// let port = Port::from_wire(0);
/// assert_eq!(port, Port::new(1));
/// assert_eq!(port.index(), 0);
/// assert!(port.is_player_slot());
/// assert!(!Port::new(5).is_player_slot());
/// ```
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
pub struct Port(u8);

impl Port {
    /// The four controller ports, in order.
    pub const ALL: [Port; 4] = [Port(1), Port(2), Port(3), Port(4)];

    /// Creates a port from its 1-based number.
    #[inline]
    #[must_use]
    pub const fn new(port: u8) -> Self {
        Port(port)
    }

    /// Creates a port from the 0-based slot index carried on the wire.
    #[inline]
    #[must_use]
    pub const fn from_wire(slot: u8) -> Self {
        Port(slot.saturating_add(1))
    }

    /// Returns the 1-based port number.
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Returns the 0-based slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0.saturating_sub(1) as usize
    }

    /// Returns `true` for ports 1 through 4.
    #[inline]
    #[must_use]
    pub const fn is_player_slot(self) -> bool {
        self.0 >= 1 && self.0 <= 4
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

// ###################
// # UNIT TESTS      #
// ###################
