//! Convenient re-exports for common usage.
//!
//! ```rust
//! use slippstream::prelude::*;
//!
//! # fn main() -> Result<(), StreamError> {
//! let source = QueuedSource::from_messages([]);
//! let mut session = SessionBuilder::new().start_session(source)?;
//! assert_eq!(session.next_frame()?, StepResult::Ended);
//! # Ok(())
//! # }
//! ```
//!
//! # What's Included
//!
//! - **Sessions**: [`Session`], [`SessionBuilder`], [`StepResult`], [`SessionConfig`], [`PollingMode`]
//! - **Sources**: [`EventSource`], [`SourceMessage`], [`QueuedSource`], [`ReplayFileSource`]
//! - **Snapshots**: [`GameState`], [`Player`], [`PlayerState`], [`Projectile`], [`Position`]
//! - **Identifiers**: [`Action`], [`Character`], [`Stage`], [`Menu`], [`Frame`], [`Port`]
//! - **Errors**: [`StreamError`]

// Sessions
pub use crate::sessions::builder::{PollingMode, SessionBuilder, SessionConfig};
pub use crate::sessions::stream_session::{Session, StepResult};

// Sources
pub use crate::source::{EventSource, QueuedSource, ReplayFileSource, SourceMessage};

// Snapshots
pub use crate::gamestate::{GameState, Player, PlayerState, Position, Projectile};

// Identifiers
pub use crate::enums::{Action, Character, Menu, Stage};
pub use crate::{Frame, Port};

// Errors
pub use crate::error::StreamError;
