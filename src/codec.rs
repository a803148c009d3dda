//! Binary snapshot codec.
//!
//! Encodes [`GameState`] snapshots with bincode using one fixed
//! configuration: `standard()` with fixed-width integers. The same snapshot always
//! encodes to the same bytes, so encoded frames can be compared byte for byte.
//!
//! # Examples
//!
//! ```
//! use slippstream::codec::{decode_state, encode_state};
//! use slippstream::GameState;
//!
//! let state = GameState::default();
//! let bytes = encode_state(&state).expect("encoding should succeed");
//! assert_eq!(decode_state(&bytes).expect("decoding should succeed"), state);
//! ```

use std::fmt;

use crate::gamestate::GameState;

fn config() -> impl bincode::config::Config {
    bincode::config::standard().with_fixed_int_encoding()
}

/// What the codec was doing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodecOperation {
    /// Encoding a game state snapshot.
    EncodeState,
    /// Decoding a game state snapshot.
    DecodeState,
}

impl fmt::Display for CodecOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EncodeState => write!(f, "encoding game state"),
            Self::DecodeState => write!(f, "decoding game state"),
        }
    }
}

/// Errors from encoding or decoding.
///
/// bincode errors carry no structure beyond their message, so the message is kept
/// as text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// Encoding failed.
    EncodeError {
        /// The bincode error message.
        message: String,
        /// The operation that was being performed.
        operation: CodecOperation,
    },
    /// Decoding failed.
    DecodeError {
        /// The bincode error message.
        message: String,
        /// The operation that was being performed.
        operation: CodecOperation,
    },
}

impl CodecError {
    /// Creates an encode error.
    pub fn encode(message: impl Into<String>, operation: CodecOperation) -> Self {
        Self::EncodeError {
            message: message.into(),
            operation,
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>, operation: CodecOperation) -> Self {
        Self::DecodeError {
            message: message.into(),
            operation,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EncodeError { message, operation } => {
                write!(f, "encoding failed while {operation}: {message}")
            },
            Self::DecodeError { message, operation } => {
                write!(f, "decoding failed while {operation}: {message}")
            },
        }
    }
}

impl std::error::Error for CodecError {}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Encodes a snapshot.
///
/// # Errors
///
/// [`CodecError::EncodeError`] if serialization fails.
pub fn encode_state(state: &GameState) -> CodecResult<Vec<u8>> {
    bincode::serde::encode_to_vec(state, config())
        .map_err(|e| CodecError::encode(e.to_string(), CodecOperation::EncodeState))
}

/// Decodes a snapshot. Trailing bytes are an error.
///
/// # Errors
///
/// [`CodecError::DecodeError`] if the bytes are not exactly one encoded snapshot.
pub fn decode_state(bytes: &[u8]) -> CodecResult<GameState> {
    let (state, read): (GameState, usize) = bincode::serde::decode_from_slice(bytes, config())
        .map_err(|e| CodecError::decode(e.to_string(), CodecOperation::DecodeState))?;
    if read != bytes.len() {
        return Err(CodecError::decode(
            format!("{} trailing bytes", bytes.len() - read),
            CodecOperation::DecodeState,
        ));
    }
    Ok(state)
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::gamestate::Projectile;
    use crate::{Action, Character, Frame, Port};

    fn sample() -> GameState {
        let mut state = GameState {
            frame: Frame::new(120),
            console_nick: "desk".into(),
            ..GameState::default()
        };
        let body = &mut state.player_mut(Port::new(2)).primary;
        body.character = Character::Falco;
        body.action = Action::Dashing;
        body.percent = 44;
        state.player_mut(Port::new(1)).body_mut(true).stock = 3;
        state.projectiles.push(Projectile::default());
        state
    }

    #[test]
    fn snapshots_survive_encoding() {
        let state = sample();
        let bytes = encode_state(&state).unwrap();
        assert_eq!(decode_state(&bytes).unwrap(), state);
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(encode_state(&sample()).unwrap(), encode_state(&sample()).unwrap());
    }

    #[test]
    fn player_order_is_preserved() {
        let decoded = decode_state(&encode_state(&sample()).unwrap()).unwrap();
        let ports: Vec<_> = decoded.players.keys().copied().collect();
        assert_eq!(ports, vec![Port::new(2), Port::new(1)]);
    }

    #[test]
    fn trailing_and_truncated_bytes_are_rejected() {
        let mut bytes = encode_state(&sample()).unwrap();
        bytes.push(0);
        assert!(matches!(
            decode_state(&bytes),
            Err(CodecError::DecodeError {
                operation: CodecOperation::DecodeState,
                ..
            })
        ));
        bytes.truncate(bytes.len() / 2);
        assert!(decode_state(&bytes).is_err());
    }

    #[test]
    fn errors_name_the_operation() {
        let err = decode_state(&[]).unwrap_err();
        assert!(err.to_string().starts_with("decoding failed while decoding game state"));
    }
}
