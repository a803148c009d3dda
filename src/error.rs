use std::error::Error;
use std::fmt;
use std::fmt::Display;

use crate::SlippiVersion;

/// This enum contains all errors a session or dispatcher can return.
///
/// Only session-level problems surface here. Short fields, unknown enum values and
/// duplicate frames are absorbed during decoding and never produce a `StreamError`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum StreamError {
    /// The stream negotiated a protocol version older than this crate decodes by default.
    ///
    /// Enable legacy support with
    /// [`SessionBuilder::with_allow_old_version`](crate::SessionBuilder::with_allow_old_version)
    /// to decode it anyway.
    VersionTooLow {
        /// The version announced by the game start event.
        version: SlippiVersion,
        /// The oldest version accepted without legacy support.
        minimum: SlippiVersion,
    },
    /// An event started with a command byte that has no registered payload length.
    ///
    /// The dispatcher will not guess a length, so the rest of the stream cannot be framed.
    UnknownCommand {
        /// The offending command byte.
        command: u8,
        /// Stream offset of the command byte.
        offset: usize,
    },
    /// A replay file's envelope could not be parsed.
    MalformedReplay {
        /// What was wrong with the envelope.
        reason: ReplayErrorKind,
    },
    /// Reading a replay file failed.
    Io {
        /// A description of what failed.
        context: String,
    },
    /// You made an invalid request, usually by using wrong parameters for function calls.
    InvalidRequest {
        /// Further specifies why the request was invalid.
        info: String,
    },
    /// The event source can no longer deliver messages.
    SourceDisconnected,
}

/// Why a replay envelope was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ReplayErrorKind {
    /// The document ended in the middle of a value.
    UnexpectedEnd {
        /// Offset at which more bytes were needed.
        offset: usize,
    },
    /// A type marker this reader does not understand.
    UnknownMarker {
        /// The marker byte.
        marker: u8,
        /// Offset of the marker.
        offset: usize,
    },
    /// The top-level value is not an object.
    NotAnObject,
    /// The top-level object has no `raw` byte array.
    MissingRaw,
    /// A length or count was negative or not an integer.
    InvalidLength {
        /// Offset of the length value.
        offset: usize,
    },
    /// A string was not valid UTF-8.
    InvalidUtf8 {
        /// Offset of the string payload.
        offset: usize,
    },
    /// Containers were nested deeper than the reader allows.
    NestingTooDeep {
        /// The depth that was reached.
        depth: usize,
    },
}

impl Display for ReplayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd { offset } => {
                write!(f, "unexpected end of document at offset {}", offset)
            },
            Self::UnknownMarker { marker, offset } => {
                write!(f, "unknown type marker 0x{:02x} at offset {}", marker, offset)
            },
            Self::NotAnObject => write!(f, "top-level value is not an object"),
            Self::MissingRaw => write!(f, "no 'raw' byte array in the replay"),
            Self::InvalidLength { offset } => {
                write!(f, "invalid length at offset {}", offset)
            },
            Self::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 string at offset {}", offset)
            },
            Self::NestingTooDeep { depth } => {
                write!(f, "containers nested deeper than {}", depth)
            },
        }
    }
}

impl Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::VersionTooLow { version, minimum } => {
                write!(
                    f,
                    "Slippi version {} is too low (minimum supported is {}); enable legacy support to decode it",
                    version, minimum
                )
            },
            StreamError::UnknownCommand { command, offset } => {
                write!(
                    f,
                    "Command byte 0x{:02x} at offset {} has no registered payload size",
                    command, offset
                )
            },
            StreamError::MalformedReplay { reason } => {
                write!(f, "Malformed replay: {}", reason)
            },
            StreamError::Io { context } => {
                write!(f, "I/O error: {}", context)
            },
            StreamError::InvalidRequest { info } => {
                write!(f, "Invalid Request: {}", info)
            },
            StreamError::SourceDisconnected => {
                write!(f, "The event source disconnected.")
            },
        }
    }
}

impl Error for StreamError {}

impl From<ReplayErrorKind> for StreamError {
    fn from(reason: ReplayErrorKind) -> Self {
        StreamError::MalformedReplay { reason }
    }
}
