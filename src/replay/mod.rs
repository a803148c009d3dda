//! Replay files: a UBJSON envelope around the raw event stream.
//!
//! A `.slp` file is an object with a `raw` byte array, holding the event stream
//! exactly as it was received, and a `metadata` object describing the session.

mod metadata;
pub mod ubjson;

use std::path::Path;

pub use metadata::{PlayerNames, ReplayMetadata};

use crate::{ReplayErrorKind, StreamError};

/// A parsed replay file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayFile {
    /// The raw event stream.
    pub raw: Vec<u8>,
    /// Session metadata. Empty when the file has none.
    pub metadata: ReplayMetadata,
    /// Metadata entries that were present but could not be read.
    pub warnings: Vec<String>,
}

impl ReplayFile {
    /// Parses a replay from its bytes.
    ///
    /// # Errors
    ///
    /// [`StreamError::MalformedReplay`] if the envelope is not an object with a `raw`
    /// byte array.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StreamError> {
        let document = ubjson::parse(bytes)?;
        if document.as_object().is_none() {
            return Err(ReplayErrorKind::NotAnObject.into());
        }
        let raw = document
            .get("raw")
            .and_then(ubjson::Value::as_bytes)
            .ok_or(ReplayErrorKind::MissingRaw)?
            .to_vec();
        let (metadata, warnings) = document
            .get("metadata")
            .map(ReplayMetadata::read)
            .unwrap_or_default();
        Ok(Self {
            raw,
            metadata,
            warnings,
        })
    }

    /// Reads and parses the replay at `path`.
    ///
    /// # Errors
    ///
    /// [`StreamError::Io`] if the file cannot be read, otherwise as
    /// [`ReplayFile::from_bytes`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| StreamError::Io {
            context: format!("reading replay {}: {err}", path.display()),
        })?;
        Self::from_bytes(&bytes)
    }
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

    #[test]
    fn extracts_raw_and_metadata() {
        let doc = b"{U\x03raw[$U#U\x02\x35\x01U\x08metadata{U\x0bconsoleNickSU\x02tv}}";
        let replay = ReplayFile::from_bytes(doc).unwrap();
        assert_eq!(replay.raw, vec![0x35, 0x01]);
        assert_eq!(replay.metadata.console_nick, "tv");
        assert!(replay.warnings.is_empty());
    }

    #[test]
    fn unreadable_metadata_is_kept_as_warnings() {
        let doc = b"{U\x03raw[$U#U\x01\x35U\x08metadata[]}";
        let replay = ReplayFile::from_bytes(doc).unwrap();
        assert_eq!(replay.metadata, ReplayMetadata::default());
        assert_eq!(replay.warnings, vec!["metadata is not an object".to_owned()]);
    }

    #[test]
    fn rejects_envelopes_without_raw() {
        assert_eq!(
            ReplayFile::from_bytes(b"{U\x01aT}"),
            Err(StreamError::MalformedReplay {
                reason: ReplayErrorKind::MissingRaw
            })
        );
        assert_eq!(
            ReplayFile::from_bytes(b"T"),
            Err(StreamError::MalformedReplay {
                reason: ReplayErrorKind::NotAnObject
            })
        );
        assert!(matches!(
            ReplayFile::from_path("/nonexistent/game.slp"),
            Err(StreamError::Io { .. })
        ));
    }
}
