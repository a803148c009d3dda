//! The runtime-negotiated payload size table.
//!
//! A stream opens with a Payloads event listing `(command, length)` pairs. Every
//! later event is framed by looking its command byte up here; the dispatcher never
//! guesses a length for an unregistered command.

use crate::events::reader::FieldReader;

/// Bytes per `(command u8, length u16)` entry.
const ENTRY_LEN: usize = 3;

/// Offset of the first entry in a Payloads event.
const FIRST_ENTRY: usize = 2;

/// Outcome of installing a Payloads event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Installed {
    /// Entries registered.
    pub registered: usize,
    /// `true` if the declared size did not describe whole entries.
    pub ragged: bool,
}

/// Payload length for every command byte.
#[derive(Clone, PartialEq, Eq)]
pub struct PayloadSizes {
    sizes: [Option<u16>; 256],
}

impl Default for PayloadSizes {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PayloadSizes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.sizes
                    .iter()
                    .enumerate()
                    .filter_map(|(cmd, size)| size.map(|s| (format!("0x{cmd:02x}"), s))),
            )
            .finish()
    }
}

impl PayloadSizes {
    /// An empty table. Every command is unknown.
    #[must_use]
    pub const fn new() -> Self {
        Self { sizes: [None; 256] }
    }

    /// Registers the payload length of `command`, excluding the command byte.
    pub fn register(&mut self, command: u8, payload_len: u16) {
        self.sizes[command as usize] = Some(payload_len);
    }

    /// The registered payload length of `command`, excluding the command byte.
    #[must_use]
    pub const fn payload_len(&self, command: u8) -> Option<u16> {
        self.sizes[command as usize]
    }

    /// Total bytes an event with this command occupies, command byte included.
    #[must_use]
    pub fn event_len(&self, command: u8) -> Option<usize> {
        self.payload_len(command).map(|len| len as usize + 1)
    }

    /// Number of registered commands.
    #[must_use]
    pub fn registered(&self) -> usize {
        self.sizes.iter().filter(|s| s.is_some()).count()
    }

    /// Total bytes a Payloads event occupies, or `None` if its size byte is missing.
    ///
    /// The size byte counts itself and the entries but not the command byte.
    #[must_use]
    pub fn payloads_event_len(event: &[u8]) -> Option<usize> {
        FieldReader::new(event).u8(1).map(|size| size as usize + 1)
    }

    /// Registers every entry of a complete Payloads event.
    ///
    /// Entries already registered are overwritten. A trailing partial entry is
    /// ignored and flagged as ragged.
    pub fn install(&mut self, event: &[u8]) -> Installed {
        let reader = FieldReader::new(event);
        let declared = reader.u8_or(1, 0) as usize;
        let body = declared.saturating_sub(1);
        let mut registered = 0;
        for index in 0..body / ENTRY_LEN {
            let offset = FIRST_ENTRY + index * ENTRY_LEN;
            match (reader.u8(offset), reader.u16(offset + 1)) {
                (Some(command), Some(len)) => {
                    self.register(command, len);
                    registered += 1;
                },
                _ => break,
            }
        }
        Installed {
            registered,
            ragged: body % ENTRY_LEN != 0 || registered < body / ENTRY_LEN,
        }
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
    fn unknown_until_registered() {
        let mut table = PayloadSizes::new();
        assert_eq!(table.event_len(0x38), None);
        table.register(0x38, 0x42);
        assert_eq!(table.payload_len(0x38), Some(0x42));
        assert_eq!(table.event_len(0x38), Some(0x43));
        assert_eq!(table.registered(), 1);
    }

    #[test]
    fn zero_length_payloads_are_known() {
        let mut table = PayloadSizes::new();
        table.register(0x3a, 0);
        assert_eq!(table.event_len(0x3a), Some(1));
    }

    #[test]
    fn installs_every_entry() {
        let event = [0x35, 0x07, 0x38, 0x00, 0x42, 0x3c, 0x00, 0x08];
        assert_eq!(PayloadSizes::payloads_event_len(&event), Some(8));

        let mut table = PayloadSizes::new();
        let installed = table.install(&event);
        assert_eq!(installed.registered, 2);
        assert!(!installed.ragged);
        assert_eq!(table.payload_len(0x3c), Some(8));
    }

    #[test]
    fn ragged_tables_keep_whole_entries() {
        let event = [0x35, 0x05, 0x38, 0x00, 0x42, 0x3c];
        let mut table = PayloadSizes::new();
        let installed = table.install(&event);
        assert_eq!(installed.registered, 1);
        assert!(installed.ragged);
    }

    #[test]
    fn debug_lists_registered_commands() {
        let mut table = PayloadSizes::new();
        table.register(0x36, 0x1a0);
        assert_eq!(format!("{table:?}"), "{\"0x36\": 416}");
    }
}
