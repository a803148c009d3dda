//! Which `(character, action)` pairs report their first action frame as 0.
//!
//! The game is inconsistent about action frame indexing. Frames delivered by this
//! crate are uniformly 1-indexed: pairs listed in the [`ZeroIndexTable`] get 1 added
//! to their action frame after decoding.
//!
//! The table is data, supplied by the host as a small CSV file:
//!
//! ```text
//! character,action,zeroindex
//! 1,20,True
//! 1,21,False
//! ```
//!
//! Columns are the in-match character id and the action id. Only rows whose
//! `zeroindex` column is `True`, `true` or `1` enter the table. A
//! [`ZeroIndexRecorder`] can rebuild the file by watching frames go by.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use indexmap::IndexMap;

use crate::gamestate::GameState;
use crate::{Action, Character, StreamError};

const HEADER: &str = "character,action,zeroindex";

/// Set of zero-indexed `(character, action)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZeroIndexTable {
    pairs: BTreeSet<(u8, u16)>,
}

impl ZeroIndexTable {
    /// The built-in table. It is empty: no action frame is adjusted until a table
    /// is loaded with [`ZeroIndexTable::from_csv`] or [`ZeroIndexTable::from_path`].
    /// Sessions started with an empty table report a configuration warning.
    #[must_use]
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Returns `true` if `action` for `character` reports its first frame as 0.
    #[must_use]
    pub fn contains(&self, character: Character, action: Action) -> bool {
        self.pairs.contains(&(character.value(), action.value()))
    }

    /// Marks `action` for `character` as zero-indexed.
    pub fn insert(&mut self, character: Character, action: Action) {
        self.pairs.insert((character.value(), action.value()));
    }

    /// Number of zero-indexed pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no pair is zero-indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Parses the CSV data file. The header row is required.
    ///
    /// # Examples
    ///
    /// ```
    /// use slippstream::{Action, Character, ZeroIndexTable};
    ///
    /// let table = ZeroIndexTable::from_csv(
    ///     "character,action,zeroindex\n1,20,True\n1,21,False\n",
    /// )?;
    /// assert!(table.contains(Character::Fox, Action::from_wire_or_unknown(20)));
    /// assert!(!table.contains(Character::Fox, Action::from_wire_or_unknown(21)));
    /// # Ok::<(), slippstream::StreamError>(())
    /// ```
    pub fn from_csv(text: &str) -> Result<Self, StreamError> {
        let mut lines = text.lines().enumerate().filter(|(_, line)| !line.trim().is_empty());
        match lines.next() {
            Some((_, header)) if header.trim().eq_ignore_ascii_case(HEADER) => {},
            _ => {
                return Err(StreamError::InvalidRequest {
                    info: format!("zero-index table must start with '{HEADER}'"),
                })
            },
        }

        let mut table = Self::default();
        for (number, line) in lines {
            let invalid = || StreamError::InvalidRequest {
                info: format!("zero-index table line {}: '{}'", number + 1, line.trim()),
            };
            let mut columns = line.split(',').map(str::trim);
            let (Some(character), Some(action), Some(flag), None) =
                (columns.next(), columns.next(), columns.next(), columns.next())
            else {
                return Err(invalid());
            };
            let character: u8 = character.parse().map_err(|_| invalid())?;
            let action: u16 = action.parse().map_err(|_| invalid())?;
            if matches!(flag, "True" | "true" | "1") {
                table.pairs.insert((character, action));
            }
        }
        Ok(table)
    }

    /// Reads and parses the CSV data file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| StreamError::Io {
            context: format!("reading zero-index table {}: {err}", path.display()),
        })?;
        Self::from_csv(&text)
    }

    /// Writes the table as CSV. Only zero-indexed pairs are listed.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = format!("{HEADER}\n");
        for (character, action) in &self.pairs {
            let _ = writeln!(out, "{character},{action},True");
        }
        out
    }
}

/// Rebuilds a zero-index table from observed frames.
///
/// Feed it frames decoded with an empty table so action frames are raw. The first
/// observation of each `(character, action)` pair decides: if that frame's action
/// frame was 0, the pair is zero-indexed.
#[derive(Debug, Clone, Default)]
pub struct ZeroIndexRecorder {
    rows: IndexMap<(u8, u16), bool>,
}

impl ZeroIndexRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every body in `state`.
    pub fn record(&mut self, state: &GameState) {
        for body in state.players.values().flat_map(|player| player.bodies()) {
            if body.character.is_unknown() || body.action.is_unknown() {
                continue;
            }
            self.rows
                .entry((body.character.value(), body.action.value()))
                .or_insert(body.action_frame == 0);
        }
    }

    /// Number of distinct pairs observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes every observed pair as CSV, in first-seen order.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = format!("{HEADER}\n");
        for ((character, action), zero) in &self.rows {
            let flag = if *zero { "True" } else { "False" };
            let _ = writeln!(out, "{character},{action},{flag}");
        }
        out
    }

    /// The zero-indexed pairs observed so far.
    #[must_use]
    pub fn into_table(self) -> ZeroIndexTable {
        ZeroIndexTable {
            pairs: self
                .rows
                .into_iter()
                .filter_map(|(pair, zero)| zero.then_some(pair))
                .collect(),
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
    use crate::Port;

    #[test]
    fn builtin_table_is_empty() {
        assert!(ZeroIndexTable::builtin().is_empty());
    }

    #[test]
    fn csv_requires_a_header() {
        assert!(ZeroIndexTable::from_csv("1,20,True\n").is_err());
        assert!(ZeroIndexTable::from_csv("").is_err());
    }

    #[test]
    fn csv_rejects_malformed_rows() {
        let err = ZeroIndexTable::from_csv("character,action,zeroindex\n1,x,True\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(ZeroIndexTable::from_csv("character,action,zeroindex\n1,2\n").is_err());
        assert!(ZeroIndexTable::from_csv("character,action,zeroindex\n1,2,True,4\n").is_err());
    }

    #[test]
    fn csv_round_trips() {
        let mut table = ZeroIndexTable::default();
        table.insert(Character::Marth, Action::Dashing);
        table.insert(Character::Fox, Action::EdgeCatching);
        let parsed = ZeroIndexTable::from_csv(&table.to_csv()).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn recorder_keeps_the_first_observation() {
        let mut state = GameState::default();
        let body = &mut state.player_mut(Port::new(1)).primary;
        body.character = Character::Fox;
        body.action = Action::Dashing;
        body.action_frame = 0;

        let mut recorder = ZeroIndexRecorder::new();
        recorder.record(&state);
        state.player_mut(Port::new(1)).primary.action_frame = 1;
        recorder.record(&state);

        assert_eq!(recorder.len(), 1);
        let table = recorder.clone().into_table();
        assert!(table.contains(Character::Fox, Action::Dashing));
        assert!(recorder.to_csv().ends_with(",True\n"));
    }

    #[test]
    fn recorder_skips_unknown_identifiers() {
        let mut state = GameState::default();
        state.player_mut(Port::new(2));
        let mut recorder = ZeroIndexRecorder::new();
        recorder.record(&state);
        assert!(recorder.is_empty());
    }
}
