use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::gamestate::GameState;
use crate::replay::ubjson::Value;
use crate::Port;

/// Display identity of one player, from replay metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerNames {
    /// Netplay display name.
    pub nickname: String,
    /// Netplay connect code, such as `ABCD#123`.
    pub connect_code: String,
}

/// The `metadata` object of a replay file.
///
/// Every key is optional in real files. Missing keys leave the field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayMetadata {
    /// `startAt`: when the game started.
    pub start_at: String,
    /// `playedOn`: the platform, such as `dolphin` or `nintendont`.
    pub played_on: String,
    /// `consoleNick`: the recording console's name.
    pub console_nick: String,
    /// `lastFrame`: the final frame number.
    pub last_frame: Option<i32>,
    /// `players`: identities keyed by port.
    pub players: BTreeMap<Port, PlayerNames>,
}

fn text(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_owned()
}

impl ReplayMetadata {
    /// Reads the metadata object. Unexpected shapes are ignored.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self::read(value).0
    }

    /// Reads the metadata object, describing every entry that was skipped.
    ///
    /// Missing keys are not reported; they are normal in older files.
    #[must_use]
    pub fn read(value: &Value) -> (Self, Vec<String>) {
        let mut skipped = Vec::new();
        if value.as_object().is_none() {
            skipped.push("metadata is not an object".to_owned());
            return (Self::default(), skipped);
        }

        let last_frame = match value.get("lastFrame") {
            None => None,
            Some(raw) => {
                let frame = raw.as_i64().and_then(|frame| i32::try_from(frame).ok());
                if frame.is_none() {
                    skipped.push(format!("lastFrame {raw:?} is not a frame number"));
                }
                frame
            },
        };
        let mut metadata = Self {
            start_at: text(value.get("startAt")),
            played_on: text(value.get("playedOn")),
            console_nick: text(value.get("consoleNick")),
            last_frame,
            players: BTreeMap::new(),
        };

        let entries = value.get("players").and_then(Value::as_object);
        for (slot, player) in entries.into_iter().flatten() {
            let Ok(wire) = slot.parse::<u8>() else {
                skipped.push(format!("player key {slot:?} is not a port"));
                continue;
            };
            let port = Port::from_wire(wire);
            if !port.is_player_slot() {
                skipped.push(format!("player key {slot:?} is out of range"));
                continue;
            }
            let names = player.get("names");
            metadata.players.insert(
                port,
                PlayerNames {
                    nickname: text(names.and_then(|n| n.get("netplay"))),
                    connect_code: text(names.and_then(|n| n.get("code"))),
                },
            );
        }
        (metadata, skipped)
    }

    /// Copies the metadata onto a decoded frame.
    pub fn apply_to(&self, state: &mut GameState) {
        state.start_at.clone_from(&self.start_at);
        state.played_on.clone_from(&self.played_on);
        state.console_nick.clone_from(&self.console_nick);
        for (port, names) in &self.players {
            if let Some(player) = state.players.get_mut(port) {
                player.primary.nickname.clone_from(&names.nickname);
                player.primary.connect_code.clone_from(&names.connect_code);
            }
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
    use crate::replay::ubjson::parse;

    #[test]
    fn reads_known_keys() {
        let doc = b"{U\x07startAtSU\x04todayU\x09lastFramel\x00\x00\x01\x00\
U\x07players{U\x011{U\x05names{U\x07netplaySU\x03bobU\x04codeSU\x05BOB#1}}}}";
        let metadata = ReplayMetadata::from_value(&parse(doc).unwrap());
        assert_eq!(metadata.start_at, "today");
        assert_eq!(metadata.last_frame, Some(256));
        assert!(metadata.played_on.is_empty());
        let names = &metadata.players[&Port::new(2)];
        assert_eq!(names.nickname, "bob");
        assert_eq!(names.connect_code, "BOB#1");
    }

    #[test]
    fn tolerates_missing_and_odd_keys() {
        let doc = b"{U\x07players{U\x01x{}U\x019{}U\x010T}}";
        let metadata = ReplayMetadata::from_value(&parse(doc).unwrap());
        assert_eq!(metadata.players.len(), 1);
        assert_eq!(metadata.players[&Port::new(1)], PlayerNames::default());
    }

    #[test]
    fn skipped_entries_are_described() {
        let doc = b"{U\x09lastFrameSU\x01xU\x07players{U\x01x{}U\x019{}U\x010T}}";
        let (metadata, skipped) = ReplayMetadata::read(&parse(doc).unwrap());
        assert_eq!(metadata.last_frame, None);
        assert_eq!(metadata.players.len(), 1);
        assert_eq!(skipped.len(), 3);
        assert!(skipped[0].starts_with("lastFrame"));
        assert!(skipped[1].contains("\"x\""));
        assert!(skipped[2].contains("out of range"));

        let (_, skipped) = ReplayMetadata::read(&parse(b"T").unwrap());
        assert_eq!(skipped, vec!["metadata is not an object".to_owned()]);

        let (_, skipped) = ReplayMetadata::read(&parse(b"{U\x07startAtSU\x01a}").unwrap());
        assert!(skipped.is_empty());
    }

    #[test]
    fn applies_only_to_present_players() {
        let mut metadata = ReplayMetadata {
            console_nick: "wii".into(),
            ..ReplayMetadata::default()
        };
        metadata.players.insert(
            Port::new(3),
            PlayerNames {
                nickname: "c".into(),
                connect_code: "C#3".into(),
            },
        );
        let mut state = GameState::default();
        state.player_mut(Port::new(1));
        metadata.apply_to(&mut state);
        assert_eq!(state.console_nick, "wii");
        assert_eq!(state.players.len(), 1);
        assert!(state.players[&Port::new(1)].primary.nickname.is_empty());
    }
}
