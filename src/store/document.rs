//! Per-room state document
//!
//! The JSON blob exchanged with the external store. Field names follow
//! the stored camelCase convention; serializing a [`GameState`] and
//! reconstructing it yields a position, upgrade list, modifier map and
//! wall map equal to the original.

use serde::{Deserialize, Serialize};

use crate::board::START_FEN;
use crate::core::{Side, Upgrade};
use crate::game::clock::{Clock, TimeControl};
use crate::game::history::History;
use crate::game::mode::InteractionMode;
use crate::game::modifiers::ModifierMap;
use crate::game::state::GameState;
use crate::game::walls::WallGrid;

/// Live clock counters, keyed by side token
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeLeft {
    pub w: f64,
    pub b: f64,
}

/// One room's stored state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDocument {
    pub fen: String,
    pub turn: Side,
    pub upgrades: Vec<Upgrade>,
    pub modifiers: ModifierMap,
    pub walls: WallGrid,
    pub history: History,
    pub winner: Option<Side>,
    pub time_config: TimeControl,
    pub time_left: TimeLeft,
    pub last_move_time: Option<i64>,
    /// Optimistic-concurrency token; absent in documents written before
    /// versioning existed
    #[serde(default)]
    pub version: u64,
}

impl RoomDocument {
    /// Initial document written on room creation
    pub fn initial(time_config: TimeControl) -> Self {
        RoomDocument {
            fen: START_FEN.to_string(),
            turn: Side::White,
            upgrades: Vec::new(),
            modifiers: ModifierMap::new(),
            walls: WallGrid::new(),
            history: History::new(),
            winner: None,
            time_left: TimeLeft {
                w: time_config.base,
                b: time_config.base,
            },
            time_config,
            last_move_time: None,
            version: 0,
        }
    }

    /// Snapshot a game state into its stored form
    pub fn from_state(state: &GameState) -> Self {
        RoomDocument {
            fen: state.fen.clone(),
            turn: state.turn,
            upgrades: state.upgrades.clone(),
            modifiers: state.modifiers.clone(),
            walls: state.walls.clone(),
            history: state.history.clone(),
            winner: state.winner,
            time_config: state.clock.config,
            time_left: TimeLeft {
                w: state.clock.white_left,
                b: state.clock.black_left,
            },
            last_move_time: state.clock.last_move_time,
            version: state.version,
        }
    }

    /// Rehydrate a game state from its stored form
    ///
    /// The position string is taken verbatim; a malformed one is tolerated
    /// and only falls back to the last known good position at use time.
    /// The interaction mode is client-local and always resets to idle.
    pub fn into_state(self) -> GameState {
        GameState {
            fen: self.fen,
            turn: self.turn,
            upgrades: self.upgrades,
            modifiers: self.modifiers,
            walls: self.walls,
            clock: Clock {
                config: self.time_config,
                white_left: self.time_left.w,
                black_left: self.time_left.b,
                last_move_time: self.last_move_time,
            },
            history: self.history,
            winner: self.winner,
            mode: InteractionMode::Idle,
            version: self.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_document_shape() {
        //! Matches the room-creation contract: standard start position,
        //! white to move, everything else empty.
        let doc = RoomDocument::initial(TimeControl {
            base: 300.0,
            increment: 2.0,
        });
        assert_eq!(doc.fen, START_FEN);
        assert_eq!(doc.turn, Side::White);
        assert!(doc.upgrades.is_empty());
        assert!(doc.modifiers.is_empty());
        assert!(doc.walls.is_empty());
        assert!(doc.history.is_empty());
        assert_eq!(doc.winner, None);
        assert_eq!(doc.time_left.w, 300.0);
        assert_eq!(doc.time_left.b, 300.0);
        assert_eq!(doc.last_move_time, None);
    }

    #[test]
    fn test_document_keys_are_camel_case() {
        let doc = RoomDocument::initial(TimeControl::default());
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("timeConfig").is_some());
        assert!(json.get("timeLeft").is_some());
        assert!(json.get("lastMoveTime").is_some());
        assert_eq!(json["winner"], serde_json::Value::Null);
        assert_eq!(json["turn"], "w");
    }

    #[test]
    fn test_version_defaults_for_old_documents() {
        let mut json = serde_json::to_value(RoomDocument::initial(TimeControl::default())).unwrap();
        json.as_object_mut().unwrap().remove("version");
        let doc: RoomDocument = serde_json::from_value(json).unwrap();
        assert_eq!(doc.version, 0);
    }
}
