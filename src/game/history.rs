//! Turn history log
//!
//! Maintains the append-only chronological record of resolved turns.
//! Each entry snapshots enough state for read-only replay scrubbing:
//! the position string, the upgrade entities, the modifier map and the
//! wall map, plus the human-readable line the resolver emitted.
//!
//! Entries are never edited or removed; any "viewing index" is an
//! external concern and the engine only ever appends.

use serde::{Deserialize, Serialize};

use crate::core::Upgrade;

use super::modifiers::ModifierMap;
use super::walls::WallGrid;

/// Immutable snapshot of one resolved turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Position string after the turn resolved
    pub position: String,
    pub upgrades: Vec<Upgrade>,
    pub modifiers: ModifierMap,
    pub walls: WallGrid,
    /// Human-readable log line, e.g. `"White: e2-e4"`
    pub text: String,
}

/// Append-only ordered sequence of resolved turns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<HistoryEntry>);

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// Append one resolved turn
    pub fn append(&mut self, entry: HistoryEntry) {
        self.0.push(entry);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entry by turn index (0 = first resolved turn)
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.0.get(index)
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.0.iter()
    }
}
