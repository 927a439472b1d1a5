//! Timed wall obstacles
//!
//! Maps a board square to remaining half-move lifetime. A walled square is
//! blocked as a destination for ordinary moves; ghost moves pass through.
//! Lifetimes decay once per fully resolved turn and expire at zero.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::Square;

/// Lifetime assigned to freshly built walls, in completed turns
pub const WALL_LIFETIME: u8 = 2;

/// Walls the builder ability places per activation
pub const BUILDER_PLACEMENTS: usize = 3;

/// Square-keyed map of wall lifetimes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WallGrid(HashMap<Square, u8>);

impl WallGrid {
    pub fn new() -> Self {
        WallGrid::default()
    }

    /// Whether ordinary moves into this square are blocked
    pub fn blocks(&self, sq: Square) -> bool {
        self.0.contains_key(&sq)
    }

    pub fn lifetime(&self, sq: Square) -> Option<u8> {
        self.0.get(&sq).copied()
    }

    /// Place a wall with the standard fresh lifetime
    pub fn place(&mut self, sq: Square) {
        self.0.insert(sq, WALL_LIFETIME);
    }

    /// Decay every wall by one completed turn, expiring any at zero
    pub fn tick(&mut self) {
        self.0.retain(|_, life| {
            *life = life.saturating_sub(1);
            *life > 0
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, u8)> + '_ {
        self.0.iter().map(|(sq, life)| (*sq, *life))
    }
}
