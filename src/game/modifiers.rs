//! Modifier registry - abilities bound to occupied squares
//!
//! A modifier represents an ability held by whichever piece currently
//! occupies its square. It does not follow the piece on its own: the
//! resolver must explicitly transfer it on every move, drop it when the
//! ability is single-use, or fire it when the kind demands instant
//! consumption.
//!
//! # Invariants
//!
//! - A square holds at most one modifier.
//! - A modifier can only exist on a square occupied by a piece; when the
//!   piece is captured or destroyed the registry entry is dropped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::{Side, Square, UpgradeKind};

/// An active ability bound to the piece on a square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    #[serde(rename = "type")]
    pub kind: UpgradeKind,
    /// Side that owns the ability (the side that picked it up)
    #[serde(rename = "activeTurn")]
    pub active_turn: Side,
}

/// What happens to a carried modifier when its piece moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferRule {
    /// Carried forward unchanged to the destination square
    Carry,
    /// Dropped at the source; the executor handles any one-shot effect
    Drop,
    /// Fires against the clock and is consumed on landing
    FireOnLanding,
}

impl UpgradeKind {
    /// Per-kind transfer rule applied on every successful move
    pub fn transfer_rule(self) -> TransferRule {
        match self {
            // Fired abilities and passives ride along until used
            UpgradeKind::Swap
            | UpgradeKind::Sniper
            | UpgradeKind::Builder
            | UpgradeKind::Martyrdom
            | UpgradeKind::HiddenMove => TransferRule::Carry,
            // One-shot move abilities burn on the move that uses them
            UpgradeKind::Ghost | UpgradeKind::DoubleMove | UpgradeKind::Necromancer => {
                TransferRule::Drop
            }
            UpgradeKind::TimeAdd | UpgradeKind::TimeSub => TransferRule::FireOnLanding,
        }
    }
}

/// Square-keyed registry of active modifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierMap(HashMap<Square, Modifier>);

impl ModifierMap {
    pub fn new() -> Self {
        ModifierMap::default()
    }

    pub fn get(&self, sq: Square) -> Option<Modifier> {
        self.0.get(&sq).copied()
    }

    pub fn insert(&mut self, sq: Square, modifier: Modifier) {
        self.0.insert(sq, modifier);
    }

    pub fn remove(&mut self, sq: Square) -> Option<Modifier> {
        self.0.remove(&sq)
    }

    /// Swap whatever modifiers sit on two squares, preserving absences
    pub fn swap(&mut self, a: Square, b: Square) {
        let at_a = self.0.remove(&a);
        let at_b = self.0.remove(&b);
        if let Some(m) = at_a {
            self.0.insert(b, m);
        }
        if let Some(m) = at_b {
            self.0.insert(a, m);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, Modifier)> + '_ {
        self.0.iter().map(|(sq, m)| (*sq, *m))
    }
}
