//! Interaction mode - the ability input state machine
//!
//! Once a fired ability arms, the next square click is intercepted by the
//! pending mode before falling back to ordinary move handling. Exactly one
//! mode can be active at a time; the tagged union makes a second
//! simultaneous mode unrepresentable.
//!
//! The mode is transient per-client interaction state: it is not part of
//! the stored room document and resets to `Idle` on load.

use crate::core::{Side, Square};

/// Pending ability input mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// No ability pending; clicks resolve as ordinary moves
    #[default]
    Idle,

    /// Swap fired (or a swap pickup landed on): the next click on a
    /// different friendly-occupied square swaps the two pieces and their
    /// modifiers. The turn token may already have flipped, so the firing
    /// side is recorded explicitly.
    AwaitingSwap { source: Square, by: Side },

    /// Sniper fired: the next click must target an enemy piece within
    /// Chebyshev distance 3 of the source
    AwaitingSniperTarget { source: Square },

    /// Builder fired: accumulating wall placements until three land
    PlacingWalls { source: Square, placed: Vec<Square> },
}

impl InteractionMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionMode::Idle)
    }

    /// The square the pending ability was fired from, if any
    pub fn source(&self) -> Option<Square> {
        match self {
            InteractionMode::Idle => None,
            InteractionMode::AwaitingSwap { source, .. }
            | InteractionMode::AwaitingSniperTarget { source }
            | InteractionMode::PlacingWalls { source, .. } => Some(*source),
        }
    }
}
