//! Game state aggregate and player actions
//!
//! `GameState` is the unit exchanged with the external store and broadcast
//! to peers: position, turn token, upgrade entities, modifier map, walls,
//! clock, history and winner. Every public engine operation takes a
//! `GameState` plus an [`Action`] and returns a new `GameState`, or fails
//! without mutation.

use serde::{Deserialize, Serialize};

use crate::board::{BoardAdapter, START_FEN};
use crate::core::{Side, Square, Upgrade};

use super::clock::{Clock, TimeControl};
use super::history::History;
use super::mode::InteractionMode;
use super::modifiers::ModifierMap;
use super::walls::WallGrid;

/// A player request against one game room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Ordinary move attempt (modifier effects and pickups apply)
    Move { from: Square, to: Square },
    /// Explicitly fire the fired-type ability on the acting side's piece
    FireAbility { square: Square },
    /// Square click while an ability mode is pending. Clicking the mode's
    /// own source square exits the mode.
    AbilityTarget { square: Square },
    /// Concede the game
    Resign,
}

/// Canonical state of one game room
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Portable position string; side-to-move always agrees with `turn`
    pub fen: String,
    pub turn: Side,
    pub upgrades: Vec<Upgrade>,
    pub modifiers: ModifierMap,
    pub walls: WallGrid,
    pub clock: Clock,
    pub history: History,
    pub winner: Option<Side>,
    /// Transient ability input mode; not persisted to the room document
    pub mode: InteractionMode,
    /// Optimistic-concurrency token, bumped on every committed resolution
    pub version: u64,
}

impl GameState {
    /// Fresh game at the standard start position
    pub fn new(time: TimeControl) -> Self {
        GameState {
            fen: START_FEN.to_string(),
            turn: Side::White,
            upgrades: Vec::new(),
            modifiers: ModifierMap::new(),
            walls: WallGrid::new(),
            clock: Clock::new(time),
            history: History::new(),
            winner: None,
            mode: InteractionMode::Idle,
            version: 0,
        }
    }

    /// The side expected to produce the next action
    ///
    /// Normally the turn holder; while a swap is pending the turn token
    /// has already flipped, so the actor is the side that fired it.
    pub fn acting_side(&self) -> Side {
        match self.mode {
            InteractionMode::AwaitingSwap { by, .. } => by,
            _ => self.turn,
        }
    }

    /// Upgrade entity occupying a square, if any
    pub fn upgrade_at(&self, sq: Square) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.occupies(sq))
    }

    /// Board adapter over the current position, falling back to the start
    /// position when the stored string is unparseable
    pub fn board(&self) -> BoardAdapter {
        match BoardAdapter::from_fen(&self.fen) {
            Ok(board) => board,
            Err(_) => {
                tracing::warn!(
                    "[STATE] unparseable position {:?}, falling back to start position",
                    self.fen
                );
                BoardAdapter::start()
            }
        }
    }

    /// The side that has run out of time as of `now_ms`, if any
    ///
    /// Derived for external pollers; the engine itself only rejects
    /// actions once the acting clock is exhausted.
    pub fn timed_out(&self, now_ms: i64) -> Option<Side> {
        if self.winner.is_some() {
            return None;
        }
        let acting = self.acting_side();
        if self.clock.projected_remaining(acting, now_ms) <= 0.0 {
            Some(acting)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_shape() {
        let state = GameState::new(TimeControl::default());
        assert_eq!(state.fen, START_FEN);
        assert_eq!(state.turn, Side::White);
        assert!(state.upgrades.is_empty());
        assert!(state.modifiers.is_empty());
        assert!(state.walls.is_empty());
        assert!(state.history.is_empty());
        assert_eq!(state.winner, None);
        assert!(state.mode.is_idle());
        assert_eq!(state.version, 0);
    }

    #[test]
    fn test_acting_side_follows_swap_flip() {
        let mut state = GameState::new(TimeControl::default());
        assert_eq!(state.acting_side(), Side::White);

        // White fired swap: token already flipped, but White still acts
        state.turn = Side::Black;
        state.mode = InteractionMode::AwaitingSwap {
            source: Square::from_algebraic("d1").unwrap(),
            by: Side::White,
        };
        assert_eq!(state.acting_side(), Side::White);
    }

    #[test]
    fn test_timed_out_reports_acting_side() {
        let mut state = GameState::new(TimeControl {
            base: 10.0,
            increment: 0.0,
        });
        state.clock.stamp(0);
        assert_eq!(state.timed_out(5_000), None);
        assert_eq!(state.timed_out(11_000), Some(Side::White));

        state.winner = Some(Side::Black);
        assert_eq!(state.timed_out(11_000), None, "decided games never flag");
    }

    #[test]
    fn test_malformed_fen_falls_back() {
        let mut state = GameState::new(TimeControl::default());
        state.fen = "garbage".to_string();
        let board = state.board();
        assert_eq!(board.to_fen(), START_FEN);
    }
}
