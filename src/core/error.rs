//! Error types for the variant engine
//!
//! Every rejection is recoverable: a failed action leaves the game state
//! untouched and the acting client is free to pick a new target or
//! deselect.

use thiserror::Error;

use super::types::Side;

/// Errors produced while resolving a player action
#[derive(Error, Debug)]
pub enum EngineError {
    /// Illegal per base chess rules, or the destination is walled off
    #[error("invalid move: {message}")]
    InvalidMove { message: String },

    /// Wrong target for the pending ability mode (sniper out of range,
    /// swap onto a non-friendly square, wall onto an occupied square, ...)
    #[error("invalid ability target: {message}")]
    InvalidAbilityTarget { message: String },

    /// The acting side's clock is already exhausted
    #[error("{side} is out of time")]
    OutOfTime { side: Side },

    /// The spawner found no empty, upgrade-free square to place on.
    /// Non-fatal: the board simply carries fewer than two upgrades.
    #[error("no free square to spawn an upgrade")]
    NoSpawnSpace,

    /// The game already has a winner; no further action writes accepted
    #[error("game is already decided")]
    GameOver,
}

impl EngineError {
    pub fn invalid_move(message: impl Into<String>) -> Self {
        EngineError::InvalidMove {
            message: message.into(),
        }
    }

    pub fn invalid_target(message: impl Into<String>) -> Self {
        EngineError::InvalidAbilityTarget {
            message: message.into(),
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
