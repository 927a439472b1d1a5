//! Chess clock with Fischer increment support
//!
//! Manages time control using the Fischer (incremental) system: each
//! player starts with a base time and receives an increment after a turn
//! that actually passes to the opponent.
//!
//! # Authority
//!
//! A side's remaining time is authoritative only at `last_move_time`;
//! between turns it is derived by subtracting wall-clock elapsed time.
//! Display countdown ticks are a local interpolation and are never the
//! basis for committing a timeout - only an actual action attempt checks
//! remaining time against zero.

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, EngineResult, Side};

/// Seconds granted to the mover by a time-boost pickup
pub const TIME_ADD_BONUS_SECS: f64 = 30.0;

/// Seconds drained from the opponent by a time-drain pickup
pub const TIME_SUB_PENALTY_SECS: f64 = 15.0;

/// Immutable time control configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeControl {
    /// Base time per player in seconds
    pub base: f64,
    /// Seconds added after each completed turn
    pub increment: f64,
}

impl Default for TimeControl {
    fn default() -> Self {
        // 10+0, matching the usual online default
        TimeControl {
            base: 600.0,
            increment: 0.0,
        }
    }
}

/// Live clock state for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    pub config: TimeControl,
    /// White's remaining time in seconds, as of `last_move_time`
    pub white_left: f64,
    /// Black's remaining time in seconds, as of `last_move_time`
    pub black_left: f64,
    /// Epoch milliseconds of the last state-producing action; `None`
    /// until the first action of the game
    pub last_move_time: Option<i64>,
}

impl Clock {
    pub fn new(config: TimeControl) -> Self {
        Clock {
            white_left: config.base,
            black_left: config.base,
            config,
            last_move_time: None,
        }
    }

    pub fn remaining(&self, side: Side) -> f64 {
        match side {
            Side::White => self.white_left,
            Side::Black => self.black_left,
        }
    }

    fn remaining_mut(&mut self, side: Side) -> &mut f64 {
        match side {
            Side::White => &mut self.white_left,
            Side::Black => &mut self.black_left,
        }
    }

    /// Charge wall-clock elapsed time to the acting side
    ///
    /// Rejects with `OutOfTime` when the acting side's remaining time is
    /// already exhausted; otherwise subtracts the elapsed seconds since
    /// `last_move_time`, floored at zero. Does not stamp the clock - the
    /// resolver stamps only once the action is accepted.
    pub fn charge(&mut self, side: Side, now_ms: i64) -> EngineResult<()> {
        if self.remaining(side) <= 0.0 {
            return Err(EngineError::OutOfTime { side });
        }
        if let Some(last) = self.last_move_time {
            let elapsed = (now_ms.saturating_sub(last)).max(0) as f64 / 1000.0;
            let left = self.remaining_mut(side);
            *left = (*left - elapsed).max(0.0);
        }
        Ok(())
    }

    /// Record the resolution instant of a state-producing action
    pub fn stamp(&mut self, now_ms: i64) {
        self.last_move_time = Some(now_ms);
    }

    /// Apply the Fischer increment to the player whose turn just passed
    pub fn apply_increment(&mut self, side: Side) {
        if self.config.increment > 0.0 {
            *self.remaining_mut(side) += self.config.increment;
        }
    }

    /// Time-boost pickup effect on the mover's clock
    pub fn add_bonus(&mut self, side: Side) {
        *self.remaining_mut(side) += TIME_ADD_BONUS_SECS;
    }

    /// Time-drain pickup effect on the opponent's clock, floored at zero
    pub fn drain(&mut self, side: Side) {
        let left = self.remaining_mut(side);
        *left = (*left - TIME_SUB_PENALTY_SECS).max(0.0);
    }

    /// Remaining time a side would have if its clock were charged now
    ///
    /// Derived, not persisted; used by external pollers to surface a
    /// timeout loss without writing state.
    pub fn projected_remaining(&self, side: Side, now_ms: i64) -> f64 {
        let elapsed = match self.last_move_time {
            Some(last) => (now_ms.saturating_sub(last)).max(0) as f64 / 1000.0,
            None => 0.0,
        };
        (self.remaining(side) - elapsed).max(0.0)
    }
}
