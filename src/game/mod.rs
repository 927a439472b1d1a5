//! Variant game engine - the deterministic rule state machine
//!
//! Given a canonical [`state::GameState`] and a player [`state::Action`],
//! [`resolver::resolve`] validates the action, applies standard or
//! modifier-specific effects, mutates the turn and clock, runs the upgrade
//! spawner, and emits a new canonical state plus a human-readable log
//! entry. A failed action returns an error and leaves the input state
//! untouched.
//!
//! # Module Organization
//!
//! - `state` - the `GameState` aggregate and the `Action` request type
//! - `resolver` - composition root: clock wrap, move pipeline, bookkeeping
//! - `abilities` - fired ability executors (swap, sniper, builder)
//! - `ghost` - ghost-move geometry
//! - `mode` - the pending-ability input state machine
//! - `modifiers` - square-keyed ability registry and transfer rules
//! - `spawner` - upgrade relocation and material-aware placement
//! - `walls` - timed wall obstacles
//! - `clock` - Fischer clock and timeout detection
//! - `history` - append-only turn log for replay scrubbing

pub mod abilities;
pub mod clock;
pub mod ghost;
pub mod history;
pub mod mode;
pub mod modifiers;
pub mod resolver;
pub mod spawner;
pub mod state;
pub mod walls;

pub use clock::{Clock, TimeControl};
pub use history::{History, HistoryEntry};
pub use mode::InteractionMode;
pub use modifiers::{Modifier, ModifierMap};
pub use resolver::resolve;
pub use state::{Action, GameState};
pub use walls::WallGrid;
