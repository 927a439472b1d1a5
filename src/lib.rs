//! Mystery Chess - a real-time two-player chess variant engine
//!
//! Layers randomized mystery pickups, temporary piece modifiers, timed
//! walls and a Fischer chess clock on top of standard chess rules. The
//! crate is the trusted evaluator for one game room: every player action
//! goes through [`game::resolve`], which returns the new canonical
//! [`game::GameState`] or rejects the action without mutation.
//!
//! Orthodox move legality is delegated to an external rules engine behind
//! [`board::BoardAdapter`]. Rendering, lobby flow, transport and durable
//! persistence are external collaborators; [`store`] carries the document
//! shape and an in-memory stand-in for them.

pub mod board;
pub mod core;
pub mod game;
pub mod store;

pub use crate::core::{EngineError, EngineResult, Side, Square, Upgrade, UpgradeKind};
pub use game::{resolve, Action, GameState, TimeControl};
