//! Shared vocabulary for the variant engine
//!
//! Everything the rest of the crate agrees on lives here: board
//! coordinates, side-to-move, upgrade kinds, piece values and the error
//! taxonomy. The module is deliberately free of chess-rules and I/O
//! dependencies so the types stay portable between the engine, the store
//! surface and tests.

pub mod error;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use types::{File, PieceKind, Rank, Side, Square, Upgrade, UpgradeKind};
