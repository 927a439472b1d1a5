//! Board Adapter - wraps the external chess-rules engine
//!
//! Owns the canonical FEN-derived position and turn token. All other
//! modules speak [`crate::core::Square`] / [`crate::core::Side`] /
//! [`crate::core::PieceKind`]; this is the only module allowed to name
//! shakmaty types.

pub mod adapter;

pub use adapter::{BoardAdapter, MoveOutcome, START_FEN};
