//! External store surface
//!
//! The surrounding system keeps one JSON document per room in a remote
//! store with point read, full-document replace and change notification.
//! This module owns the document shape (byte-compatible with that blob),
//! the room-code and color-slot conventions of the lobby, and an
//! in-memory [`rooms::RoomStore`] that embedding hosts and tests use as a
//! stand-in for the remote collaborator.

pub mod document;
pub mod rooms;

pub use document::{RoomDocument, TimeLeft};
pub use rooms::{generate_room_code, ColorSlots, RoomStore, StoreError, StoreResult, ROOM_CODE_LEN};
