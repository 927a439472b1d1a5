//! In-memory room registry with versioned replace
//!
//! Stand-in for the remote store collaborator: point read, full-document
//! replace guarded by an optimistic-concurrency token, and best-effort
//! change notification over channels. Color slots implement the lobby's
//! first-claim-wins assignment.

use std::collections::HashMap;

use crossbeam_channel::{unbounded, Receiver, Sender};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::Side;

use super::document::RoomDocument;

/// Room codes are 5 uppercase alphanumeric characters
pub const ROOM_CODE_LEN: usize = 5;

const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Errors from the store surface
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("room {code} not found")]
    RoomNotFound { code: String },

    /// The caller raced another writer and must retry against the latest
    /// document rather than silently overwriting it
    #[error("stale write: expected version {expected}, store has {actual}")]
    StaleVersion { expected: u64, actual: u64 },
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Generate a client-side room code
///
/// Not guaranteed globally unique; on an insert collision the last writer
/// wins, which is acceptable at this scope.
pub fn generate_room_code(rng: &mut impl Rng) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Lobby color assignment, first claim wins, each slot claimed once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorSlots {
    pub white_taken: bool,
    pub black_taken: bool,
}

impl ColorSlots {
    /// Claim a color slot; returns false when it is already taken
    pub fn claim(&mut self, side: Side) -> bool {
        let slot = match side {
            Side::White => &mut self.white_taken,
            Side::Black => &mut self.black_taken,
        };
        if *slot {
            false
        } else {
            *slot = true;
            true
        }
    }

    pub fn is_taken(&self, side: Side) -> bool {
        match side {
            Side::White => self.white_taken,
            Side::Black => self.black_taken,
        }
    }
}

struct Room {
    doc: RoomDocument,
    slots: ColorSlots,
    watchers: Vec<Sender<RoomDocument>>,
}

/// Registry of all active rooms
#[derive(Default)]
pub struct RoomStore {
    rooms: HashMap<String, Room>,
}

impl RoomStore {
    pub fn new() -> Self {
        RoomStore::default()
    }

    /// Insert a room document, replacing any colliding code (last writer
    /// wins on insert)
    pub fn create(&mut self, code: impl Into<String>, doc: RoomDocument) {
        let code = code.into();
        info!("[STORE] room {code} created");
        self.rooms.insert(
            code,
            Room {
                doc,
                slots: ColorSlots::default(),
                watchers: Vec::new(),
            },
        );
    }

    /// Point read of one room's document
    pub fn read(&self, code: &str) -> Option<&RoomDocument> {
        self.rooms.get(code).map(|room| &room.doc)
    }

    /// Full-document replace guarded by the concurrency token
    ///
    /// `expected_version` is the version of the document the writer based
    /// its update on; a mismatch means another client committed first and
    /// the write must be retried against the latest state.
    pub fn replace(
        &mut self,
        code: &str,
        doc: RoomDocument,
        expected_version: u64,
    ) -> StoreResult<()> {
        let room = self.rooms.get_mut(code).ok_or_else(|| StoreError::RoomNotFound {
            code: code.to_string(),
        })?;
        if room.doc.version != expected_version {
            return Err(StoreError::StaleVersion {
                expected: expected_version,
                actual: room.doc.version,
            });
        }

        room.doc = doc;
        // Best-effort broadcast; dead subscribers are dropped
        room.watchers
            .retain(|watcher| watcher.send(room.doc.clone()).is_ok());
        debug!(
            "[STORE] room {code} replaced at version {}",
            room.doc.version
        );
        Ok(())
    }

    /// Subscribe to change notifications for one room
    pub fn subscribe(&mut self, code: &str) -> StoreResult<Receiver<RoomDocument>> {
        let room = self.rooms.get_mut(code).ok_or_else(|| StoreError::RoomNotFound {
            code: code.to_string(),
        })?;
        let (tx, rx) = unbounded();
        room.watchers.push(tx);
        Ok(rx)
    }

    /// Claim a color slot in a room; first claim wins
    pub fn claim_color(&mut self, code: &str, side: Side) -> StoreResult<bool> {
        let room = self.rooms.get_mut(code).ok_or_else(|| StoreError::RoomNotFound {
            code: code.to_string(),
        })?;
        Ok(room.slots.claim(side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::clock::TimeControl;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_room_code_format() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let code = generate_room_code(&mut rng);
            assert_eq!(code.len(), ROOM_CODE_LEN);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_color_slots_first_claim_wins() {
        let mut slots = ColorSlots::default();
        assert!(slots.claim(Side::White));
        assert!(!slots.claim(Side::White), "second claim must lose");
        assert!(slots.claim(Side::Black));
        assert!(slots.is_taken(Side::White));
        assert!(slots.is_taken(Side::Black));
    }

    #[test]
    fn test_replace_rejects_stale_version() {
        let mut store = RoomStore::new();
        store.create("AB12C", RoomDocument::initial(TimeControl::default()));

        let mut first = store.read("AB12C").unwrap().clone();
        first.version = 1;
        store.replace("AB12C", first, 0).unwrap();

        // A second writer still holding version 0 must be rejected
        let mut racer = RoomDocument::initial(TimeControl::default());
        racer.version = 1;
        let err = store.replace("AB12C", racer, 0).unwrap_err();
        assert!(matches!(
            err,
            StoreError::StaleVersion {
                expected: 0,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_subscribers_see_replacements() {
        let mut store = RoomStore::new();
        store.create("ZZ999", RoomDocument::initial(TimeControl::default()));
        let rx = store.subscribe("ZZ999").unwrap();

        let mut doc = store.read("ZZ999").unwrap().clone();
        doc.version = 1;
        store.replace("ZZ999", doc, 0).unwrap();

        let seen = rx.try_recv().expect("subscriber notified");
        assert_eq!(seen.version, 1);
    }

    #[test]
    fn test_missing_room_errors() {
        let mut store = RoomStore::new();
        assert!(store.read("XXXXX").is_none());
        let err = store
            .replace("XXXXX", RoomDocument::initial(TimeControl::default()), 0)
            .unwrap_err();
        assert!(matches!(err, StoreError::RoomNotFound { .. }));
    }
}
