//! Leaderboard slot persistence.
//!
//! The slot holds a JSON array of entries. Ordering and retention are
//! decided by the caller; this store only reads and writes the list.

use mahes_types::LeaderboardEntry;

use crate::error::StoreError;
use crate::kv::{KeyValueStore, LEADERBOARD_KEY};

/// Operations on the `mahes_leaderboard` slot.
pub struct LeaderboardStore<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> LeaderboardStore<'a, S> {
    /// Create a leaderboard store bound to a backend.
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All stored entries, in stored order. An unreadable slot is logged and
    /// treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend read fails.
    pub fn load_entries(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let Some(raw) = self.store.get(LEADERBOARD_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable leaderboard");
                Ok(Vec::new())
            }
        }
    }

    /// Replace the stored entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    pub fn save_entries(&self, entries: &[LeaderboardEntry]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entries)?;
        self.store.put(LEADERBOARD_KEY, &raw)?;
        tracing::debug!(entries = entries.len(), "Leaderboard saved");
        Ok(())
    }
}
