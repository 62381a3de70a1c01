//! Save-slot persistence for the in-progress game.
//!
//! Loading is lenient: a snapshot that cannot be decoded is logged and
//! reported as "no save found" so the player starts fresh instead of being
//! stuck on a broken save. Backend failures still propagate.

use chrono::{DateTime, Utc};
use mahes_types::GameState;

use crate::error::StoreError;
use crate::kv::{GAME_STATE_KEY, KeyValueStore};
use crate::snapshot;

/// Operations on the `mahes_game_state` slot.
pub struct SaveStore<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> SaveStore<'a, S> {
    /// Create a save store bound to a backend.
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Persist `state` as the current save.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    pub fn save_game(&self, state: &GameState, now: DateTime<Utc>) -> Result<(), StoreError> {
        let raw = snapshot::encode(state, now)?;
        self.store.put(GAME_STATE_KEY, &raw)?;
        tracing::debug!(
            completed = state.progress.completed_challenges.len(),
            score = state.stats.score,
            "Game saved"
        );
        Ok(())
    }

    /// Load the current save, if there is a usable one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only if the backend read fails. A corrupt or
    /// unsupported snapshot yields `Ok(None)`.
    pub fn load_game(&self) -> Result<Option<GameState>, StoreError> {
        let Some(raw) = self.store.get(GAME_STATE_KEY)? else {
            return Ok(None);
        };
        match snapshot::decode(&raw) {
            Ok(state) => {
                tracing::debug!(
                    completed = state.progress.completed_challenges.len(),
                    "Game loaded"
                );
                Ok(Some(state))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable save");
                Ok(None)
            }
        }
    }

    /// Delete the current save.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend delete fails.
    pub fn clear_game(&self) -> Result<(), StoreError> {
        self.store.remove(GAME_STATE_KEY)
    }
}
