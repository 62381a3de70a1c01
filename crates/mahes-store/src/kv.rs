//! The string key-value seam between the engine and its storage backend.
//!
//! The engine only ever needs two slots:
//!
//! | Key | Content |
//! |-----|---------|
//! | `mahes_game_state` | JSON save snapshot envelope |
//! | `mahes_leaderboard` | JSON array of leaderboard entries |
//!
//! Backends implement get/put/remove on raw strings; typed JSON access is
//! layered on top by the provided methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Slot holding the in-progress game snapshot.
pub const GAME_STATE_KEY: &str = "mahes_game_state";

/// Slot holding the leaderboard.
pub const LEADERBOARD_KEY: &str = "mahes_leaderboard";

/// A synchronous string key-value store.
pub trait KeyValueStore {
    /// Read the value at `key`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Serialize `value` as JSON and store it at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if serialization fails, or the
    /// backend's error if the write fails.
    fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.put(key, &json)
    }

    /// Read the value at `key` and deserialize it from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if deserialization fails, or
    /// the backend's error if the read fails.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>
    where
        Self: Sized,
    {
        self.get(key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(StoreError::from)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Reject keys that are empty or could escape a directory when used as a
/// file name. Only ASCII alphanumerics, `_` and `-` are allowed.
///
/// # Errors
///
/// Returns [`StoreError::InvalidKey`] for anything else.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_keys_are_valid() {
        assert!(validate_key(GAME_STATE_KEY).is_ok());
        assert!(validate_key(LEADERBOARD_KEY).is_ok());
    }

    #[test]
    fn path_like_keys_are_rejected() {
        for key in ["", "../etc", "a/b", "slot.json", "spaced key"] {
            assert!(
                matches!(validate_key(key), Err(StoreError::InvalidKey(_))),
                "{key:?}"
            );
        }
    }
}
