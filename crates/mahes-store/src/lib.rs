//! Persistence layer for Mahes: save snapshots and the leaderboard.
//!
//! The engine talks to storage through the [`KeyValueStore`] trait, a
//! synchronous string key-value seam with two slots. Typed stores sit on
//! top of it and own the JSON formats.
//!
//! ```text
//! GameSession
//!     |
//!     +-- SaveStore         (mahes_game_state, versioned snapshot)
//!     +-- LeaderboardStore  (mahes_leaderboard, entry array)
//!             |
//!             v
//!       KeyValueStore
//!         |-- MemoryStore   (tests, ephemeral sessions)
//!         +-- FileStore     (one JSON file per slot, atomic replace)
//! ```
//!
//! # Modules
//!
//! - [`kv`] -- The [`KeyValueStore`] trait and slot keys
//! - [`memory`] -- In-memory backend
//! - [`file`] -- File-backed backend
//! - [`snapshot`] -- Versioned snapshot envelope codec
//! - [`legacy`] -- Version 1 snapshot migration
//! - [`repair`] -- Invariant repair for decoded states
//! - [`save_store`] -- Save-slot operations
//! - [`leaderboard_store`] -- Leaderboard slot operations
//! - [`error`] -- Shared error types

pub mod error;
pub mod file;
pub mod kv;
pub mod leaderboard_store;
pub mod legacy;
pub mod memory;
pub mod repair;
pub mod save_store;
pub mod snapshot;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use file::FileStore;
pub use kv::{GAME_STATE_KEY, KeyValueStore, LEADERBOARD_KEY};
pub use leaderboard_store::LeaderboardStore;
pub use memory::MemoryStore;
pub use save_store::SaveStore;
pub use snapshot::{SNAPSHOT_VERSION, Snapshot};
