//! Versioned save snapshot codec.
//!
//! A snapshot is a JSON envelope around the game state:
//!
//! ```json
//! { "version": 2, "saved_at": "2024-05-01T08:30:00Z", "state": { ... } }
//! ```
//!
//! The envelope keeps the version and timestamp out of [`GameState`], so
//! decoding an encoded state yields exactly the state that was saved.
//! Version 1 snapshots (a bare state object with `"version": "1.0.0"`)
//! are migrated by [`crate::legacy`]. Decoded states of every version are
//! passed through [`crate::repair`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mahes_types::GameState;

use crate::error::StoreError;
use crate::legacy::{self, LEGACY_VERSION};
use crate::repair::repair;

/// Version written by [`encode`].
pub const SNAPSHOT_VERSION: u32 = 2;

/// The on-disk snapshot envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version, [`SNAPSHOT_VERSION`] for snapshots written now.
    pub version: u32,
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
    /// The saved game.
    pub state: GameState,
}

/// Serialize `state` into a current-version snapshot.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if serialization fails.
pub fn encode(state: &GameState, saved_at: DateTime<Utc>) -> Result<String, StoreError> {
    #[derive(Serialize)]
    struct Envelope<'a> {
        version: u32,
        saved_at: DateTime<Utc>,
        state: &'a GameState,
    }

    Ok(serde_json::to_string(&Envelope {
        version: SNAPSHOT_VERSION,
        saved_at,
        state,
    })?)
}

/// Parse a snapshot of any supported version.
///
/// # Errors
///
/// Returns [`StoreError::CorruptSnapshot`] if the text is not JSON, the
/// version is missing or unknown, or the payload does not match the
/// version's schema.
pub fn decode(raw: &str) -> Result<GameState, StoreError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| StoreError::CorruptSnapshot {
            reason: format!("not JSON: {e}"),
        })?;

    match value.get("version") {
        Some(serde_json::Value::Number(n)) if n.as_u64() == Some(u64::from(SNAPSHOT_VERSION)) => {
            let snapshot: Snapshot =
                serde_json::from_value(value).map_err(|e| StoreError::CorruptSnapshot {
                    reason: format!("version {SNAPSHOT_VERSION} snapshot: {e}"),
                })?;
            let mut state = snapshot.state;
            let repairs = repair(&mut state);
            if repairs > 0 {
                tracing::warn!(repairs, "Repaired snapshot fields outside their valid range");
            }
            Ok(state)
        }
        Some(serde_json::Value::String(v)) if v == LEGACY_VERSION => legacy::migrate(value),
        Some(other) => Err(StoreError::CorruptSnapshot {
            reason: format!("unsupported version {other}"),
        }),
        None => Err(StoreError::CorruptSnapshot {
            reason: String::from("missing version"),
        }),
    }
}
