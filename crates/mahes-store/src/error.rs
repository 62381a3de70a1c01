//! Error types for the persistence layer.
//!
//! All errors are propagated via [`StoreError`], which wraps the underlying
//! I/O and [`serde_json`] errors. A snapshot that parses but cannot be
//! understood is reported as [`StoreError::CorruptSnapshot`] so callers can
//! treat it as "no save found".

/// Errors that can occur in the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored snapshot is unreadable or has an unknown version.
    #[error("Corrupt snapshot: {reason}")]
    CorruptSnapshot {
        /// What could not be understood.
        reason: String,
    },

    /// A slot key contains characters that are not safe as a file name.
    #[error("Invalid slot key: {0}")]
    InvalidKey(String),
}
