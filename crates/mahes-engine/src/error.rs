//! Error types for the game session.
//!
//! [`SessionError`] wraps every subsystem error an intent can hit, plus the
//! rejections that only make sense at the session level. A rejected intent
//! leaves the session exactly as it was.

use mahes_catalog::CatalogError;
use mahes_core::ProgressionError;
use mahes_store::StoreError;
use mahes_types::QuestionId;

/// Errors returned by [`crate::GameSession::dispatch`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A progression rule rejected the intent.
    #[error("progression error: {source}")]
    Progression {
        /// The underlying progression error.
        #[from]
        source: ProgressionError,
    },

    /// The intent named a question or option missing from the catalog.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: CatalogError,
    },

    /// Persisting or loading failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// An answer or hint arrived while no question is on screen, or for a
    /// question other than the one on screen.
    #[error("no active challenge for this intent")]
    NoActiveChallenge,

    /// `continue` arrived while no answer feedback is on screen.
    #[error("no feedback pending")]
    NoFeedbackPending,

    /// Every hint of the current question has already been revealed.
    #[error("no more hints for question {0}")]
    NoMoreHints(QuestionId),

    /// This run has already been recorded on the leaderboard.
    #[error("run already saved to the leaderboard")]
    AlreadyOnLeaderboard,
}

impl SessionError {
    /// Whether this rejection is the idempotency guard firing on a repeated
    /// answer. Callers treat it as a no-op rather than a user-facing error.
    pub const fn is_duplicate_answer(&self) -> bool {
        matches!(
            self,
            Self::Progression {
                source: ProgressionError::AlreadyCompleted(_)
            }
        )
    }
}
