//! Error types for the mahes-core crate.
//!
//! Every rejected operation leaves the caller's [`GameState`] untouched:
//! engine operations take the state by reference and only hand back a new
//! one on success.
//!
//! [`GameState`]: mahes_types::GameState

use mahes_catalog::CatalogError;
use mahes_types::{GamePhase, OptionId, QuestionId, Region};

/// Errors that can occur during progression operations.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    /// The question was already answered. Re-submission is rejected so
    /// rewards are never awarded twice.
    #[error("question already completed: {0}")]
    AlreadyCompleted(QuestionId),

    /// A hint was requested with an empty hint balance.
    #[error("no hints left")]
    InsufficientHints,

    /// The option handed to the engine does not belong to the question.
    #[error("option {option} does not belong to question {question}")]
    OptionNotInQuestion {
        /// The question being answered.
        question: QuestionId,
        /// The foreign option id.
        option: OptionId,
    },

    /// The region has not been unlocked yet.
    #[error("region {0} is locked")]
    RegionLocked(Region),

    /// Setup was submitted without a player name.
    #[error("player name must not be empty")]
    EmptyPlayerName,

    /// The requested screen change is not part of the phase graph.
    #[error("invalid phase transition from {from} to {to}")]
    InvalidPhaseTransition {
        /// Current phase.
        from: GamePhase,
        /// Requested phase.
        to: GamePhase,
    },

    /// The ending was requested before every question was completed.
    #[error("game not complete: {completed} of {total} questions answered")]
    GameNotComplete {
        /// Questions completed so far.
        completed: usize,
        /// Questions in the catalog.
        total: usize,
    },

    /// A catalog lookup failed.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: CatalogError,
    },
}
