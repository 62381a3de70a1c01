//! Screen-flow state machine.
//!
//! The presentation layer moves between phases in this order:
//!
//! 1. **Landing** -- title screen; start a new game, continue a saved one
//!    (a finished save resumes on the ending screen), or view the leaderboard.
//! 2. **Setup** -- player name, avatar and difficulty.
//! 3. **Map** -- region selection.
//! 4. **Challenge** -- a question is on screen.
//! 5. **Feedback** -- the outcome of the last answer; continues to the map,
//!    or to the ending once every question is completed.
//! 6. **Ending** -- narrative ending; save to the leaderboard or restart.
//! 7. **Leaderboard** -- ranked runs.
//!
//! The phase is UI routing state. It is not part of [`GameState`] and is
//! never persisted.
//!
//! [`GameState`]: mahes_types::GameState

use mahes_types::GamePhase;

use crate::error::ProgressionError;

/// Whether the screen flow allows moving from `from` to `to`.
pub const fn can_transition(from: GamePhase, to: GamePhase) -> bool {
    use GamePhase::{Challenge, Ending, Feedback, Landing, Leaderboard, Map, Setup};

    matches!(
        (from, to),
        (Landing, Setup | Map | Ending | Leaderboard)
            | (Setup | Feedback, Map)
            | (Map, Challenge | Ending | Leaderboard)
            | (Challenge, Feedback | Map)
            | (Feedback, Ending)
            | (Ending, Leaderboard | Map | Setup)
            | (Leaderboard, Map | Landing)
    )
}

/// Move to `to` if the screen flow allows it.
///
/// # Errors
///
/// Returns [`ProgressionError::InvalidPhaseTransition`] otherwise.
pub fn transition(from: GamePhase, to: GamePhase) -> Result<GamePhase, ProgressionError> {
    if can_transition(from, to) {
        tracing::debug!(%from, %to, "Phase transition");
        Ok(to)
    } else {
        Err(ProgressionError::InvalidPhaseTransition { from, to })
    }
}
