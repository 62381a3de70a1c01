//! Game session facade for the Mahes progression engine.
//!
//! The presentation layer constructs one [`GameSession`] per player with an
//! injected storage backend and forwards every user action as an
//! [`Intent`]. Each dispatch returns an [`Outcome`] carrying the resulting
//! phase and an explicit [`SessionEvent`] (feedback text, revealed hint,
//! resolved ending, leaderboard snapshot) instead of broadcasting events.
//!
//! # Modules
//!
//! - [`session`] -- [`GameSession`]: intent dispatch, persistence, phase tracking
//! - [`intent`] -- Intents, events, and answer feedback
//! - [`script`] -- YAML intent scripts for deterministic replay
//! - [`error`] -- Session errors ([`SessionError`])

pub mod error;
pub mod intent;
pub mod script;
pub mod session;

pub use error::SessionError;
pub use intent::{AnswerFeedback, Intent, Outcome, SessionEvent};
pub use script::{ReplayReport, Script, ScriptError};
pub use session::GameSession;
