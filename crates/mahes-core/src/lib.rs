//! Progression and scoring engine for Mahes.
//!
//! Everything here is synchronous and free of I/O apart from reading the
//! config file. Operations borrow a [`GameState`] and hand back a new one,
//! so a session layer can persist after each accepted mutation and drop
//! rejected ones without cleanup.
//!
//! # Modules
//!
//! - [`progression`] -- Answering, hints, fragments, region unlocking, next question
//! - [`ending`] -- Karma thresholds and the fragment-gating policy
//! - [`leaderboard`] -- Entry construction and ranking
//! - [`phase`] -- Screen-flow state machine
//! - [`level`] -- Player level derived from score
//! - [`config`] -- YAML configuration ([`GameConfig`])
//! - [`error`] -- Progression errors ([`ProgressionError`])
//!
//! [`GameState`]: mahes_types::GameState

pub mod config;
pub mod ending;
pub mod error;
pub mod leaderboard;
pub mod level;
pub mod phase;
pub mod progression;

pub use config::{ConfigError, GameConfig};
pub use ending::{EndingPolicy, calculate_ending};
pub use error::ProgressionError;
pub use level::LevelProgress;
