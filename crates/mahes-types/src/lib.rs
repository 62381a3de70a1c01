//! Shared type definitions for the Mahes progression engine.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the presentation layer, which renders whatever state the
//! engine returns.
//!
//! # Modules
//!
//! - [`ids`] -- Typed identifiers for questions, options, and leaderboard entries
//! - [`enums`] -- Regions, question kinds, endings, fragments, item effects, phases
//! - [`structs`] -- Catalog questions, the `GameState` aggregate, leaderboard entries

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    DifficultyTier, EndingType, FragmentKind, GamePhase, ItemEffect, QuestionType, Region,
};
pub use ids::{LeaderboardEntryId, OptionId, QuestionId};
pub use structs::{
    FRAGMENT_CAP, FragmentCounts, GameProgress, GameState, GameStats, Inventory, KARMA_MAX,
    KARMA_MIN, LeaderboardEntry, OptionEffect, Player, Question, QuestionOption, RegionInfo,
    STARTING_KARMA, Settings,
};
