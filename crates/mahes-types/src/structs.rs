//! Core entity structs: catalog questions, the mutable game state
//! aggregate, and leaderboard records.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DifficultyTier, EndingType, FragmentKind, ItemEffect, QuestionType, Region};
use crate::ids::{LeaderboardEntryId, OptionId, QuestionId};

/// Lowest possible karma.
pub const KARMA_MIN: u8 = 0;

/// Highest possible karma.
pub const KARMA_MAX: u8 = 100;

/// Karma every new player starts with (neutral).
pub const STARTING_KARMA: u8 = 50;

/// Number of fragments that completes one artifact set.
pub const FRAGMENT_CAP: u8 = 6;

// ---------------------------------------------------------------------------
// Catalog content
// ---------------------------------------------------------------------------

/// What choosing an option does to the game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OptionEffect {
    /// Points added to the score. Never negative.
    pub score: u32,
    /// Signed karma change, clamped into `[0, 100]` when applied.
    pub karma: i32,
    /// Item awarded, parsed from the catalog token at load time.
    pub item: ItemEffect,
    /// Text shown on the feedback screen.
    pub feedback: String,
}

/// One selectable answer of a [`Question`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuestionOption {
    /// Identifier, unique within the owning question.
    pub id: OptionId,
    /// Text displayed on the answer button.
    pub text: String,
    /// Whether this is the "correct" answer (informational for moral choices).
    pub is_correct: bool,
    /// Consequences of choosing this option.
    pub effect: OptionEffect,
}

/// An immutable catalog question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Question {
    /// Globally unique identifier.
    pub id: QuestionId,
    /// The single region this question belongs to.
    pub region: Region,
    /// Kind of challenge.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Free-form content category (e.g. "empathy", "logic").
    pub category: String,
    /// Authored difficulty, 1 (easy) to 5 (hard).
    pub difficulty: u8,
    /// Short heading.
    pub title: String,
    /// Optional narrative set-up shown before the prompt.
    pub scenario: Option<String>,
    /// The question itself.
    pub prompt: String,
    /// Answer options in display order.
    pub options: Vec<QuestionOption>,
    /// Hints in reveal order.
    pub hints: Vec<String>,
    /// Seconds allowed to answer.
    pub time_limit_secs: u32,
    /// Minimum karma for the question to be offered first, if any.
    pub required_karma: Option<u8>,
    /// Search tags.
    pub tags: Vec<String>,
}

impl Question {
    /// Look up an option of this question by id.
    pub fn option(&self, id: &OptionId) -> Option<&QuestionOption> {
        self.options.iter().find(|option| &option.id == id)
    }

    /// The hint at `index` in reveal order, if there is one.
    pub fn hint(&self, index: usize) -> Option<&str> {
        self.hints.get(index).map(String::as_str)
    }
}

/// Display metadata for a region on the world map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RegionInfo {
    /// Which region this describes.
    pub region: Region,
    /// Display title.
    pub title: String,
    /// One-line description.
    pub description: String,
}

// ---------------------------------------------------------------------------
// Game state aggregate
// ---------------------------------------------------------------------------

/// Player identity, fixed at setup until an explicit restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Player {
    /// Display name. Must be non-empty to leave setup.
    pub name: String,
    /// Avatar choice.
    pub avatar: String,
    /// Chosen difficulty tier.
    pub difficulty: DifficultyTier,
}

/// Map progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameProgress {
    /// The region the player is in. Always a member of `unlocked_regions`.
    pub current_region: Region,
    /// Regions open for play. Always contains region 1 and only grows.
    pub unlocked_regions: BTreeSet<Region>,
    /// Completed question ids in completion order. Append-only, no duplicates.
    pub completed_challenges: Vec<QuestionId>,
    /// Ending resolved for this run. Set once, when every question is done.
    #[serde(default)]
    pub ending: Option<EndingType>,
    /// Whether this run already has its leaderboard entry.
    #[serde(default)]
    pub recorded_on_leaderboard: bool,
}

impl GameProgress {
    /// Whether the question with this id has already been answered.
    pub fn is_completed(&self, id: &QuestionId) -> bool {
        self.completed_challenges.contains(id)
    }

    /// Whether the given region is open for play.
    pub fn is_unlocked(&self, region: Region) -> bool {
        self.unlocked_regions.contains(&region)
    }
}

impl Default for GameProgress {
    fn default() -> Self {
        Self {
            current_region: Region::FIRST,
            unlocked_regions: BTreeSet::from([Region::FIRST]),
            completed_challenges: Vec::new(),
            ending: None,
            recorded_on_leaderboard: false,
        }
    }
}

/// Running score and timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameStats {
    /// Cumulative score.
    pub score: u32,
    /// Morality score, always within `[0, 100]`.
    pub karma: u8,
    /// Epoch milliseconds at which setup completed.
    pub start_time: i64,
    /// Seconds from start to the ending; zero until the ending is reached.
    pub play_time: u64,
    /// Number of hints consumed. Only grows.
    pub hints_used: u32,
}

impl Default for GameStats {
    fn default() -> Self {
        Self {
            score: 0,
            karma: STARTING_KARMA,
            start_time: 0,
            play_time: 0,
            hints_used: 0,
        }
    }
}

/// Collected fragment counts, each within `[0, FRAGMENT_CAP]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FragmentCounts {
    /// Crown fragments collected.
    pub crown: u8,
    /// Sash fragments collected.
    pub sash: u8,
}

impl FragmentCounts {
    /// Count for one fragment kind.
    pub const fn get(self, kind: FragmentKind) -> u8 {
        match kind {
            FragmentKind::Crown => self.crown,
            FragmentKind::Sash => self.sash,
        }
    }

    /// Mutable access to the counter for one fragment kind.
    pub const fn get_mut(&mut self, kind: FragmentKind) -> &mut u8 {
        match kind {
            FragmentKind::Crown => &mut self.crown,
            FragmentKind::Sash => &mut self.sash,
        }
    }
}

/// Everything the player carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Inventory {
    /// Artifact fragments.
    pub fragments: FragmentCounts,
    /// Spendable hint balance.
    pub hints: u32,
    /// Keepsakes awarded by item tokens that are neither fragments nor hints.
    pub special_items: Vec<String>,
}

/// Audio and accessibility preferences. Opaque to game logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Settings {
    /// Music volume, 0-100.
    pub music_volume: u8,
    /// Sound effect volume, 0-100.
    pub sfx_volume: u8,
    /// Named accessibility toggles.
    pub accessibility: BTreeMap<String, bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 70,
            sfx_volume: 80,
            accessibility: BTreeMap::new(),
        }
    }
}

/// The single mutable aggregate per player.
///
/// Mutated exclusively through the progression engine; persisted after
/// every mutation during active play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// Who is playing.
    pub player: Player,
    /// Where they are on the map.
    pub progress: GameProgress,
    /// Score, karma, and timing.
    pub stats: GameStats,
    /// Fragments, hints, and keepsakes.
    pub inventory: Inventory,
    /// Pass-through preferences.
    pub settings: Settings,
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

/// One finished run on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LeaderboardEntry {
    /// Unique entry id.
    pub id: LeaderboardEntryId,
    /// Player name at the time of the run.
    pub name: String,
    /// Final score.
    pub score: u32,
    /// Final karma.
    pub karma: u8,
    /// Elapsed play time in seconds.
    pub time_secs: u64,
    /// When the run was recorded.
    pub date: DateTime<Utc>,
    /// Ending reached.
    pub ending: EndingType,
}
