//! Player level derived from score.
//!
//! Levels are HUD data only. They are recomputed from the score on demand
//! and never stored in the game state.

use serde::Serialize;

/// Score needed per level.
pub const XP_PER_LEVEL: u32 = 100;

/// Level and progress towards the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    /// Current level, starting at 1.
    pub level: u32,
    /// Score accumulated inside the current level.
    pub xp_into_level: u32,
    /// Score still needed to reach the next level.
    pub xp_to_next_level: u32,
}

impl LevelProgress {
    /// Derive level progress from a score.
    pub const fn from_score(score: u32) -> Self {
        Self {
            level: level_for_score(score),
            xp_into_level: xp_into_level(score),
            xp_to_next_level: xp_to_next_level(score),
        }
    }
}

/// `score / 100 + 1`.
pub const fn level_for_score(score: u32) -> u32 {
    match score.checked_div(XP_PER_LEVEL) {
        Some(completed) => completed.saturating_add(1),
        None => 1,
    }
}

/// Score earned since the last level boundary.
pub const fn xp_into_level(score: u32) -> u32 {
    match score.checked_rem(XP_PER_LEVEL) {
        Some(rem) => rem,
        None => 0,
    }
}

/// Score missing before the next level boundary.
pub const fn xp_to_next_level(score: u32) -> u32 {
    XP_PER_LEVEL.saturating_sub(xp_into_level(score))
}
