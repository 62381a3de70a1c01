//! Migration of version 1 save snapshots.
//!
//! Version 1 snapshots embed the version and timestamp inside the state
//! object, use camelCase keys, number regions 1 to 3, and record fragments
//! as boolean slot arrays. Migration converts them to the current
//! [`GameState`]; the result then goes through [`crate::repair`] like any
//! other decoded state.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use mahes_types::{
    DifficultyTier, FRAGMENT_CAP, FragmentCounts, GameProgress, GameState, GameStats, Inventory,
    KARMA_MAX, Player, QuestionId, Region, Settings,
};

use crate::error::StoreError;
use crate::repair::repair;

/// Version string written by version 1 snapshots.
pub const LEGACY_VERSION: &str = "1.0.0";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyState {
    #[serde(default)]
    player: LegacyPlayer,
    progress: LegacyProgress,
    stats: LegacyStats,
    #[serde(default)]
    inventory: LegacyInventory,
    #[serde(default)]
    settings: Option<LegacySettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPlayer {
    #[serde(default)]
    name: String,
    #[serde(default)]
    avatar: String,
    #[serde(default)]
    difficulty: DifficultyTier,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyProgress {
    current_region: u8,
    #[serde(default)]
    completed_challenges: Vec<String>,
    #[serde(default)]
    unlocked_regions: Vec<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyStats {
    #[serde(default)]
    score: u32,
    karma: i64,
    #[serde(default)]
    start_time: i64,
    #[serde(default)]
    play_time: u64,
    #[serde(default)]
    hints_used: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyInventory {
    #[serde(default)]
    fragments: LegacyFragments,
    #[serde(default)]
    hints: u32,
    #[serde(default)]
    special_items: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyFragments {
    #[serde(default)]
    crown: Vec<bool>,
    #[serde(default)]
    sash: Vec<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySettings {
    #[serde(default)]
    music_volume: Option<u32>,
    #[serde(default)]
    sfx_volume: Option<u32>,
    #[serde(default)]
    accessibility: BTreeMap<String, serde_json::Value>,
}

/// Convert a version 1 snapshot to the current state model.
///
/// # Errors
///
/// Returns [`StoreError::CorruptSnapshot`] if required fields are missing
/// or the current region is not a known region number.
pub fn migrate(value: serde_json::Value) -> Result<GameState, StoreError> {
    let legacy: LegacyState =
        serde_json::from_value(value).map_err(|e| StoreError::CorruptSnapshot {
            reason: format!("legacy snapshot: {e}"),
        })?;

    let current_region = Region::from_number(legacy.progress.current_region).ok_or_else(|| {
        StoreError::CorruptSnapshot {
            reason: format!(
                "legacy snapshot: unknown region {}",
                legacy.progress.current_region
            ),
        }
    })?;

    let unlocked_regions: BTreeSet<Region> = legacy
        .progress
        .unlocked_regions
        .iter()
        .filter_map(|n| Region::from_number(*n))
        .collect();
    let completed_challenges: Vec<QuestionId> = legacy
        .progress
        .completed_challenges
        .into_iter()
        .map(QuestionId::from)
        .collect();

    let defaults = Settings::default();
    let settings = legacy.settings.map_or_else(Settings::default, |s| Settings {
        music_volume: s.music_volume.map_or(defaults.music_volume, clamp_volume),
        sfx_volume: s.sfx_volume.map_or(defaults.sfx_volume, clamp_volume),
        accessibility: s
            .accessibility
            .into_iter()
            .filter_map(|(key, value)| value.as_bool().map(|flag| (key, flag)))
            .collect(),
    });

    let mut state = GameState {
        player: Player {
            name: legacy.player.name,
            avatar: legacy.player.avatar,
            difficulty: legacy.player.difficulty,
        },
        progress: GameProgress {
            current_region,
            unlocked_regions,
            completed_challenges,
            ending: None,
            recorded_on_leaderboard: false,
        },
        stats: GameStats {
            score: legacy.stats.score,
            karma: clamp_legacy_karma(legacy.stats.karma),
            start_time: legacy.stats.start_time,
            play_time: legacy.stats.play_time,
            hints_used: legacy.stats.hints_used,
        },
        inventory: Inventory {
            fragments: FragmentCounts {
                crown: count_slots(&legacy.inventory.fragments.crown),
                sash: count_slots(&legacy.inventory.fragments.sash),
            },
            hints: legacy.inventory.hints,
            special_items: legacy.inventory.special_items,
        },
        settings,
    };

    let repairs = repair(&mut state);
    tracing::info!(
        completed = state.progress.completed_challenges.len(),
        repairs,
        "Migrated legacy snapshot"
    );
    Ok(state)
}

fn count_slots(slots: &[bool]) -> u8 {
    let collected = slots.iter().filter(|slot| **slot).count();
    u8::try_from(collected)
        .unwrap_or(FRAGMENT_CAP)
        .min(FRAGMENT_CAP)
}

fn clamp_legacy_karma(karma: i64) -> u8 {
    u8::try_from(karma.clamp(0, i64::from(KARMA_MAX))).unwrap_or(KARMA_MAX)
}

fn clamp_volume(volume: u32) -> u8 {
    u8::try_from(volume.min(100)).unwrap_or(100)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy_json() -> serde_json::Value {
        json!({
            "version": "1.0.0",
            "timestamp": "2024-03-01T10:00:00.000Z",
            "player": { "name": "Sari", "avatar": "mahes", "difficulty": "adventure" },
            "progress": {
                "currentRegion": 2,
                "completedChallenges": ["q001_moral", "q002_puzzle", "q001_moral"],
                "unlockedRegions": [1, 2]
            },
            "stats": {
                "score": 120,
                "karma": 135,
                "startTime": 1_700_000_000_000_i64,
                "playTime": 0,
                "hintsUsed": 2
            },
            "inventory": {
                "fragments": {
                    "crown": [true, false, true, true, true, true, true, true],
                    "sash": [false, true, false, false, false, false]
                },
                "hints": 1,
                "specialItems": ["blue_lantern"]
            },
            "settings": {
                "musicVolume": 40,
                "sfxVolume": 250,
                "accessibility": { "highContrast": true, "fontScale": 1.5 }
            }
        })
    }

    #[test]
    fn migrates_fields_and_repairs_invariants() {
        let state = migrate(legacy_json()).unwrap();

        assert_eq!(state.player.name, "Sari");
        assert_eq!(state.player.difficulty, DifficultyTier::Adventure);
        assert_eq!(state.progress.current_region, Region::HutanBiru);
        assert_eq!(
            state.progress.unlocked_regions.iter().copied().collect::<Vec<_>>(),
            vec![Region::PulauAwan, Region::HutanBiru]
        );
        assert_eq!(state.progress.completed_challenges.len(), 2);
        assert_eq!(state.stats.score, 120);
        assert_eq!(state.stats.karma, 100);
        assert_eq!(state.stats.hints_used, 2);
        assert_eq!(state.inventory.fragments.crown, FRAGMENT_CAP);
        assert_eq!(state.inventory.fragments.sash, 1);
        assert_eq!(state.inventory.special_items, vec![String::from("blue_lantern")]);
        assert_eq!(state.settings.music_volume, 40);
        assert_eq!(state.settings.sfx_volume, 100);
        assert_eq!(state.settings.accessibility.len(), 1);
        assert_eq!(state.settings.accessibility.get("highContrast"), Some(&true));
    }

    #[test]
    fn current_region_outside_unlocked_falls_back() {
        let mut value = legacy_json();
        value["progress"]["unlockedRegions"] = json!([]);
        value["progress"]["currentRegion"] = json!(3);
        let state = migrate(value).unwrap();
        assert_eq!(state.progress.current_region, Region::PulauAwan);
        assert_eq!(state.progress.unlocked_regions.len(), 1);
    }

    #[test]
    fn negative_karma_clamps_to_zero() {
        let mut value = legacy_json();
        value["stats"]["karma"] = json!(-12);
        assert_eq!(migrate(value).unwrap().stats.karma, 0);
    }

    #[test]
    fn unknown_region_is_corrupt() {
        let mut value = legacy_json();
        value["progress"]["currentRegion"] = json!(9);
        assert!(matches!(
            migrate(value),
            Err(StoreError::CorruptSnapshot { .. })
        ));
    }

    #[test]
    fn missing_stats_is_corrupt() {
        let mut value = legacy_json();
        value.as_object_mut().unwrap().remove("stats");
        assert!(matches!(
            migrate(value),
            Err(StoreError::CorruptSnapshot { .. })
        ));
    }
}
