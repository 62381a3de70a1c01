//! Invariant repair for decoded game states.
//!
//! Snapshots are external input. Whatever the version, a decoded state is
//! brought back within the game state invariants before it reaches the
//! engine:
//! - karma is clamped to `[0, 100]`
//! - fragment counters are capped at [`FRAGMENT_CAP`]
//! - duplicate completions are dropped, keeping the first occurrence
//! - region 1 is unlocked, and a current region that is not unlocked falls
//!   back to the highest unlocked one
//! - volumes are clamped to 100
//! - a run cannot be on the leaderboard before it has an ending

use std::collections::BTreeSet;

use mahes_types::{FRAGMENT_CAP, GameState, KARMA_MAX, Region};

/// Highest volume setting.
const MAX_VOLUME: u8 = 100;

/// Repair `state` in place. Returns how many fields were changed.
pub fn repair(state: &mut GameState) -> usize {
    let mut fixes = 0_usize;
    let mut fix = |changed: bool| {
        if changed {
            fixes = fixes.saturating_add(1);
        }
    };

    fix(cap(&mut state.stats.karma, KARMA_MAX));
    fix(cap(&mut state.inventory.fragments.crown, FRAGMENT_CAP));
    fix(cap(&mut state.inventory.fragments.sash, FRAGMENT_CAP));
    fix(cap(&mut state.settings.music_volume, MAX_VOLUME));
    fix(cap(&mut state.settings.sfx_volume, MAX_VOLUME));

    let progress = &mut state.progress;
    let before = progress.completed_challenges.len();
    let mut seen = BTreeSet::new();
    progress
        .completed_challenges
        .retain(|id| seen.insert(id.clone()));
    fix(progress.completed_challenges.len() != before);

    fix(progress.unlocked_regions.insert(Region::FIRST));
    if !progress.unlocked_regions.contains(&progress.current_region) {
        progress.current_region = progress
            .unlocked_regions
            .last()
            .copied()
            .unwrap_or(Region::FIRST);
        fix(true);
    }

    if progress.recorded_on_leaderboard && progress.ending.is_none() {
        progress.recorded_on_leaderboard = false;
        fix(true);
    }

    fixes
}

fn cap(value: &mut u8, max: u8) -> bool {
    if *value > max {
        *value = max;
        true
    } else {
        false
    }
}
