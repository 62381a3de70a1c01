//! Leaderboard entry construction and ranking.
//!
//! Ranking is score descending, then play time ascending, then date
//! ascending, so the earlier of two otherwise equal runs places first.

use core::cmp::Ordering;

use chrono::{DateTime, Utc};
use mahes_types::{EndingType, GameState, LeaderboardEntry, LeaderboardEntryId};

/// Build the leaderboard record for a finished run.
pub fn new_entry(state: &GameState, ending: EndingType, now: DateTime<Utc>) -> LeaderboardEntry {
    LeaderboardEntry {
        id: LeaderboardEntryId::new(),
        name: state.player.name.clone(),
        score: state.stats.score,
        karma: state.stats.karma,
        time_secs: state.stats.play_time,
        date: now,
        ending,
    }
}

/// Total order used to rank entries.
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.time_secs.cmp(&b.time_secs))
        .then_with(|| a.date.cmp(&b.date))
}

/// Sort entries into rank order in place. Stable for full ties.
pub fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(compare_entries);
}

/// Append `entry`, re-rank, and keep at most `max_entries` when capped.
///
/// Returns the 1-based rank of the new entry, or `None` if it fell off a
/// capped board.
pub fn insert_ranked(
    entries: &mut Vec<LeaderboardEntry>,
    entry: LeaderboardEntry,
    max_entries: Option<usize>,
) -> Option<usize> {
    let id = entry.id;
    entries.push(entry);
    rank(entries);
    if let Some(cap) = max_entries {
        entries.truncate(cap);
    }
    entries
        .iter()
        .position(|e| e.id == id)
        .map(|index| index.saturating_add(1))
}
