//! Ending resolution.
//!
//! The canonical rule is threshold-only: karma alone decides the ending.
//! [`EndingPolicy::require_all_fragments_for_good`] is the extension point
//! for fragment gating; it defaults to off, leaving the threshold rule intact.

use serde::Deserialize;

use mahes_types::{EndingType, GameState};

use crate::progression::has_all_fragments;

/// Karma at or above which the good ending is reached.
pub const GOOD_KARMA_THRESHOLD: u8 = 70;

/// Karma at or above which the neutral ending is reached.
pub const NEUTRAL_KARMA_THRESHOLD: u8 = 40;

/// Thresholds and gating that map final karma to an ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EndingPolicy {
    /// Minimum karma for [`EndingType::Good`].
    #[serde(default = "default_good_threshold")]
    pub good_threshold: u8,

    /// Minimum karma for [`EndingType::Neutral`].
    #[serde(default = "default_neutral_threshold")]
    pub neutral_threshold: u8,

    /// When set, a good-karma run without both complete fragment sets is
    /// demoted to [`EndingType::Neutral`].
    #[serde(default)]
    pub require_all_fragments_for_good: bool,
}

impl Default for EndingPolicy {
    fn default() -> Self {
        Self {
            good_threshold: default_good_threshold(),
            neutral_threshold: default_neutral_threshold(),
            require_all_fragments_for_good: false,
        }
    }
}

const fn default_good_threshold() -> u8 {
    GOOD_KARMA_THRESHOLD
}

const fn default_neutral_threshold() -> u8 {
    NEUTRAL_KARMA_THRESHOLD
}

impl EndingPolicy {
    /// Map final karma and fragment completeness to an ending.
    pub const fn resolve(self, karma: u8, has_all_fragments: bool) -> EndingType {
        if karma >= self.good_threshold {
            if self.require_all_fragments_for_good && !has_all_fragments {
                EndingType::Neutral
            } else {
                EndingType::Good
            }
        } else if karma >= self.neutral_threshold {
            EndingType::Neutral
        } else {
            EndingType::Bad
        }
    }

    /// Resolve the ending for a finished game state.
    pub fn resolve_state(self, state: &GameState) -> EndingType {
        self.resolve(state.stats.karma, has_all_fragments(state))
    }
}

/// Resolve an ending with the default threshold-only policy.
///
/// `karma >= 70` is good, `40 <= karma < 70` is neutral, anything lower is
/// bad. `has_all_fragments` does not change the outcome under the default
/// policy.
pub const fn calculate_ending(karma: u8, has_all_fragments: bool) -> EndingType {
    let policy = EndingPolicy {
        good_threshold: GOOD_KARMA_THRESHOLD,
        neutral_threshold: NEUTRAL_KARMA_THRESHOLD,
        require_all_fragments_for_good: false,
    };
    policy.resolve(karma, has_all_fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mahes_types::FRAGMENT_CAP;

    #[test]
    fn documented_examples() {
        assert_eq!(calculate_ending(75, true), EndingType::Good);
        assert_eq!(calculate_ending(55, false), EndingType::Neutral);
        assert_eq!(calculate_ending(10, true), EndingType::Bad);
        assert_eq!(calculate_ending(69, false), EndingType::Neutral);
    }

    #[test]
    fn boundaries_are_inclusive_from_below() {
        assert_eq!(calculate_ending(70, false), EndingType::Good);
        assert_eq!(calculate_ending(40, false), EndingType::Neutral);
        assert_eq!(calculate_ending(39, false), EndingType::Bad);
        assert_eq!(calculate_ending(0, false), EndingType::Bad);
        assert_eq!(calculate_ending(100, false), EndingType::Good);
    }

    #[test]
    fn fragments_do_not_matter_by_default() {
        for karma in 0..=100 {
            assert_eq!(calculate_ending(karma, true), calculate_ending(karma, false));
        }
    }

    #[test]
    fn fragment_gate_demotes_good_to_neutral() {
        let policy = EndingPolicy {
            require_all_fragments_for_good: true,
            ..EndingPolicy::default()
        };
        assert_eq!(policy.resolve(90, false), EndingType::Neutral);
        assert_eq!(policy.resolve(90, true), EndingType::Good);
        assert_eq!(policy.resolve(20, true), EndingType::Bad);
    }

    #[test]
    fn resolve_state_reads_karma_and_fragments() {
        let mut state = GameState::default();
        state.stats.karma = 80;
        state.inventory.fragments.crown = FRAGMENT_CAP;
        state.inventory.fragments.sash = FRAGMENT_CAP;
        let gated = EndingPolicy {
            require_all_fragments_for_good: true,
            ..EndingPolicy::default()
        };
        assert_eq!(gated.resolve_state(&state), EndingType::Good);
        state.inventory.fragments.sash = 5;
        assert_eq!(gated.resolve_state(&state), EndingType::Neutral);
    }
}
