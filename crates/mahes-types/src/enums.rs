//! Enumeration types for the Mahes progression engine.
//!
//! Closed sets the engine reasons about: regions, question kinds, player
//! difficulty tiers, endings, fragment kinds, item effects, and the
//! presentation phases whose transitions the engine validates.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// One of the three themed content zones of the world map.
///
/// Regions are strictly ordered: region N+1 unlocks only after every
/// question of region N has been completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Region {
    /// Region 1: the floating cloud island.
    PulauAwan,
    /// Region 2: the blue-glowing forest.
    HutanBiru,
    /// Region 3: the harbour town by the sea.
    KotaTepiLaut,
}

impl Region {
    /// Every region in progression order.
    pub const ALL: [Self; 3] = [Self::PulauAwan, Self::HutanBiru, Self::KotaTepiLaut];

    /// The first region, unlocked from the start.
    pub const FIRST: Self = Self::PulauAwan;

    /// The final region; completing it ends the game.
    pub const LAST: Self = Self::KotaTepiLaut;

    /// The 1-based region number shown on the map.
    pub const fn number(self) -> u8 {
        match self {
            Self::PulauAwan => 1,
            Self::HutanBiru => 2,
            Self::KotaTepiLaut => 3,
        }
    }

    /// Resolve a 1-based region number.
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::PulauAwan),
            2 => Some(Self::HutanBiru),
            3 => Some(Self::KotaTepiLaut),
            _ => None,
        }
    }

    /// The region that follows this one, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PulauAwan => Some(Self::HutanBiru),
            Self::HutanBiru => Some(Self::KotaTepiLaut),
            Self::KotaTepiLaut => None,
        }
    }

    /// The region that precedes this one, if any.
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::PulauAwan => None,
            Self::HutanBiru => Some(Self::PulauAwan),
            Self::KotaTepiLaut => Some(Self::HutanBiru),
        }
    }

    /// The catalog slug used in content files.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::PulauAwan => "pulau_awan",
            Self::HutanBiru => "hutan_biru",
            Self::KotaTepiLaut => "kota_tepi_laut",
        }
    }
}

impl core::fmt::Display for Region {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.slug())
    }
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// The kind of challenge a question poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum QuestionType {
    /// A logic or pattern puzzle with one correct answer.
    Puzzle,
    /// A moral dilemma; options differ mainly in karma.
    Moral,
    /// A knowledge question.
    Trivia,
    /// A narrative event with branching consequences.
    Event,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Difficulty tier chosen at player setup.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DifficultyTier {
    /// Relaxed play.
    #[default]
    Casual,
    /// The intended experience.
    Adventure,
    /// For players who want the hardest time limits.
    Legendary,
}

// ---------------------------------------------------------------------------
// Endings and collectibles
// ---------------------------------------------------------------------------

/// The narrative ending reached when every question is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EndingType {
    /// High karma.
    Good,
    /// Middling karma.
    Neutral,
    /// Low karma.
    Bad,
}

impl core::fmt::Display for EndingType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Good => "good",
            Self::Neutral => "neutral",
            Self::Bad => "bad",
        })
    }
}

/// The two artifact sets whose fragments players collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FragmentKind {
    /// Pieces of the crown (mahkota).
    Crown,
    /// Pieces of the sash (selendang).
    Sash,
}

impl FragmentKind {
    /// Both fragment kinds.
    pub const ALL: [Self; 2] = [Self::Crown, Self::Sash];
}

impl core::fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Crown => "crown",
            Self::Sash => "sash",
        })
    }
}

/// The item reward attached to an answer option.
///
/// Catalog content spells rewards as free-form tokens
/// (`fragment_crown_1`, `hint`, ...); the catalog parses them into this
/// variant once at load time so the engine never inspects strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ItemEffect {
    /// No item is awarded.
    #[default]
    None,
    /// One fragment of the given kind.
    Fragment(FragmentKind),
    /// One hint token.
    Hint,
    /// Any other named keepsake, stored in the special item list.
    Special(String),
}

impl ItemEffect {
    /// Whether this effect awards anything at all.
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

// ---------------------------------------------------------------------------
// Presentation phases
// ---------------------------------------------------------------------------

/// The screen a play session is on.
///
/// The presentation layer drives these, but the engine validates every
/// transition: `landing -> setup -> map -> challenge -> feedback -> map`
/// loops until every question is done, then `ending`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GamePhase {
    /// Title screen.
    #[default]
    Landing,
    /// Player name, avatar, and difficulty entry.
    Setup,
    /// Region selection.
    Map,
    /// A question is on screen.
    Challenge,
    /// The outcome of the last answer is on screen.
    Feedback,
    /// The narrative ending.
    Ending,
    /// The ranked leaderboard.
    Leaderboard,
}

impl core::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Landing => "landing",
            Self::Setup => "setup",
            Self::Map => "map",
            Self::Challenge => "challenge",
            Self::Feedback => "feedback",
            Self::Ending => "ending",
            Self::Leaderboard => "leaderboard",
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn region_numbers_round_trip() {
        for region in Region::ALL {
            assert_eq!(Region::from_number(region.number()), Some(region));
        }
        assert_eq!(Region::from_number(0), None);
        assert_eq!(Region::from_number(4), None);
    }

    #[test]
    fn region_order_is_linear() {
        assert_eq!(Region::FIRST.next(), Some(Region::HutanBiru));
        assert_eq!(Region::HutanBiru.next(), Some(Region::LAST));
        assert_eq!(Region::LAST.next(), None);
        assert_eq!(Region::FIRST.previous(), None);
        assert!(Region::PulauAwan < Region::KotaTepiLaut);
    }

    #[test]
    fn region_serializes_as_slug() {
        let json = serde_json::to_string(&Region::KotaTepiLaut).unwrap();
        assert_eq!(json, "\"kota_tepi_laut\"");
    }

    #[test]
    fn item_effect_is_adjacently_tagged() {
        let json = serde_json::to_string(&ItemEffect::Fragment(FragmentKind::Sash)).unwrap();
        assert_eq!(json, r#"{"kind":"fragment","value":"sash"}"#);
        let none: ItemEffect = serde_json::from_str(r#"{"kind":"none"}"#).unwrap();
        assert!(none.is_none());
    }
}
