//! Presentation-layer intents and the outcomes the session returns for them.
//!
//! Intents are plain data so a sequence of them can be written to a YAML
//! script and replayed deterministically:
//!
//! ```yaml
//! - intent: new_game
//! - intent: complete_setup
//!   name: Sari
//!   difficulty: adventure
//! - intent: select_region
//!   region: pulau_awan
//! - intent: submit_answer
//!   question: q001_moral
//!   option: a
//! ```

use serde::{Deserialize, Serialize};

use mahes_types::{
    DifficultyTier, EndingType, GamePhase, ItemEffect, LeaderboardEntry, OptionId, QuestionId,
    Region,
};

/// One player action forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Leave the title screen for player setup with a fresh state.
    NewGame,
    /// Leave the title screen resuming the saved game, if any.
    ContinueGame,
    /// Submit the setup form.
    CompleteSetup {
        /// Player display name.
        name: String,
        /// Avatar choice.
        #[serde(default)]
        avatar: String,
        /// Difficulty tier.
        #[serde(default)]
        difficulty: DifficultyTier,
    },
    /// Pick a region on the map.
    SelectRegion {
        /// The chosen region.
        region: Region,
    },
    /// Answer the question on screen.
    SubmitAnswer {
        /// The question being answered.
        question: QuestionId,
        /// The chosen option.
        option: OptionId,
    },
    /// Spend a hint on the question on screen.
    RequestHint,
    /// Dismiss answer feedback.
    Continue,
    /// Record the finished run on the leaderboard.
    SaveToLeaderboard,
    /// Open the leaderboard.
    ViewLeaderboard,
    /// Close the leaderboard.
    CloseLeaderboard,
    /// Discard the current game and return to setup.
    Restart,
}

/// What the presentation layer shows after an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    /// The answered question.
    pub question: QuestionId,
    /// The chosen option.
    pub option: OptionId,
    /// Whether the option was the correct one.
    pub correct: bool,
    /// Narrative feedback text from the option.
    pub text: String,
    /// Points awarded.
    pub score_delta: u32,
    /// Karma change as authored (before clamping).
    pub karma_delta: i32,
    /// Item granted.
    pub item: ItemEffect,
    /// Region unlocked by this answer, if it completed a region.
    pub unlocked: Option<Region>,
    /// Whether every catalog question is now completed.
    pub game_complete: bool,
}

/// The result of a successfully dispatched intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Setup opened with a fresh state.
    SetupStarted,
    /// A saved game was resumed.
    GameResumed {
        /// Questions already completed in the resumed save.
        completed: usize,
    },
    /// No usable save existed; setup opened with a fresh state instead.
    NoSaveFound,
    /// Setup accepted; the map is open.
    SetupCompleted {
        /// The trimmed player name.
        name: String,
    },
    /// A question is on screen.
    ChallengePresented {
        /// The question shown.
        question: QuestionId,
    },
    /// The chosen region has nothing left to answer.
    RegionComplete {
        /// The region chosen.
        region: Region,
        /// The next region, if this selection unlocked it.
        unlocked: Option<Region>,
    },
    /// An answer was applied.
    AnswerAccepted(AnswerFeedback),
    /// A hint was spent and revealed.
    HintRevealed {
        /// Hint text for display. Not persisted.
        text: String,
        /// Hint balance after spending.
        remaining: u32,
    },
    /// Feedback dismissed; back on the map.
    ReturnedToMap,
    /// Every question is completed and the ending is resolved.
    EndingReached {
        /// The ending.
        ending: EndingType,
        /// Final score.
        score: u32,
        /// Final karma.
        karma: u8,
        /// Elapsed play time in seconds.
        play_time: u64,
    },
    /// The run was recorded on the leaderboard.
    LeaderboardSaved {
        /// 1-based rank of the new entry, `None` if a capped board dropped it.
        rank: Option<usize>,
        /// The ranked board after saving.
        entries: Vec<LeaderboardEntry>,
    },
    /// The ranked leaderboard.
    LeaderboardShown {
        /// Entries in rank order.
        entries: Vec<LeaderboardEntry>,
    },
    /// The leaderboard was closed.
    LeaderboardClosed,
    /// The game was discarded; setup is open.
    Restarted,
}

/// A dispatched intent's event together with the phase it left the session in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Phase after the intent.
    pub phase: GamePhase,
    /// What happened.
    pub event: SessionEvent,
}
