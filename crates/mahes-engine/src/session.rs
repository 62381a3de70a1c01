//! The game session: one explicit engine instance per player.
//!
//! A [`GameSession`] owns the current [`GameState`], the screen phase, and
//! the transient UI context (question on screen, hints revealed, resolved
//! ending). Storage is injected as any [`KeyValueStore`], so tests run on a
//! [`mahes_store::MemoryStore`] and the binary on a
//! [`mahes_store::FileStore`].
//!
//! Every intent is processed to completion before the next is accepted.
//! Mutations during active play are persisted before they are committed to
//! the session: if the write fails the intent fails and the session keeps
//! its prior state.
//!
//! The resolved ending and whether the run is on the leaderboard are part
//! of the saved progress, so a finished run resumes on the ending screen
//! and can be recorded only once.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use mahes_catalog::Catalog;
use mahes_core::config::GameConfig;
use mahes_core::progression::{
    apply_answer, complete_setup, finish_game, initial_state, is_game_complete,
    maybe_unlock_next_region, next_question, select_region, use_hint,
};
use mahes_core::{EndingPolicy, LevelProgress, ProgressionError, leaderboard, phase};
use mahes_store::{KeyValueStore, LeaderboardStore, SaveStore};
use mahes_types::{
    EndingType, GamePhase, GameState, LeaderboardEntry, OptionId, Player, Question, QuestionId,
    Region,
};

use crate::error::SessionError;
use crate::intent::{AnswerFeedback, Intent, Outcome, SessionEvent};

/// A question currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveChallenge {
    question: QuestionId,
    hints_revealed: usize,
}

/// An explicit progression engine instance bound to one storage backend.
#[derive(Debug)]
pub struct GameSession<S: KeyValueStore> {
    catalog: Arc<Catalog>,
    store: S,
    policy: EndingPolicy,
    max_entries: Option<usize>,
    state: GameState,
    phase: GamePhase,
    active: Option<ActiveChallenge>,
    feedback_pending: bool,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Create a session on the landing screen with a fresh state.
    pub fn new(catalog: Arc<Catalog>, store: S, config: &GameConfig) -> Self {
        Self {
            catalog,
            store,
            policy: config.ending,
            max_entries: config.leaderboard.max_entries,
            state: initial_state(),
            phase: GamePhase::Landing,
            active: None,
            feedback_pending: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current game state.
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The current screen phase.
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// The content catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The storage backend.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The ending, once resolved.
    pub const fn ending(&self) -> Option<EndingType> {
        self.state.progress.ending
    }

    /// The question on screen, if any.
    pub fn active_question(&self) -> Option<&Question> {
        self.active
            .as_ref()
            .and_then(|active| self.catalog.question(&active.question).ok())
    }

    /// Player level derived from the current score.
    pub const fn level(&self) -> LevelProgress {
        LevelProgress::from_score(self.state.stats.score)
    }

    /// The leaderboard in rank order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the backend read fails.
    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, SessionError> {
        let mut entries = LeaderboardStore::new(&self.store).load_entries()?;
        leaderboard::rank(&mut entries);
        Ok(entries)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Process one intent at time `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] describing why the intent was rejected.
    /// The session is unchanged after a rejection.
    pub fn dispatch(
        &mut self,
        intent: Intent,
        now: DateTime<Utc>,
    ) -> Result<Outcome, SessionError> {
        let result = match intent {
            Intent::NewGame => self.new_game(),
            Intent::ContinueGame => self.continue_game(),
            Intent::CompleteSetup {
                name,
                avatar,
                difficulty,
            } => self.complete_setup(
                Player {
                    name,
                    avatar,
                    difficulty,
                },
                now,
            ),
            Intent::SelectRegion { region } => self.select_region(region, now),
            Intent::SubmitAnswer { question, option } => {
                self.submit_answer(&question, &option, now)
            }
            Intent::RequestHint => self.request_hint(now),
            Intent::Continue => self.continue_from_feedback(now),
            Intent::SaveToLeaderboard => self.save_to_leaderboard(now),
            Intent::ViewLeaderboard => self.view_leaderboard(),
            Intent::CloseLeaderboard => self.close_leaderboard(),
            Intent::Restart => self.restart(),
        };

        match &result {
            Ok(outcome) => debug!(phase = %outcome.phase, "Intent applied"),
            Err(e) if e.is_duplicate_answer() => debug!(error = %e, "Duplicate answer ignored"),
            Err(e) => warn!(phase = %self.phase, error = %e, "Intent rejected"),
        }
        result
    }

    fn outcome(&self, event: SessionEvent) -> Outcome {
        Outcome {
            phase: self.phase,
            event,
        }
    }

    /// Persist `next` and make it the session state.
    fn commit(&mut self, next: GameState, now: DateTime<Utc>) -> Result<(), SessionError> {
        SaveStore::new(&self.store).save_game(&next, now)?;
        self.state = next;
        Ok(())
    }

    // =========================================================================
    // Landing and setup
    // =========================================================================

    fn new_game(&mut self) -> Result<Outcome, SessionError> {
        self.phase = phase::transition(self.phase, GamePhase::Setup)?;
        self.reset_run();
        Ok(self.outcome(SessionEvent::SetupStarted))
    }

    fn continue_game(&mut self) -> Result<Outcome, SessionError> {
        phase::transition(self.phase, GamePhase::Map)?;
        if let Some(saved) = SaveStore::new(&self.store).load_game()? {
            let completed = saved.progress.completed_challenges.len();
            let to = if saved.progress.ending.is_some() {
                GamePhase::Ending
            } else {
                GamePhase::Map
            };
            self.phase = phase::transition(self.phase, to)?;
            self.reset_run();
            self.state = saved;
            info!(
                completed,
                player = %self.state.player.name,
                phase = %self.phase,
                "Game resumed"
            );
            return Ok(self.outcome(SessionEvent::GameResumed { completed }));
        }

        self.phase = phase::transition(self.phase, GamePhase::Setup)?;
        self.reset_run();
        Ok(self.outcome(SessionEvent::NoSaveFound))
    }

    fn complete_setup(
        &mut self,
        player: Player,
        now: DateTime<Utc>,
    ) -> Result<Outcome, SessionError> {
        if self.phase != GamePhase::Setup {
            return Err(ProgressionError::InvalidPhaseTransition {
                from: self.phase,
                to: GamePhase::Map,
            }
            .into());
        }
        let next = complete_setup(&initial_state(), player, now.timestamp_millis())?;
        self.commit(next, now)?;
        self.phase = GamePhase::Map;
        let name = self.state.player.name.clone();
        Ok(self.outcome(SessionEvent::SetupCompleted { name }))
    }

    // =========================================================================
    // Map and challenges
    // =========================================================================

    fn select_region(
        &mut self,
        region: Region,
        now: DateTime<Utc>,
    ) -> Result<Outcome, SessionError> {
        if self.phase != GamePhase::Map {
            return Err(ProgressionError::InvalidPhaseTransition {
                from: self.phase,
                to: GamePhase::Challenge,
            }
            .into());
        }
        let selected = select_region(&self.state, region)?;

        if let Some(question) = next_question(&selected, &self.catalog, region) {
            let question = question.id.clone();
            self.commit(selected, now)?;
            self.active = Some(ActiveChallenge {
                question: question.clone(),
                hints_revealed: 0,
            });
            self.phase = GamePhase::Challenge;
            debug!(%region, question_id = %question, "Challenge presented");
            return Ok(self.outcome(SessionEvent::ChallengePresented { question }));
        }

        // Nothing left here: the region is complete.
        if is_game_complete(&selected, &self.catalog) {
            self.commit(selected, now)?;
            return self.reach_ending(now);
        }
        let had_next = region
            .next()
            .is_some_and(|next| selected.progress.is_unlocked(next));
        let unlocked_state = maybe_unlock_next_region(&selected, &self.catalog, region);
        let unlocked = region
            .next()
            .filter(|next| !had_next && unlocked_state.progress.is_unlocked(*next));
        self.commit(unlocked_state, now)?;
        Ok(self.outcome(SessionEvent::RegionComplete { region, unlocked }))
    }

    fn submit_answer(
        &mut self,
        question_id: &QuestionId,
        option_id: &OptionId,
        now: DateTime<Utc>,
    ) -> Result<Outcome, SessionError> {
        let catalog = Arc::clone(&self.catalog);
        let (question, option) = catalog.option(question_id, option_id)?;

        if self.state.progress.is_completed(&question.id) {
            return Err(ProgressionError::AlreadyCompleted(question.id.clone()).into());
        }
        let on_screen = self
            .active
            .as_ref()
            .is_some_and(|active| active.question == question.id);
        if self.phase != GamePhase::Challenge || !on_screen {
            return Err(SessionError::NoActiveChallenge);
        }

        let answered = apply_answer(&self.state, question, option)?;
        let next = maybe_unlock_next_region(&answered, &catalog, question.region);
        let unlocked = question.region.next().filter(|region| {
            !answered.progress.is_unlocked(*region) && next.progress.is_unlocked(*region)
        });
        let game_complete = is_game_complete(&next, &catalog);

        self.commit(next, now)?;
        self.active = None;
        self.feedback_pending = true;
        self.phase = GamePhase::Feedback;

        Ok(self.outcome(SessionEvent::AnswerAccepted(AnswerFeedback {
            question: question.id.clone(),
            option: option.id.clone(),
            correct: option.is_correct,
            text: option.effect.feedback.clone(),
            score_delta: option.effect.score,
            karma_delta: option.effect.karma,
            item: option.effect.item.clone(),
            unlocked,
            game_complete,
        })))
    }

    fn request_hint(&mut self, now: DateTime<Utc>) -> Result<Outcome, SessionError> {
        let Some(active) = self.active.clone() else {
            return Err(SessionError::NoActiveChallenge);
        };
        if self.phase != GamePhase::Challenge {
            return Err(SessionError::NoActiveChallenge);
        }
        let catalog = Arc::clone(&self.catalog);
        let question = catalog.question(&active.question)?;
        let Some(text) = question.hint(active.hints_revealed) else {
            return Err(SessionError::NoMoreHints(question.id.clone()));
        };

        let next = use_hint(&self.state)?;
        let remaining = next.inventory.hints;
        self.commit(next, now)?;
        self.active = Some(ActiveChallenge {
            hints_revealed: active.hints_revealed.saturating_add(1),
            ..active
        });
        Ok(self.outcome(SessionEvent::HintRevealed {
            text: text.to_owned(),
            remaining,
        }))
    }

    fn continue_from_feedback(&mut self, now: DateTime<Utc>) -> Result<Outcome, SessionError> {
        if self.phase != GamePhase::Feedback || !self.feedback_pending {
            return Err(SessionError::NoFeedbackPending);
        }
        if is_game_complete(&self.state, &self.catalog) {
            return self.reach_ending(now);
        }
        self.phase = phase::transition(self.phase, GamePhase::Map)?;
        self.feedback_pending = false;
        Ok(self.outcome(SessionEvent::ReturnedToMap))
    }

    /// Resolve the ending from the current state and move to the ending screen.
    fn reach_ending(&mut self, now: DateTime<Utc>) -> Result<Outcome, SessionError> {
        let to = phase::transition(self.phase, GamePhase::Ending)?;
        let (finished, ending) = finish_game(
            &self.state,
            &self.catalog,
            self.policy,
            now.timestamp_millis(),
        )?;
        self.commit(finished, now)?;
        self.phase = to;
        self.feedback_pending = false;
        Ok(self.outcome(SessionEvent::EndingReached {
            ending,
            score: self.state.stats.score,
            karma: self.state.stats.karma,
            play_time: self.state.stats.play_time,
        }))
    }

    // =========================================================================
    // Ending and leaderboard
    // =========================================================================

    fn save_to_leaderboard(&mut self, now: DateTime<Utc>) -> Result<Outcome, SessionError> {
        let Some(ending) = self.ending().filter(|_| self.phase == GamePhase::Ending) else {
            return Err(ProgressionError::InvalidPhaseTransition {
                from: self.phase,
                to: GamePhase::Leaderboard,
            }
            .into());
        };
        if self.state.progress.recorded_on_leaderboard {
            return Err(SessionError::AlreadyOnLeaderboard);
        }
        let to = phase::transition(self.phase, GamePhase::Leaderboard)?;

        let mut entries = LeaderboardStore::new(&self.store).load_entries()?;
        let entry = leaderboard::new_entry(&self.state, ending, now);
        let rank = leaderboard::insert_ranked(&mut entries, entry, self.max_entries);

        // The recorded flag is saved before the entry; a failed entry write
        // clears it again.
        let previous = self.state.clone();
        let mut recorded = self.state.clone();
        recorded.progress.recorded_on_leaderboard = true;
        self.commit(recorded, now)?;
        if let Err(e) = LeaderboardStore::new(&self.store).save_entries(&entries) {
            self.commit(previous, now)?;
            return Err(e.into());
        }
        info!(player = %self.state.player.name, ?rank, "Run saved to leaderboard");

        self.phase = to;
        Ok(self.outcome(SessionEvent::LeaderboardSaved { rank, entries }))
    }

    fn view_leaderboard(&mut self) -> Result<Outcome, SessionError> {
        let to = phase::transition(self.phase, GamePhase::Leaderboard)?;
        let entries = self.leaderboard()?;
        self.phase = to;
        Ok(self.outcome(SessionEvent::LeaderboardShown { entries }))
    }

    fn close_leaderboard(&mut self) -> Result<Outcome, SessionError> {
        // A named player goes back to the map; otherwise to the title.
        let to = if self.state.player.name.is_empty() {
            GamePhase::Landing
        } else {
            GamePhase::Map
        };
        self.phase = phase::transition(self.phase, to)?;
        Ok(self.outcome(SessionEvent::LeaderboardClosed))
    }

    fn restart(&mut self) -> Result<Outcome, SessionError> {
        SaveStore::new(&self.store).clear_game()?;
        self.reset_run();
        self.phase = GamePhase::Setup;
        info!("Game restarted");
        Ok(self.outcome(SessionEvent::Restarted))
    }

    fn reset_run(&mut self) {
        self.state = initial_state();
        self.active = None;
        self.feedback_pending = false;
    }
}
