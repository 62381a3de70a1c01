//! The progression engine: every mutation of [`GameState`].
//!
//! Operations are pure functions of `(current state, input) -> new state`.
//! They borrow the current state and return a fresh one, so a rejected
//! operation leaves the caller holding the unmodified prior state and any
//! sequence of intents can be replayed deterministically.
//!
//! Invariants maintained by every operation:
//! - karma stays within `[0, 100]`
//! - each fragment counter stays within `[0, 6]`
//! - `completed_challenges` never holds duplicates and never shrinks
//! - `unlocked_regions` contains region 1, only grows, and region N+1 is
//!   present only once every question of region N is completed
//! - `current_region` is always unlocked

use mahes_catalog::Catalog;
use mahes_types::{
    EndingType, FRAGMENT_CAP, FragmentKind, GameState, ItemEffect, KARMA_MAX, KARMA_MIN, Player,
    Question, QuestionOption, Region,
};
use tracing::{debug, info};

use crate::ending::EndingPolicy;
use crate::error::ProgressionError;

/// Milliseconds per second, for play time computation.
const MILLIS_PER_SECOND: i64 = 1000;

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// A fresh game: region 1 unlocked, score zero, neutral karma (50),
/// empty inventory, default settings.
pub fn initial_state() -> GameState {
    GameState::default()
}

/// Record the player chosen at setup and stamp the start time.
///
/// # Errors
///
/// Returns [`ProgressionError::EmptyPlayerName`] if the name is blank.
pub fn complete_setup(
    state: &GameState,
    player: Player,
    now_ms: i64,
) -> Result<GameState, ProgressionError> {
    let name = player.name.trim();
    if name.is_empty() {
        return Err(ProgressionError::EmptyPlayerName);
    }

    let mut next = state.clone();
    next.player = Player {
        name: name.to_owned(),
        ..player
    };
    next.stats.start_time = now_ms;
    info!(
        player = %next.player.name,
        difficulty = ?next.player.difficulty,
        "Player setup complete"
    );
    Ok(next)
}

/// Compute the elapsed play time in whole seconds from the start time.
pub fn record_play_time(state: &GameState, now_ms: i64) -> GameState {
    let elapsed_ms = now_ms.saturating_sub(state.stats.start_time).max(0);
    let seconds = elapsed_ms.checked_div(MILLIS_PER_SECOND).unwrap_or(0);

    let mut next = state.clone();
    next.stats.play_time = u64::try_from(seconds).unwrap_or(0);
    next
}

/// Close a completed run: stamp the play time and resolve the ending.
///
/// A run is closed once. Finishing an already finished run returns it
/// unchanged together with the ending it was closed with, so the play time
/// stays the one stamped at completion.
///
/// # Errors
///
/// Returns [`ProgressionError::GameNotComplete`] while any catalog
/// question is still unanswered.
pub fn finish_game(
    state: &GameState,
    catalog: &Catalog,
    policy: EndingPolicy,
    now_ms: i64,
) -> Result<(GameState, EndingType), ProgressionError> {
    if !is_game_complete(state, catalog) {
        return Err(ProgressionError::GameNotComplete {
            completed: state.progress.completed_challenges.len(),
            total: catalog.len(),
        });
    }

    if let Some(ending) = state.progress.ending {
        debug!(%ending, "Run already finished");
        return Ok((state.clone(), ending));
    }

    let mut next = record_play_time(state, now_ms);
    let ending = policy.resolve_state(&next);
    next.progress.ending = Some(ending);
    info!(
        %ending,
        score = next.stats.score,
        karma = next.stats.karma,
        play_time = next.stats.play_time,
        "Game finished"
    );
    Ok((next, ending))
}

// ---------------------------------------------------------------------------
// Answering
// ---------------------------------------------------------------------------

/// Apply the effects of choosing `option` for `question`.
///
/// Adds the score, applies the clamped karma delta, grants the item (a
/// fragment up to the cap, a hint, or a special item), and marks the
/// question completed.
///
/// # Errors
///
/// - [`ProgressionError::AlreadyCompleted`] if the question was answered
///   before. Nothing is awarded a second time.
/// - [`ProgressionError::OptionNotInQuestion`] if `option` is not one of
///   `question`'s options.
pub fn apply_answer(
    state: &GameState,
    question: &Question,
    option: &QuestionOption,
) -> Result<GameState, ProgressionError> {
    if state.progress.is_completed(&question.id) {
        debug!(question_id = %question.id, "Rejected duplicate answer");
        return Err(ProgressionError::AlreadyCompleted(question.id.clone()));
    }
    if question.option(&option.id).is_none() {
        return Err(ProgressionError::OptionNotInQuestion {
            question: question.id.clone(),
            option: option.id.clone(),
        });
    }

    let effect = &option.effect;
    let mut next = update_score(state, effect.score);
    next = update_karma(&next, effect.karma);
    next = add_item(&next, &effect.item);
    next.progress.completed_challenges.push(question.id.clone());

    info!(
        question_id = %question.id,
        option_id = %option.id,
        correct = option.is_correct,
        score = next.stats.score,
        karma = next.stats.karma,
        "Answer applied"
    );
    Ok(next)
}

/// Add points to the score, saturating at `u32::MAX`.
pub fn update_score(state: &GameState, delta: u32) -> GameState {
    let mut next = state.clone();
    next.stats.score = next.stats.score.saturating_add(delta);
    next
}

/// Apply a signed karma change, clamped into `[0, 100]`.
pub fn update_karma(state: &GameState, delta: i32) -> GameState {
    let mut next = state.clone();
    next.stats.karma = clamp_karma(next.stats.karma, delta);
    next
}

/// Add `delta` to `karma` and clamp into `[KARMA_MIN, KARMA_MAX]`.
pub fn clamp_karma(karma: u8, delta: i32) -> u8 {
    let raw = i32::from(karma)
        .saturating_add(delta)
        .clamp(i32::from(KARMA_MIN), i32::from(KARMA_MAX));
    u8::try_from(raw).unwrap_or(KARMA_MAX)
}

/// Grant one fragment of `kind`. Collecting beyond the cap is a silent no-op.
pub fn add_fragment(state: &GameState, kind: FragmentKind) -> GameState {
    let mut next = state.clone();
    let counter = next.inventory.fragments.get_mut(kind);
    if *counter < FRAGMENT_CAP {
        *counter = counter.saturating_add(1);
        debug!(%kind, count = *counter, "Fragment collected");
    } else {
        debug!(%kind, "Fragment set already complete");
    }
    next
}

/// Grant whatever an option's item effect awards.
pub fn add_item(state: &GameState, item: &ItemEffect) -> GameState {
    match item {
        ItemEffect::None => state.clone(),
        ItemEffect::Fragment(kind) => add_fragment(state, *kind),
        ItemEffect::Hint => {
            let mut next = state.clone();
            next.inventory.hints = next.inventory.hints.saturating_add(1);
            next
        }
        ItemEffect::Special(name) => {
            let mut next = state.clone();
            next.inventory.special_items.push(name.clone());
            next
        }
    }
}

/// Spend one hint.
///
/// The hint text itself is chosen by the caller from the current question
/// and is not part of the persisted state.
///
/// # Errors
///
/// Returns [`ProgressionError::InsufficientHints`] if the balance is zero.
pub fn use_hint(state: &GameState) -> Result<GameState, ProgressionError> {
    let remaining = state
        .inventory
        .hints
        .checked_sub(1)
        .ok_or(ProgressionError::InsufficientHints)?;

    let mut next = state.clone();
    next.inventory.hints = remaining;
    next.stats.hints_used = next.stats.hints_used.saturating_add(1);
    debug!(remaining, hints_used = next.stats.hints_used, "Hint used");
    Ok(next)
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// Whether every question of `region` has been completed.
pub fn is_region_complete(state: &GameState, catalog: &Catalog, region: Region) -> bool {
    catalog
        .questions_in_region(region)
        .all(|q| state.progress.is_completed(&q.id))
}

/// Unlock the region after `completed_region` if it is fully completed.
///
/// This is the only way regions unlock. It is a no-op when the region is
/// incomplete, locked itself, the last region, or its successor is already
/// unlocked. On unlock the player moves to the new region.
pub fn maybe_unlock_next_region(
    state: &GameState,
    catalog: &Catalog,
    completed_region: Region,
) -> GameState {
    let Some(next_region) = completed_region.next() else {
        return state.clone();
    };
    if state.progress.is_unlocked(next_region)
        || !state.progress.is_unlocked(completed_region)
        || !is_region_complete(state, catalog, completed_region)
    {
        return state.clone();
    }

    let mut next = state.clone();
    next.progress.unlocked_regions.insert(next_region);
    next.progress.current_region = next_region;
    info!(
        completed = %completed_region,
        unlocked = %next_region,
        "Region unlocked"
    );
    next
}

/// Move the player to an unlocked region.
///
/// # Errors
///
/// Returns [`ProgressionError::RegionLocked`] if the region is not unlocked.
pub fn select_region(state: &GameState, region: Region) -> Result<GameState, ProgressionError> {
    if !state.progress.is_unlocked(region) {
        return Err(ProgressionError::RegionLocked(region));
    }
    let mut next = state.clone();
    next.progress.current_region = region;
    Ok(next)
}

/// The next question to offer in `region`.
///
/// Returns the first uncompleted question in catalog order whose karma gate
/// the player meets. When every remaining question is gated, the first
/// remaining one is offered anyway so a region can never become unwinnable.
pub fn next_question<'c>(
    state: &GameState,
    catalog: &'c Catalog,
    region: Region,
) -> Option<&'c Question> {
    let pending: Vec<&Question> = catalog
        .questions_in_region(region)
        .filter(|q| !state.progress.is_completed(&q.id))
        .collect();

    let karma = state.stats.karma;
    pending
        .iter()
        .copied()
        .find(|q| q.required_karma.is_none_or(|required| karma >= required))
        .or_else(|| pending.first().copied())
}

/// Whether every catalog question has been completed.
pub fn is_game_complete(state: &GameState, catalog: &Catalog) -> bool {
    catalog
        .questions()
        .iter()
        .all(|q| state.progress.is_completed(&q.id))
}

// ---------------------------------------------------------------------------
// Collectibles
// ---------------------------------------------------------------------------

/// Fragments of one kind collected so far.
pub const fn fragment_count(state: &GameState, kind: FragmentKind) -> u8 {
    state.inventory.fragments.get(kind)
}

/// Whether both the crown and sash sets are complete.
pub const fn has_all_fragments(state: &GameState) -> bool {
    state.inventory.fragments.crown == FRAGMENT_CAP
        && state.inventory.fragments.sash == FRAGMENT_CAP
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use mahes_types::{
        DifficultyTier, OptionEffect, OptionId, QuestionId, QuestionType, RegionInfo,
    };

    fn option(id: &str, score: u32, karma: i32, item: ItemEffect) -> QuestionOption {
        QuestionOption {
            id: OptionId::from(id),
            text: format!("option {id}"),
            is_correct: score > 0,
            effect: OptionEffect {
                score,
                karma,
                item,
                feedback: String::from("feedback"),
            },
        }
    }

    fn question(id: &str, region: Region, options: Vec<QuestionOption>) -> Question {
        Question {
            id: QuestionId::from(id),
            region,
            question_type: QuestionType::Moral,
            category: String::new(),
            difficulty: 1,
            title: id.to_owned(),
            scenario: None,
            prompt: String::from("?"),
            options,
            hints: vec![String::from("think")],
            time_limit_secs: 60,
            required_karma: None,
            tags: Vec::new(),
        }
    }

    fn simple(id: &str, region: Region) -> Question {
        question(id, region, vec![option("a", 10, 5, ItemEffect::None)])
    }

    /// Five questions in region 1, two in region 2, one in region 3.
    fn catalog() -> Catalog {
        let mut questions: Vec<Question> = (1..=5)
            .map(|n| simple(&format!("r1_{n}"), Region::PulauAwan))
            .collect();
        questions.push(simple("r2_1", Region::HutanBiru));
        questions.push(simple("r2_2", Region::HutanBiru));
        questions.push(simple("r3_1", Region::KotaTepiLaut));
        Catalog::from_parts(questions, Vec::<RegionInfo>::new()).unwrap()
    }

    fn answer_all(state: &GameState, catalog: &Catalog, region: Region) -> GameState {
        let mut current = state.clone();
        let questions: Vec<Question> = catalog.questions_in_region(region).cloned().collect();
        for q in &questions {
            current = apply_answer(&current, q, &q.options[0]).unwrap();
        }
        current
    }

    #[test]
    fn initial_state_is_neutral() {
        let state = initial_state();
        assert_eq!(state.stats.karma, 50);
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.progress.unlocked_regions.len(), 1);
        assert!(state.progress.is_unlocked(Region::PulauAwan));
        assert_eq!(state.progress.current_region, Region::PulauAwan);
        assert_eq!(state.inventory.hints, 0);
    }

    #[test]
    fn answer_applies_score_karma_fragment_and_completion() {
        let q = question(
            "q1",
            Region::PulauAwan,
            vec![option("a", 10, 5, ItemEffect::Fragment(FragmentKind::Crown))],
        );
        let state = initial_state();
        let next = apply_answer(&state, &q, &q.options[0]).unwrap();

        assert_eq!(next.stats.score, 10);
        assert_eq!(next.stats.karma, 55);
        assert_eq!(fragment_count(&next, FragmentKind::Crown), 1);
        assert!(next.progress.is_completed(&q.id));
        // Input untouched.
        assert_eq!(state, initial_state());
    }

    #[test]
    fn second_answer_is_rejected_without_double_award() {
        let q = question(
            "q1",
            Region::PulauAwan,
            vec![
                option("a", 10, 5, ItemEffect::Fragment(FragmentKind::Sash)),
                option("b", 3, -5, ItemEffect::None),
            ],
        );
        let once = apply_answer(&initial_state(), &q, &q.options[0]).unwrap();
        let twice = apply_answer(&once, &q, &q.options[1]);
        assert!(matches!(twice, Err(ProgressionError::AlreadyCompleted(_))));
        assert_eq!(once.progress.completed_challenges.len(), 1);
        assert_eq!(once.stats.score, 10);
    }

    #[test]
    fn foreign_option_is_rejected() {
        let q1 = simple("q1", Region::PulauAwan);
        let foreign = option("z", 99, 0, ItemEffect::None);
        let result = apply_answer(&initial_state(), &q1, &foreign);
        assert!(matches!(result, Err(ProgressionError::OptionNotInQuestion { .. })));
    }

    #[test]
    fn karma_clamps_at_both_ends() {
        assert_eq!(clamp_karma(95, 20), 100);
        assert_eq!(clamp_karma(5, -20), 0);
        assert_eq!(clamp_karma(50, i32::MAX), 100);
        assert_eq!(clamp_karma(50, i32::MIN), 0);
        assert_eq!(update_karma(&initial_state(), -7).stats.karma, 43);
    }

    #[test]
    fn fragments_cap_silently() {
        let mut state = initial_state();
        for _ in 0..10 {
            state = add_fragment(&state, FragmentKind::Crown);
        }
        assert_eq!(fragment_count(&state, FragmentKind::Crown), FRAGMENT_CAP);
        assert_eq!(fragment_count(&state, FragmentKind::Sash), 0);
        assert!(!has_all_fragments(&state));
        for _ in 0..6 {
            state = add_fragment(&state, FragmentKind::Sash);
        }
        assert!(has_all_fragments(&state));
    }

    #[test]
    fn hint_and_special_items_are_granted() {
        let state = add_item(&initial_state(), &ItemEffect::Hint);
        assert_eq!(state.inventory.hints, 1);
        let state = add_item(&state, &ItemEffect::Special(String::from("blue_lantern")));
        assert_eq!(state.inventory.special_items, vec![String::from("blue_lantern")]);
        assert_eq!(add_item(&state, &ItemEffect::None), state);
    }

    #[test]
    fn using_a_hint_spends_balance() {
        let state = add_item(&initial_state(), &ItemEffect::Hint);
        let used = use_hint(&state).unwrap();
        assert_eq!(used.inventory.hints, 0);
        assert_eq!(used.stats.hints_used, 1);
    }

    #[test]
    fn hint_with_empty_balance_is_rejected() {
        let state = initial_state();
        let result = use_hint(&state);
        assert!(matches!(result, Err(ProgressionError::InsufficientHints)));
        assert_eq!(state, initial_state());
    }

    #[test]
    fn final_question_of_region_one_unlocks_region_two() {
        let catalog = catalog();
        let questions: Vec<Question> = catalog
            .questions_in_region(Region::PulauAwan)
            .cloned()
            .collect();

        let mut state = initial_state();
        for q in &questions[..4] {
            state = apply_answer(&state, q, &q.options[0]).unwrap();
            state = maybe_unlock_next_region(&state, &catalog, Region::PulauAwan);
            assert!(!state.progress.is_unlocked(Region::HutanBiru));
        }

        state = apply_answer(&state, &questions[4], &questions[4].options[0]).unwrap();
        state = maybe_unlock_next_region(&state, &catalog, Region::PulauAwan);
        let unlocked: Vec<Region> = state.progress.unlocked_regions.iter().copied().collect();
        assert_eq!(unlocked, vec![Region::PulauAwan, Region::HutanBiru]);
        assert_eq!(state.progress.current_region, Region::HutanBiru);
    }

    #[test]
    fn unlock_is_idempotent_and_never_skips() {
        let catalog = catalog();
        let state = answer_all(&initial_state(), &catalog, Region::PulauAwan);
        let once = maybe_unlock_next_region(&state, &catalog, Region::PulauAwan);
        let twice = maybe_unlock_next_region(&once, &catalog, Region::PulauAwan);
        assert_eq!(once, twice);

        // Region 3 questions answered out of order do not unlock anything
        // while region 2 is incomplete.
        let r3: Vec<Question> = catalog
            .questions_in_region(Region::KotaTepiLaut)
            .cloned()
            .collect();
        let skipped = apply_answer(&once, &r3[0], &r3[0].options[0]).unwrap();
        let after = maybe_unlock_next_region(&skipped, &catalog, Region::HutanBiru);
        assert!(!after.progress.is_unlocked(Region::KotaTepiLaut));
        let last = maybe_unlock_next_region(&after, &catalog, Region::KotaTepiLaut);
        assert_eq!(last, after);
    }

    #[test]
    fn completed_but_locked_region_does_not_unlock_successor() {
        let catalog = catalog();
        let state = answer_all(&initial_state(), &catalog, Region::HutanBiru);
        let after = maybe_unlock_next_region(&state, &catalog, Region::HutanBiru);
        assert!(!after.progress.is_unlocked(Region::KotaTepiLaut));
    }

    #[test]
    fn select_region_requires_unlock() {
        let state = initial_state();
        assert!(matches!(
            select_region(&state, Region::HutanBiru),
            Err(ProgressionError::RegionLocked(Region::HutanBiru))
        ));
        let same = select_region(&state, Region::PulauAwan).unwrap();
        assert_eq!(same.progress.current_region, Region::PulauAwan);
    }

    #[test]
    fn next_question_prefers_satisfied_gates() {
        let mut gated = simple("gated", Region::PulauAwan);
        gated.required_karma = Some(80);
        let open = simple("open", Region::PulauAwan);
        let questions = vec![
            gated,
            open,
            simple("r2", Region::HutanBiru),
            simple("r3", Region::KotaTepiLaut),
        ];
        let catalog = Catalog::from_parts(questions, Vec::new()).unwrap();

        let state = initial_state();
        let first = next_question(&state, &catalog, Region::PulauAwan).unwrap();
        assert_eq!(first.id.as_str(), "open");

        let q = first.clone();
        let state = apply_answer(&state, &q, &q.options[0]).unwrap();
        // Only the gated question is left; it is offered anyway.
        let fallback = next_question(&state, &catalog, Region::PulauAwan).unwrap();
        assert_eq!(fallback.id.as_str(), "gated");
    }

    #[test]
    fn game_completes_after_every_question() {
        let catalog = catalog();
        let mut state = initial_state();
        for region in Region::ALL {
            assert!(!is_game_complete(&state, &catalog));
            state = answer_all(&state, &catalog, region);
            state = maybe_unlock_next_region(&state, &catalog, region);
        }
        assert!(is_game_complete(&state, &catalog));
        assert_eq!(state.progress.unlocked_regions.len(), 3);
        assert_eq!(state.progress.current_region, Region::KotaTepiLaut);
        assert_eq!(next_question(&state, &catalog, Region::PulauAwan), None);
    }

    #[test]
    fn finish_requires_every_question() {
        let catalog = catalog();
        let partial = answer_all(&initial_state(), &catalog, Region::PulauAwan);
        let result = finish_game(&partial, &catalog, EndingPolicy::default(), 0);
        assert!(matches!(
            result,
            Err(ProgressionError::GameNotComplete { completed: 5, total: 8 })
        ));
    }

    #[test]
    fn finish_stamps_play_time_and_resolves_ending() {
        let catalog = catalog();
        let mut state = initial_state();
        state.stats.start_time = 1_000;
        for region in Region::ALL {
            state = answer_all(&state, &catalog, region);
        }
        // Eight answers at +5 karma from 50.
        assert_eq!(state.stats.karma, 90);
        let (done, ending) =
            finish_game(&state, &catalog, EndingPolicy::default(), 601_000).unwrap();
        assert_eq!(done.stats.play_time, 600);
        assert_eq!(ending, EndingType::Good);
        assert_eq!(done.progress.ending, Some(EndingType::Good));
    }

    #[test]
    fn finishing_twice_keeps_first_play_time_and_ending() {
        let catalog = catalog();
        let mut state = initial_state();
        state.stats.start_time = 1_000;
        for region in Region::ALL {
            state = answer_all(&state, &catalog, region);
        }
        let (done, first) =
            finish_game(&state, &catalog, EndingPolicy::default(), 601_000).unwrap();

        // A stricter policy and a much later clock change nothing.
        let strict = EndingPolicy {
            good_threshold: 100,
            ..EndingPolicy::default()
        };
        let (again, second) = finish_game(&done, &catalog, strict, 9_000_000_000).unwrap();
        assert_eq!(second, first);
        assert_eq!(again, done);
        assert_eq!(again.stats.play_time, 600);
    }

    #[test]
    fn setup_trims_name_and_stamps_start() {
        let player = Player {
            name: String::from("  Sari "),
            avatar: String::from("mahes"),
            difficulty: DifficultyTier::Adventure,
        };
        let state = complete_setup(&initial_state(), player, 1_700_000_000_000).unwrap();
        assert_eq!(state.player.name, "Sari");
        assert_eq!(state.stats.start_time, 1_700_000_000_000);
    }

    #[test]
    fn setup_rejects_blank_name() {
        let player = Player {
            name: String::from("   "),
            ..Player::default()
        };
        let result = complete_setup(&initial_state(), player, 0);
        assert!(matches!(result, Err(ProgressionError::EmptyPlayerName)));
    }

    #[test]
    fn play_time_is_whole_seconds_and_never_negative() {
        let mut state = initial_state();
        state.stats.start_time = 10_000;
        assert_eq!(record_play_time(&state, 75_999).stats.play_time, 65);
        assert_eq!(record_play_time(&state, 5_000).stats.play_time, 0);
    }
}
