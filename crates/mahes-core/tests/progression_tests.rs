//! Integration tests for the progression engine against the reference
//! catalog.
//!
//! The invariant checks sweep every answer sequence the reference content
//! allows along a few deterministic orderings instead of sampling randomly.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::too_many_lines
)]

use mahes_catalog::Catalog;
use mahes_core::progression::{
    add_fragment, apply_answer, fragment_count, has_all_fragments, initial_state,
    is_game_complete, maybe_unlock_next_region, next_question, update_karma, use_hint,
};
use mahes_core::{EndingPolicy, ProgressionError, calculate_ending};
use mahes_types::{
    EndingType, FRAGMENT_CAP, FragmentKind, GameState, ItemEffect, KARMA_MAX, OptionId,
    QuestionId, Region,
};

fn reference() -> Catalog {
    Catalog::reference().expect("reference catalog")
}

/// Answer with `pick` for every question, following `next_question` and
/// unlocking after each answer, the way a session does.
fn play_through(
    catalog: &Catalog,
    mut pick: impl FnMut(&mahes_types::Question) -> OptionId,
    mut check: impl FnMut(&GameState, &GameState),
) -> GameState {
    let mut state = initial_state();
    for region in Region::ALL {
        while let Some(question) = next_question(&state, catalog, region) {
            let question = question.clone();
            let option_id = pick(&question);
            let option = question.option(&option_id).expect("picked option").clone();
            let answered = apply_answer(&state, &question, &option).expect("answer accepted");
            let unlocked = maybe_unlock_next_region(&answered, catalog, region);
            check(&state, &unlocked);
            state = unlocked;
        }
    }
    state
}

fn assert_invariants(before: &GameState, after: &GameState) {
    assert!(after.stats.karma <= KARMA_MAX);
    assert!(after.inventory.fragments.crown <= FRAGMENT_CAP);
    assert!(after.inventory.fragments.sash <= FRAGMENT_CAP);

    // Completed list is append-only with no duplicates.
    let prior = &before.progress.completed_challenges;
    assert!(after.progress.completed_challenges.starts_with(prior));
    let mut ids = after.progress.completed_challenges.clone();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), after.progress.completed_challenges.len());

    // Unlocks only grow and always include region 1.
    assert!(after.progress.unlocked_regions.contains(&Region::PulauAwan));
    assert!(before.progress.unlocked_regions.is_subset(&after.progress.unlocked_regions));
    assert!(after.progress.is_unlocked(after.progress.current_region));
}

#[test]
fn first_answer_awards_score_karma_and_crown() {
    let catalog = reference();
    let first = next_question(&initial_state(), &catalog, Region::PulauAwan).unwrap();
    assert_eq!(first.id, QuestionId::from("q001_moral"));
    let option = first.option(&OptionId::from("a")).unwrap();
    assert_eq!(option.effect.score, 15);
    assert_eq!(option.effect.karma, 10);
    assert_eq!(option.effect.item, ItemEffect::Fragment(FragmentKind::Crown));

    let state = apply_answer(&initial_state(), first, option).unwrap();
    assert_eq!(state.stats.score, 15);
    assert_eq!(state.stats.karma, 60);
    assert_eq!(fragment_count(&state, FragmentKind::Crown), 1);
    assert_eq!(
        state.progress.completed_challenges,
        vec![QuestionId::from("q001_moral")]
    );
}

#[test]
fn fifth_answer_in_region_one_unlocks_region_two() {
    let catalog = reference();
    let mut state = initial_state();
    for answered in 1..=5 {
        let question = next_question(&state, &catalog, Region::PulauAwan)
            .unwrap()
            .clone();
        let option = question.options[0].clone();
        state = apply_answer(&state, &question, &option).unwrap();
        state = maybe_unlock_next_region(&state, &catalog, Region::PulauAwan);
        assert_eq!(state.progress.is_unlocked(Region::HutanBiru), answered == 5);
    }
    let unlocked: Vec<Region> = state.progress.unlocked_regions.iter().copied().collect();
    assert_eq!(unlocked, vec![Region::PulauAwan, Region::HutanBiru]);
    assert_eq!(state.progress.current_region, Region::HutanBiru);
    assert!(!state.progress.is_unlocked(Region::KotaTepiLaut));
}

#[test]
fn hint_with_zero_balance_leaves_state_unchanged() {
    let state = initial_state();
    let snapshot = state.clone();
    assert!(matches!(use_hint(&state), Err(ProgressionError::InsufficientHints)));
    assert_eq!(state, snapshot);
}

#[test]
fn resubmitting_any_reference_question_is_rejected() {
    let catalog = reference();
    let mut state = initial_state();
    for question in catalog.questions_in_region(Region::PulauAwan) {
        let first = question.options[0].clone();
        state = apply_answer(&state, question, &first).unwrap();
        for option in &question.options {
            let again = apply_answer(&state, question, option);
            assert!(matches!(again, Err(ProgressionError::AlreadyCompleted(_))));
        }
    }
    assert_eq!(state.progress.completed_challenges.len(), 5);
}

#[test]
fn invariants_hold_for_every_option_column() {
    let catalog = reference();
    // Always pick option a, then always b, then always c (falling back to
    // the last option for shorter questions).
    for column in 0..3_usize {
        let end = play_through(
            &catalog,
            |q| {
                let index = column.min(q.options.len() - 1);
                q.options[index].id.clone()
            },
            assert_invariants,
        );
        assert!(is_game_complete(&end, &catalog));
        assert_eq!(end.progress.unlocked_regions.len(), 3);
        assert_eq!(end.progress.completed_challenges.len(), catalog.len());
    }
}

#[test]
fn invariants_hold_when_alternating_options() {
    let catalog = reference();
    let mut turn = 0_usize;
    let end = play_through(
        &catalog,
        |q| {
            turn += 1;
            q.options[turn % q.options.len()].id.clone()
        },
        assert_invariants,
    );
    assert!(is_game_complete(&end, &catalog));
}

#[test]
fn best_run_collects_both_fragment_sets_and_reaches_good_ending() {
    let catalog = reference();
    let end = play_through(
        &catalog,
        |q| {
            q.options
                .iter()
                .find(|o| o.is_correct)
                .map_or_else(|| q.options[0].id.clone(), |o| o.id.clone())
        },
        assert_invariants,
    );
    assert!(has_all_fragments(&end));
    assert_eq!(
        EndingPolicy::default().resolve_state(&end),
        calculate_ending(end.stats.karma, true)
    );
    assert_eq!(calculate_ending(end.stats.karma, true), EndingType::Good);
}

#[test]
fn karma_sweep_stays_in_range() {
    let mut state = initial_state();
    for delta in [-200, -1, 0, 1, 37, 100, 250, i32::MIN, i32::MAX] {
        state = update_karma(&state, delta);
        assert!(state.stats.karma <= KARMA_MAX);
    }
    assert_eq!(state.stats.karma, KARMA_MAX);
}

#[test]
fn fragment_cap_sweep() {
    for extra in 0..20_u8 {
        let mut state = initial_state();
        for _ in 0..extra {
            state = add_fragment(&state, FragmentKind::Sash);
        }
        assert_eq!(
            fragment_count(&state, FragmentKind::Sash),
            extra.min(FRAGMENT_CAP)
        );
    }
}

#[test]
fn unlocks_never_skip_a_region() {
    let catalog = reference();
    // Answer region 3 entirely while region 2 is untouched.
    let mut state = initial_state();
    for question in catalog.questions_in_region(Region::KotaTepiLaut) {
        state = apply_answer(&state, question, &question.options[0]).unwrap();
    }
    for region in Region::ALL {
        state = maybe_unlock_next_region(&state, &catalog, region);
    }
    assert_eq!(state.progress.unlocked_regions.len(), 1);
}
