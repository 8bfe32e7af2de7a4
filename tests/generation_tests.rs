//! Deck stream determinism and continuation.

use penney_sim::generation::{generate, DeckGenerator, RngState};
use proptest::prelude::*;

// =============================================================================
// Continuation
// =============================================================================

#[test]
fn test_split_generation_equals_single_call() {
    let start = RngState::new(42, 26);
    let whole = generate(10_000, &start).unwrap();

    let first = generate(5_000, &start).unwrap();
    let second = generate(5_000, &first.state).unwrap();

    let mut joined = first.decks;
    joined.extend(second.decks);
    assert_eq!(joined, whole.decks);
    assert_eq!(second.state, whole.state);
    assert_eq!(whole.state.decks_generated, 10_000);
}

#[test]
fn test_state_survives_json() {
    let first = generate(123, &RngState::new(9, 26)).unwrap();
    let json = serde_json::to_string(&first.state).unwrap();
    let restored: RngState = serde_json::from_str(&json).unwrap();

    let resumed = generate(50, &restored).unwrap();
    let direct = generate(50, &first.state).unwrap();
    assert_eq!(resumed.decks, direct.decks);
}

#[test]
fn test_iterator_matches_generate() {
    let from_iter: Vec<_> = DeckGenerator::fresh(3, 5).unwrap().take(40).collect();
    let from_fn = generate(40, &RngState::new(3, 5)).unwrap().decks;
    assert_eq!(from_iter, from_fn);
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_seed_same_decks() {
    let a = generate(500, &RngState::new(7, 26)).unwrap();
    let b = generate(500, &RngState::new(7, 26)).unwrap();
    assert_eq!(a.decks, b.decks);
    assert_eq!(a.state, b.state);
}

#[test]
fn test_different_seeds_differ() {
    let a = generate(50, &RngState::new(1, 26)).unwrap().decks;
    let b = generate(50, &RngState::new(2, 26)).unwrap().decks;
    assert_ne!(a, b);
}

#[test]
fn test_zero_half_deck_rejected() {
    assert!(generate(1, &RngState::new(1, 0)).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_decks_are_balanced(seed in any::<u64>(), half in 1usize..40, n in 0usize..30) {
        let generation = generate(n, &RngState::new(seed, half)).unwrap();
        prop_assert_eq!(generation.decks.len(), n);
        prop_assert_eq!(generation.state.decks_generated, n as u64);
        for deck in &generation.decks {
            prop_assert_eq!(deck.len(), 2 * half);
            prop_assert_eq!(deck.count(0), half);
            prop_assert_eq!(deck.count(1), half);
        }
    }

    #[test]
    fn prop_any_split_continues_stream(seed in any::<u64>(), a in 0usize..40, b in 0usize..40) {
        let start = RngState::new(seed, 6);
        let first = generate(a, &start).unwrap();
        let second = generate(b, &first.state).unwrap();
        let whole = generate(a + b, &start).unwrap();

        let mut joined = first.decks;
        joined.extend(second.decks);
        prop_assert_eq!(joined, whole.decks);
    }
}
