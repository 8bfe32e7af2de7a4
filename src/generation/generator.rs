//! Seeded, resumable deck generation.

use tracing::debug;

use super::state::RngState;
use crate::core::{Deck, DeckRng};
use crate::error::{PenneyError, Result};

/// Decks produced by one generation call and the state to resume from.
#[derive(Clone, Debug)]
pub struct Generation {
    /// The new decks, in stream order.
    pub decks: Vec<Deck>,

    /// Stream position after the last deck.
    pub state: RngState,
}

/// Produces balanced decks from a seeded stream.
///
/// Each deck is `half_deck_size` zeros and `half_deck_size` ones put through a
/// Fisher-Yates shuffle. Consecutive decks come from one continuous stream, so
/// generating `a` decks, saving [`DeckGenerator::state`], resuming and
/// generating `b` more yields exactly the decks of a single `a + b` call.
///
/// Also an [`Iterator`] over an endless stream of decks.
#[derive(Clone, Debug)]
pub struct DeckGenerator {
    rng: DeckRng,
    half_deck_size: usize,
    decks_generated: u64,
}

impl DeckGenerator {
    /// Start a new stream for `seed`.
    pub fn fresh(seed: u64, half_deck_size: usize) -> Result<Self> {
        Self::resume(&RngState::new(seed, half_deck_size))
    }

    /// Continue a stream from a saved state.
    pub fn resume(state: &RngState) -> Result<Self> {
        if state.half_deck_size == 0 {
            return Err(PenneyError::InvalidDeck(
                "half-deck size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            rng: DeckRng::from_state(&state.rng),
            half_deck_size: state.half_deck_size,
            decks_generated: state.decks_generated,
        })
    }

    /// Shuffle and return the next deck of the stream.
    pub fn next_deck(&mut self) -> Deck {
        let mut cards = Deck::sorted_cards(self.half_deck_size);
        self.rng.shuffle(&mut cards);
        self.decks_generated += 1;
        Deck::from_balanced(cards)
    }

    /// Produce the next `n_decks` decks.
    pub fn generate(&mut self, n_decks: usize) -> Vec<Deck> {
        debug!(
            seed = self.rng.seed(),
            n_decks,
            from = self.decks_generated,
            "generating decks"
        );
        (0..n_decks).map(|_| self.next_deck()).collect()
    }

    /// Current stream position, suitable for persisting.
    #[must_use]
    pub fn state(&self) -> RngState {
        RngState {
            seed: self.rng.seed(),
            half_deck_size: self.half_deck_size,
            decks_generated: self.decks_generated,
            rng: self.rng.state(),
        }
    }

    /// Decks produced so far, including those from earlier calls on this stream.
    #[must_use]
    pub fn decks_generated(&self) -> u64 {
        self.decks_generated
    }
}

impl Iterator for DeckGenerator {
    type Item = Deck;

    fn next(&mut self) -> Option<Deck> {
        Some(self.next_deck())
    }
}

/// Generate `n_decks` decks continuing from `start`.
///
/// The state is passed in and handed back; nothing is global.
pub fn generate(n_decks: usize, start: &RngState) -> Result<Generation> {
    let mut generator = DeckGenerator::resume(start)?;
    let decks = generator.generate(n_decks);
    Ok(Generation {
        decks,
        state: generator.state(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decks_are_balanced() {
        let mut generator = DeckGenerator::fresh(42, 26).unwrap();
        for deck in generator.generate(500) {
            assert_eq!(deck.len(), 52);
            assert_eq!(deck.count(0), 26);
            assert_eq!(deck.count(1), 26);
        }
    }

    #[test]
    fn test_determinism() {
        let a = generate(200, &RngState::new(7, 26)).unwrap();
        let b = generate(200, &RngState::new(7, 26)).unwrap();
        assert_eq!(a.decks, b.decks);
        assert_eq!(a.state, b.state);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate(20, &RngState::new(1, 26)).unwrap();
        let b = generate(20, &RngState::new(2, 26)).unwrap();
        assert_ne!(a.decks, b.decks);
    }

    #[test]
    fn test_continuation_is_concatenation() {
        let whole = generate(300, &RngState::new(42, 26)).unwrap();

        let first = generate(120, &RngState::new(42, 26)).unwrap();
        let second = generate(180, &first.state).unwrap();

        let mut joined = first.decks;
        joined.extend(second.decks);
        assert_eq!(joined, whole.decks);
        assert_eq!(second.state, whole.state);
        assert_eq!(second.state.decks_generated, 300);
    }

    #[test]
    fn test_iterator_matches_generate() {
        let from_iter: Vec<Deck> = DeckGenerator::fresh(3, 5).unwrap().take(10).collect();
        let from_call = generate(10, &RngState::new(3, 5)).unwrap();
        assert_eq!(from_iter, from_call.decks);
    }

    #[test]
    fn test_zero_half_deck_rejected() {
        assert!(matches!(
            DeckGenerator::fresh(1, 0),
            Err(PenneyError::InvalidDeck(_))
        ));
    }

    #[test]
    fn test_zero_decks() {
        let generation = generate(0, &RngState::new(9, 26)).unwrap();
        assert!(generation.decks.is_empty());
        assert_eq!(generation.state, RngState::new(9, 26));
    }
}
