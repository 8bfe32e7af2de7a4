//! Balanced binary decks.
//!
//! A deck holds `2 * half_deck_size` cards, exactly half of them `0` and half
//! `1`. Decks are immutable once built; the only ways to obtain one are the
//! validating [`Deck::from_cards`] and the generator.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{PenneyError, Result};

/// Cards stored inline up to a standard 52-card deck (plus headroom).
type CardVec = SmallVec<[u8; 64]>;

/// One shuffled deck of binary card colours.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Deck {
    cards: CardVec,
}

impl Deck {
    /// Validate raw cards: every symbol in {0, 1}, equal counts of each.
    pub fn from_cards(cards: &[u8]) -> Result<Self> {
        if cards.is_empty() || cards.len() % 2 != 0 {
            return Err(PenneyError::InvalidDeck(format!(
                "deck length {} is not a positive even number",
                cards.len()
            )));
        }
        if let Some(&bad) = cards.iter().find(|&&c| c > 1) {
            return Err(PenneyError::InvalidDeck(format!("symbol {bad} is not binary")));
        }
        let ones = cards.iter().filter(|&&c| c == 1).count();
        if ones * 2 != cards.len() {
            return Err(PenneyError::InvalidDeck(format!(
                "{ones} ones in a deck of {} cards",
                cards.len()
            )));
        }
        Ok(Self {
            cards: CardVec::from_slice(cards),
        })
    }

    /// The unshuffled deck: `half_deck_size` zeros followed by as many ones.
    pub(crate) fn sorted_cards(half_deck_size: usize) -> CardVec {
        let mut cards = CardVec::with_capacity(half_deck_size * 2);
        cards.resize(half_deck_size, 0);
        cards.resize(half_deck_size * 2, 1);
        cards
    }

    /// Wrap cards already known to be balanced (produced by shuffling
    /// [`Deck::sorted_cards`]).
    pub(crate) fn from_balanced(cards: CardVec) -> Self {
        debug_assert!(cards.len() % 2 == 0);
        debug_assert_eq!(cards.iter().filter(|&&c| c == 1).count() * 2, cards.len());
        Self { cards }
    }

    /// The cards, top of the deck first.
    #[must_use]
    pub fn cards(&self) -> &[u8] {
        &self.cards
    }

    /// Total number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false for a valid deck; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards of each colour.
    #[must_use]
    pub fn half_deck_size(&self) -> usize {
        self.cards.len() / 2
    }

    /// How many cards show `symbol`.
    #[must_use]
    pub fn count(&self, symbol: u8) -> usize {
        self.cards.iter().filter(|&&c| c == symbol).count()
    }
}

impl TryFrom<Vec<u8>> for Deck {
    type Error = PenneyError;

    fn try_from(cards: Vec<u8>) -> Result<Self> {
        Self::from_cards(&cards)
    }
}

impl From<Deck> for Vec<u8> {
    fn from(deck: Deck) -> Self {
        deck.cards.into_vec()
    }
}

impl AsRef<[u8]> for Deck {
    fn as_ref(&self) -> &[u8] {
        &self.cards
    }
}
