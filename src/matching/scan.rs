//! The left-to-right scan shared by both scoring rules.
//!
//! Cards are drawn one at a time into a pile. Once the pile holds at least
//! three cards, the last three are compared with player 1's sequence and then
//! player 2's. A match empties the pile, so the next match needs three fresh
//! cards: matched cards are never reused by an overlapping window. Whatever is
//! left in the pile when the deck runs out belongs to nobody.

use super::outcome::{DeckOutcome, MatchOutcome, Player};
use crate::core::{Deck, SequencePair, SEQUENCE_LEN};

const WINDOW_MASK: u8 = (1 << SEQUENCE_LEN) - 1;

/// One completed pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Whose sequence appeared.
    pub player: Player,
    /// Cards in the pile when it was won (always at least 3).
    pub pile: u32,
    /// Number of cards drawn so far, i.e. index just past the matching window.
    pub end: usize,
}

/// Iterator over the matches of one deck, in deck order.
#[derive(Clone, Debug)]
pub struct Matches<'a> {
    cards: &'a [u8],
    pos: usize,
    window: u8,
    pile: u32,
    player1: u8,
    player2: u8,
}

impl<'a> Matches<'a> {
    pub(crate) fn new(cards: &'a [u8], player1: u8, player2: u8) -> Self {
        Self {
            cards,
            pos: 0,
            window: 0,
            pile: 0,
            player1,
            player2,
        }
    }
}

impl Iterator for Matches<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        while let Some(&card) = self.cards.get(self.pos) {
            self.pos += 1;
            self.pile += 1;
            self.window = ((self.window << 1) | (card & 1)) & WINDOW_MASK;

            if self.pile < SEQUENCE_LEN as u32 {
                continue;
            }
            let player = if self.window == self.player1 {
                Player::One
            } else if self.window == self.player2 {
                Player::Two
            } else {
                continue;
            };

            let found = Match {
                player,
                pile: self.pile,
                end: self.pos,
            };
            self.pile = 0;
            return Some(found);
        }
        None
    }
}

/// Scores decks for one sequence pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceMatcher {
    pair: SequencePair,
}

impl SequenceMatcher {
    #[must_use]
    pub const fn new(pair: SequencePair) -> Self {
        Self { pair }
    }

    #[must_use]
    pub const fn pair(&self) -> SequencePair {
        self.pair
    }

    /// Every pile won in `deck`, in order.
    #[must_use]
    pub fn matches<'a>(&self, deck: &'a Deck) -> Matches<'a> {
        Matches::new(
            deck.cards(),
            self.pair.player1().bits(),
            self.pair.player2().bits(),
        )
    }

    /// "Cards" rule: total pile sizes won by each player.
    #[must_use]
    pub fn score_cards(&self, deck: &Deck) -> MatchOutcome {
        let mut outcome = MatchOutcome::default();
        for m in self.matches(deck) {
            outcome.award(m.player, m.pile);
        }
        outcome
    }

    /// "Tricks" rule: number of piles won by each player.
    #[must_use]
    pub fn score_tricks(&self, deck: &Deck) -> MatchOutcome {
        let mut outcome = MatchOutcome::default();
        for m in self.matches(deck) {
            outcome.award(m.player, 1);
        }
        outcome
    }

    /// Both rules from one pass over the deck.
    #[must_use]
    pub fn score(&self, deck: &Deck) -> DeckOutcome {
        let mut outcome = DeckOutcome::default();
        for m in self.matches(deck) {
            outcome.cards.award(m.player, m.pile);
            outcome.tricks.award(m.player, 1);
        }
        outcome
    }
}

/// Score `deck` for `pair` under the "cards" rule.
#[must_use]
pub fn score_cards(deck: &Deck, pair: &SequencePair) -> MatchOutcome {
    SequenceMatcher::new(*pair).score_cards(deck)
}

/// Score `deck` for `pair` under the "tricks" rule.
#[must_use]
pub fn score_tricks(deck: &Deck, pair: &SequencePair) -> MatchOutcome {
    SequenceMatcher::new(*pair).score_tricks(deck)
}

/// Score `deck` for `pair` under both rules.
#[must_use]
pub fn score(deck: &Deck, pair: &SequencePair) -> DeckOutcome {
    SequenceMatcher::new(*pair).score(deck)
}
