//! Scoring a deck for a pair of sequences.
//!
//! ## Rules
//!
//! - **Cards**: whoever's sequence completes a pile takes every card in it.
//!   The award is the pile's card count; a pile always holds at least the
//!   three matching cards.
//! - **Tricks**: whoever's sequence completes a pile takes one trick.
//!
//! Both rules share one scan ([`Matches`]) and consume matched cards, so
//! windows never overlap a previous match. Unfinished piles are discarded.
//!
//! ## Usage
//!
//! ```
//! use penney_sim::core::{Deck, SequencePair};
//! use penney_sim::matching::{score_cards, score_tricks, MatchOutcome};
//!
//! let deck = Deck::from_cards(&[0, 0, 0, 1, 1, 1]).unwrap();
//! let pair = SequencePair::parse("001", "110").unwrap();
//!
//! assert_eq!(score_cards(&deck, &pair), MatchOutcome::new(4, 0));
//! assert_eq!(score_tricks(&deck, &pair), MatchOutcome::new(1, 0));
//! ```

pub mod outcome;
pub mod scan;

pub use outcome::{DeckOutcome, MatchOutcome, Player, Scoring, Verdict};
pub use scan::{score, score_cards, score_tricks, Match, Matches, SequenceMatcher};
