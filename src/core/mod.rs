//! Core types: decks, sequences, RNG, configuration.
//!
//! Everything else in the crate is built from these. None of them touch
//! storage or threads.

pub mod config;
pub mod deck;
pub mod rng;
pub mod sequence;

pub use config::{SimConfig, DEFAULT_DECKS_PER_FILE, DEFAULT_HALF_DECK_SIZE};
pub use deck::Deck;
pub use rng::{DeckRng, DeckRngState};
pub use sequence::{SequencePair, SequenceTriple, SEQUENCE_LEN, TRIPLE_COUNT};
