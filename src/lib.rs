//! # penney-sim
//!
//! Monte Carlo simulation of Penney's Game played over shuffled two-colour decks.
//!
//! ## Design Principles
//!
//! 1. **Reproducible Streams**: Every deck comes from a seeded ChaCha8 stream
//!    whose position is persisted. Appending to a seed continues the stream
//!    exactly, so `n + n` decks equal `2n` decks.
//!
//! 2. **Exhaustive Pairs**: Every deck is scored for all 56 ordered pairs of
//!    distinct 3-card sequences under both the cards and tricks rules.
//!
//! 3. **Explicit State**: No globals. Generator state is passed in and handed
//!    back, and storage goes through the `StorageBackend` trait.
//!
//! ## Modules
//!
//! - `core`: Decks, sequences, RNG, configuration
//! - `generation`: Resumable balanced deck generation
//! - `matching`: Rolling-window sequence matching and scoring
//! - `analysis`: Parallel tallies over all pairs, aggregate tables, win grids
//! - `storage`: Backends plus deck, state and result files
//! - `simulation`: The generate, store, analyze, merge pipeline

pub mod analysis;
pub mod core;
pub mod error;
pub mod generation;
pub mod matching;
pub mod simulation;
pub mod storage;

// Re-export commonly used types
pub use crate::core::{
    Deck, DeckRng, DeckRngState,
    SequencePair, SequenceTriple,
    SimConfig, DEFAULT_HALF_DECK_SIZE,
};

pub use crate::error::{PenneyError, Result};

pub use crate::generation::{generate, DeckGenerator, Generation, RngState};

pub use crate::matching::{score_cards, score_tricks, MatchOutcome, Scoring, SequenceMatcher, Verdict};

pub use crate::analysis::{AggregateTable, CombinationAnalyzer, OutcomeCounts, PairRecord, WinGrid};

pub use crate::storage::{FsBackend, MemoryBackend, StorageBackend};

pub use crate::simulation::{RunReport, RunRequest, SeedSummary, Simulation};
