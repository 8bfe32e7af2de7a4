//! Crate-wide error type.
//!
//! Every fallible operation returns [`Result`]. Nothing is retried: a
//! simulation is replayed deliberately from its persisted state, never
//! blindly re-run.

use thiserror::Error;

/// Errors surfaced by generation, analysis and storage.
#[derive(Debug, Error)]
pub enum PenneyError {
    /// Append requested but no RNG state was persisted for the seed.
    #[error("no RNG state found for seed {0}; run without append first")]
    StateNotFound(u64),

    /// Analysis requested for a seed with no stored decks.
    #[error("no deck files found for seed {0}")]
    DataNotFound(u64),

    /// A sequence is not three binary symbols, or both players chose the same one.
    #[error("invalid sequence: {0}")]
    InvalidSequence(String),

    /// Aggregate counts disagree with each other or with the deck count.
    #[error("corrupt state: {0}")]
    CorruptState(String),

    /// Raw cards do not form a balanced binary deck.
    #[error("invalid deck: {0}")]
    InvalidDeck(String),

    /// Append requested with a half-deck size other than the stored one.
    #[error("half-deck size mismatch: stored state uses {expected}, requested {found}")]
    HalfDeckMismatch { expected: usize, found: usize },

    /// Another writer currently holds the seed.
    ///
    /// A run that crashed leaves its lock behind. Once no run is active,
    /// deleting `seed_<seed>.lock` from the data directory frees the seed.
    #[error(
        "seed {0} is locked by another run; if none is active, delete seed_{0}.lock from the data directory"
    )]
    SeedLocked(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PenneyError>;
