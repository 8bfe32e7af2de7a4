//! Simulation configuration parameters.

use serde::{Deserialize, Serialize};

/// Default number of cards of each colour (a standard 52-card deck).
pub const DEFAULT_HALF_DECK_SIZE: usize = 26;

/// Default maximum number of decks stored in one batch file.
pub const DEFAULT_DECKS_PER_FILE: usize = 50_000;

/// Simulation configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Cards of each colour per deck (deck length is twice this).
    pub half_deck_size: usize,

    /// Maximum decks per persisted batch file.
    /// Only affects storage layout, never the deck sequence.
    pub decks_per_file: usize,

    /// Score decks on the rayon worker pool.
    /// Results are identical either way.
    pub parallel: bool,

    /// Emit a progress event every this many decks (0 = never).
    pub progress_interval: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            half_deck_size: DEFAULT_HALF_DECK_SIZE,
            decks_per_file: DEFAULT_DECKS_PER_FILE,
            parallel: true,
            progress_interval: 10_000,
        }
    }
}

impl SimConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the half-deck size.
    pub fn with_half_deck_size(mut self, half_deck_size: usize) -> Self {
        self.half_deck_size = half_deck_size;
        self
    }

    /// Set the batch file capacity. Values below 1 are raised to 1.
    pub fn with_decks_per_file(mut self, decks_per_file: usize) -> Self {
        self.decks_per_file = decks_per_file.max(1);
        self
    }

    /// Enable or disable parallel analysis.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the progress reporting interval.
    pub fn with_progress_interval(mut self, decks: usize) -> Self {
        self.progress_interval = decks;
        self
    }
}
