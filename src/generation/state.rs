//! Persistable generator state.

use serde::{Deserialize, Serialize};

use crate::core::DeckRngState;

/// Where a seed's deck stream stands.
///
/// Saved after every generation call so that an append run continues the
/// exact same stream: decks are never repeated and never skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    /// Seed the stream was started from.
    pub seed: u64,

    /// Cards of each colour in every deck of this stream.
    pub half_deck_size: usize,

    /// Decks produced so far across all calls.
    pub decks_generated: u64,

    /// Position of the underlying ChaCha8 stream.
    pub rng: DeckRngState,
}

impl RngState {
    /// The start of the stream for `seed`.
    #[must_use]
    pub const fn new(seed: u64, half_deck_size: usize) -> Self {
        Self {
            seed,
            half_deck_size,
            decks_generated: 0,
            rng: DeckRngState::start(seed),
        }
    }

    /// Length of every deck in this stream.
    #[must_use]
    pub const fn deck_len(&self) -> usize {
        self.half_deck_size * 2
    }
}
