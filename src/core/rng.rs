//! Deterministic, resumable random number generation for deck shuffling.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Resumable**: O(1) state capture and restore at any point of the stream
//! - **Serializable**: State is a seed plus a ChaCha8 word position
//!
//! ## Resuming a stream
//!
//! ```
//! use penney_sim::core::DeckRng;
//!
//! let mut rng = DeckRng::new(42);
//! let mut first = [0u8, 0, 0, 1, 1, 1];
//! rng.shuffle(&mut first);
//!
//! // Capture the position, keep going, then resume from the capture.
//! let saved = rng.state();
//! let mut expected = [0u8, 0, 0, 1, 1, 1];
//! rng.shuffle(&mut expected);
//!
//! let mut resumed = DeckRng::from_state(&saved);
//! let mut actual = [0u8, 0, 0, 1, 1, 1];
//! resumed.shuffle(&mut actual);
//! assert_eq!(expected, actual);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seeded RNG whose position in the stream can be saved and restored.
///
/// Uses ChaCha8 for speed while maintaining cryptographic quality randomness.
/// There is no process-wide generator: callers own a `DeckRng` and hand its
/// [`DeckRngState`] to whoever continues the stream.
#[derive(Clone, Debug)]
pub struct DeckRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DeckRng {
    /// Create a new RNG at the start of the stream for `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle a slice in place with a uniform Fisher-Yates permutation.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> DeckRngState {
        DeckRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &DeckRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

impl DeckRngState {
    /// State at the very start of the stream for `seed`.
    #[must_use]
    pub const fn start(seed: u64) -> Self {
        Self { seed, word_pos: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shuffled(rng: &mut DeckRng) -> Vec<u32> {
        let mut data: Vec<u32> = (0..32).collect();
        rng.shuffle(&mut data);
        data
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = DeckRng::new(42);
        let mut rng2 = DeckRng::new(42);

        for _ in 0..20 {
            assert_eq!(shuffled(&mut rng1), shuffled(&mut rng2));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = DeckRng::new(1);
        let mut rng2 = DeckRng::new(2);

        assert_ne!(shuffled(&mut rng1), shuffled(&mut rng2));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = DeckRng::new(42);
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let original = data.clone();

        rng.shuffle(&mut data);

        // Should be same elements, different order (very likely)
        assert_ne!(data, original);
        data.sort();
        assert_eq!(data, original);
    }

    #[test]
    fn test_state_serialization() {
        let mut rng = DeckRng::new(42);

        // Advance the RNG
        for _ in 0..100 {
            shuffled(&mut rng);
        }

        // Save state
        let state = rng.state();

        // Continue generating
        let expected: Vec<_> = (0..10).map(|_| shuffled(&mut rng)).collect();

        // Restore and verify
        let mut restored = DeckRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| shuffled(&mut restored)).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_start_state_matches_new() {
        let mut fresh = DeckRng::new(7);
        let mut from_start = DeckRng::from_state(&DeckRngState::start(7));

        assert_eq!(fresh.state(), DeckRngState::start(7));
        assert_eq!(shuffled(&mut fresh), shuffled(&mut from_start));
    }

    #[test]
    fn test_state_serde() {
        let state = DeckRngState {
            seed: 42,
            word_pos: 12345,
        };

        let json = serde_json::to_string(&state).unwrap();
        let deserialized: DeckRngState = serde_json::from_str(&json).unwrap();

        assert_eq!(state, deserialized);
    }
}
