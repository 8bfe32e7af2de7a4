//! Persisted generator state, one JSON file per seed.

use tracing::debug;

use super::backend::StorageBackend;
use super::keys;
use crate::error::Result;
use crate::generation::RngState;

/// Loads and saves [`RngState`] records.
pub struct StateStore<'a, B: StorageBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: StorageBackend + ?Sized> StateStore<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// The saved state for `seed`, if any.
    pub fn load(&self, seed: u64) -> Result<Option<RngState>> {
        self.backend
            .load(&keys::state(seed))?
            .map(|bytes| serde_json::from_slice(&bytes).map_err(Into::into))
            .transpose()
    }

    pub fn save(&self, state: &RngState) -> Result<()> {
        let json = serde_json::to_vec_pretty(state)?;
        self.backend.save(&keys::state(state.seed), &json)?;
        debug!(seed = state.seed, decks = state.decks_generated, "saved rng state");
        Ok(())
    }

    pub fn remove(&self, seed: u64) -> Result<()> {
        self.backend.remove(&keys::state(seed))
    }

    /// Seeds with a saved state, ascending.
    pub fn seeds(&self) -> Result<Vec<u64>> {
        let mut seeds: Vec<u64> = self
            .backend
            .list(keys::STATE_PREFIX)?
            .iter()
            .filter_map(|key| keys::seed_from_state(key))
            .collect();
        seeds.sort_unstable();
        Ok(seeds)
    }
}
