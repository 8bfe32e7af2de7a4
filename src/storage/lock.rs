//! Single-writer guard per seed.

use tracing::warn;

use super::backend::StorageBackend;
use super::keys;
use crate::error::{PenneyError, Result};

/// Held for the duration of a run that writes a seed's files.
///
/// Released on drop. A second `acquire` for the same seed fails with
/// [`PenneyError::SeedLocked`] until then.
pub struct SeedLock<'a, B: StorageBackend + ?Sized> {
    backend: &'a B,
    key: String,
    seed: u64,
}

impl<'a, B: StorageBackend + ?Sized> SeedLock<'a, B> {
    pub fn acquire(backend: &'a B, seed: u64) -> Result<Self> {
        let key = keys::lock(seed);
        if !backend.try_lock(&key)? {
            return Err(PenneyError::SeedLocked(seed));
        }
        Ok(Self { backend, key, seed })
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<B: StorageBackend + ?Sized> Drop for SeedLock<'_, B> {
    fn drop(&mut self) {
        if let Err(e) = self.backend.unlock(&self.key) {
            warn!(seed = self.seed, error = %e, "failed to release seed lock");
        }
    }
}
