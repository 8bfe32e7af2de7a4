//! Cumulative results, one JSON table per seed.

use tracing::{debug, info};

use super::backend::StorageBackend;
use super::keys;
use crate::analysis::{AggregateTable, TableRow};
use crate::error::{PenneyError, Result};

/// Merges, saves and loads [`AggregateTable`]s.
pub struct ResultStore<'a, B: StorageBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: StorageBackend + ?Sized> ResultStore<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Add `new` onto `prior`. Without a prior, `new` is the full record.
    ///
    /// Both inputs and the sum are validated; any broken invariant is
    /// [`PenneyError::CorruptState`].
    pub fn merge(&self, new: AggregateTable, prior: Option<&AggregateTable>) -> Result<AggregateTable> {
        new.validate()?;
        let Some(prior) = prior else {
            return Ok(new);
        };
        prior.validate()?;
        let merged = prior.merge(&new)?;
        debug!(
            prior = prior.decks_processed(),
            added = new.decks_processed(),
            total = merged.decks_processed(),
            "merged results"
        );
        Ok(merged)
    }

    /// Write `table` as the results for `seed`.
    pub fn persist(&self, table: &AggregateTable, seed: u64) -> Result<()> {
        let json = serde_json::to_vec_pretty(&table.rows())?;
        self.backend.save(&keys::results(seed), &json)?;
        info!(seed, decks = table.decks_processed(), "saved results");
        Ok(())
    }

    /// The stored results for `seed`, validated.
    pub fn load(&self, seed: u64) -> Result<Option<AggregateTable>> {
        let Some(bytes) = self.backend.load(&keys::results(seed))? else {
            return Ok(None);
        };
        let rows: Vec<TableRow> = serde_json::from_slice(&bytes)?;
        let table = AggregateTable::from_rows(rows).map_err(|e| match e {
            PenneyError::InvalidSequence(msg) => {
                PenneyError::CorruptState(format!("results for seed {seed}: {msg}"))
            }
            other => other,
        })?;
        Ok(Some(table))
    }

    pub fn remove(&self, seed: u64) -> Result<()> {
        self.backend.remove(&keys::results(seed))
    }
}
