//! The end-to-end pipeline: generate, store, analyze, merge, persist.
//!
//! ```
//! use penney_sim::simulation::{RunRequest, Simulation};
//! use penney_sim::storage::MemoryBackend;
//! use penney_sim::SimConfig;
//!
//! let sim = Simulation::new(MemoryBackend::new(), SimConfig::default());
//! sim.run(&RunRequest::new(200, 7)).unwrap();
//! let report = sim.run(&RunRequest::new(300, 7).appending()).unwrap();
//!
//! assert_eq!(report.total_decks, 500);
//! assert_eq!(report.table.decks_processed(), 500);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use crate::analysis::{AggregateTable, AnalyzerConfig, CombinationAnalyzer};
use crate::core::{SimConfig, DEFAULT_HALF_DECK_SIZE};
use crate::error::{PenneyError, Result};
use crate::generation::{generate, Generation, RngState};
use crate::storage::{DeckArchive, ResultStore, SeedLock, StateStore, StorageBackend};

/// One invocation of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Decks to generate in this run.
    pub n_decks: usize,
    pub seed: u64,
    pub half_deck_size: usize,
    /// Continue the seed's stream and results instead of starting over.
    pub append: bool,
}

impl RunRequest {
    /// A fresh run of `n_decks` standard decks.
    pub fn new(n_decks: usize, seed: u64) -> Self {
        Self {
            n_decks,
            seed,
            half_deck_size: DEFAULT_HALF_DECK_SIZE,
            append: false,
        }
    }

    pub fn with_half_deck_size(mut self, half_deck_size: usize) -> Self {
        self.half_deck_size = half_deck_size;
        self
    }

    /// Turn this into an append run.
    pub fn appending(mut self) -> Self {
        self.append = true;
        self
    }
}

/// What a run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub seed: u64,
    /// Decks generated by this run.
    pub new_decks: u64,
    /// Decks behind `table`, across every run on the seed.
    pub total_decks: u64,
    /// Cumulative results for the seed.
    pub table: AggregateTable,
}

/// A seed with stored state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub seed: u64,
    pub half_deck_size: usize,
    pub decks_generated: u64,
}

/// Runs the pipeline against one storage backend.
pub struct Simulation<B: StorageBackend> {
    backend: B,
    config: SimConfig,
    analyzer: CombinationAnalyzer,
}

impl<B: StorageBackend> Simulation<B> {
    pub fn new(backend: B, config: SimConfig) -> Self {
        let analyzer = CombinationAnalyzer::new(AnalyzerConfig::from(&config));
        Self {
            backend,
            config,
            analyzer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// A fresh request using the configured half-deck size.
    pub fn request(&self, n_decks: usize, seed: u64) -> RunRequest {
        RunRequest::new(n_decks, seed).with_half_deck_size(self.config.half_deck_size)
    }

    fn archive(&self) -> DeckArchive<'_, B> {
        DeckArchive::new(&self.backend, self.config.decks_per_file)
    }

    fn states(&self) -> StateStore<'_, B> {
        StateStore::new(&self.backend)
    }

    fn results(&self) -> ResultStore<'_, B> {
        ResultStore::new(&self.backend)
    }

    /// Generate, store and analyze `request.n_decks` decks.
    ///
    /// An append run resumes the seed's stream where the last run stopped
    /// and adds onto its results, so `run(n)` followed by an append of `n`
    /// leaves the same results as a single `run(2n)`. A fresh run replaces
    /// everything stored for the seed.
    ///
    /// Decks are written first, then results, then the generator state. The
    /// state is the commit point: decks or results beyond it were left by a
    /// run that failed part way and are repaired by the next append or
    /// [`Simulation::reanalyze`].
    pub fn run(&self, request: &RunRequest) -> Result<RunReport> {
        let started = Instant::now();
        let seed = request.seed;
        let _lock = SeedLock::acquire(&self.backend, seed)?;

        let (start, prior) = if request.append {
            self.resume_point(request)?
        } else {
            (RngState::new(seed, request.half_deck_size), None)
        };

        let Generation { decks, state } = generate(request.n_decks, &start)?;
        if !request.append {
            self.clear(seed)?;
        }
        self.archive().append(seed, &decks)?;

        let added = self.analyzer.analyze(&decks, None)?;
        let table = self.results().merge(added, prior.as_ref())?;
        if table.decks_processed() != state.decks_generated {
            return Err(PenneyError::CorruptState(format!(
                "results cover {} decks but {} were generated for seed {seed}",
                table.decks_processed(),
                state.decks_generated
            )));
        }

        self.results().persist(&table, seed)?;
        self.states().save(&state)?;

        info!(
            seed,
            new_decks = decks.len(),
            total_decks = state.decks_generated,
            append = request.append,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "run complete"
        );

        Ok(RunReport {
            seed,
            new_decks: decks.len() as u64,
            total_decks: state.decks_generated,
            table,
        })
    }

    /// Saved state and prior results for an append.
    ///
    /// Uncommitted trailing decks are dropped and results that disagree with
    /// the state are rebuilt from the committed decks.
    fn resume_point(&self, request: &RunRequest) -> Result<(RngState, Option<AggregateTable>)> {
        let seed = request.seed;
        let state = self
            .states()
            .load(seed)?
            .ok_or(PenneyError::StateNotFound(seed))?;
        if state.half_deck_size != request.half_deck_size {
            return Err(PenneyError::HalfDeckMismatch {
                expected: state.half_deck_size,
                found: request.half_deck_size,
            });
        }

        self.discard_uncommitted(&state)?;

        let prior = self.results().load(seed)?;
        let processed = prior.as_ref().map_or(0, AggregateTable::decks_processed);
        if processed == state.decks_generated {
            return Ok((state, prior));
        }
        if state.decks_generated == 0 {
            return Ok((state, None));
        }

        warn!(
            seed,
            processed,
            committed = state.decks_generated,
            "results out of step with state, rebuilding from stored decks"
        );
        let decks = self.archive().load_all(seed)?;
        let rebuilt = self.analyzer.analyze(&decks, None)?;
        Ok((state, Some(rebuilt)))
    }

    /// Cut the archive back to the decks `state` committed.
    fn discard_uncommitted(&self, state: &RngState) -> Result<()> {
        let seed = state.seed;
        let archive = self.archive();
        let stored = archive.deck_count(seed)?;
        if stored < state.decks_generated {
            return Err(PenneyError::CorruptState(format!(
                "seed {seed} has {stored} stored decks but its state records {}",
                state.decks_generated
            )));
        }
        if stored > state.decks_generated {
            archive.truncate(seed, state.decks_generated)?;
        }
        Ok(())
    }

    /// Remove the state first so a partial clear never leaves a state
    /// pointing at missing decks.
    fn clear(&self, seed: u64) -> Result<()> {
        self.states().remove(seed)?;
        self.results().remove(seed)?;
        let removed = self.archive().clear(seed)?;
        if removed > 0 {
            warn!(seed, files = removed, "replaced earlier decks for seed");
        }
        Ok(())
    }

    /// Rebuild a seed's results from its stored decks.
    ///
    /// With a saved state, only the decks it committed are analyzed and any
    /// later ones are discarded.
    pub fn reanalyze(&self, seed: u64) -> Result<AggregateTable> {
        let _lock = SeedLock::acquire(&self.backend, seed)?;
        if let Some(state) = self.states().load(seed)? {
            self.discard_uncommitted(&state)?;
        }
        let decks = self.archive().load_all(seed)?;

        let table = self.analyzer.analyze(&decks, None)?;
        self.results().persist(&table, seed)?;
        info!(seed, decks = decks.len(), "reanalysis complete");
        Ok(table)
    }

    /// Every seed with saved state, ascending.
    pub fn processed_seeds(&self) -> Result<Vec<SeedSummary>> {
        let states = self.states();
        let mut seeds = Vec::new();
        for seed in states.seeds()? {
            if let Some(state) = states.load(seed)? {
                seeds.push(SeedSummary {
                    seed,
                    half_deck_size: state.half_deck_size,
                    decks_generated: state.decks_generated,
                });
            }
        }
        Ok(seeds)
    }

    /// Stored results for `seed`.
    pub fn load_results(&self, seed: u64) -> Result<Option<AggregateTable>> {
        self.results().load(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    fn sim() -> Simulation<MemoryBackend> {
        Simulation::new(
            MemoryBackend::new(),
            SimConfig::default().with_decks_per_file(64),
        )
    }

    #[test]
    fn test_fresh_run_persists_everything() {
        let sim = sim();
        let report = sim.run(&RunRequest::new(150, 3)).unwrap();

        assert_eq!(report.new_decks, 150);
        assert_eq!(report.total_decks, 150);
        assert_eq!(sim.load_results(3).unwrap(), Some(report.table));
        assert_eq!(sim.backend().list("decks_3_").unwrap().len(), 3);
        assert_eq!(
            sim.processed_seeds().unwrap(),
            vec![SeedSummary {
                seed: 3,
                half_deck_size: 26,
                decks_generated: 150
            }]
        );
    }

    #[test]
    fn test_fresh_run_replaces_previous() {
        let sim = sim();
        sim.run(&RunRequest::new(200, 4)).unwrap();
        let report = sim.run(&RunRequest::new(10, 4)).unwrap();

        assert_eq!(report.total_decks, 10);
        assert_eq!(sim.backend().list("decks_4_").unwrap().len(), 1);
        assert_eq!(sim.processed_seeds().unwrap()[0].decks_generated, 10);
    }

    #[test]
    fn test_request_uses_configured_half_deck() {
        let sim = Simulation::new(MemoryBackend::new(), SimConfig::default().with_half_deck_size(4));
        assert_eq!(sim.request(5, 1).half_deck_size, 4);
        assert_eq!(RunRequest::new(5, 1).half_deck_size, 26);
    }

    #[test]
    fn test_append_needs_state() {
        let sim = sim();
        let result = sim.run(&RunRequest::new(10, 8).appending());
        assert!(matches!(result, Err(PenneyError::StateNotFound(8))));
    }

    #[test]
    fn test_append_rejects_other_half_deck() {
        let sim = sim();
        sim.run(&RunRequest::new(10, 9).with_half_deck_size(3)).unwrap();
        let result = sim.run(&RunRequest::new(10, 9).appending());
        assert!(matches!(
            result,
            Err(PenneyError::HalfDeckMismatch { expected: 3, found: 26 })
        ));
    }

    #[test]
    fn test_locked_seed_is_refused() {
        let sim = sim();
        let _held = SeedLock::acquire(sim.backend(), 5).unwrap();
        assert!(matches!(
            sim.run(&RunRequest::new(10, 5)),
            Err(PenneyError::SeedLocked(5))
        ));
        assert!(sim.run(&RunRequest::new(10, 6)).is_ok());
    }

    #[test]
    fn test_zero_half_deck_keeps_existing_data() {
        let sim = sim();
        sim.run(&RunRequest::new(20, 2)).unwrap();
        let result = sim.run(&RunRequest::new(20, 2).with_half_deck_size(0));

        assert!(matches!(result, Err(PenneyError::InvalidDeck(_))));
        assert_eq!(sim.processed_seeds().unwrap()[0].decks_generated, 20);
    }

    #[test]
    fn test_reanalyze_matches_run() {
        let sim = sim();
        sim.run(&RunRequest::new(90, 1)).unwrap();
        let report = sim.run(&RunRequest::new(40, 1).appending()).unwrap();

        assert_eq!(sim.reanalyze(1).unwrap(), report.table);
        assert!(matches!(sim.reanalyze(2), Err(PenneyError::DataNotFound(2))));
    }
}
