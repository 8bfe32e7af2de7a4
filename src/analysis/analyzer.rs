//! Scores every deck for every pair and tallies the outcomes.

use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

use super::record::PairRecord;
use super::table::AggregateTable;
use crate::core::{Deck, SequencePair, SimConfig};
use crate::error::Result;
use crate::matching::SequenceMatcher;

/// Analyzer settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Score decks on the rayon pool.
    pub parallel: bool,

    /// Emit a progress event every this many decks (0 = never).
    pub progress_interval: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            progress_interval: 10_000,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_progress_interval(mut self, decks: usize) -> Self {
        self.progress_interval = decks;
        self
    }
}

impl From<&SimConfig> for AnalyzerConfig {
    fn from(config: &SimConfig) -> Self {
        Self {
            parallel: config.parallel,
            progress_interval: config.progress_interval,
        }
    }
}

/// Per-worker counts for the canonical pairs, indexed like `matchers`.
#[derive(Clone, Debug)]
struct Tally(Vec<PairRecord>);

impl Tally {
    fn new(len: usize) -> Self {
        Self(vec![PairRecord::default(); len])
    }

    fn merged(mut self, other: Tally) -> Result<Self> {
        for (mine, theirs) in self.0.iter_mut().zip(other.0) {
            *mine = mine.merged(&theirs)?;
        }
        Ok(self)
    }
}

/// Drives the matcher over all pairs and decks.
///
/// Only the 28 canonical pairs are scanned. A window can equal at most one
/// of two distinct triples, so exchanging the players exchanges the scores
/// exactly, and the mirrored pair's record is the swapped canonical record.
///
/// Tallies are plain sums, so any split of the decks across workers gives
/// the same table as a sequential pass.
#[derive(Clone, Debug)]
pub struct CombinationAnalyzer {
    config: AnalyzerConfig,
    matchers: Vec<SequenceMatcher>,
}

impl CombinationAnalyzer {
    /// Create an analyzer for all canonical pairs.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            matchers: SequencePair::all_canonical().map(SequenceMatcher::new).collect(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Tally `decks` for every ordered pair, merged into `existing` if given.
    pub fn analyze(&self, decks: &[Deck], existing: Option<&AggregateTable>) -> Result<AggregateTable> {
        let start = Instant::now();
        let tally = if self.config.parallel {
            self.tally_parallel(decks)?
        } else {
            self.tally_sequential(decks)
        };

        let table = AggregateTable::from_canonical(
            self.matchers
                .iter()
                .map(SequenceMatcher::pair)
                .zip(tally.0),
        );
        table.validate()?;

        info!(
            decks = decks.len(),
            pairs = table.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "analysis complete"
        );

        match existing {
            Some(prior) => prior.merge(&table),
            None => Ok(table),
        }
    }

    fn tally_deck(&self, mut tally: Tally, deck: &Deck) -> Tally {
        for (record, matcher) in tally.0.iter_mut().zip(&self.matchers) {
            record.record(&matcher.score(deck));
        }
        tally
    }

    fn tally_sequential(&self, decks: &[Deck]) -> Tally {
        let done = AtomicU64::new(0);
        decks.iter().fold(Tally::new(self.matchers.len()), |tally, deck| {
            let tally = self.tally_deck(tally, deck);
            self.report_progress(&done, decks.len());
            tally
        })
    }

    fn tally_parallel(&self, decks: &[Deck]) -> Result<Tally> {
        let done = AtomicU64::new(0);
        decks
            .par_iter()
            .fold(
                || Tally::new(self.matchers.len()),
                |tally, deck| {
                    let tally = self.tally_deck(tally, deck);
                    self.report_progress(&done, decks.len());
                    tally
                },
            )
            .map(Ok)
            .try_reduce(|| Tally::new(self.matchers.len()), Tally::merged)
    }

    fn report_progress(&self, done: &AtomicU64, total: usize) {
        let interval = self.config.progress_interval as u64;
        if interval == 0 {
            return;
        }
        let n = done.fetch_add(1, Ordering::Relaxed) + 1;
        if n % interval == 0 {
            debug!(done = n, total, "analyzing decks");
        }
    }
}

impl Default for CombinationAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
