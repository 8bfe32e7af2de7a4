//! The aggregate table: one [`PairRecord`] per ordered sequence pair.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::grid::WinGrid;
use super::record::PairRecord;
use crate::core::{SequencePair, SequenceTriple};
use crate::error::{PenneyError, Result};
use crate::matching::Scoring;

/// Outcome counts for all 56 ordered pairs.
///
/// Every record covers the same decks, so every pair and both rules share
/// one `decks_processed` value. [`AggregateTable::validate`] checks this.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TableRow>", into = "Vec<TableRow>")]
pub struct AggregateTable {
    records: BTreeMap<SequencePair, PairRecord>,
}

/// One persisted row, keyed by the two sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub player1: SequenceTriple,
    pub player2: SequenceTriple,
    #[serde(flatten)]
    pub record: PairRecord,
}

impl AggregateTable {
    /// All 56 pairs at zero.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            records: SequencePair::all_ordered()
                .map(|pair| (pair, PairRecord::default()))
                .collect(),
        }
    }

    /// Build from canonical-pair records; mirrored pairs get the swapped record.
    pub(crate) fn from_canonical(records: impl IntoIterator<Item = (SequencePair, PairRecord)>) -> Self {
        let mut table = Self::empty();
        for (pair, record) in records {
            table.records.insert(pair, record);
            table.records.insert(pair.swapped(), record.swapped());
        }
        table
    }

    /// Rebuild from persisted rows, rejecting incomplete or inconsistent data.
    pub fn from_rows(rows: Vec<TableRow>) -> Result<Self> {
        let mut records = BTreeMap::new();
        for row in rows {
            let pair = SequencePair::new(row.player1, row.player2)?;
            if records.insert(pair, row.record).is_some() {
                return Err(PenneyError::CorruptState(format!("duplicate row for {pair}")));
            }
        }
        let table = Self { records };
        table.validate()?;
        Ok(table)
    }

    /// Rows in pair order, ready to persist.
    #[must_use]
    pub fn rows(&self) -> Vec<TableRow> {
        self.records
            .iter()
            .map(|(pair, record)| TableRow {
                player1: pair.player1(),
                player2: pair.player2(),
                record: *record,
            })
            .collect()
    }

    /// Record for one ordered pair.
    #[must_use]
    pub fn get(&self, pair: &SequencePair) -> Option<&PairRecord> {
        self.records.get(pair)
    }

    /// All pairs and their records, in pair order.
    pub fn iter(&self) -> impl Iterator<Item = (&SequencePair, &PairRecord)> {
        self.records.iter()
    }

    /// Number of pairs in the table (56 once validated).
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Decks behind every record.
    #[must_use]
    pub fn decks_processed(&self) -> u64 {
        self.records
            .values()
            .next()
            .map_or(0, |r| r.cards.decks_processed)
    }

    /// Check every per-pair invariant and that all pairs agree on the deck count.
    pub fn validate(&self) -> Result<()> {
        let expected = SequencePair::all_ordered().count();
        if self.records.len() != expected {
            return Err(PenneyError::CorruptState(format!(
                "table has {} pairs, expected {expected}",
                self.records.len()
            )));
        }

        let decks = self.decks_processed();
        for (pair, record) in &self.records {
            if !record.is_consistent() {
                return Err(PenneyError::CorruptState(format!(
                    "counts for {pair} do not add up: {record:?}"
                )));
            }
            if record.cards.decks_processed != decks {
                return Err(PenneyError::CorruptState(format!(
                    "{pair} covers {} decks, other pairs cover {decks}",
                    record.cards.decks_processed
                )));
            }
        }
        Ok(())
    }

    /// Sum two tables pair by pair, then validate the result.
    pub fn merge(&self, other: &AggregateTable) -> Result<AggregateTable> {
        let mut records = self.records.clone();
        for (pair, record) in &other.records {
            let sum = match records.get(pair) {
                Some(mine) => mine.merged(record)?,
                None => *record,
            };
            records.insert(*pair, sum);
        }
        let merged = Self { records };
        merged.validate()?;
        Ok(merged)
    }

    /// The 8×8 grid of player 1 win percentages for one rule.
    #[must_use]
    pub fn win_grid(&self, scoring: Scoring) -> WinGrid {
        WinGrid::from_table(self, scoring)
    }
}

impl Default for AggregateTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<Vec<TableRow>> for AggregateTable {
    type Error = PenneyError;

    fn try_from(rows: Vec<TableRow>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<AggregateTable> for Vec<TableRow> {
    fn from(table: AggregateTable) -> Self {
        table.rows()
    }
}
