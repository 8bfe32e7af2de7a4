//! Fixed 8×8 view of a table for one scoring rule.
//!
//! Rows are player 2's sequence, columns player 1's, both in
//! [`SequenceTriple::all`] order. The diagonal is empty because both players
//! may not choose the same sequence. This is the data a heatmap renderer
//! consumes; rendering itself lives outside the crate.

use serde::{Deserialize, Serialize};

use super::table::AggregateTable;
use crate::core::{SequencePair, SequenceTriple, TRIPLE_COUNT};
use crate::matching::Scoring;

/// Percentages for one cell, both in [0, 100].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub p1_win_pct: f64,
    pub tie_pct: f64,
}

/// Player 1 win and tie percentages for every ordered pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WinGrid {
    pub scoring: Scoring,
    /// Decks behind every cell.
    pub sample_size: u64,
    /// `cells[row][col]`: row = player 2 sequence, col = player 1 sequence.
    pub cells: [[Option<GridCell>; TRIPLE_COUNT]; TRIPLE_COUNT],
}

impl WinGrid {
    pub(crate) fn from_table(table: &AggregateTable, scoring: Scoring) -> Self {
        let mut cells = [[None; TRIPLE_COUNT]; TRIPLE_COUNT];
        for (pair, record) in table.iter() {
            let counts = record.get(scoring);
            cells[pair.player2().index()][pair.player1().index()] = Some(GridCell {
                p1_win_pct: counts.p1_win_pct(),
                tie_pct: counts.tie_pct(),
            });
        }
        Self {
            scoring,
            sample_size: table.decks_processed(),
            cells,
        }
    }

    /// Row and column labels in the `B`/`R` display alphabet.
    #[must_use]
    pub fn labels() -> Vec<String> {
        SequenceTriple::all().map(SequenceTriple::display_label).collect()
    }

    /// The cell for one ordered pair.
    #[must_use]
    pub fn cell(&self, pair: &SequencePair) -> Option<GridCell> {
        self.cells[pair.player2().index()][pair.player1().index()]
    }
}
