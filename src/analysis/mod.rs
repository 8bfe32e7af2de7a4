//! Exhaustive pairwise analysis.
//!
//! ## Overview
//!
//! - **OutcomeCounts / PairRecord**: win, loss and tie counters per pair and rule
//! - **AggregateTable**: records for all 56 ordered pairs, mergeable across runs
//! - **CombinationAnalyzer**: scores decks for every pair, in parallel
//! - **WinGrid**: the 8×8 percentage view handed to renderers
//!
//! ## Usage
//!
//! ```
//! use penney_sim::analysis::CombinationAnalyzer;
//! use penney_sim::generation::{generate, RngState};
//! use penney_sim::matching::Scoring;
//!
//! let decks = generate(1_000, &RngState::new(42, 26)).unwrap().decks;
//! let table = CombinationAnalyzer::default().analyze(&decks, None).unwrap();
//!
//! let grid = table.win_grid(Scoring::Cards);
//! assert_eq!(grid.sample_size, 1_000);
//! ```

pub mod analyzer;
pub mod grid;
pub mod record;
pub mod table;

pub use analyzer::{AnalyzerConfig, CombinationAnalyzer};
pub use grid::{GridCell, WinGrid};
pub use record::{OutcomeCounts, PairRecord};
pub use table::{AggregateTable, TableRow};
