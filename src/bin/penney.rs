//! Penney's Game simulator CLI.
//!
//! Generates decks for a seed, scores every sequence pair and keeps cumulative
//! results under a data directory.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use penney_sim::analysis::WinGrid;
use penney_sim::matching::Scoring;
use penney_sim::{FsBackend, PenneyError, SimConfig, Simulation};

#[derive(Parser)]
#[command(name = "penney")]
#[command(about = "Monte Carlo simulator for Penney's Game over shuffled decks")]
struct Args {
    /// Directory holding deck, state and result files
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate and analyze decks for a seed
    Run {
        /// Number of decks to generate
        #[arg(short = 'n', long)]
        decks: usize,

        /// Seed of the deck stream
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Cards of each colour per deck
        #[arg(long, default_value_t = penney_sim::DEFAULT_HALF_DECK_SIZE)]
        half_deck_size: usize,

        /// Continue the seed's stream and results instead of replacing them
        #[arg(short, long)]
        append: bool,

        /// Maximum decks per stored batch file
        #[arg(long, default_value_t = penney_sim::core::DEFAULT_DECKS_PER_FILE)]
        decks_per_file: usize,

        /// Analyze on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// List seeds with saved generator state and their committed deck counts
    Seeds,

    /// Rebuild a seed's results from its stored decks
    Reanalyze {
        #[arg(short, long)]
        seed: u64,
    },

    /// Print a seed's win grids
    Show {
        #[arg(short, long)]
        seed: u64,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match execute(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<(), PenneyError> {
    let backend = FsBackend::new(&args.data_dir)?;

    match args.command {
        Command::Run {
            decks,
            seed,
            half_deck_size,
            append,
            decks_per_file,
            sequential,
        } => {
            let config = SimConfig::default()
                .with_half_deck_size(half_deck_size)
                .with_decks_per_file(decks_per_file)
                .with_parallel(!sequential);
            let sim = Simulation::new(backend, config);

            let mut request = sim.request(decks, seed);
            if append {
                request = request.appending();
            }
            let report = sim.run(&request)?;
            info!(
                "Seed {}: {} new decks, {} total",
                report.seed, report.new_decks, report.total_decks
            );
            for scoring in Scoring::ALL {
                print!("{}", render_grid(&report.table.win_grid(scoring)));
            }
        }
        Command::Seeds => {
            let sim = Simulation::new(backend, SimConfig::default());
            let seeds = sim.processed_seeds()?;
            if seeds.is_empty() {
                println!("No seeds in {}", args.data_dir.display());
            }
            for summary in seeds {
                println!(
                    "seed {:>20}  decks {:>12}  half-deck {}",
                    summary.seed, summary.decks_generated, summary.half_deck_size
                );
            }
        }
        Command::Reanalyze { seed } => {
            let sim = Simulation::new(backend, SimConfig::default());
            let table = sim.reanalyze(seed)?;
            for scoring in Scoring::ALL {
                print!("{}", render_grid(&table.win_grid(scoring)));
            }
        }
        Command::Show { seed } => {
            let sim = Simulation::new(backend, SimConfig::default());
            let table = sim.load_results(seed)?.ok_or(PenneyError::DataNotFound(seed))?;
            for scoring in Scoring::ALL {
                print!("{}", render_grid(&table.win_grid(scoring)));
            }
        }
    }

    Ok(())
}

const CELL_WIDTH: usize = 8;

/// Player 1 win percentage with the tie percentage in parentheses.
/// Columns are player 1's sequence, rows player 2's.
fn render_grid(grid: &WinGrid) -> String {
    let labels = WinGrid::labels();
    let mut out = String::new();

    let _ = writeln!(out, "P1 win % ({}), N = {}", grid.scoring, grid.sample_size);
    let _ = write!(out, "{:>5}", "P2\\P1");
    for label in &labels {
        let _ = write!(out, "{label:>CELL_WIDTH$}");
    }
    out.push('\n');

    for (label, row) in labels.iter().zip(&grid.cells) {
        let _ = write!(out, "{label:>5}");
        for cell in row {
            let text = match cell {
                Some(cell) => format!("{:.0}({:.0})", cell.p1_win_pct, cell.tie_pct),
                None => "-".to_string(),
            };
            let _ = write!(out, "{text:>CELL_WIDTH$}");
        }
        out.push('\n');
    }
    out.push('\n');
    out
}
