//! CLI commands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use stockline_allocation::{Batch, OrderLine, allocate, select_batch};

use crate::dto::{AllocationReport, BatchSummary, LineOutcome};
use crate::input::{load_batches, load_lines};

/// stockline - allocate order lines to stock batches.
#[derive(Debug, Parser)]
#[command(name = "stockline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Allocate every line in file order and report the resulting stock.
    Allocate(InputArgs),

    /// Show which batch each line would go to, without allocating.
    Check(InputArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    /// JSON file with the batches.
    #[arg(long, env = "STOCKLINE_BATCHES")]
    batches: PathBuf,

    /// JSON file with the order lines.
    #[arg(long, env = "STOCKLINE_LINES")]
    lines: PathBuf,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let report = match self.command {
            Commands::Allocate(args) => {
                let batches = load_batches(&args.batches)?;
                let lines = load_lines(&args.lines)?;
                allocate_all(batches, &lines)
            }
            Commands::Check(args) => {
                let batches = load_batches(&args.batches)?;
                let lines = load_lines(&args.lines)?;
                check_all(&batches, &lines)
            }
        };

        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

/// Allocate `lines` one after another; later lines see earlier allocations.
pub fn allocate_all(mut batches: Vec<Batch>, lines: &[OrderLine]) -> AllocationReport {
    let outcomes: Vec<LineOutcome> = lines
        .iter()
        .map(|line| LineOutcome::new(line, allocate(line, &mut batches)))
        .collect();

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    tracing::info!(
        "allocated {} of {} order line(s)",
        outcomes.len() - failed,
        outcomes.len()
    );

    AllocationReport {
        outcomes,
        batches: batches.iter().map(BatchSummary::from).collect(),
    }
}

/// Evaluate each line on its own against the untouched batches.
pub fn check_all(batches: &[Batch], lines: &[OrderLine]) -> AllocationReport {
    let outcomes = lines
        .iter()
        .map(|line| {
            let choice = select_batch(line, batches).map(|batch| batch.reference().clone());
            LineOutcome::new(line, choice)
        })
        .collect();

    AllocationReport {
        outcomes,
        batches: batches.iter().map(BatchSummary::from).collect(),
    }
}
