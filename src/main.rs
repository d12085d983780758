//! blossom-forest
//!
//! Reads a weighted graph (vertex count, edge count, then `i j weight` per
//! edge, 1-based) from a file or stdin and prints the matching found by the
//! blossom forest: the total weight, then one matched pair per line.
//!
//! Exit code 1 on unreadable or malformed input.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use blossom_forest::{format_matching, read_graph, Result};

/// Weighted matching in general graphs with a primal-dual blossom forest
#[derive(Parser)]
#[command(name = "blossom-forest")]
#[command(version)]
#[command(about = "Weighted matching in general graphs with a primal-dual blossom forest")]
struct Cli {
    /// Graph file; stdin when absent
    input: Option<PathBuf>,

    /// Skip the optimality check after solving
    #[arg(long)]
    no_verify: bool,

    /// Print a header line, and a warning when the pairing is incomplete
    #[arg(long)]
    verbose_output: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(cli: &Cli) -> Result<String> {
    let graph = match &cli.input {
        Some(path) => {
            info!("reading graph from {}", path.display());
            read_graph(File::open(path)?)?
        }
        None => read_graph(io::stdin().lock())?,
    };

    let mut forest = graph.forest();
    let summary = forest.verify(!cli.no_verify).solve();
    info!(
        "steps={} bursts={} appends={} contractions={} augmentations={}",
        summary.stats.steps,
        summary.stats.bursts,
        summary.stats.appends,
        summary.stats.contractions,
        summary.stats.augmentations
    );
    Ok(format_matching(&summary, cli.verbose_output))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()) {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
