//! Cache and branch prediction model CLI.
//!
//! This binary replays access traces through the clocked model. It provides:
//! 1. **Run:** Replay a trace file (fetches, loads, stores, resolved branches) and
//!    print the statistics report, as text or JSON.
//! 2. **Config:** Print the default configuration as JSON, as a starting point
//!    for a `--config` file.
//!
//! Log verbosity follows `RUST_LOG` (for example `RUST_LOG=uarch_core=debug`
//! shows every miss state transition).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uarch_core::sim::trace;
use uarch_core::{Config, System};

#[derive(Parser, Debug)]
#[command(
    name = "uarch",
    author,
    version,
    about = "Cycle-level cache and branch prediction model",
    long_about = "Replay an access trace through direct-mapped instruction and data caches \
                  (with victim caches and a stream buffer) and a tournament branch predictor.\n\n\
                  Trace lines:\n  F <addr>\n  L <addr>\n  S <addr> <word>\n  B <pc> <target> <taken>\n\n\
                  Examples:\n  uarch run --trace loop.trace\n  \
                  uarch run --trace loop.trace --config small.json --json\n  \
                  uarch config > small.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a trace and report statistics.
    Run(RunArgs),
    /// Print the default configuration as JSON.
    Config,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Trace file to replay.
    #[arg(short, long)]
    trace: PathBuf,

    /// JSON configuration file; omitted fields keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print statistics as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Report sections to print (summary, icache, dcache, branch). Default: all.
    #[arg(long, value_delimiter = ',')]
    sections: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => cmd_run(&args),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&Config::default())?);
            Ok(())
        }
    }
}

/// Loads the configuration, replays the trace and prints the report.
fn cmd_run(args: &RunArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    let mut system = System::new(&config).context("invalid configuration")?;

    let text = fs::read_to_string(&args.trace)
        .with_context(|| format!("failed to read trace {}", args.trace.display()))?;
    let ops = trace::parse(&text).with_context(|| format!("in {}", args.trace.display()))?;
    tracing::info!(ops = ops.len(), trace = %args.trace.display(), "replaying trace");

    system.replay(&ops)?;

    let stats = system.stats();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        stats.print_sections(&args.sections);
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}
