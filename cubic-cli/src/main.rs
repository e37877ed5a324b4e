//! Cubic CLI - Command-line interface
//!
//! Commands:
//! - play: Play against the engine in the terminal
//! - analyze: Compare engine configurations on random positions
//! - sweep: Nodes and time per depth on the empty board
//! - match: Engine vs random player or engine vs engine

mod analyze;
mod engine_args;
mod match_cmd;
mod play;
mod sweep;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubic")]
#[command(about = "4x4x4 tic-tac-toe with a minimax search engine", version)]
struct Cli {
    /// Seed for random positions and opponents
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log search diagnostics (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the engine
    Play(play::PlayArgs),
    /// Compare engine configurations on random positions
    Analyze(analyze::AnalyzeArgs),
    /// Nodes and time per search depth on the empty board
    Sweep(sweep::SweepArgs),
    /// Play a series of games and report statistics
    Match(match_cmd::MatchArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Analyze(args) => analyze::run(args, cli.seed),
        Commands::Sweep(args) => sweep::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
    }
}

/// Logs go to stderr so `--json` output stays machine readable
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
