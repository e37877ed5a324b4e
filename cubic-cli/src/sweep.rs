//! Sweep command - cost of a single decision on the empty board per depth

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use cubic_core::{Algorithm, Board, HeuristicKind, Player, SearchConfig, SearchEngine};

#[derive(Args)]
pub struct SweepArgs {
    /// Deepest search to run
    #[arg(long, default_value = "4")]
    pub max_depth: u32,

    /// Leaf heuristic: simple or advanced
    #[arg(long, default_value = "advanced")]
    pub heuristic: HeuristicKind,

    /// Search algorithm: minimax or alpha-beta
    #[arg(long, default_value = "alpha-beta")]
    pub algorithm: Algorithm,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, Serialize)]
struct SweepRow {
    depth: u32,
    index: usize,
    score: i32,
    nodes: u64,
    pruned: u64,
    time_ms: f64,
}

pub fn run(args: SweepArgs, _seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Sweeping depths 1..={} ({}/{})",
        args.max_depth,
        args.algorithm,
        args.heuristic
    );

    let rows = sweep(args.max_depth, args.heuristic, args.algorithm)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("\n=== Depth sweep: {} / {} ===", args.algorithm, args.heuristic);
    println!(
        "{:>5} {:>6} {:>9} {:>12} {:>12} {:>12}",
        "Depth", "Move", "Score", "Nodes", "Pruned", "Time"
    );
    for row in &rows {
        println!(
            "{:>5} {:>6} {:>9} {:>12} {:>12} {:>10.2}ms",
            row.depth, row.index, row.score, row.nodes, row.pruned, row.time_ms
        );
    }
    Ok(())
}

/// One fresh engine per depth so no table entries carry over
fn sweep(max_depth: u32, heuristic: HeuristicKind, algorithm: Algorithm) -> Result<Vec<SweepRow>> {
    let mut rows = Vec::new();

    for depth in 1..=max_depth {
        let config = SearchConfig {
            depth,
            heuristic,
            algorithm,
            ..Default::default()
        };
        let mut engine = SearchEngine::new(config)?;
        let mut board = Board::new();
        let result = engine.find_best_move(&mut board, Player::X)?;

        tracing::debug!("depth {}: {} nodes", depth, result.nodes);
        rows.push(SweepRow {
            depth,
            index: result.index,
            score: result.score,
            nodes: result.nodes,
            pruned: result.pruned,
            time_ms: result.elapsed.as_secs_f64() * 1000.0,
        });
    }

    Ok(rows)
}
