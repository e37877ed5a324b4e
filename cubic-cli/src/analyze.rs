//! Analyze command - compare engine configurations on random positions
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: generate_positions(), analyze_config(), report_results()
//! - Level 3: config_matrix(), summarize()
//! - Level 4: formatting utilities
//!
//! Positions are searched in parallel; each task clones its own board and
//! builds its own engine, so no search state is shared between threads.

use std::ops::RangeInclusive;

use anyhow::{bail, Result};
use clap::Args;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use cubic_core::{
    random_position, status, Algorithm, Board, CubicError, HeuristicKind, Player, SearchConfig,
    SearchEngine, SearchResult,
};

use crate::match_cmd::create_rng;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Number of random positions
    #[arg(long, default_value = "10")]
    pub positions: usize,

    /// Search depth for every configuration
    #[arg(long, default_value = "3")]
    pub depth: u32,

    /// Fewest random plies per position
    #[arg(long, default_value = "5")]
    pub min_plies: usize,

    /// Most random plies per position
    #[arg(long, default_value = "15")]
    pub max_plies: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// A position to search and the side to move in it
#[derive(Clone, Debug)]
struct TestPosition {
    board: Board,
    side: Player,
}

/// Averages for one configuration over all positions
#[derive(Clone, Debug, Serialize)]
struct ConfigSummary {
    label: String,
    algorithm: Algorithm,
    heuristic: HeuristicKind,
    symmetry: bool,
    ordering: bool,
    positions: usize,
    avg_nodes: f64,
    avg_pruned: f64,
    /// Pruned siblings over (visited + pruned)
    pruning_ratio: f64,
    avg_time_ms: f64,
    table_hits: u64,
}

#[derive(Debug, Serialize)]
struct AnalysisReport {
    depth: u32,
    positions: usize,
    configs: Vec<ConfigSummary>,
    fastest: Option<String>,
    fewest_nodes: Option<String>,
    best_pruning: Option<String>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run analyze command
///
/// 1. Generate random test positions
/// 2. Search every position with every configuration
/// 3. Report averages and the best configurations
pub fn run(args: AnalyzeArgs, seed: Option<u64>) -> Result<()> {
    if args.min_plies > args.max_plies {
        bail!(
            "--min-plies ({}) exceeds --max-plies ({})",
            args.min_plies,
            args.max_plies
        );
    }
    if args.positions == 0 {
        bail!("--positions must be at least 1");
    }

    let mut rng = create_rng(seed);
    let positions = generate_positions(args.positions, args.min_plies..=args.max_plies, &mut rng);

    let configs = config_matrix(args.depth);
    tracing::info!(
        "Analyzing {} positions with {} configurations at depth {}",
        positions.len(),
        configs.len(),
        args.depth
    );

    let mut summaries = Vec::with_capacity(configs.len());
    for config in &configs {
        let summary = analyze_config(config, &positions)?;
        tracing::info!(
            "{}: {:.0} nodes, {:.1}% pruned, {:.2}ms",
            summary.label,
            summary.avg_nodes,
            summary.pruning_ratio * 100.0,
            summary.avg_time_ms
        );
        summaries.push(summary);
    }

    let report = build_report(args.depth, positions.len(), summaries);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_report(&report);
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Ongoing positions reached by a random number of random plies
fn generate_positions(
    count: usize,
    plies: RangeInclusive<usize>,
    rng: &mut ChaCha8Rng,
) -> Vec<TestPosition> {
    let mut positions = Vec::with_capacity(count);
    while positions.len() < count {
        let n = rng.gen_range(plies.clone());
        let board = random_position(rng, n);
        if status(&board).is_over() {
            continue;
        }
        let side = if board.move_count() % 2 == 0 {
            Player::X
        } else {
            Player::O
        };
        positions.push(TestPosition { board, side });
    }
    positions
}

/// Search every position with `config` in parallel
fn analyze_config(config: &SearchConfig, positions: &[TestPosition]) -> Result<ConfigSummary> {
    let results = positions
        .par_iter()
        .map(|pos| {
            let mut engine = SearchEngine::new(config.clone())?;
            let mut board = pos.board.clone();
            engine.find_best_move(&mut board, pos.side)
        })
        .collect::<Result<Vec<SearchResult>, CubicError>>()?;

    Ok(summarize(config, &results))
}

fn build_report(depth: u32, positions: usize, configs: Vec<ConfigSummary>) -> AnalysisReport {
    let pick = |better: fn(&ConfigSummary, &ConfigSummary) -> bool| {
        configs
            .iter()
            .fold(None::<&ConfigSummary>, |best, c| match best {
                Some(b) if !better(c, b) => Some(b),
                _ => Some(c),
            })
            .map(|c| c.label.clone())
    };

    let fastest = pick(|a, b| a.avg_time_ms < b.avg_time_ms);
    let fewest_nodes = pick(|a, b| a.avg_nodes < b.avg_nodes);
    let best_pruning = pick(|a, b| a.pruning_ratio > b.pruning_ratio);

    AnalysisReport {
        depth,
        positions,
        configs,
        fastest,
        fewest_nodes,
        best_pruning,
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Minimax and alpha-beta, each heuristic, with and without symmetry keys.
/// Alpha-beta also runs with and without heuristic move ordering.
fn config_matrix(depth: u32) -> Vec<SearchConfig> {
    let mut configs = Vec::new();
    for heuristic in HeuristicKind::ALL {
        for symmetry in [false, true] {
            configs.push(
                SearchConfig::minimax(depth)
                    .with_heuristic(heuristic)
                    .with_symmetry(symmetry),
            );
        }
    }
    for heuristic in HeuristicKind::ALL {
        for symmetry in [false, true] {
            for ordering in [false, true] {
                configs.push(
                    SearchConfig::alpha_beta(depth)
                        .with_heuristic(heuristic)
                        .with_symmetry(symmetry)
                        .with_heuristic_ordering(ordering),
                );
            }
        }
    }
    configs
}

fn summarize(config: &SearchConfig, results: &[SearchResult]) -> ConfigSummary {
    let n = results.len().max(1) as f64;
    let nodes: u64 = results.iter().map(|r| r.nodes).sum();
    let pruned: u64 = results.iter().map(|r| r.pruned).sum();
    let time: f64 = results.iter().map(|r| r.elapsed.as_secs_f64() * 1000.0).sum();
    let table_hits = results.iter().map(|r| r.table_hits).sum();

    let considered = nodes + pruned;
    let pruning_ratio = if considered > 0 {
        pruned as f64 / considered as f64
    } else {
        0.0
    };

    ConfigSummary {
        label: config.describe(),
        algorithm: config.algorithm,
        heuristic: config.heuristic,
        symmetry: config.symmetry_reduction,
        ordering: config.heuristic_ordering,
        positions: results.len(),
        avg_nodes: nodes as f64 / n,
        avg_pruned: pruned as f64 / n,
        pruning_ratio,
        avg_time_ms: time / n,
        table_hits,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_text_report(report: &AnalysisReport) {
    println!(
        "\n=== Analysis: {} positions, depth {} ===",
        report.positions, report.depth
    );
    println!(
        "{:<40} {:>12} {:>12} {:>8} {:>10} {:>10}",
        "Config", "Avg nodes", "Avg pruned", "Pruned", "Avg time", "Hits"
    );
    for c in &report.configs {
        println!(
            "{:<40} {:>12.0} {:>12.0} {:>7.1}% {:>8.2}ms {:>10}",
            c.label,
            c.avg_nodes,
            c.avg_pruned,
            c.pruning_ratio * 100.0,
            c.avg_time_ms,
            c.table_hits
        );
    }

    let show = |name: &str, label: &Option<String>| {
        if let Some(label) = label {
            println!("{:<14} {}", name, label);
        }
    };
    println!();
    show("Fastest:", &report.fastest);
    show("Fewest nodes:", &report.fewest_nodes);
    show("Best pruning:", &report.best_pruning);
}

// ============================================================================
// TESTS
// ============================================================================
