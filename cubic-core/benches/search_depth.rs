//! Search Performance Benchmark
//!
//! Compares:
//! 1. Time and nodes per decision at increasing depth
//! 2. Minimax vs alpha-beta on the same positions
//! 3. Effect of the transposition table, symmetry reduction and move ordering

use std::time::Instant;

use cubic_core::{random_position, Board, HeuristicKind, Player, SearchConfig, SearchEngine};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST POSITIONS
// ============================================================================

fn test_positions() -> Vec<(&'static str, Board)> {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    vec![
        ("empty", Board::new()),
        ("opening", random_position(&mut rng, 6)),
        ("midgame", random_position(&mut rng, 16)),
    ]
}

// ============================================================================
// BENCHMARK STRUCTURES
// ============================================================================

#[derive(Clone, Debug)]
struct BenchmarkResult {
    position: &'static str,
    config: String,
    avg_time_ms: f64,
    avg_nodes: f64,
    avg_pruned: f64,
}

impl BenchmarkResult {
    fn to_table_row(&self) -> String {
        format!(
            "| {:<8} | {:<34} | {:>10.2}ms | {:>12.0} | {:>10.0} |",
            self.position, self.config, self.avg_time_ms, self.avg_nodes, self.avg_pruned
        )
    }
}

fn run(position: &'static str, board: &Board, config: SearchConfig) -> BenchmarkResult {
    let iterations = 3;
    let side = if board.move_count() % 2 == 0 { Player::X } else { Player::O };
    let label = config.describe();

    let mut engine = match SearchEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => panic!("bad benchmark config {}: {}", label, e),
    };
    let mut scratch = board.clone();

    let (mut time, mut nodes, mut pruned) = (0.0, 0.0, 0.0);
    for _ in 0..iterations {
        let start = Instant::now();
        if let Ok(result) = engine.find_best_move(&mut scratch, side) {
            nodes += result.nodes as f64;
            pruned += result.pruned as f64;
        }
        time += start.elapsed().as_secs_f64() * 1000.0;
    }

    let n = iterations as f64;
    BenchmarkResult {
        position,
        config: label,
        avg_time_ms: time / n,
        avg_nodes: nodes / n,
        avg_pruned: pruned / n,
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    println!("\n=== CUBIC SEARCH BENCHMARK ===");
    let mut results = Vec::new();

    for (name, board) in test_positions() {
        println!("\n--- {} ({} moves played) ---", name, board.move_count());

        for depth in 1..=3 {
            print!("  minimax depth {} ... ", depth);
            let r = run(name, &board, SearchConfig::minimax(depth).with_transposition_table(false));
            println!("{:.2}ms", r.avg_time_ms);
            results.push(r);
        }

        for depth in 1..=4 {
            for kind in HeuristicKind::ALL {
                print!("  alpha-beta {} depth {} ... ", kind, depth);
                let r = run(name, &board, SearchConfig::alpha_beta(depth).with_heuristic(kind));
                println!("{:.2}ms", r.avg_time_ms);
                results.push(r);
            }
        }

        print!("  alpha-beta depth 4 +sym ... ");
        let r = run(name, &board, SearchConfig::alpha_beta(4).with_symmetry(true));
        println!("{:.2}ms", r.avg_time_ms);
        results.push(r);

        print!("  alpha-beta depth 4 +order ... ");
        let r = run(name, &board, SearchConfig::alpha_beta(4).with_heuristic_ordering(true));
        println!("{:.2}ms", r.avg_time_ms);
        results.push(r);
    }

    println!("\n| Position | Config                             |     Avg Time |    Avg Nodes | Avg Pruned |");
    println!("|----------|------------------------------------|--------------|--------------|------------|");
    for result in &results {
        println!("{}", result.to_table_row());
    }
    println!();
}
