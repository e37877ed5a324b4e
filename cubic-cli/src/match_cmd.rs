//! Match command - play a series of games against the engine
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_opponent(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use cubic_core::{
    CubicError, Game, HeuristicKind, Player, RandomPlayer, SearchConfig, SearchEngine, Status,
};

use crate::engine_args::EngineArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OpponentKind {
    /// Uniformly random legal moves
    Random,
    /// A second search engine
    Ai,
}

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Who the engine plays against
    #[arg(long, value_enum, default_value_t = OpponentKind::Random)]
    pub opponent: OpponentKind,

    /// Search depth of the AI opponent
    #[arg(long, default_value = "2")]
    pub opponent_depth: u32,

    /// Heuristic of the AI opponent
    #[arg(long, default_value = "simple")]
    pub opponent_heuristic: HeuristicKind,

    /// Number of games to play (will alternate colors)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Opponent of the engine under test
enum Opponent {
    Random(RandomPlayer),
    Engine(SearchEngine),
}

/// Outcome from the engine's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    EngineWin,
    OpponentWin,
    Draw,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    engine_side: Player,
    outcome: Outcome,
    moves: usize,
    winning_line: Option<String>,
    engine_nodes: u64,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    engine_wins: usize,
    opponent_wins: usize,
    draws: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Build the engine and its opponent
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let config = args.engine.to_config()?;
    let mut engine = SearchEngine::new(config.clone())?;
    let mut rng = create_rng(seed);
    let mut opponent = build_opponent(&args, &mut rng)?;

    tracing::info!(
        "Starting match: {} vs {:?} ({} games)",
        config.describe(),
        args.opponent,
        args.games
    );

    let results = play_match(&mut engine, &mut opponent, args.games)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_opponent(args: &MatchArgs, rng: &mut ChaCha8Rng) -> Result<Opponent> {
    Ok(match args.opponent {
        OpponentKind::Random => Opponent::Random(RandomPlayer::new(rng.gen())),
        OpponentKind::Ai => {
            let config = SearchConfig::alpha_beta(args.opponent_depth)
                .with_heuristic(args.opponent_heuristic);
            let engine = SearchEngine::new(config).context("Invalid opponent settings")?;
            Opponent::Engine(engine)
        }
    })
}

/// Play all games in the match
fn play_match(
    engine: &mut SearchEngine,
    opponent: &mut Opponent,
    games: usize,
) -> Result<MatchResults> {
    let mut records = Vec::with_capacity(games);

    for game_num in 0..games {
        // Alternate colors for fairness
        let engine_side = if game_num % 2 == 0 {
            Player::X
        } else {
            Player::O
        };

        let record = play_single_game(engine, opponent, engine_side, game_num + 1)?;

        tracing::info!(
            "Game {}: engine as {} -> {:?} ({} moves)",
            record.game_number,
            record.engine_side,
            record.outcome,
            record.moves
        );

        records.push(record);
    }

    Ok(compute_match_statistics(records))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to completion
fn play_single_game(
    engine: &mut SearchEngine,
    opponent: &mut Opponent,
    engine_side: Player,
    game_number: usize,
) -> Result<GameRecord> {
    let mut game = Game::new();
    let mut engine_nodes = 0;

    engine.clear_table();
    if let Opponent::Engine(other) = opponent {
        other.clear_table();
    }

    while !game.is_over() {
        if game.to_move() == engine_side {
            engine_nodes += game.ai_move(engine)?.nodes;
            continue;
        }
        match opponent {
            Opponent::Random(player) => {
                let index = player
                    .choose(game.board())
                    .ok_or(CubicError::NoLegalMove)?;
                game.play(index)?;
            }
            Opponent::Engine(other) => {
                game.ai_move(other)?;
            }
        }
    }

    let outcome = match game.status() {
        Status::Win { player, .. } if player == engine_side => Outcome::EngineWin,
        Status::Win { .. } => Outcome::OpponentWin,
        _ => Outcome::Draw,
    };

    Ok(GameRecord {
        game_number,
        engine_side,
        outcome,
        moves: game.moves().len(),
        winning_line: game.winning_line().map(|line| line.describe()),
        engine_nodes,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let count = |o: Outcome| games.iter().filter(|g| g.outcome == o).count();
    let engine_wins = count(Outcome::EngineWin);
    let opponent_wins = count(Outcome::OpponentWin);
    let draws = count(Outcome::Draw);

    let total_moves: usize = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        games,
        engine_wins,
        opponent_wins,
        draws,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
pub(crate) fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn rate(n: usize, total: usize) -> f32 {
    if total > 0 {
        n as f32 / total as f32
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        engine_side: String,
        outcome: String,
        moves: usize,
        winning_line: Option<String>,
        engine_nodes: u64,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        engine_wins: usize,
        opponent_wins: usize,
        draws: usize,
        avg_moves: f32,
        engine_win_rate: f32,
        games: Vec<JsonGame>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        total_games: total,
        engine_wins: results.engine_wins,
        opponent_wins: results.opponent_wins,
        draws: results.draws,
        avg_moves: results.avg_moves,
        engine_win_rate: rate(results.engine_wins, total),
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                engine_side: g.engine_side.to_string(),
                outcome: format!("{:?}", g.outcome),
                moves: g.moves,
                winning_line: g.winning_line.clone(),
                engine_nodes: g.engine_nodes,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games:   {}", total);
    println!(
        "Engine wins:   {} ({:.1}%)",
        results.engine_wins,
        rate(results.engine_wins, total) * 100.0
    );
    println!(
        "Opponent wins: {} ({:.1}%)",
        results.opponent_wins,
        rate(results.opponent_wins, total) * 100.0
    );
    println!(
        "Draws:         {} ({:.1}%)",
        results.draws,
        rate(results.draws, total) * 100.0
    );
    println!("Avg moves:     {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        let line = game
            .winning_line
            .as_deref()
            .map(|l| format!(" on {}", l))
            .unwrap_or_default();
        println!(
            "  Game {}: engine as {} -> {:?}{} in {} moves",
            game.game_number, game.engine_side, game.outcome, line, game.moves
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
