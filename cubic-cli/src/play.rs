//! Play command - a human against the engine in the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: human_turn(), engine_turn(), report_outcome()
//! - Level 3: parse_move()
//! - Level 4: render_board(), formatting utilities

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;

use cubic_core::{
    index_of, Board, Game, Line, Player, SearchEngine, SearchResult, Status, SIZE,
};

use crate::engine_args::EngineArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Let the engine move first (the human plays O)
    #[arg(long)]
    pub ai_first: bool,

    /// Engine plays both sides
    #[arg(long)]
    pub watch: bool,
}

/// What the human typed
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Move(usize),
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the engine
/// 2. Alternate human and engine turns until the game ends
/// 3. Report the outcome
pub fn run(args: PlayArgs, _seed: Option<u64>) -> Result<()> {
    let config = args.engine.to_config()?;
    tracing::info!("Starting game against {}", config.describe());

    let mut engine = SearchEngine::new(config)?;
    let mut game = Game::new();
    let human = if args.ai_first { Player::O } else { Player::X };

    let stdin = io::stdin();
    let mut input = stdin.lock().lines();

    println!("{}", render_board(game.board(), None));

    while !game.is_over() {
        if !args.watch && game.to_move() == human {
            if !human_turn(&mut game, &mut input)? {
                println!("Bye.");
                return Ok(());
            }
        } else {
            engine_turn(&mut game, &mut engine)?;
        }
        println!("{}", render_board(game.board(), game.winning_line()));
    }

    report_outcome(&game.status());
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Prompt until a legal move is played. Returns false on quit or end of input.
fn human_turn(
    game: &mut Game,
    input: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<bool> {
    loop {
        print!("{} to move (layer row col, or q): ", game.to_move());
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = input.next() else {
            println!();
            return Ok(false);
        };
        let line = line.context("Failed to read move")?;

        match parse_move(&line) {
            Ok(Input::Quit) => return Ok(false),
            Ok(Input::Move(index)) => match game.play(index) {
                Ok(_) => return Ok(true),
                Err(e) => println!("  {}", e),
            },
            Err(msg) => println!("  {}", msg),
        }
    }
}

fn engine_turn(game: &mut Game, engine: &mut SearchEngine) -> Result<()> {
    let side = game.to_move();
    let result = game.ai_move(engine)?;
    println!("{}", describe_decision(side, &result));
    Ok(())
}

fn report_outcome(status: &Status) {
    match status {
        Status::Win { player, line } => {
            println!("{} wins with {} {:?}", player, line.describe(), line.cells)
        }
        Status::Draw => println!("Draw: the board is full."),
        Status::Ongoing => {}
    }
}

// ============================================================================
// LEVEL 3 - INPUT
// ============================================================================

/// Accepts "layer row col" (spaces or commas), a single cell index, or "q"
fn parse_move(line: &str) -> std::result::Result<Input, String> {
    let trimmed = line.trim();
    if matches!(trimmed.to_ascii_lowercase().as_str(), "q" | "quit" | "exit") {
        return Ok(Input::Quit);
    }

    let numbers = trimmed
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|_| format!("not a number: '{}'", s)))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    match numbers.as_slice() {
        [layer, row, col] => index_of(*layer, *row, *col)
            .map(Input::Move)
            .map_err(|e| e.to_string()),
        [index] => Ok(Input::Move(*index)),
        _ => Err("enter three numbers: layer row col".to_string()),
    }
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

/// The four layers side by side; cells of `highlight` are bracketed
fn render_board(board: &Board, highlight: Option<&Line>) -> String {
    let mut out = String::new();

    for layer in 0..SIZE {
        out.push_str(&format!("{:<15}", format!(" Layer {}", layer)));
    }
    out.push('\n');

    for row in 0..SIZE {
        for layer in 0..SIZE {
            for col in 0..SIZE {
                let index = layer * 16 + row * 4 + col;
                let symbol = board.get(index).symbol();
                if highlight.map_or(false, |line| line.contains(index)) {
                    out.push_str(&format!("[{}]", symbol));
                } else {
                    out.push_str(&format!(" {} ", symbol));
                }
            }
            out.push_str("   ");
        }
        out.push('\n');
    }

    out
}

fn describe_decision(side: Player, result: &SearchResult) -> String {
    format!(
        "{} ({}, {}) plays {} [index {}]: score {}, nodes {}, pruned {}, table hits {}, {:.1}ms",
        side,
        result.algorithm,
        result.heuristic_label(),
        result.coord(),
        result.index,
        result.score,
        result.nodes,
        result.pruned,
        result.table_hits,
        result.elapsed.as_secs_f64() * 1000.0
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cubic_core::{status, SearchConfig};

    #[test]
    fn test_parse_move_coordinates() {
        assert_eq!(parse_move("1 2 3"), Ok(Input::Move(27)));
        assert_eq!(parse_move(" 0,0,3 "), Ok(Input::Move(3)));
        assert_eq!(parse_move("63"), Ok(Input::Move(63)));
        assert_eq!(parse_move("q"), Ok(Input::Quit));
        assert_eq!(parse_move("QUIT"), Ok(Input::Quit));
    }

    #[test]
    fn test_parse_move_errors() {
        assert!(parse_move("1 2").is_err());
        assert!(parse_move("a b c").is_err());
        assert!(parse_move("0 4 0").is_err());
        assert!(parse_move("").is_err());
    }

    #[test]
    fn test_render_board_layout() {
        let mut board = Board::new();
        board.apply(0, Player::X).unwrap();
        board.apply(63, Player::O).unwrap();

        let text = render_board(&board, None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Layer 0") && lines[0].contains("Layer 3"));
        assert!(lines[1].starts_with(" X "));
        assert!(lines[4].trim_end().ends_with('O'));
        assert!(!text.contains('['));
    }

    #[test]
    fn test_render_highlights_winning_line() {
        let mut board = Board::new();
        for index in [0, 1, 2, 3] {
            board.apply(index, Player::X).unwrap();
        }
        let st = status(&board);
        let text = render_board(&board, st.winning_line());
        assert_eq!(text.matches("[X]").count(), 4);
    }

    #[test]
    fn test_describe_decision() {
        let mut engine = SearchEngine::new(SearchConfig::alpha_beta(1)).unwrap();
        let mut game = Game::new();
        let result = game.ai_move(&mut engine).unwrap();
        let text = describe_decision(Player::X, &result);
        assert!(text.starts_with("X (alpha-beta, advanced) plays"));
        assert!(text.contains("nodes 64"));
    }
}
