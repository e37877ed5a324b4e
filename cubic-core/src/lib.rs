//! Cubic Core - 4x4x4 tic-tac-toe engine and AI
//!
//! This crate provides the core game logic for Cubic:
//! - Board representation with in-place move/retract
//! - The 76 winning lines and terminal detection
//! - Position evaluation (simple and advanced heuristics)
//! - Minimax / alpha-beta search with a transposition table
//! - A game session driving the engine

pub mod board;
pub mod lines;
pub mod rules;
pub mod eval;
pub mod tt;
pub mod symmetry;
pub mod search;
pub mod config;
pub mod game;
pub mod random;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Cell, Coord, MoveRecord, Player, CELLS, SIZE, index_of, coordinates_of};
pub use lines::{lines, Line, LineKind, LINE_COUNT};
pub use rules::{status, winner, Status};
pub use eval::{Evaluate, HeuristicKind, terminal_score, WIN_SCORE};
pub use tt::{Bound, PositionKey, TranspositionTable, TtEntry};
pub use search::{find_best_move, SearchEngine, SearchResult};
pub use config::{Algorithm, SearchConfig, TableScope};
pub use game::Game;
pub use random::{random_position, RandomPlayer};
pub use error::{CubicError, Result};
