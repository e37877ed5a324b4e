//! Error types for board mutation, search and configuration

use thiserror::Error;

/// Recoverable failures surfaced to callers.
///
/// Broken internal invariants (out-of-order retraction, a malformed line
/// table, two sides winning at once) are not represented here; they panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CubicError {
    #[error("invalid move at index {index}: {reason}")]
    InvalidMove { index: usize, reason: &'static str },

    #[error("coordinates out of range: layer={layer}, row={row}, col={col}")]
    OutOfRange { layer: usize, row: usize, col: usize },

    #[error("unrecognised board notation: {0}")]
    BadNotation(String),

    #[error("no legal move: the game is already over")]
    NoLegalMove,

    #[error("game is over; start a new game")]
    GameOver,

    #[error("unknown heuristic '{0}' (expected 'simple' or 'advanced')")]
    UnknownHeuristic(String),

    #[error("unknown algorithm '{0}' (expected 'minimax' or 'alpha-beta')")]
    UnknownAlgorithm(String),

    #[error("unknown table scope '{0}' (expected 'per-move' or 'session')")]
    UnknownTableScope(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CubicError>;
