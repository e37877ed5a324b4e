//! Position evaluation
//!
//! Two leaf estimators share the `Evaluate` capability:
//! - `Simple`: open-line balance
//! - `Advanced`: threat and pattern weights plus centre control
//!
//! Both are called only on non-terminal boards. Terminal boards are scored
//! with `terminal_score`, whose magnitude dominates any heuristic value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Player};
use crate::error::CubicError;
use crate::lines::lines;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Base score of a won position. Heuristic scores stay far below this.
pub const WIN_SCORE: i32 = 1_000_000;

/// Three own markers and an empty cell
pub const THREAT: i32 = 500;
/// Three opposing markers and an empty cell. Weighted above `THREAT` so
/// blocking is preferred over building.
pub const BLOCK_THREAT: i32 = 600;
/// Two markers and two empty cells
pub const TWO_IN_LINE: i32 = 50;
/// One marker and three empty cells
pub const ONE_IN_LINE: i32 = 5;
/// Per marker on one of the 8 centre cells
pub const CENTER_BONUS: i32 = 10;

/// Cells with every coordinate in {1, 2}
pub const CENTER_CELLS: [usize; 8] = [21, 22, 25, 26, 37, 38, 41, 42];

// ============================================================================
// EVALUATORS
// ============================================================================

/// Score a non-terminal board; higher is better for `side`
pub trait Evaluate {
    fn score(&self, board: &Board, side: Player) -> i32;
}

/// Open lines for `side` minus open lines for the opponent
#[derive(Clone, Copy, Debug, Default)]
pub struct Simple;

impl Evaluate for Simple {
    fn score(&self, board: &Board, side: Player) -> i32 {
        let mut score = 0;
        for line in lines() {
            let (own, opp) = counts(line.occupancy(board), side);
            if opp == 0 {
                score += 1;
            }
            if own == 0 {
                score -= 1;
            }
        }
        score
    }
}

/// Pattern scoring over every line plus a centre bonus
#[derive(Clone, Copy, Debug, Default)]
pub struct Advanced;

impl Evaluate for Advanced {
    fn score(&self, board: &Board, side: Player) -> i32 {
        let mut score = 0;

        for line in lines() {
            let occupancy = line.occupancy(board);
            let empty = occupancy.2;
            let (own, opp) = counts(occupancy, side);

            if opp == 0 {
                score += match (own, empty) {
                    (3, 1) => THREAT,
                    (2, 2) => TWO_IN_LINE,
                    (1, 3) => ONE_IN_LINE,
                    _ => 0,
                };
            }
            if own == 0 {
                score -= match (opp, empty) {
                    (3, 1) => BLOCK_THREAT,
                    (2, 2) => TWO_IN_LINE,
                    (1, 3) => ONE_IN_LINE,
                    _ => 0,
                };
            }
        }

        let own_cell = Cell::from(side);
        for &index in &CENTER_CELLS {
            match board.get(index) {
                Cell::Empty => {}
                c if c == own_cell => score += CENTER_BONUS,
                _ => score -= CENTER_BONUS,
            }
        }

        score
    }
}

/// (own, opponent) marker counts from an (X, O, empty) occupancy
fn counts((x, o, _): (u8, u8, u8), side: Player) -> (u8, u8) {
    match side {
        Player::X => (x, o),
        Player::O => (o, x),
    }
}

// ============================================================================
// STRATEGY SELECTION
// ============================================================================

/// Closed set of heuristic strategies, selectable by name
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    Simple,
    #[default]
    Advanced,
}

impl HeuristicKind {
    pub fn label(self) -> &'static str {
        match self {
            HeuristicKind::Simple => "simple",
            HeuristicKind::Advanced => "advanced",
        }
    }

    pub const ALL: [HeuristicKind; 2] = [HeuristicKind::Simple, HeuristicKind::Advanced];
}

impl Evaluate for HeuristicKind {
    fn score(&self, board: &Board, side: Player) -> i32 {
        match self {
            HeuristicKind::Simple => Simple.score(board, side),
            HeuristicKind::Advanced => Advanced.score(board, side),
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HeuristicKind {
    type Err = CubicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(HeuristicKind::Simple),
            "advanced" => Ok(HeuristicKind::Advanced),
            other => Err(CubicError::UnknownHeuristic(other.to_string())),
        }
    }
}

/// Score of a won/lost position from `perspective`, with `depth` plies of
/// search budget left. Sooner wins score higher, sooner losses lower.
pub fn terminal_score(winner: Player, perspective: Player, depth: u32) -> i32 {
    let magnitude = WIN_SCORE + depth as i32;
    if winner == perspective {
        magnitude
    } else {
        -magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::coordinates_of;

    fn board_with(x: &[usize], o: &[usize]) -> Board {
        let mut board = Board::new();
        for &i in x {
            board.apply(i, Player::X).unwrap();
        }
        for &i in o {
            board.apply(i, Player::O).unwrap();
        }
        board
    }

    #[test]
    fn test_empty_board_scores_zero() {
        let board = Board::new();
        for kind in HeuristicKind::ALL {
            assert_eq!(kind.score(&board, Player::X), 0);
            assert_eq!(kind.score(&board, Player::O), 0);
        }
    }

    #[test]
    fn test_simple_counts_open_lines() {
        // A corner marker closes 7 lines to the opponent
        let board = board_with(&[0], &[]);
        assert_eq!(Simple.score(&board, Player::X), 7);
        assert_eq!(Simple.score(&board, Player::O), -7);
    }

    #[test]
    fn test_simple_antisymmetric() {
        let board = board_with(&[0, 21, 5, 60], &[1, 42, 17]);
        let x = Simple.score(&board, Player::X);
        assert_eq!(x, -Simple.score(&board, Player::O));
        // Swapping the markers mirrors the score
        let swapped = board.swap_sides();
        assert_eq!(x, -Simple.score(&swapped, Player::X));
        assert_eq!(x, Simple.score(&swapped, Player::O));
    }

    #[test]
    fn test_advanced_threat_weights() {
        // X holds three cells of the first row; nothing else on the board
        let board = board_with(&[0, 1, 2], &[]);
        let for_x = Advanced.score(&board, Player::X);
        let for_o = Advanced.score(&board, Player::O);

        // Everything except the threat terms cancels between perspectives
        assert_eq!(for_x + for_o, THREAT - BLOCK_THREAT);
        assert!(BLOCK_THREAT >= THREAT);
        assert!(for_o < -THREAT);
    }

    #[test]
    fn test_advanced_pattern_constants() {
        // Lone corner marker: 7 single-marker lines
        let board = board_with(&[0], &[]);
        assert_eq!(Advanced.score(&board, Player::X), 7 * ONE_IN_LINE);

        // Two markers sharing one line: that line becomes a two, the rest stay singles
        let board = board_with(&[0, 3], &[]);
        let expected = TWO_IN_LINE + 12 * ONE_IN_LINE;
        assert_eq!(Advanced.score(&board, Player::X), expected);
    }

    #[test]
    fn test_advanced_center_bonus() {
        let center = 21;
        assert!(coordinates_of(center).unwrap().is_center());
        let board = board_with(&[center], &[]);
        assert_eq!(
            Advanced.score(&board, Player::X),
            7 * ONE_IN_LINE + CENTER_BONUS
        );
    }

    #[test]
    fn test_advanced_deterministic() {
        let board = board_with(&[0, 21, 43], &[5, 6]);
        let a = Advanced.score(&board, Player::O);
        let b = Advanced.score(&board, Player::O);
        assert_eq!(a, b);
    }

    #[test]
    fn test_win_dominates_heuristic() {
        // Upper bound of any advanced score: every line a threat plus all centres
        let max = 76 * BLOCK_THREAT + 8 * CENTER_BONUS;
        assert!(terminal_score(Player::X, Player::X, 0) > max);
        assert!(terminal_score(Player::O, Player::X, 0) < -max);
        assert!(terminal_score(Player::X, Player::X, 3) > terminal_score(Player::X, Player::X, 1));
        assert!(terminal_score(Player::O, Player::X, 3) < terminal_score(Player::O, Player::X, 1));
    }

    #[test]
    fn test_heuristic_from_str() {
        assert_eq!("simple".parse::<HeuristicKind>().unwrap(), HeuristicKind::Simple);
        assert_eq!("Advanced".parse::<HeuristicKind>().unwrap(), HeuristicKind::Advanced);
        assert!(matches!(
            "none".parse::<HeuristicKind>(),
            Err(CubicError::UnknownHeuristic(_))
        ));
        assert_eq!(HeuristicKind::default().to_string(), "advanced");
    }
}
