//! Terminal detection: win, draw or ongoing

use serde::{Deserialize, Serialize};

use crate::board::{Board, Player};
use crate::lines::{lines, Line};

/// Game status of a board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Ongoing,
    /// `line` is the first completed line in canonical order
    Win { player: Player, line: Line },
    Draw,
}

impl Status {
    pub fn is_over(&self) -> bool {
        !matches!(self, Status::Ongoing)
    }

    pub fn winner(&self) -> Option<Player> {
        match self {
            Status::Win { player, .. } => Some(*player),
            _ => None,
        }
    }

    pub fn winning_line(&self) -> Option<&Line> {
        match self {
            Status::Win { line, .. } => Some(line),
            _ => None,
        }
    }
}

/// First completed line and its owner, scanning in canonical order
///
/// Panics if both sides hold a completed line. Only the lines after the
/// first completed one are rescanned, so ongoing boards pay nothing extra.
pub fn winner(board: &Board) -> Option<(Player, Line)> {
    let table = lines();
    let (pos, player) = table
        .iter()
        .enumerate()
        .find_map(|(i, line)| line.owner(board).map(|p| (i, p)))?;

    assert!(
        table[pos + 1..]
            .iter()
            .all(|line| line.owner(board) != Some(player.opponent())),
        "both sides hold a completed line:\n{}",
        board
    );

    Some((player, table[pos]))
}

/// Classify a board as won, drawn or ongoing
pub fn status(board: &Board) -> Status {
    if let Some((player, line)) = winner(board) {
        return Status::Win { player, line };
    }
    if board.is_full() {
        Status::Draw
    } else {
        Status::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    const DRAWN: &str = "OOOXOXXOXOOOOOOX/XXOXXOXXOXOXOOXO/XOXOOOXOOXXOXXOX/XOXOXXOXXXOOOXXX";

    #[test]
    fn test_empty_board_ongoing() {
        assert_eq!(status(&Board::new()), Status::Ongoing);
    }

    #[test]
    fn test_axis_win() {
        let mut board = Board::new();
        for index in [0, 1, 2, 3] {
            board.apply(index, Player::X).unwrap();
        }
        board.apply(20, Player::O).unwrap();

        let s = status(&board);
        assert_eq!(s.winner(), Some(Player::X));
        assert_eq!(s.winning_line().unwrap().cells, [0, 1, 2, 3]);
        assert!(s.is_over());
    }

    #[test]
    fn test_space_diagonal_win() {
        let mut board = Board::new();
        for index in [15, 26, 37, 48] {
            board.apply(index, Player::O).unwrap();
        }
        let s = status(&board);
        assert_eq!(s.winner(), Some(Player::O));
        assert_eq!(s.winning_line().unwrap().describe(), "3D diagonal");
    }

    #[test]
    fn test_three_in_line_not_win() {
        let mut board = Board::new();
        for index in [0, 21, 42] {
            board.apply(index, Player::X).unwrap();
        }
        assert_eq!(status(&board), Status::Ongoing);
    }

    #[test]
    fn test_full_board_draw() {
        let board: Board = DRAWN.parse().unwrap();
        assert!(board.is_full());
        assert_eq!(board.count(Cell::X), 32);
        assert_eq!(status(&board), Status::Draw);
    }

    #[test]
    fn test_full_board_with_win_is_win() {
        // Same fill, but X takes the first row of layer 0
        let text: String = DRAWN
            .chars()
            .enumerate()
            .map(|(i, c)| if i < 4 { 'X' } else { c })
            .collect();
        let board: Board = text.parse().unwrap();
        assert!(board.is_full());
        assert_eq!(status(&board).winner(), Some(Player::X));
    }

    #[test]
    fn test_exactly_one_outcome() {
        let mut board = Board::new();
        let moves = [0usize, 16, 1, 17, 2, 18, 3];
        for (n, &index) in moves.iter().enumerate() {
            let player = if n % 2 == 0 { Player::X } else { Player::O };
            board.apply(index, player).unwrap();
            let s = status(&board);
            let flags = [
                s == Status::Ongoing,
                s.winner() == Some(Player::X),
                s.winner() == Some(Player::O),
                s == Status::Draw,
            ];
            assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
        }
        assert_eq!(status(&board).winner(), Some(Player::X));
    }

    #[test]
    #[should_panic(expected = "both sides hold a completed line")]
    fn test_double_win_panics() {
        // X on row 0 of layer 0, O on row 0 of layer 1
        let board: Board = "XXXX............/OOOO............/................/................"
            .parse()
            .unwrap();
        let _ = status(&board);
    }

    #[test]
    fn test_single_win_among_many_lines() {
        // X completes two lines at once; O holds three in a row
        let board: Board = "XXXXX...X...X.../OOO............./................/................"
            .parse()
            .unwrap();
        let s = status(&board);
        assert_eq!(s.winner(), Some(Player::X));
        assert_eq!(s.winning_line().unwrap().cells, [0, 1, 2, 3]);
    }
}
