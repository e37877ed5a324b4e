//! Game session: the board, whose turn it is, and the outcome so far

use crate::board::{index_of, Board, Player};
use crate::error::{CubicError, Result};
use crate::lines::Line;
use crate::rules::{self, Status};
use crate::search::{SearchEngine, SearchResult};

/// One game of Cubic. X moves first.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Player,
    status: Status,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Player::X,
            status: Status::Ongoing,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Cell indices in the order they were played
    pub fn moves(&self) -> &[u8] {
        self.board.history()
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn winner(&self) -> Option<Player> {
        self.status.winner()
    }

    pub fn winning_line(&self) -> Option<&Line> {
        self.status.winning_line()
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    /// Place the side to move on `index` and pass the turn
    pub fn play(&mut self, index: usize) -> Result<Status> {
        if self.is_over() {
            return Err(CubicError::GameOver);
        }
        self.board.apply(index, self.to_move)?;
        self.status = rules::status(&self.board);

        tracing::debug!("{} plays {} -> {:?}", self.to_move, index, self.status);
        self.to_move = self.to_move.opponent();
        Ok(self.status)
    }

    /// `play` by coordinates
    pub fn play_at(&mut self, layer: usize, row: usize, col: usize) -> Result<Status> {
        let index = index_of(layer, row, col)?;
        self.play(index)
    }

    /// Let `engine` choose for the side to move and commit its choice
    pub fn ai_move(&mut self, engine: &mut SearchEngine) -> Result<SearchResult> {
        if self.is_over() {
            return Err(CubicError::GameOver);
        }
        let result = engine.find_best_move(&mut self.board, self.to_move)?;
        self.play(result.index)?;
        Ok(result)
    }
}
