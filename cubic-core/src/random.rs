//! Seeded random play: a sparring opponent and random test positions

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Player};
use crate::rules;

/// Picks a uniformly random empty cell
pub struct RandomPlayer {
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Random empty cell, or None on a full board
    pub fn choose(&mut self, board: &Board) -> Option<usize> {
        board.empty_indices().choose(&mut self.rng)
    }
}

/// Board reached by `plies` random alternating moves starting with X.
/// Stops early when a move ends the game.
pub fn random_position(rng: &mut ChaCha8Rng, plies: usize) -> Board {
    let mut board = Board::new();
    let mut side = Player::X;

    for _ in 0..plies {
        let Some(index) = board.empty_indices().choose(rng) else {
            break;
        };
        if board.apply(index, side).is_err() {
            break;
        }
        if rules::status(&board).is_over() {
            break;
        }
        side = side.opponent();
    }

    board
}
