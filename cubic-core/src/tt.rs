//! Transposition table
//!
//! Maps a position key to the best score found for it, the remaining depth
//! that score was searched to, and whether the score is exact or a bound.
//! Scores are always from the perspective of the side the search is run for,
//! which is part of the key.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::board::{Board, Player};
use crate::symmetry;

/// How a stored score relates to the true minimax value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Search completed inside the window
    Exact,
    /// True value >= score (cutoff at or above beta)
    Lower,
    /// True value <= score (failed low at or below alpha)
    Upper,
}

/// Canonical key of a searched position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey {
    /// 2 bits per cell, see `Board::encode`
    pub cells: u128,
    pub to_move: Player,
    /// Side whose score is being maximised
    pub perspective: Player,
}

impl PositionKey {
    /// Build a key; with `symmetric` the cell encoding is the minimum over
    /// all 48 cube symmetries so mirrored positions share an entry.
    pub fn new(board: &Board, to_move: Player, perspective: Player, symmetric: bool) -> Self {
        let cells = if symmetric {
            symmetry::canonical_encoding(board)
        } else {
            board.encode()
        };
        Self {
            cells,
            to_move,
            perspective,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    pub depth: u32,
    pub score: i32,
    pub bound: Bound,
}

impl TtEntry {
    /// Score usable for a node searched to `depth` inside (alpha, beta)
    pub fn usable(&self, depth: u32, alpha: i32, beta: i32) -> Option<i32> {
        if self.depth < depth {
            return None;
        }
        match self.bound {
            Bound::Exact => Some(self.score),
            Bound::Lower if self.score >= beta => Some(self.score),
            Bound::Upper if self.score <= alpha => Some(self.score),
            _ => None,
        }
    }
}

/// Bounded map of searched positions
///
/// Once `capacity` distinct positions are stored, new positions are
/// dropped; existing entries can still be deepened.
#[derive(Debug)]
pub struct TranspositionTable {
    entries: FxHashMap<PositionKey, TtEntry>,
    capacity: usize,
    rejected: u64,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            capacity,
            rejected: 0,
        }
    }

    pub fn probe(&self, key: &PositionKey) -> Option<TtEntry> {
        self.entries.get(key).copied()
    }

    /// Store an entry, replacing an existing one only when the new search
    /// was at least as deep
    pub fn store(&mut self, key: PositionKey, entry: TtEntry) {
        let len = self.entries.len();
        match self.entries.entry(key) {
            Entry::Occupied(mut slot) => {
                if entry.depth >= slot.get().depth {
                    slot.insert(entry);
                }
            }
            Entry::Vacant(slot) if len < self.capacity => {
                slot.insert(entry);
            }
            Entry::Vacant(_) => {
                if self.rejected == 0 {
                    tracing::trace!("transposition table full at {} entries", self.capacity);
                }
                self.rejected += 1;
            }
        }
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            tracing::trace!("clearing {} table entries", self.entries.len());
        }
        self.entries.clear();
        self.rejected = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// New positions dropped because the table was full
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(board: &Board) -> PositionKey {
        PositionKey::new(board, Player::X, Player::O, false)
    }

    #[test]
    fn test_store_and_probe() {
        let mut tt = TranspositionTable::new(16);
        let board = Board::new();
        let entry = TtEntry { depth: 2, score: 40, bound: Bound::Exact };
        tt.store(key(&board), entry);
        assert_eq!(tt.probe(&key(&board)), Some(entry));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_key_includes_side_and_perspective() {
        let board = Board::new();
        let a = PositionKey::new(&board, Player::X, Player::O, false);
        let b = PositionKey::new(&board, Player::O, Player::O, false);
        let c = PositionKey::new(&board, Player::X, Player::X, false);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_shallower_entry_does_not_replace() {
        let mut tt = TranspositionTable::new(16);
        let k = key(&Board::new());
        tt.store(k, TtEntry { depth: 3, score: 10, bound: Bound::Exact });
        tt.store(k, TtEntry { depth: 1, score: 99, bound: Bound::Exact });
        assert_eq!(tt.probe(&k).unwrap().score, 10);
        tt.store(k, TtEntry { depth: 3, score: 12, bound: Bound::Exact });
        assert_eq!(tt.probe(&k).unwrap().score, 12);
    }

    #[test]
    fn test_usable_respects_depth_and_bounds() {
        let exact = TtEntry { depth: 2, score: 5, bound: Bound::Exact };
        assert_eq!(exact.usable(2, -100, 100), Some(5));
        assert_eq!(exact.usable(1, -100, 100), Some(5));
        assert_eq!(exact.usable(3, -100, 100), None);

        let lower = TtEntry { depth: 2, score: 50, bound: Bound::Lower };
        assert_eq!(lower.usable(2, 0, 40), Some(50));
        assert_eq!(lower.usable(2, 0, 60), None);

        let upper = TtEntry { depth: 2, score: -10, bound: Bound::Upper };
        assert_eq!(upper.usable(2, 0, 60), Some(-10));
        assert_eq!(upper.usable(2, -20, 60), None);
    }

    #[test]
    fn test_capacity_limit() {
        let mut tt = TranspositionTable::new(2);
        let mut board = Board::new();
        for index in 0..4 {
            board.apply(index, Player::X).unwrap();
            tt.store(key(&board), TtEntry { depth: 1, score: 0, bound: Bound::Exact });
        }
        assert_eq!(tt.len(), 2);
        assert_eq!(tt.rejected(), 2);

        tt.clear();
        assert!(tt.is_empty());
        assert_eq!(tt.rejected(), 0);
    }
}
