//! Minimax search with alpha-beta pruning and a transposition table
//!
//! The search walks the tree in place: each child is explored by placing a
//! marker on the shared board and retracting it before the next sibling, so
//! the board is unchanged when a call returns normally. Moves are tried in
//! ascending index order and the root keeps the first of equally scored
//! moves, which makes every decision reproducible.
//!
//! With heuristic ordering enabled, interior nodes try their children
//! best-first by a one-ply heuristic score instead. That changes how much
//! gets pruned, never the root's choice.

use std::cmp::Reverse;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::board::{Board, Coord, EmptyIndices, Player};
use crate::config::{Algorithm, SearchConfig, TableScope};
use crate::error::{CubicError, Result};
use crate::eval::{terminal_score, Evaluate, HeuristicKind};
use crate::rules::{self, Status};
use crate::tt::{Bound, PositionKey, TranspositionTable, TtEntry};

/// Bound wider than any reachable score
const INFINITY: i32 = i32::MAX;

// ============================================================================
// SEARCH RESULT
// ============================================================================

/// Outcome of one AI decision
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Chosen cell
    pub index: usize,
    /// Score of the chosen move for the side that searched
    pub score: i32,
    /// Nodes visited below the root
    pub nodes: u64,
    /// Sibling moves skipped by cutoffs
    pub pruned: u64,
    /// Nodes answered from the transposition table
    pub table_hits: u64,
    pub elapsed: Duration,
    pub heuristic: HeuristicKind,
    pub algorithm: Algorithm,
    pub depth: u32,
}

impl SearchResult {
    pub fn heuristic_label(&self) -> &'static str {
        self.heuristic.label()
    }

    /// Coordinates of the chosen cell; `index` is always below 64
    pub fn coord(&self) -> Coord {
        Coord::from_index(self.index)
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct SearchStats {
    nodes: u64,
    pruned: u64,
    table_hits: u64,
}

// ============================================================================
// ENGINE
// ============================================================================

/// Search engine owning its configuration and transposition table
///
/// One engine serves one search at a time. Concurrent searches each need
/// their own engine and their own board.
#[derive(Debug)]
pub struct SearchEngine {
    config: SearchConfig,
    table: TranspositionTable,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let table = TranspositionTable::new(config.table_capacity);
        Ok(Self { config, table })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    pub fn clear_table(&mut self) {
        self.table.clear();
    }

    /// Pick the best move for `side`
    ///
    /// The board is explored hypothetically and restored before returning;
    /// committing the chosen move is left to the caller. Fails with
    /// `NoLegalMove` when the game is already decided or the board is full.
    pub fn find_best_move(&mut self, board: &mut Board, side: Player) -> Result<SearchResult> {
        if rules::status(board).is_over() {
            return Err(CubicError::NoLegalMove);
        }
        if self.config.table_scope == TableScope::PerMove {
            self.table.clear();
        }

        let start = Instant::now();
        let moves_before = board.move_count();
        let depth = self.config.depth;
        let pruning = self.config.algorithm == Algorithm::AlphaBeta;

        let mut searcher = Searcher {
            table: self
                .config
                .use_transposition_table
                .then_some(&mut self.table),
            heuristic: self.config.heuristic,
            pruning,
            symmetric: self.config.symmetry_reduction,
            ordering: self.config.heuristic_ordering,
            root: side,
            stats: SearchStats::default(),
        };

        let mut best: Option<(usize, i32)> = None;
        let mut alpha = -INFINITY;
        for index in board.empty_indices() {
            let score = board.scoped(index as u8, side, |b| {
                searcher.minimax(b, depth - 1, alpha, INFINITY, false)
            });
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((index, score));
            }
            if pruning {
                alpha = alpha.max(score);
            }
        }

        assert_eq!(
            board.move_count(),
            moves_before,
            "search left the board with a different number of moves"
        );

        let (index, score) = best.ok_or(CubicError::NoLegalMove)?;
        let stats = searcher.stats;
        let result = SearchResult {
            index,
            score,
            nodes: stats.nodes,
            pruned: stats.pruned,
            table_hits: stats.table_hits,
            elapsed: start.elapsed(),
            heuristic: self.config.heuristic,
            algorithm: self.config.algorithm,
            depth,
        };

        tracing::debug!(
            "{} chose {} ({}): score={}, nodes={}, pruned={}, hits={}, {:?}",
            side,
            index,
            result.coord(),
            score,
            result.nodes,
            result.pruned,
            result.table_hits,
            result.elapsed
        );

        Ok(result)
    }
}

/// One-shot alpha-beta search on a copy of `board` with a fresh table
pub fn find_best_move(
    board: &Board,
    side: Player,
    depth: u32,
    heuristic: HeuristicKind,
) -> Result<SearchResult> {
    let config = SearchConfig::alpha_beta(depth).with_heuristic(heuristic);
    let mut engine = SearchEngine::new(config)?;
    let mut scratch = board.clone();
    engine.find_best_move(&mut scratch, side)
}

// ============================================================================
// MINIMAX
// ============================================================================

/// Per-call search state
struct Searcher<'t> {
    table: Option<&'t mut TranspositionTable>,
    heuristic: HeuristicKind,
    pruning: bool,
    symmetric: bool,
    ordering: bool,
    /// Side the whole search maximises for
    root: Player,
    stats: SearchStats,
}

impl Searcher<'_> {
    /// Value of `board` for `self.root` with `depth` plies left.
    /// `maximizing` is true when `self.root` is to move.
    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.stats.nodes += 1;

        match rules::status(board) {
            Status::Win { player, .. } => return terminal_score(player, self.root, depth),
            Status::Draw => return 0,
            Status::Ongoing => {}
        }
        if depth == 0 {
            return self.heuristic.score(board, self.root);
        }

        let to_move = if maximizing {
            self.root
        } else {
            self.root.opponent()
        };

        let key = self
            .table
            .is_some()
            .then(|| PositionKey::new(board, to_move, self.root, self.symmetric));
        if let (Some(table), Some(key)) = (self.table.as_deref(), key.as_ref()) {
            if let Some(score) = table.probe(key).and_then(|e| e.usable(depth, alpha, beta)) {
                self.stats.table_hits += 1;
                return score;
            }
        }

        let (alpha_in, beta_in) = (alpha, beta);
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        let mut moves = if self.ordering && depth >= 2 {
            Moves::Ordered(order_moves(board, to_move, self.heuristic).into_iter())
        } else {
            Moves::Ascending(board.empty_indices())
        };

        while let Some(index) = moves.next() {
            let score = board.scoped(index, to_move, |b| {
                self.minimax(b, depth - 1, alpha, beta, !maximizing)
            });

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if self.pruning && alpha >= beta {
                self.stats.pruned += moves.len() as u64;
                break;
            }
        }

        if let (Some(table), Some(key)) = (self.table.as_deref_mut(), key) {
            let bound = if !self.pruning {
                Bound::Exact
            } else if best <= alpha_in {
                Bound::Upper
            } else if best >= beta_in {
                Bound::Lower
            } else {
                Bound::Exact
            };
            table.store(key, TtEntry { depth, score: best, bound });
        }

        best
    }
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Children of an interior node in the order they are searched
enum Moves {
    Ascending(EmptyIndices),
    Ordered(std::vec::IntoIter<u8>),
}

impl Iterator for Moves {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        match self {
            Moves::Ascending(iter) => iter.next().map(|i| i as u8),
            Moves::Ordered(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Moves::Ascending(iter) => iter.size_hint(),
            Moves::Ordered(iter) => iter.size_hint(),
        }
    }
}

impl ExactSizeIterator for Moves {}

/// Empty cells sorted by the mover's heuristic score after playing there,
/// best first; equal scores keep ascending index order
fn order_moves(board: &mut Board, to_move: Player, heuristic: HeuristicKind) -> Vec<u8> {
    let mut scored: Vec<(i32, u8)> = board
        .empty_indices()
        .map(|i| {
            let index = i as u8;
            let score = board.scoped(index, to_move, |b| heuristic.score(b, to_move));
            (score, index)
        })
        .collect();
    scored.sort_by_key(|&(score, index)| (Reverse(score), index));
    scored.into_iter().map(|(_, index)| index).collect()
}

// ============================================================================
// TESTS
// ============================================================================
