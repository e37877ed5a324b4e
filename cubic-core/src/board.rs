//! 4x4x4 board with flat cell indexing
//!
//! Cells are addressed by `index = layer * 16 + row * 4 + col`. The board is
//! mutated in place during search: every `apply` is paired with a `retract`
//! in reverse order, so a subtree walk leaves the board exactly as found.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CubicError, Result};

/// Cells along one edge of the cube
pub const SIZE: usize = 4;

/// Total number of cells
pub const CELLS: usize = SIZE * SIZE * SIZE;

// ============================================================================
// SIDES AND CELLS
// ============================================================================

/// One of the two sides. X moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X = 0,
    O = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Contents of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Owner of the cell, if any
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    /// 2-bit code used by position encodings
    pub(crate) fn code(self) -> u128 {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => 2,
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

// ============================================================================
// COORDINATES
// ============================================================================

/// Layer/row/column coordinates of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub layer: usize,
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(layer: usize, row: usize, col: usize) -> Self {
        Self { layer, row, col }
    }

    /// Layer/row/column split of a flat index, without range checking
    pub(crate) const fn from_index(index: usize) -> Self {
        Self::new(index / 16, (index / 4) % 4, index % 4)
    }

    /// Check if the coordinates lie inside the cube
    pub fn is_valid(&self) -> bool {
        self.layer < SIZE && self.row < SIZE && self.col < SIZE
    }

    /// One of the 8 cells with every coordinate in {1, 2}
    pub fn is_center(&self) -> bool {
        (1..=2).contains(&self.layer) && (1..=2).contains(&self.row) && (1..=2).contains(&self.col)
    }

    /// Flat index of this cell
    pub fn index(&self) -> Result<usize> {
        index_of(self.layer, self.row, self.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}, row {}, col {}", self.layer, self.row, self.col)
    }
}

/// Convert layer/row/column to a flat index
pub fn index_of(layer: usize, row: usize, col: usize) -> Result<usize> {
    if layer >= SIZE || row >= SIZE || col >= SIZE {
        return Err(CubicError::OutOfRange { layer, row, col });
    }
    Ok(layer * SIZE * SIZE + row * SIZE + col)
}

/// Convert a flat index back to layer/row/column
///
/// An index past the last cell maps to a layer beyond the cube and is
/// reported as that out-of-range triple.
pub fn coordinates_of(index: usize) -> Result<Coord> {
    let coord = Coord::from_index(index);
    if index >= CELLS {
        return Err(CubicError::OutOfRange {
            layer: coord.layer,
            row: coord.row,
            col: coord.col,
        });
    }
    Ok(coord)
}

// ============================================================================
// MOVE RECORD
// ============================================================================

/// Undo information for one applied move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub index: u8,
    pub prior: Cell,
}

// ============================================================================
// BOARD
// ============================================================================

/// The 64-cell game board
///
/// Equality and hashing look at the cells only: the same position reached
/// through a different move order compares equal.
#[derive(Clone, Debug)]
pub struct Board {
    cells: [Cell; CELLS],
    /// Bit i set when cell i is occupied
    occupied: u64,
    /// Applied indices in order; its length is the number of moves played
    history: Vec<u8>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cells.hash(state);
    }
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELLS],
            occupied: 0,
            history: Vec::with_capacity(CELLS),
        }
    }

    /// Get the contents of a cell
    ///
    /// Panics if `index >= 64`.
    pub fn get(&self, index: usize) -> Cell {
        self.cells[index]
    }

    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    /// Indices applied so far, oldest first
    pub fn history(&self) -> &[u8] {
        &self.history
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn is_full(&self) -> bool {
        self.occupied == u64::MAX
    }

    /// Place `player` on an empty cell
    pub fn apply(&mut self, index: usize, player: Player) -> Result<MoveRecord> {
        if index >= CELLS {
            return Err(CubicError::InvalidMove {
                index,
                reason: "index out of range",
            });
        }
        if !self.cells[index].is_empty() {
            return Err(CubicError::InvalidMove {
                index,
                reason: "cell already occupied",
            });
        }
        Ok(self.place(index as u8, player))
    }

    /// Undo the most recent `apply`
    ///
    /// Panics if `record` is not the latest move: retraction must follow
    /// strict stack order.
    pub fn retract(&mut self, record: MoveRecord) {
        let last = self.history.pop();
        assert_eq!(
            last,
            Some(record.index),
            "retraction out of order: expected {:?}, got index {}",
            last,
            record.index
        );
        self.cells[record.index as usize] = record.prior;
        if record.prior.is_empty() {
            self.occupied &= !(1u64 << record.index);
        }
    }

    /// Apply a move, run `f` on the resulting board, then retract the move
    pub fn with_move<R>(
        &mut self,
        index: usize,
        player: Player,
        f: impl FnOnce(&mut Board) -> R,
    ) -> Result<R> {
        let record = self.apply(index, player)?;
        let out = f(self);
        self.retract(record);
        Ok(out)
    }

    /// Unchecked placement for indices already known to be empty
    pub(crate) fn place(&mut self, index: u8, player: Player) -> MoveRecord {
        let i = index as usize;
        debug_assert!(self.cells[i].is_empty(), "placing on occupied cell {}", i);
        let record = MoveRecord {
            index,
            prior: self.cells[i],
        };
        self.cells[i] = Cell::from(player);
        self.occupied |= 1u64 << index;
        self.history.push(index);
        record
    }

    /// Scoped variant of `with_move` for indices taken from `empty_indices`
    pub(crate) fn scoped<R>(
        &mut self,
        index: u8,
        player: Player,
        f: impl FnOnce(&mut Board) -> R,
    ) -> R {
        let record = self.place(index, player);
        let out = f(self);
        self.retract(record);
        out
    }

    /// Empty cells in ascending index order
    pub fn empty_indices(&self) -> EmptyIndices {
        EmptyIndices {
            remaining: !self.occupied,
        }
    }

    /// Pack the 64 cells into 2 bits each. Distinct boards never collide.
    pub fn encode(&self) -> u128 {
        self.cells
            .iter()
            .enumerate()
            .fold(0u128, |acc, (i, cell)| acc | (cell.code() << (2 * i)))
    }

    /// Copy of the board with every X and O exchanged
    pub fn swap_sides(&self) -> Board {
        let mut swapped = self.clone();
        for cell in swapped.cells.iter_mut() {
            *cell = match *cell {
                Cell::Empty => Cell::Empty,
                Cell::X => Cell::O,
                Cell::O => Cell::X,
            };
        }
        swapped
    }

    /// Count of cells holding `cell`
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }
}

/// Compact notation: 64 cells of `.`, `X`, `O` in index order, layers
/// separated by `/`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (layer, chunk) in self.cells.chunks(SIZE * SIZE).enumerate() {
            if layer > 0 {
                write!(f, "/")?;
            }
            for cell in chunk {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = CubicError;

    /// Parse the `Display` notation. `/`, `|` and whitespace are ignored.
    fn from_str(s: &str) -> Result<Self> {
        let symbols: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/' && *c != '|')
            .collect();
        if symbols.len() != CELLS {
            return Err(CubicError::BadNotation(format!(
                "expected {} cells, found {}",
                CELLS,
                symbols.len()
            )));
        }

        let mut board = Board::new();
        for (index, symbol) in symbols.into_iter().enumerate() {
            let player = match symbol.to_ascii_uppercase() {
                '.' | '-' | '_' => continue,
                'X' => Player::X,
                'O' => Player::O,
                other => {
                    return Err(CubicError::BadNotation(format!(
                        "unexpected symbol '{}' at index {}",
                        other, index
                    )))
                }
            };
            board.place(index as u8, player);
        }
        Ok(board)
    }
}

/// Iterator over empty cell indices, lowest first. Cheap to copy and restart.
#[derive(Clone, Copy, Debug)]
pub struct EmptyIndices {
    remaining: u64,
}

impl Iterator for EmptyIndices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.remaining.trailing_zeros() as usize;
        self.remaining &= self.remaining - 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for EmptyIndices {}
