//! The 76 winning lines of the 4x4x4 cube
//!
//! Built once on first use and shared for the rest of the process. Order is
//! canonical: axis lines, then planar diagonals, then space diagonals.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::board::{coordinates_of, Board, Cell, Coord, Player, CELLS, SIZE};

/// Number of winning lines in the cube
pub const LINE_COUNT: usize = 76;

/// Direction a straight line travels in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Fixed layer and row
    Col,
    /// Fixed layer and column
    Row,
    /// Fixed row and column
    Layer,
}

/// Slice a planar diagonal lies in, named by its fixed coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plane {
    Layer(u8),
    Row(u8),
    Col(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    Axis(Axis),
    PlanarDiagonal(Plane),
    SpaceDiagonal,
}

/// One winning line: four cell indices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub cells: [u8; 4],
    pub kind: LineKind,
}

impl Line {
    pub fn contains(&self, index: usize) -> bool {
        self.cells.iter().any(|&c| c as usize == index)
    }

    /// Occupancy counts as (X markers, O markers, empty)
    pub fn occupancy(&self, board: &Board) -> (u8, u8, u8) {
        let mut counts = (0u8, 0u8, 0u8);
        for &c in &self.cells {
            match board.get(c as usize) {
                Cell::X => counts.0 += 1,
                Cell::O => counts.1 += 1,
                Cell::Empty => counts.2 += 1,
            }
        }
        counts
    }

    /// Side holding all four cells, if any
    pub fn owner(&self, board: &Board) -> Option<Player> {
        let first = board.get(self.cells[0] as usize).player()?;
        let cell = Cell::from(first);
        self.cells[1..]
            .iter()
            .all(|&c| board.get(c as usize) == cell)
            .then_some(first)
    }

    /// Short human description, e.g. "layer 2" or "3D diagonal"
    pub fn describe(&self) -> String {
        let coords: Vec<Coord> = self
            .cells
            .iter()
            .filter_map(|&c| coordinates_of(c as usize).ok())
            .collect();
        let first = coords[0];

        if coords.iter().all(|c| c.layer == first.layer) {
            format!("layer {}", first.layer)
        } else if coords.iter().all(|c| c.row == first.row) {
            format!("row {}", first.row)
        } else if coords.iter().all(|c| c.col == first.col) {
            format!("column {}", first.col)
        } else {
            "3D diagonal".to_string()
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.cells;
        write!(f, "[{}, {}, {}, {}] ({})", a, b, c, d, self.describe())
    }
}

/// The shared line table
pub fn lines() -> &'static [Line] {
    static LINES: OnceLock<Vec<Line>> = OnceLock::new();
    LINES.get_or_init(build_lines)
}

const fn flat(layer: usize, row: usize, col: usize) -> u8 {
    (layer * SIZE * SIZE + row * SIZE + col) as u8
}

fn line(kind: LineKind, f: impl Fn(usize) -> u8) -> Line {
    Line {
        cells: [f(0), f(1), f(2), f(3)],
        kind,
    }
}

fn build_lines() -> Vec<Line> {
    let last = SIZE - 1;
    let mut lines = Vec::with_capacity(LINE_COUNT);

    // Axis-parallel lines
    for layer in 0..SIZE {
        for row in 0..SIZE {
            lines.push(line(LineKind::Axis(Axis::Col), |i| flat(layer, row, i)));
        }
    }
    for layer in 0..SIZE {
        for col in 0..SIZE {
            lines.push(line(LineKind::Axis(Axis::Row), |i| flat(layer, i, col)));
        }
    }
    for row in 0..SIZE {
        for col in 0..SIZE {
            lines.push(line(LineKind::Axis(Axis::Layer), |i| flat(i, row, col)));
        }
    }

    // Planar diagonals
    for layer in 0..SIZE {
        let plane = LineKind::PlanarDiagonal(Plane::Layer(layer as u8));
        lines.push(line(plane, |i| flat(layer, i, i)));
        lines.push(line(plane, |i| flat(layer, i, last - i)));
    }
    for row in 0..SIZE {
        let plane = LineKind::PlanarDiagonal(Plane::Row(row as u8));
        lines.push(line(plane, |i| flat(i, row, i)));
        lines.push(line(plane, |i| flat(i, row, last - i)));
    }
    for col in 0..SIZE {
        let plane = LineKind::PlanarDiagonal(Plane::Col(col as u8));
        lines.push(line(plane, |i| flat(i, i, col)));
        lines.push(line(plane, |i| flat(i, last - i, col)));
    }

    // Space diagonals
    lines.push(line(LineKind::SpaceDiagonal, |i| flat(i, i, i)));
    lines.push(line(LineKind::SpaceDiagonal, |i| flat(i, i, last - i)));
    lines.push(line(LineKind::SpaceDiagonal, |i| flat(i, last - i, i)));
    lines.push(line(LineKind::SpaceDiagonal, |i| flat(i, last - i, last - i)));

    validate(&lines);
    lines
}

/// A malformed table is a programming error
fn validate(lines: &[Line]) {
    assert_eq!(lines.len(), LINE_COUNT, "line table must hold exactly 76 lines");

    let mut seen = Vec::with_capacity(LINE_COUNT);
    for line in lines {
        let mut sorted = line.cells;
        sorted.sort_unstable();
        assert!(
            sorted.windows(2).all(|w| w[0] < w[1]),
            "line {:?} repeats a cell",
            line.cells
        );
        assert!((sorted[3] as usize) < CELLS, "line {:?} leaves the board", line.cells);
        assert!(!seen.contains(&sorted), "line {:?} appears twice", line.cells);
        seen.push(sorted);
    }
}
