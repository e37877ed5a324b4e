//! Rigid symmetries of the cube
//!
//! The 48 maps formed by permuting the three axes and reflecting any subset
//! of them send winning lines to winning lines and centre cells to centre
//! cells, so symmetric positions have identical search values.

use std::sync::OnceLock;

use crate::board::{Board, CELLS, SIZE};

/// Number of rigid symmetries (3! axis orders x 2^3 reflections)
pub const SYMMETRY_COUNT: usize = 48;

type Permutation = [u8; CELLS];

/// Index permutations, identity first
pub fn permutations() -> &'static [Permutation] {
    static PERMS: OnceLock<Vec<Permutation>> = OnceLock::new();
    PERMS.get_or_init(build_permutations)
}

fn build_permutations() -> Vec<Permutation> {
    const AXIS_ORDERS: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    let last = SIZE - 1;
    let mut perms = Vec::with_capacity(SYMMETRY_COUNT);

    for order in AXIS_ORDERS {
        for mirror in 0..8u8 {
            let mut perm = [0u8; CELLS];
            for (index, slot) in perm.iter_mut().enumerate() {
                let src = [index / 16, (index / 4) % 4, index % 4];
                let mut dst = [src[order[0]], src[order[1]], src[order[2]]];
                for (axis, v) in dst.iter_mut().enumerate() {
                    if mirror & (1 << axis) != 0 {
                        *v = last - *v;
                    }
                }
                *slot = (dst[0] * 16 + dst[1] * 4 + dst[2]) as u8;
            }
            perms.push(perm);
        }
    }

    assert_eq!(perms.len(), SYMMETRY_COUNT);
    perms
}

/// Encoding of `board` after moving each cell `i` to `perm[i]`
pub fn encode_with(board: &Board, perm: &Permutation) -> u128 {
    board
        .cells()
        .iter()
        .zip(perm.iter())
        .fold(0u128, |acc, (cell, &to)| acc | (cell.code() << (2 * to as u32)))
}

/// Smallest encoding over all symmetric images of `board`
pub fn canonical_encoding(board: &Board) -> u128 {
    permutations()
        .iter()
        .map(|perm| encode_with(board, perm))
        .min()
        .unwrap_or_else(|| board.encode())
}
