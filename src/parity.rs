//! Solvability by permutation parity.
//!
//! A board is solvable iff its inversion count, corrected by the blank's row on even-sized
//! boards, has the same parity as the goal's. The solver doesn't use this, it finds out by
//! searching the board and its twin. The generator uses it to reject unsolvable shuffles.

use itertools::Itertools;

use crate::board::Board;

/// Number of pairs of non-blank tiles where the larger tile comes first in row-major order.
pub fn inversions(tiles: &[u16]) -> usize {
    tiles
        .iter()
        .filter(|&&tile| tile != 0)
        .tuple_combinations()
        .filter(|(first, second)| first > second)
        .count()
}

pub fn is_solvable(board: &Board) -> bool {
    let inversions = inversions(board.tiles());
    if board.dimension() % 2 == 1 {
        inversions % 2 == 0
    } else {
        let (blank_row, _) = board.blank();
        (inversions + blank_row) % 2 == 1
    }
}
