//! Winning line analysis for the 3x3 play zone

use super::{Board, Cell, CellIndex};

const fn at(row: usize, col: usize) -> CellIndex {
    CellIndex::from_parts(row, col)
}

/// Winning lines in evaluation order: rows, then columns, then diagonals
pub const WINNING_LINES: [[CellIndex; 3]; 8] = [
    [at(0, 0), at(0, 1), at(0, 2)],
    [at(1, 0), at(1, 1), at(1, 2)],
    [at(2, 0), at(2, 1), at(2, 2)], // rows
    [at(0, 0), at(1, 0), at(2, 0)],
    [at(0, 1), at(1, 1), at(2, 1)],
    [at(0, 2), at(1, 2), at(2, 2)], // columns
    [at(0, 0), at(1, 1), at(2, 2)],
    [at(0, 2), at(1, 1), at(2, 0)], // diagonals
];

/// Utility for analyzing winning lines
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// First line (in [`WINNING_LINES`] order) filled with a single color
    pub fn first_winning_line(board: &Board) -> Option<[CellIndex; 3]> {
        WINNING_LINES.iter().copied().find(|line| {
            let first = board.get(line[0]);
            first != Cell::Empty && line.iter().all(|&idx| board.get(idx) == first)
        })
    }
}
