//! Uniformly random play

use rand::{Rng, seq::IndexedRandom};

use crate::tictactoe::{Board, CellIndex};

/// Pick any empty cell with equal probability
pub fn choose<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<CellIndex> {
    board.empty_cells().choose(rng).copied()
}
