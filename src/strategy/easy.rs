//! One-ply lookahead: take a win, block a loss, otherwise play at random

use rand::Rng;

use super::random;
use crate::tictactoe::{Board, CellIndex, Colors};

pub fn choose<R: Rng + ?Sized>(board: &Board, colors: Colors, rng: &mut R) -> Option<CellIndex> {
    board
        .immediate_win_for(colors.computer)
        .or_else(|| board.immediate_win_for(colors.human))
        .or_else(|| random::choose(board, rng))
}
