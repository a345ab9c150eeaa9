//! Tic-tac-toe board model

pub mod board;
pub mod game;
pub mod lines;

pub use board::{Board, Cell, CellIndex, GameResult, PlayerColor};
pub use game::{Colors, GameOutcome, Move, Participant};
pub use lines::{LineAnalyzer, WINNING_LINES};
