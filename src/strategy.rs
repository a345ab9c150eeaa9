//! Move selection for the computer player.
//!
//! Strategies are pure functions of a board snapshot and the color
//! assignment; they return the chosen cell and never touch the board they are
//! given. Applying the move is the caller's job (see
//! [`crate::session::GameSession::commit_computer_move`]).

pub mod easy;
pub mod optimal;
pub mod random;

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    tictactoe::{Board, CellIndex, Colors},
};

/// Difficulty levels offered to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Strategy {
    /// Uniformly random empty cell
    Random,
    /// Win if possible, otherwise block, otherwise random
    Easy,
    /// Rule-based perfect play; `randomized` plays one move in five at random
    Optimal { randomized: bool },
}

impl Strategy {
    /// "hard": beatable variant of the optimal strategy
    pub const HARD: Strategy = Strategy::Optimal { randomized: true };
    /// "impossible": the optimal strategy without random moves
    pub const IMPOSSIBLE: Strategy = Strategy::Optimal { randomized: false };

    const KEYS: &'static str = "r (random), e (easy), h (hard), i (impossible)";

    /// Choose the computer's next cell, `None` when the board is full
    pub fn choose<R: Rng + ?Sized>(
        &self,
        board: &Board,
        colors: Colors,
        rng: &mut R,
    ) -> Option<CellIndex> {
        match *self {
            Strategy::Random => random::choose(board, rng),
            Strategy::Easy => easy::choose(board, colors, rng),
            Strategy::Optimal { randomized } => optimal::choose(board, colors, randomized, rng),
        }
    }

    /// Single-letter key used on the command line
    pub fn key(self) -> char {
        match self {
            Strategy::Random => 'r',
            Strategy::Easy => 'e',
            Strategy::Optimal { randomized: true } => 'h',
            Strategy::Optimal { randomized: false } => 'i',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Random => "random",
            Strategy::Easy => "easy",
            Strategy::Optimal { randomized: true } => "hard",
            Strategy::Optimal { randomized: false } => "impossible",
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::IMPOSSIBLE
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "random" => Ok(Strategy::Random),
            "e" | "easy" => Ok(Strategy::Easy),
            "h" | "hard" => Ok(Strategy::HARD),
            "i" | "impossible" => Ok(Strategy::IMPOSSIBLE),
            _ => Err(Error::InvalidStrategy {
                input: s.to_string(),
                expected: Self::KEYS.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Strategy {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Strategy> for String {
    fn from(strategy: Strategy) -> Self {
        strategy.name().to_string()
    }
}
