//! Players, moves and outcomes of a single game

use serde::{Deserialize, Serialize};

use super::board::{CellIndex, GameResult, PlayerColor};

/// Color assignment for one game. The two colors are always complementary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Colors {
    pub human: PlayerColor,
    pub computer: PlayerColor,
}

impl Colors {
    /// Bind the human to `human`; the computer gets the other color
    pub fn with_human(human: PlayerColor) -> Self {
        Self {
            human,
            computer: human.opponent(),
        }
    }

    /// Bind the computer to `computer`; the human gets the other color
    pub fn with_computer(computer: PlayerColor) -> Self {
        Self::with_human(computer.opponent())
    }

    pub fn color_of(&self, participant: Participant) -> PlayerColor {
        match participant {
            Participant::Human => self.human,
            Participant::Computer => self.computer,
        }
    }
}

/// Who made a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participant {
    Human,
    Computer,
}

/// A move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub cell: CellIndex,
    pub color: PlayerColor,
    pub by: Participant,
}

/// Outcome of a finished game, seen from the robot's side of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    HumanWon,
    ComputerWon,
    Draw,
}

impl GameOutcome {
    /// Interpret a board result for the given color assignment.
    ///
    /// Returns `None` while the game is still ongoing.
    pub fn from_result(result: GameResult, colors: Colors) -> Option<Self> {
        match result {
            GameResult::Win(color) if color == colors.human => Some(GameOutcome::HumanWon),
            GameResult::Win(_) => Some(GameOutcome::ComputerWon),
            GameResult::Draw => Some(GameOutcome::Draw),
            GameResult::Ongoing => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            GameOutcome::HumanWon => "Congratulations, you won!",
            GameOutcome::ComputerWon => "Yay, I won!",
            GameOutcome::Draw => "It's a draw!",
        }
    }
}
