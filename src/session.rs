//! Per-game state owned by the orchestrating loop.
//!
//! A `GameSession` holds the authoritative board, the storage picture, the
//! color assignment and the reconciliation counters for one game. It is passed
//! by reference into the reconciler and the strategy engine; nothing else
//! keeps game state.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    error::Error,
    geometry::{BoardGeometry, WorldPoint},
    perception::{ReconcileOutcome, ReconcileStats, SkipReason},
    storage::StorageState,
    strategy::Strategy,
    tictactoe::{Board, CellIndex, Colors, GameOutcome, GameResult, Move, Participant, PlayerColor},
};

/// Whether the colors of this game are known yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    AwaitingFirstMove,
    InProgress,
}

/// The computer's chosen move and where the pawn has to go
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComputerMove {
    pub cell: CellIndex,
    pub color: PlayerColor,
    pub target: WorldPoint,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    storage: StorageState,
    colors: Option<Colors>,
    history: Vec<Move>,
    stats: ReconcileStats,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing position with colors already assigned
    pub fn with_board(board: Board, colors: Colors) -> Self {
        Self {
            board,
            colors: Some(colors),
            ..Self::default()
        }
    }

    /// Forget everything for a new game
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn storage(&self) -> &StorageState {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut StorageState {
        &mut self.storage
    }

    pub fn colors(&self) -> Option<Colors> {
        self.colors
    }

    /// Colors of the game, or [`Error::ColorsNotBound`] before assignment
    pub fn require_colors(&self) -> Result<Colors> {
        self.colors.ok_or(Error::ColorsNotBound)
    }

    pub fn bind_colors(&mut self, colors: Colors) {
        self.colors = Some(colors);
    }

    pub fn phase(&self) -> SessionPhase {
        match self.colors {
            None => SessionPhase::AwaitingFirstMove,
            Some(_) => SessionPhase::InProgress,
        }
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn stats(&self) -> &ReconcileStats {
        &self.stats
    }

    pub fn result(&self) -> GameResult {
        self.board.winner()
    }

    pub fn is_over(&self) -> bool {
        self.board.has_winner()
    }

    /// Finished-game outcome from the robot's point of view
    pub fn outcome(&self) -> Option<GameOutcome> {
        GameOutcome::from_result(self.result(), self.colors?)
    }

    /// Ask `strategy` for the computer's next move and where its pawn has to
    /// go. The board is left untouched until [`Self::commit_computer_move`].
    ///
    /// Returns `Ok(None)` when no empty cell is left.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColorsNotBound`] if the colors are not assigned yet.
    pub fn choose_computer_move<R: Rng + ?Sized>(
        &self,
        strategy: Strategy,
        geometry: &BoardGeometry,
        rng: &mut R,
    ) -> Result<Option<ComputerMove>> {
        let colors = self.require_colors()?;
        Ok(strategy
            .choose(&self.board, colors, rng)
            .map(|cell| ComputerMove {
                cell,
                color: colors.computer,
                target: geometry.cell_to_position(cell),
            }))
    }

    /// Record a chosen move once a pawn has been found to play it
    pub fn commit_computer_move(&mut self, mv: &ComputerMove) {
        self.apply_computer_move(mv.cell, mv.color);
        info!(cell = %mv.cell, color = %mv.color, "I'm playing");
    }

    pub(crate) fn apply_human_move(&mut self, cell: CellIndex, color: PlayerColor) {
        self.apply(cell, color, Participant::Human);
    }

    pub(crate) fn apply_computer_move(&mut self, cell: CellIndex, color: PlayerColor) {
        self.apply(cell, color, Participant::Computer);
    }

    fn apply(&mut self, cell: CellIndex, color: PlayerColor, by: Participant) {
        self.board.set(cell, color.to_cell());
        self.history.push(Move { cell, color, by });
    }

    pub(crate) fn record(&mut self, outcome: &ReconcileOutcome) {
        match outcome {
            ReconcileOutcome::Skipped(SkipReason::HandPresent) => self.stats.skipped_hand += 1,
            ReconcileOutcome::Skipped(SkipReason::UnresolvedPosition) => {
                self.stats.skipped_unresolved += 1
            }
            ReconcileOutcome::NoChange => self.stats.no_change += 1,
            ReconcileOutcome::Ambiguous(_) => self.stats.ambiguous += 1,
            ReconcileOutcome::Accepted(_) => self.stats.accepted += 1,
            // Counted with their reason where they are detected
            ReconcileOutcome::Ignored => {}
        }
    }

    pub(crate) fn count_wrong_color(&mut self) {
        self.stats.ignored_wrong_color += 1;
    }

    pub(crate) fn count_occupied_cell(&mut self) {
        self.stats.ignored_occupied_cell += 1;
    }
}
