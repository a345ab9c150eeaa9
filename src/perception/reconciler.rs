//! Turn a noisy perception frame into at most one validated human move.
//!
//! Each call handles a single perception cycle:
//!
//! 1. A frame with a hand in view is skipped.
//! 2. A candidate grid is built from the dog and cat detections lying in the
//!    play zone. One detection without a usable position aborts the cycle.
//! 3. The candidate is diffed against the authoritative board. No difference
//!    means no move; more than one is rejected as ambiguous.
//! 4. A single difference binds the colors if this is the first move, then is
//!    accepted only if it places the human's color on an empty cell.
//!
//! Rejections in step 4 are deliberately not distinguished in the returned
//! outcome: a wrong-color change may be sensor noise or an illegal move, and
//! both are treated as "ignored". The session counts each reason separately.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Frame;
use crate::{
    geometry::BoardGeometry,
    session::GameSession,
    tictactoe::{Board, Cell, CellIndex, Colors, PlayerColor},
};

/// Why a cycle was skipped without looking at the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    HandPresent,
    UnresolvedPosition,
}

/// One differing cell between the authoritative board and the candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub cell: CellIndex,
    pub previous: Cell,
    pub observed: Cell,
}

/// A validated human move, already applied to the session board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanMove {
    pub cell: CellIndex,
    pub color: PlayerColor,
    /// True when this move bound the colors for the game
    pub bound_colors: bool,
}

/// Result of one reconciliation cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileOutcome {
    Skipped(SkipReason),
    NoChange,
    /// Several cells changed at once; nothing was applied
    Ambiguous(Vec<CellChange>),
    /// A single change that is not a legal human move; nothing was applied
    Ignored,
    Accepted(HumanMove),
}

impl ReconcileOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ReconcileOutcome::Accepted(_))
    }
}

/// Per-game counters of reconciliation outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub accepted: usize,
    pub no_change: usize,
    pub skipped_hand: usize,
    pub skipped_unresolved: usize,
    pub ambiguous: usize,
    /// Single change to a color other than the human's
    pub ignored_wrong_color: usize,
    /// Single change on a cell that was not empty, or a pawn removal
    pub ignored_occupied_cell: usize,
}

/// Build the board the camera currently sees.
///
/// Returns `None` when any detection lacks a usable position. Detections
/// outside the play zone are ignored, as are empty-cell markers.
pub fn candidate_board(frame: &Frame, geometry: &BoardGeometry) -> Option<Board> {
    let mut candidate = Board::new();
    for detection in &frame.detections {
        let Some(position) = detection.position else {
            debug!(class = ?detection.class, "detection without position");
            return None;
        };
        if !geometry.is_in_play_zone(position) {
            continue;
        }
        let Some(cell) = geometry.position_to_cell(position) else {
            debug!(x = position.x, z = position.z, "play zone position outside the grid");
            return None;
        };
        if let Some(color) = detection.class.player_color() {
            candidate.set(cell, color.to_cell());
        }
    }
    Some(candidate)
}

/// Run one reconciliation cycle against the session's authoritative board
pub fn reconcile(
    session: &mut GameSession,
    frame: &Frame,
    geometry: &BoardGeometry,
) -> ReconcileOutcome {
    let outcome = evaluate(session, frame, geometry);
    session.record(&outcome);
    outcome
}

fn evaluate(session: &mut GameSession, frame: &Frame, geometry: &BoardGeometry) -> ReconcileOutcome {
    if frame.has_hand() {
        return ReconcileOutcome::Skipped(SkipReason::HandPresent);
    }

    let Some(candidate) = candidate_board(frame, geometry) else {
        return ReconcileOutcome::Skipped(SkipReason::UnresolvedPosition);
    };

    let board = *session.board();
    let changes: Vec<CellChange> = board
        .differences(&candidate)
        .into_iter()
        .map(|cell| CellChange {
            cell,
            previous: board.get(cell),
            observed: candidate.get(cell),
        })
        .collect();

    let change = match changes.as_slice() {
        [] => {
            debug!("no changes detected");
            return ReconcileOutcome::NoChange;
        }
        [single] => *single,
        _ => {
            debug!(?changes, "changes");
            warn!(count = changes.len(), "multiple changes detected, are you cheating?");
            return ReconcileOutcome::Ambiguous(changes);
        }
    };

    let Some(observed) = change.observed.color() else {
        session.count_occupied_cell();
        return ReconcileOutcome::Ignored;
    };

    let mut bound_colors = false;
    if session.colors().is_none() {
        let colors = Colors::with_human(observed);
        info!(human = %colors.human, computer = %colors.computer, "colors assigned from first move");
        session.bind_colors(colors);
        bound_colors = true;
    }

    let Some(colors) = session.colors() else {
        return ReconcileOutcome::Ignored;
    };
    if observed != colors.human {
        session.count_wrong_color();
        return ReconcileOutcome::Ignored;
    }
    if !change.previous.is_empty() {
        session.count_occupied_cell();
        return ReconcileOutcome::Ignored;
    }

    session.apply_human_move(change.cell, observed);
    info!(cell = %change.cell, color = %observed, "you played");
    ReconcileOutcome::Accepted(HumanMove {
        cell: change.cell,
        color: observed,
        bound_colors,
    })
}
