//! Read-only queries over one perception frame.
//!
//! These answer the questions the game loop asks between moves: what does the
//! board look like, where is the closest spare pawn, is anything left on the
//! play zone. None of them touch game state.

use tracing::debug;

use super::{DetectorClass, Frame};
use crate::{
    geometry::{BoardGeometry, WorldPoint},
    tictactoe::{Board, CellIndex, Colors, PlayerColor},
};

/// Default confidence a detection needs before the robot acts on it
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;

/// A pawn found in the storage ring, snapped to its slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoredPawn {
    pub slot: usize,
    /// Slot center, used as the pick position
    pub position: WorldPoint,
    /// Distance from the raw detection to the search target
    pub distance: f64,
}

/// Board as seen by the camera, for checking the physical board.
///
/// Unlike [`super::reconciler::candidate_board`], detections without a
/// position are skipped rather than invalidating the whole frame.
pub fn observed_board(frame: &Frame, geometry: &BoardGeometry) -> Board {
    let mut board = Board::new();
    for detection in &frame.detections {
        let (Some(color), Some(position)) = (detection.class.player_color(), detection.position)
        else {
            continue;
        };
        if let Some(cell) = geometry.position_to_cell(position) {
            board.set(cell, color.to_cell());
        }
    }
    board
}

/// Let the computer pick its color from the pawns in view.
///
/// The first dog or cat detection above `min_confidence` becomes the human's
/// color and the computer takes the other one. Returns `None` while a hand is
/// in view or no confident pawn is visible.
pub fn choose_colors(frame: &Frame, min_confidence: f64) -> Option<Colors> {
    if frame.has_hand() {
        return None;
    }
    frame
        .detections
        .iter()
        .filter(|d| d.confidence > min_confidence)
        .find_map(|d| d.class.player_color())
        .map(Colors::with_human)
}

/// Closest pawn of `color` outside the play zone.
///
/// Distances are measured from the raw detection to `target`; the returned
/// position is the center of the slot the pawn sits in so the gripper aims at
/// a known spot. Pawns outside every slot are ignored.
pub fn nearest_stored_pawn(
    frame: &Frame,
    color: PlayerColor,
    target: WorldPoint,
    geometry: &BoardGeometry,
    min_confidence: f64,
) -> Option<StoredPawn> {
    let wanted = DetectorClass::from(color);
    let mut best: Option<StoredPawn> = None;

    for detection in &frame.detections {
        if detection.class != wanted || detection.confidence <= min_confidence {
            continue;
        }
        let Some(position) = detection.position else {
            debug!("stored pawn without position");
            continue;
        };
        if geometry.is_in_play_zone(position) {
            continue;
        }
        let Some((slot, center)) = geometry
            .position_to_storage_slot(position)
            .and_then(|slot| Some((slot, geometry.storage_slot_to_position(slot)?)))
        else {
            debug!(x = position.x, z = position.z, "pawn outside every storage slot");
            continue;
        };

        let distance = position.distance(target);
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(StoredPawn {
                slot,
                position: center,
                distance,
            });
        }
    }

    match &best {
        Some(pawn) => debug!(slot = pawn.slot, distance = pawn.distance, "found a pawn to play"),
        None => debug!(%color, "no stored pawn found"),
    }
    best
}

/// First dog or cat pawn lying on the play zone, as a cell
pub fn select_pawn_in_play_zone(frame: &Frame, geometry: &BoardGeometry) -> Option<CellIndex> {
    frame
        .detections
        .iter()
        .filter(|d| d.class.player_color().is_some())
        .filter_map(|d| d.position)
        .filter(|&p| geometry.is_in_play_zone(p))
        .find_map(|p| geometry.position_to_cell(p))
}

/// True when no pawn is on the play zone; never true while a hand is in view
pub fn is_play_zone_clear(frame: &Frame, geometry: &BoardGeometry) -> bool {
    if frame.has_hand() {
        return false;
    }
    !frame.detections.iter().any(|d| {
        d.class.player_color().is_some() && d.position.is_some_and(|p| geometry.is_in_play_zone(p))
    })
}
