//! Pick-and-place planning for repairing and clearing the physical board.
//!
//! After every robot move the camera view is compared with the authoritative
//! board. Each mismatching cell becomes a [`Correction`], which is then turned
//! into concrete pawn transfers between cells and storage slots.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    Result,
    error::Error,
    geometry::{BoardGeometry, WorldPoint},
    perception::{Frame, scene},
    storage::{SlotState, StorageState},
    tictactoe::{Board, CellIndex, PlayerColor},
};

/// Move one pawn from `pick` to `place`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickPlace {
    pub pick: WorldPoint,
    pub place: WorldPoint,
}

/// What a mismatching cell needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Correction {
    /// Cell should hold `color` but is empty
    Fetch { cell: CellIndex, color: PlayerColor },
    /// Cell should be empty but holds a pawn
    Park { cell: CellIndex, found: PlayerColor },
    /// Cell holds `found` instead of `color`
    Replace {
        cell: CellIndex,
        found: PlayerColor,
        color: PlayerColor,
    },
}

impl Correction {
    pub fn cell(&self) -> CellIndex {
        match *self {
            Correction::Fetch { cell, .. }
            | Correction::Park { cell, .. }
            | Correction::Replace { cell, .. } => cell,
        }
    }
}

/// Cell-by-cell differences between the expected and the observed board,
/// in row-major order
pub fn diagnose(expected: &Board, observed: &Board) -> Vec<Correction> {
    expected
        .differences(observed)
        .into_iter()
        .filter_map(|cell| match (expected.get(cell).color(), observed.get(cell).color()) {
            (Some(color), None) => Some(Correction::Fetch { cell, color }),
            (None, Some(found)) => Some(Correction::Park { cell, found }),
            (Some(color), Some(found)) => Some(Correction::Replace { cell, found, color }),
            (None, None) => None,
        })
        .collect()
}

/// Plans transfers against one frame and a storage picture.
///
/// The storage picture is updated as transfers are planned, so several
/// corrections planned in a row never reuse the same slot or pawn.
#[derive(Debug)]
pub struct Planner<'a> {
    geometry: &'a BoardGeometry,
    frame: &'a Frame,
    storage: &'a mut StorageState,
    min_confidence: f64,
    used_slots: Vec<usize>,
}

impl<'a> Planner<'a> {
    pub fn new(
        geometry: &'a BoardGeometry,
        frame: &'a Frame,
        storage: &'a mut StorageState,
        min_confidence: f64,
    ) -> Self {
        Self {
            geometry,
            frame,
            storage,
            min_confidence,
            used_slots: Vec::new(),
        }
    }

    /// Transfers that resolve one correction.
    ///
    /// # Errors
    ///
    /// [`Error::StorageFull`] when a pawn has to be parked and no slot is
    /// empty; [`Error::NoStoredPawn`] when a pawn has to be fetched and none
    /// of the right color is visible in storage.
    pub fn plan(&mut self, correction: Correction) -> Result<Vec<PickPlace>> {
        let cell = correction.cell();
        match correction {
            Correction::Fetch { color, .. } => Ok(vec![self.fetch(cell, color)?]),
            Correction::Park { found, .. } => Ok(vec![self.park(cell, found)?]),
            Correction::Replace { found, color, .. } => {
                let park = self.park(cell, found)?;
                let fetch = self.fetch(cell, color)?;
                Ok(vec![park, fetch])
            }
        }
    }

    /// Move the pawn on `cell` to the nearest empty storage slot
    pub fn park(&mut self, cell: CellIndex, color: PlayerColor) -> Result<PickPlace> {
        let from = self.geometry.cell_to_position(cell);
        let slot = self
            .storage
            .nearest_empty_slot(self.geometry, from)
            .ok_or(Error::StorageFull)?;
        let place = self
            .geometry
            .storage_slot_to_position(slot)
            .ok_or(Error::StorageFull)?;
        self.storage.set(slot, SlotState::Occupied(color));
        self.used_slots.push(slot);
        debug!(%cell, slot, "parking pawn");
        Ok(PickPlace { pick: from, place })
    }

    /// Bring the nearest stored pawn of `color` onto `cell`
    pub fn fetch(&mut self, cell: CellIndex, color: PlayerColor) -> Result<PickPlace> {
        let target = self.geometry.cell_to_position(cell);
        let mut frame = self.frame.clone();
        frame.detections.retain(|d| {
            d.position
                .and_then(|p| self.geometry.position_to_storage_slot(p))
                .is_none_or(|slot| !self.used_slots.contains(&slot))
        });
        let pawn =
            scene::nearest_stored_pawn(&frame, color, target, self.geometry, self.min_confidence)
                .ok_or(Error::NoStoredPawn { color })?;
        self.storage.set(pawn.slot, SlotState::Empty);
        self.used_slots.push(pawn.slot);
        debug!(%cell, slot = pawn.slot, "fetching pawn");
        Ok(PickPlace {
            pick: pawn.position,
            place: target,
        })
    }
}

/// Next action while clearing the play zone at the end of a game
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearStep {
    /// Nothing left on the play zone
    Done,
    /// A hand is in view; look again
    Wait,
    Move(PickPlace),
}

/// Decide the next pawn to take off the board.
///
/// Refreshes `storage` from `frame` and moves the first pawn found on the
/// play zone to the empty slot nearest to it.
///
/// # Errors
///
/// [`Error::StorageFull`] when pawns remain and no slot is free.
pub fn plan_clear_step(
    frame: &Frame,
    storage: &mut StorageState,
    geometry: &BoardGeometry,
) -> Result<ClearStep> {
    if frame.has_hand() {
        return Ok(ClearStep::Wait);
    }
    if scene::is_play_zone_clear(frame, geometry) {
        return Ok(ClearStep::Done);
    }
    storage.refresh_from_frame(frame, geometry);

    let Some(cell) = scene::select_pawn_in_play_zone(frame, geometry) else {
        return Ok(ClearStep::Done);
    };
    let pick = geometry.cell_to_position(cell);
    let Some(slot) = storage.nearest_empty_slot(geometry, pick) else {
        warn!("no empty storage left to clear the board");
        return Err(Error::StorageFull);
    };
    let place = geometry
        .storage_slot_to_position(slot)
        .ok_or(Error::StorageFull)?;
    debug!(%cell, slot, "clearing pawn");
    Ok(ClearStep::Move(PickPlace { pick, place }))
}
