//! Parking slots around the play zone

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    geometry::{BoardGeometry, STORAGE_SLOTS, WorldPoint},
    perception::Frame,
    tictactoe::PlayerColor,
};

/// What is known about one storage slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotState {
    /// Not observed since the game started
    Undefined,
    Empty,
    Occupied(PlayerColor),
}

/// The twelve storage slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageState {
    slots: [SlotState; STORAGE_SLOTS],
}

impl StorageState {
    /// All slots start undefined until the first refresh sweep
    pub fn new() -> Self {
        Self {
            slots: [SlotState::Undefined; STORAGE_SLOTS],
        }
    }

    /// State of a slot, `None` outside `0..12`
    pub fn get(&self, slot: usize) -> Option<SlotState> {
        self.slots.get(slot).copied()
    }

    pub fn slots(&self) -> &[SlotState; STORAGE_SLOTS] {
        &self.slots
    }

    /// Rebuild the storage picture from one frame.
    ///
    /// The sweep is skipped entirely when a hand is in view. Otherwise every
    /// slot is reset to empty and each dog or cat detection lying in a slot
    /// overwrites it. Returns whether the sweep ran.
    pub fn refresh_from_frame(&mut self, frame: &Frame, geometry: &BoardGeometry) -> bool {
        if frame.has_hand() {
            debug!("hand in view, storage refresh skipped");
            return false;
        }

        self.slots = [SlotState::Empty; STORAGE_SLOTS];
        for detection in &frame.detections {
            let (Some(color), Some(position)) = (detection.class.player_color(), detection.position)
            else {
                continue;
            };
            if let Some(slot) = geometry.position_to_storage_slot(position) {
                self.slots[slot] = SlotState::Occupied(color);
            }
        }
        true
    }

    /// First empty slot in index order
    pub fn next_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(|&s| s == SlotState::Empty)
    }

    pub fn is_full(&self) -> bool {
        self.next_empty_slot().is_none()
    }

    /// Empty slot whose center is closest to `from`; ties go to the lower index
    pub fn nearest_empty_slot(&self, geometry: &BoardGeometry, from: WorldPoint) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (slot, state) in self.slots.iter().enumerate() {
            if *state != SlotState::Empty {
                continue;
            }
            let Some(center) = geometry.storage_slot_to_position(slot) else {
                continue;
            };
            let distance = center.distance(from);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((slot, distance));
            }
        }
        best.map(|(slot, _)| slot)
    }

    /// Record a pawn parked by the robot, or a slot emptied by a pick
    pub fn set(&mut self, slot: usize, state: SlotState) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = state;
        }
    }
}

impl Default for StorageState {
    fn default() -> Self {
        Self::new()
    }
}
