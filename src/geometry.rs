//! Mapping between world coordinates and board cells / storage slots.
//!
//! The robot works in the simulation frame where the play zone is centered on
//! the origin. Only the horizontal `x` and `z` axes matter here; the vertical
//! axis belongs to motion planning.
//!
//! ```text
//! Play zone cells (row, col) and their centers (x, z):
//! +-------------+-------------+-------------+
//! | (0,0)       | (0,1)       | (0,2)       |
//! | (-dx, dz)   | (-dx, 0)    | (-dx, -dz)  |
//! +-------------+-------------+-------------+
//! | (1,0)       | (1,1)       | (1,2)       |
//! | (0, dz)     | (0, 0)      | (0, -dz)    |
//! +-------------+-------------+-------------+
//! | (2,0)       | (2,1)       | (2,2)       |
//! | (dx, dz)    | (dx, 0)     | (dx, -dz)   |
//! +-------------+-------------+-------------+
//!
//! Storage slots around the play zone:
//! |    | 0  | 1  | 2  |    |
//! | 9  |    |    |    | 3  |
//! | 10 |    |    |    | 4  |
//! | 11 |    |    |    | 5  |
//! |    | 6  | 7  | 8  |    |
//! ```
//!
//! Slots 0-2 lie on the `x < xmin` side, 3-5 on `z < zmin`, 6-8 on
//! `x > xmax` and 9-11 on `z > zmax`.

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error, tictactoe::CellIndex};

/// Number of parking slots in the storage zone
pub const STORAGE_SLOTS: usize = 12;

/// A point on the table plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub z: f64,
}

impl WorldPoint {
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Euclidean distance on the table plane
    pub fn distance(self, other: WorldPoint) -> f64 {
        (self.x - other.x).hypot(self.z - other.z)
    }
}

/// Central rectangle holding the 3x3 grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayZone {
    pub xmin: f64,
    pub zmin: f64,
    pub xmax: f64,
    pub zmax: f64,
    /// Distance between the centers of two neighbouring cells along x
    pub dx: f64,
    /// Distance between the centers of two neighbouring cells along z
    pub dz: f64,
}

impl Default for PlayZone {
    fn default() -> Self {
        Self {
            xmin: -45.0,
            zmin: -45.0,
            xmax: 45.0,
            zmax: 45.0,
            dx: 30.0,
            dz: 30.0,
        }
    }
}

impl PlayZone {
    pub fn contains(&self, p: WorldPoint) -> bool {
        self.xmin <= p.x && p.x <= self.xmax && self.zmin <= p.z && p.z <= self.zmax
    }
}

/// Outer rectangle; the ring between it and the play zone holds the storage slots
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageZone {
    pub xmin: f64,
    pub zmin: f64,
    pub xmax: f64,
    pub zmax: f64,
}

impl Default for StorageZone {
    fn default() -> Self {
        Self {
            xmin: -75.0,
            zmin: -75.0,
            xmax: 75.0,
            zmax: 75.0,
        }
    }
}

impl StorageZone {
    pub fn contains(&self, p: WorldPoint) -> bool {
        self.xmin <= p.x && p.x <= self.xmax && self.zmin <= p.z && p.z <= self.zmax
    }
}

/// Bidirectional mapper between continuous positions and discrete indices
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardGeometry {
    #[serde(default)]
    pub play: PlayZone,
    #[serde(default)]
    pub storage: StorageZone,
}

impl BoardGeometry {
    /// Create a geometry, checking that the storage zone strictly contains the
    /// play zone and that the cell pitch is positive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZones`] when the zones are inconsistent.
    pub fn new(play: PlayZone, storage: StorageZone) -> Result<Self> {
        let geometry = Self { play, storage };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Check the zone invariants
    pub fn validate(&self) -> Result<()> {
        let (play, storage) = (&self.play, &self.storage);
        if !(play.dx > 0.0 && play.dz > 0.0) {
            return Err(Error::InvalidZones {
                message: format!("cell pitch must be positive (dx={}, dz={})", play.dx, play.dz),
            });
        }
        if !(play.xmin < play.xmax && play.zmin < play.zmax) {
            return Err(Error::InvalidZones {
                message: "play zone bounds are empty".to_string(),
            });
        }
        let strictly_inside = storage.xmin < play.xmin
            && play.xmax < storage.xmax
            && storage.zmin < play.zmin
            && play.zmax < storage.zmax;
        if !strictly_inside {
            return Err(Error::InvalidZones {
                message: "storage zone must strictly contain the play zone".to_string(),
            });
        }
        Ok(())
    }

    pub fn is_in_play_zone(&self, p: WorldPoint) -> bool {
        self.play.contains(p)
    }

    /// Inside the storage rectangle but outside the play rectangle
    pub fn is_in_storage_zone(&self, p: WorldPoint) -> bool {
        !self.play.contains(p) && self.storage.contains(p)
    }

    /// Center of a cell
    pub fn cell_to_position(&self, cell: CellIndex) -> WorldPoint {
        let x = (cell.row() as f64 - 1.0) * self.play.dx;
        let z = (1.0 - cell.col() as f64) * self.play.dz;
        WorldPoint::new(x, z)
    }

    /// Cell containing `p`.
    ///
    /// The offset from the play zone corner is floor-divided by the cell
    /// pitch, so a point exactly on an inner edge belongs to the cell that
    /// starts at that edge. The far edges (`x == xmax`, `z == zmin`) floor to
    /// index 3 and resolve to `None`.
    pub fn position_to_cell(&self, p: WorldPoint) -> Option<CellIndex> {
        if !self.is_in_play_zone(p) {
            return None;
        }
        let row = self.row_offset(p.x)?;
        let col = self.col_offset(p.z)?;
        CellIndex::new(row, col).ok()
    }

    /// Storage slot containing `p`, if any.
    ///
    /// Points in the corners of the storage ring fall outside the three slots
    /// of their side and resolve to `None`.
    pub fn position_to_storage_slot(&self, p: WorldPoint) -> Option<usize> {
        if !self.is_in_storage_zone(p) {
            return None;
        }
        let (side, along) = if p.x < self.play.xmin {
            (0, self.col_offset(p.z))
        } else if p.z < self.play.zmin {
            (3, self.row_offset(p.x))
        } else if p.x > self.play.xmax {
            (6, self.col_offset(p.z))
        } else {
            (9, self.row_offset(p.x))
        };
        along.map(|i| side + i)
    }

    /// Center of a storage slot, `None` outside `0..12`
    pub fn storage_slot_to_position(&self, slot: usize) -> Option<WorldPoint> {
        let (dx, dz) = (self.play.dx, self.play.dz);
        let along = (slot % 3) as f64;
        let point = match slot {
            0..=2 => WorldPoint::new(-dx * 2.0, (1.0 - along) * dz),
            3..=5 => WorldPoint::new((along - 1.0) * dx, -dz * 2.0),
            6..=8 => WorldPoint::new(dx * 2.0, (1.0 - along) * dz),
            9..=11 => WorldPoint::new((along - 1.0) * dx, dz * 2.0),
            _ => return None,
        };
        Some(point)
    }

    /// Snap a point to the center of the cell or slot it lies in
    pub fn snap(&self, p: WorldPoint) -> Option<WorldPoint> {
        if let Some(cell) = self.position_to_cell(p) {
            return Some(self.cell_to_position(cell));
        }
        self.position_to_storage_slot(p)
            .and_then(|slot| self.storage_slot_to_position(slot))
    }

    fn row_offset(&self, x: f64) -> Option<usize> {
        floor_index((x - self.play.xmin) / self.play.dx)
    }

    fn col_offset(&self, z: f64) -> Option<usize> {
        floor_index((self.play.zmax - z) / self.play.dz)
    }
}

fn floor_index(value: f64) -> Option<usize> {
    let floored = value.floor();
    (0.0..3.0).contains(&floored).then_some(floored as usize)
}
