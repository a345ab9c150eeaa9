//! Common test utilities: a simulated table shared by a fake camera and a
//! fake arm.
//!
//! Pawns are points on the table. The arm picks the pawn under the gripper
//! when it closes at pick height and drops it when it opens at place height.
//! A scripted human places a pawn of their color a few frames after their
//! turn begins, and puts a robot pawn that landed in the wrong place where
//! the robot meant it to go if the robot leaves it there.
//!
//! Frames are stamped as if the camera ran at ten frames per second.

#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use emio_tictactoe::{
    Board, BoardGeometry, CellIndex, PlayerColor, Result, WorldPoint,
    error::Error,
    motion::{MotionSettings, Point3},
    perception::{Detection, DetectorClass, Frame},
    ports::{MotionExecutor, PerceptionSource},
};

const GRAB_RADIUS: f64 = 10.0;
const FRAME_LIMIT: usize = 500;
pub const FRAME_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, Copy)]
pub struct Pawn {
    pub color: PlayerColor,
    pub at: WorldPoint,
}

#[derive(Debug)]
struct Human {
    color: PlayerColor,
    goes_first: bool,
    moves: VecDeque<CellIndex>,
    patience: usize,
    waited: usize,
}

/// A robot pawn that landed away from where it was dropped
#[derive(Debug, Clone, Copy)]
struct Misplaced {
    color: PlayerColor,
    landed: WorldPoint,
    intended: WorldPoint,
    waited: usize,
}

#[derive(Debug)]
struct Table {
    geometry: BoardGeometry,
    motion: MotionSettings,
    pawns: Vec<Pawn>,
    gripper: Option<Point3>,
    holding: Option<PlayerColor>,
    armed: bool,
    drops: usize,
    misdrops: VecDeque<(usize, WorldPoint)>,
    misplaced: Option<Misplaced>,
    human: Human,
    frames: Vec<Frame>,
}

impl Table {
    fn on_board(&self, color: PlayerColor) -> usize {
        self.pawns
            .iter()
            .filter(|p| p.color == color && self.geometry.is_in_play_zone(p.at))
            .count()
    }

    fn pawn_at(&self, at: WorldPoint) -> Option<usize> {
        self.pawns.iter().position(|p| p.at.distance(at) < GRAB_RADIUS)
    }

    /// Returns true while the human is busy with a misplaced robot pawn
    fn human_tidies(&mut self) -> bool {
        let Some(mut misplaced) = self.misplaced else {
            return false;
        };
        if self.pawn_at(misplaced.intended).is_some() {
            self.misplaced = None;
            return false;
        }
        misplaced.waited += 1;
        if misplaced.waited < self.human.patience {
            self.misplaced = Some(misplaced);
            return true;
        }
        self.misplaced = None;

        let geometry = self.geometry;
        let pawn = self.pawn_at(misplaced.landed).or_else(|| {
            self.pawns
                .iter()
                .position(|p| p.color == misplaced.color && !geometry.is_in_play_zone(p.at))
        });
        if let Some(i) = pawn {
            self.pawns[i].at = misplaced.intended;
        }
        true
    }

    fn human_acts(&mut self) {
        if !self.armed || self.holding.is_some() {
            return;
        }
        if self.human_tidies() {
            return;
        }
        let mine = self.on_board(self.human.color);
        let theirs = self.on_board(self.human.color.opponent());
        let my_turn = if self.human.goes_first {
            mine == theirs
        } else {
            mine < theirs
        };
        if !my_turn || self.human.moves.is_empty() {
            self.human.waited = 0;
            return;
        }

        self.human.waited += 1;
        if self.human.waited < self.human.patience {
            return;
        }
        self.human.waited = 0;

        let Some(cell) = self.human.moves.pop_front() else {
            return;
        };
        let color = self.human.color;
        let geometry = self.geometry;
        if let Some(i) = self
            .pawns
            .iter()
            .position(|p| p.color == color && !geometry.is_in_play_zone(p.at))
        {
            self.pawns[i].at = geometry.cell_to_position(cell);
        }
    }

    fn frame(&self) -> Frame {
        Frame::new(
            self.pawns
                .iter()
                .map(|p| Detection::at(DetectorClass::from(p.color), 0.9, p.at.x, p.at.z))
                .collect(),
        )
        .with_timestamp_ms(self.frames.len() as u64 * FRAME_INTERVAL_MS)
    }
}

/// Shared handle on the simulated table
#[derive(Debug, Clone)]
pub struct SimulatedTable(Rc<RefCell<Table>>);

impl SimulatedTable {
    /// Five dogs in slots 0-4 and five cats in slots 6-10; the human plays
    /// dog and places pawns on `moves` in order.
    pub fn new(human_goes_first: bool, moves: &[(usize, usize)]) -> Self {
        let geometry = BoardGeometry::default();
        let mut pawns = Vec::new();
        for slot in 0..5 {
            pawns.push(Pawn {
                color: PlayerColor::Dog,
                at: geometry.storage_slot_to_position(slot).unwrap(),
            });
        }
        for slot in 6..11 {
            pawns.push(Pawn {
                color: PlayerColor::Cat,
                at: geometry.storage_slot_to_position(slot).unwrap(),
            });
        }
        Self::with_pawns(human_goes_first, moves, pawns)
    }

    pub fn with_pawns(human_goes_first: bool, moves: &[(usize, usize)], pawns: Vec<Pawn>) -> Self {
        let human = Human {
            color: PlayerColor::Dog,
            goes_first: human_goes_first,
            moves: moves
                .iter()
                .map(|&(r, c)| CellIndex::new(r, c).unwrap())
                .collect(),
            patience: 3,
            waited: 0,
        };
        Self(Rc::new(RefCell::new(Table {
            geometry: BoardGeometry::default(),
            motion: MotionSettings::default(),
            pawns,
            gripper: None,
            holding: None,
            armed: false,
            drops: 0,
            misdrops: VecDeque::new(),
            misplaced: None,
            human,
            frames: Vec::new(),
        })))
    }

    /// The robot's next drop lands on `at` instead of under the gripper
    pub fn misdrop_next(&self, at: WorldPoint) {
        let mut table = self.0.borrow_mut();
        let next = table.drops;
        table.misdrops.push_back((next, at));
    }

    /// The robot's drop number `drop` (counting from zero) lands on `at`
    pub fn misdrop_on(&self, drop: usize, at: WorldPoint) {
        self.0.borrow_mut().misdrops.push_back((drop, at));
    }

    pub fn camera(&self) -> TableCamera {
        TableCamera(Rc::clone(&self.0))
    }

    pub fn arm(&self) -> TableArm {
        TableArm(Rc::clone(&self.0))
    }

    /// Physical board as it lies on the table
    pub fn board(&self) -> Board {
        let table = self.0.borrow();
        let mut board = Board::new();
        for pawn in &table.pawns {
            if let Some(cell) = table.geometry.position_to_cell(pawn.at) {
                board.set(cell, pawn.color.to_cell());
            }
        }
        board
    }

    /// Every frame the camera produced, in order
    pub fn recorded_frames(&self) -> Vec<Frame> {
        self.0.borrow().frames.clone()
    }
}

pub struct TableCamera(Rc<RefCell<Table>>);

impl PerceptionSource for TableCamera {
    fn next_frame(&mut self) -> Result<Frame> {
        let mut table = self.0.borrow_mut();
        if table.frames.len() >= FRAME_LIMIT {
            return Err(Error::PerceptionExhausted);
        }
        table.human_acts();
        let frame = table.frame();
        table.frames.push(frame.clone());
        Ok(frame)
    }
}

pub struct TableArm(Rc<RefCell<Table>>);

impl MotionExecutor for TableArm {
    fn set_gripper_target(&mut self, target: Point3, _speed: f64, _min_steps: u32) -> Result<()> {
        let mut table = self.0.borrow_mut();
        if target == table.motion.rest_position {
            table.armed = true;
        }
        table.gripper = Some(target);
        Ok(())
    }

    fn set_gripper_opening(&mut self, opening: f64, _speed: f64, _min_steps: u32) -> Result<()> {
        let mut table = self.0.borrow_mut();
        let Some(gripper) = table.gripper else {
            return Ok(());
        };
        let here = WorldPoint::new(gripper.x, gripper.z);
        let settings = table.motion;

        if opening <= settings.gripper_closed
            && table.holding.is_none()
            && gripper.y <= settings.pick_height
        {
            if let Some(i) = table
                .pawns
                .iter()
                .position(|p| p.at.distance(here) < GRAB_RADIUS)
            {
                let pawn = table.pawns.swap_remove(i);
                table.holding = Some(pawn.color);
            }
        } else if opening >= settings.gripper_open && gripper.y <= settings.place_height {
            if let Some(color) = table.holding.take() {
                let drop = table.drops;
                table.drops += 1;
                let misdrop = table
                    .misdrops
                    .front()
                    .copied()
                    .filter(|&(n, _)| n == drop);
                let at = match misdrop {
                    Some((_, at)) => {
                        table.misdrops.pop_front();
                        table.misplaced = Some(Misplaced {
                            color,
                            landed: at,
                            intended: here,
                            waited: 0,
                        });
                        at
                    }
                    None => here,
                };
                table.pawns.push(Pawn { color, at });
            }
        }
        Ok(())
    }

    fn step(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_done(&self) -> bool {
        true
    }
}
