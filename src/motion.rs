//! Gripper motion sequences and the executor driver.
//!
//! Sequences are plain lists of [`MotionCommand`]s built from
//! [`MotionSettings`]; [`drive`] feeds them one at a time to a
//! [`MotionExecutor`] and steps it until each command settles.
//!
//! Heights are on the robot's vertical `y` axis and are negative below the
//! robot base. Table positions map to `x` and `z`.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{Result, error::Error, geometry::WorldPoint, ports::MotionExecutor};

/// Gripper position in robot coordinates (millimetres)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Table point lifted to height `y`
    pub fn above(p: WorldPoint, y: f64) -> Self {
        Self::new(p.x, y, p.z)
    }
}

/// One instruction for the motion executor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionCommand {
    MoveTo {
        target: Point3,
        speed: f64,
        min_steps: u32,
    },
    Grip {
        opening: f64,
        speed: f64,
        min_steps: u32,
    },
}

/// Heights, gripper openings and speeds used to build motion sequences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Safe travel height above pawns
    pub travel_height: f64,
    pub pick_height: f64,
    pub place_height: f64,
    pub gripper_open: f64,
    pub gripper_closed: f64,
    pub rest_opening: f64,
    pub speed: f64,
    /// Minimum steps per command before it may report done
    pub min_steps: u32,
    /// Minimum steps for the slow descents onto a pawn or cell
    pub settle_steps: u32,
    /// Steps after which a command is considered stuck
    pub max_steps_per_command: usize,
    pub rest_position: Point3,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            travel_height: -230.0,
            pick_height: -290.0,
            place_height: -280.0,
            gripper_open: 40.0,
            gripper_closed: 15.0,
            rest_opening: 35.0,
            speed: 300.0,
            min_steps: 40,
            settle_steps: 70,
            max_steps_per_command: 10_000,
            rest_position: Point3::new(0.0, -160.0, 0.0),
        }
    }
}

const EMOTE_SPEED: f64 = 400.0;
const EMOTE_STEPS: u32 = 10;
const APPLAUSE_CLAPS: usize = 10;
const APPLAUSE_CLOSED: f64 = 8.0;
const SHAKE_SPEED: f64 = 500.0;
const SHAKE_AMPLITUDE: f64 = 20.0;
const SHAKE_REPEATS: usize = 3;

impl MotionSettings {
    fn move_to(&self, target: Point3) -> MotionCommand {
        MotionCommand::MoveTo {
            target,
            speed: self.speed,
            min_steps: self.min_steps,
        }
    }

    fn descend_to(&self, target: Point3) -> MotionCommand {
        MotionCommand::MoveTo {
            target,
            speed: self.speed,
            min_steps: self.settle_steps,
        }
    }

    fn grip(&self, opening: f64) -> MotionCommand {
        MotionCommand::Grip {
            opening,
            speed: self.speed,
            min_steps: self.min_steps,
        }
    }

    fn rest_at_travel_height(&self) -> Point3 {
        Point3::new(self.rest_position.x, self.travel_height, self.rest_position.z)
    }

    /// Return to the rest pose with the gripper half open
    pub fn rest(&self) -> Vec<MotionCommand> {
        vec![
            MotionCommand::MoveTo {
                target: self.rest_position,
                speed: self.speed,
                min_steps: 0,
            },
            self.grip(self.rest_opening),
        ]
    }

    /// Pick a pawn at `pick` and drop it at `place`.
    ///
    /// With `via_rest` the sequence starts and ends above the rest position
    /// and finishes in the rest pose; without it the gripper stays above
    /// `place`, which is how the board is cleared pawn after pawn.
    pub fn pick_and_place(&self, pick: WorldPoint, place: WorldPoint, via_rest: bool) -> Vec<MotionCommand> {
        let mut commands = Vec::with_capacity(13);
        if via_rest {
            commands.push(self.move_to(self.rest_at_travel_height()));
        }

        commands.extend([
            self.move_to(Point3::above(pick, self.travel_height)),
            self.grip(self.gripper_open),
            self.descend_to(Point3::above(pick, self.pick_height)),
            self.grip(self.gripper_closed),
            self.move_to(Point3::above(pick, self.travel_height)),
            self.move_to(Point3::above(place, self.travel_height)),
            self.descend_to(Point3::above(place, self.place_height)),
            self.grip(self.gripper_open),
            self.move_to(Point3::above(place, self.travel_height)),
        ]);

        if via_rest {
            commands.push(self.move_to(self.rest_at_travel_height()));
            commands.extend(self.rest());
        }
        commands
    }

    /// Clap the gripper; played when the human wins
    pub fn applause(&self) -> Vec<MotionCommand> {
        let clap = |opening| MotionCommand::Grip {
            opening,
            speed: EMOTE_SPEED,
            min_steps: EMOTE_STEPS,
        };
        let mut commands = vec![self.move_to(self.rest_position)];
        for _ in 0..APPLAUSE_CLAPS {
            commands.push(clap(APPLAUSE_CLOSED));
            commands.push(clap(self.rest_opening));
        }
        commands
    }

    /// Sway left and right; played on a draw or a robot win
    pub fn shake(&self) -> Vec<MotionCommand> {
        let sway = |dx: f64| MotionCommand::MoveTo {
            target: Point3::new(
                self.rest_position.x + dx,
                self.rest_position.y,
                self.rest_position.z,
            ),
            speed: SHAKE_SPEED,
            min_steps: EMOTE_STEPS,
        };
        let mut commands = vec![self.move_to(self.rest_position)];
        for _ in 0..SHAKE_REPEATS {
            commands.push(sway(SHAKE_AMPLITUDE));
            commands.push(sway(-SHAKE_AMPLITUDE));
        }
        commands.push(self.move_to(self.rest_position));
        commands
    }
}

/// Run `commands` to completion on `executor`.
///
/// Each command is issued, then the executor is stepped until it reports
/// done.
///
/// # Errors
///
/// [`Error::MotionTimeout`] when a command is not done after `max_steps`
/// steps; executor errors are passed through.
pub fn drive<E: MotionExecutor + ?Sized>(
    executor: &mut E,
    commands: &[MotionCommand],
    max_steps: usize,
) -> Result<()> {
    for command in commands {
        trace!(?command, "issuing motion command");
        match *command {
            MotionCommand::MoveTo {
                target,
                speed,
                min_steps,
            } => executor.set_gripper_target(target, speed, min_steps)?,
            MotionCommand::Grip {
                opening,
                speed,
                min_steps,
            } => executor.set_gripper_opening(opening, speed, min_steps)?,
        }

        let mut steps = 0;
        while !executor.is_done() {
            if steps >= max_steps {
                return Err(Error::MotionTimeout { steps });
            }
            executor.step()?;
            steps += 1;
        }
    }
    debug!(commands = commands.len(), "motion sequence done");
    Ok(())
}
