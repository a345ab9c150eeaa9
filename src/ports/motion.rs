//! Motion port - the arm and gripper

use crate::{Result, motion::Point3};

/// Executor for gripper commands.
///
/// Commands are asynchronous: `set_*` starts a motion and [`step`] advances
/// the simulation or the control loop by one tick. [`is_done`] turns true once
/// the motion has settled and at least `min_steps` ticks have passed.
/// [`crate::motion::drive`] runs a whole sequence this way.
///
/// [`step`]: MotionExecutor::step
/// [`is_done`]: MotionExecutor::is_done
pub trait MotionExecutor {
    /// Move the gripper tip to `target` at up to `speed` mm/s
    fn set_gripper_target(&mut self, target: Point3, speed: f64, min_steps: u32) -> Result<()>;

    /// Set the distance between the gripper fingers, in millimetres
    fn set_gripper_opening(&mut self, opening: f64, speed: f64, min_steps: u32) -> Result<()>;

    /// Advance one control tick
    fn step(&mut self) -> Result<()>;

    /// Whether the last command has completed
    fn is_done(&self) -> bool;
}
