//! Motion executor that records commands instead of moving anything.

use crate::{Result, motion::{MotionCommand, Point3}, ports::MotionExecutor};

/// Records every command and reports it done after a fixed number of steps.
#[derive(Debug, Clone, Default)]
pub struct RecordingMotion {
    steps_per_command: usize,
    remaining: usize,
    total_steps: usize,
    commands: Vec<MotionCommand>,
}

impl RecordingMotion {
    pub fn new(steps_per_command: usize) -> Self {
        Self {
            steps_per_command,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[MotionCommand] {
        &self.commands
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Gripper targets in the order they were commanded
    pub fn targets(&self) -> Vec<Point3> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                MotionCommand::MoveTo { target, .. } => Some(*target),
                MotionCommand::Grip { .. } => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.total_steps = 0;
        self.remaining = 0;
    }
}

impl MotionExecutor for RecordingMotion {
    fn set_gripper_target(&mut self, target: Point3, speed: f64, min_steps: u32) -> Result<()> {
        self.commands.push(MotionCommand::MoveTo {
            target,
            speed,
            min_steps,
        });
        self.remaining = self.steps_per_command;
        Ok(())
    }

    fn set_gripper_opening(&mut self, opening: f64, speed: f64, min_steps: u32) -> Result<()> {
        self.commands.push(MotionCommand::Grip {
            opening,
            speed,
            min_steps,
        });
        self.remaining = self.steps_per_command;
        Ok(())
    }

    fn step(&mut self) -> Result<()> {
        self.remaining = self.remaining.saturating_sub(1);
        self.total_steps += 1;
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.remaining == 0
    }
}
