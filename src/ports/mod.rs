//! Ports (trait boundaries) for the robot's hardware collaborators.
//!
//! The game core never talks to the camera, the detector or the motors
//! directly. These traits are owned by the domain and implemented by adapters:
//! the real robot stack in production, the in-memory adapters of
//! [`crate::adapters`] in tests and replays.

pub mod motion;
pub mod perception;

pub use motion::MotionExecutor;
pub use perception::PerceptionSource;
