//! Adapters implementing the hardware ports.
//!
//! The robot's camera and motor stack live outside this crate. The adapters
//! here are in-memory implementations used to replay recorded games and to
//! test the game loop without hardware, plus a filter that can wrap any
//! perception source.

pub mod recording_motion;
pub mod scripted_perception;
pub mod stabilized_perception;

pub use recording_motion::RecordingMotion;
pub use scripted_perception::ScriptedPerception;
pub use stabilized_perception::StabilizedPerception;
