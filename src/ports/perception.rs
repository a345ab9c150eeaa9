//! Perception port - where detection frames come from

use crate::{Result, perception::Frame};

/// Source of detection frames.
///
/// Each call runs one perception cycle (grab an image, run the detector,
/// back-project the detections onto the table) and returns its result. The
/// source decides whether a hand is present; [`crate::perception::HandGate`]
/// is available to implementations that need hysteresis.
///
/// # Examples
///
/// ```
/// use emio_tictactoe::{
///     perception::{Detection, DetectorClass, Frame},
///     ports::PerceptionSource,
/// };
///
/// struct OneDog;
///
/// impl PerceptionSource for OneDog {
///     fn next_frame(&mut self) -> emio_tictactoe::Result<Frame> {
///         Ok(Frame::new(vec![Detection::at(DetectorClass::Dog, 0.9, 0.0, 0.0)]))
///     }
/// }
/// ```
pub trait PerceptionSource {
    /// Produce the next frame.
    ///
    /// Returning an error ends the current game; scripted sources return
    /// [`crate::Error::PerceptionExhausted`] when they run dry.
    fn next_frame(&mut self) -> Result<Frame>;
}
