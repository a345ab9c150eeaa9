//! Perception filter applying hand hysteresis and temporal consistency.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::{
    Result,
    perception::{Frame, FrameStabilizer, HandGate},
    ports::PerceptionSource,
};

/// Wraps a raw source so that every returned frame is trustworthy.
///
/// Frames are pulled from the inner source until the last `window` of them
/// agree on the dog and cat counts; the last one is returned with its
/// `hand_present` flag set from a [`HandGate`]. The gate runs on frame
/// timestamps when the source provides them and on the wall clock otherwise.
#[derive(Debug)]
pub struct StabilizedPerception<P> {
    inner: P,
    gate: HandGate,
    stabilizer: FrameStabilizer,
    origin: Instant,
}

impl<P: PerceptionSource> StabilizedPerception<P> {
    pub fn new(inner: P, hand_hold: Duration, window: usize) -> Self {
        Self {
            inner,
            gate: HandGate::new(hand_hold),
            stabilizer: FrameStabilizer::new(window),
            origin: Instant::now(),
        }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: PerceptionSource> PerceptionSource for StabilizedPerception<P> {
    fn next_frame(&mut self) -> Result<Frame> {
        self.stabilizer.reset();
        loop {
            let mut frame = self.inner.next_frame()?;
            let now = frame
                .timestamp_ms
                .map_or_else(Instant::now, |ms| self.origin + Duration::from_millis(ms));
            let hand = self.gate.observe(&frame.detections, now);
            frame.hand_present |= hand;
            if self.stabilizer.push(&frame) {
                return Ok(frame);
            }
            trace!("waiting for consistent frames");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::ScriptedPerception,
        error::Error,
        perception::{Detection, DetectorClass},
    };

    fn dogs(n: usize) -> Frame {
        Frame::new(
            (0..n)
                .map(|i| Detection::at(DetectorClass::Dog, 0.9, -60.0, 30.0 - 30.0 * i as f64))
                .collect(),
        )
    }

    #[test]
    fn waits_for_agreeing_frames() {
        let inner = ScriptedPerception::new([dogs(1), dogs(2), dogs(2), dogs(2), dogs(1)]);
        let mut source = StabilizedPerception::new(inner, Duration::ZERO, 3);
        assert_eq!(source.next_frame().unwrap().detections.len(), 2);
        assert!(matches!(source.next_frame(), Err(Error::PerceptionExhausted)));
    }

    #[test]
    fn hand_is_latched_onto_later_frames() {
        let mut hand = dogs(1);
        hand.detections.push(Detection::new(DetectorClass::Hand, 0.8, None));
        let inner = ScriptedPerception::new([hand, dogs(1)]);
        let mut source = StabilizedPerception::new(inner, Duration::from_secs(60), 1);
        assert!(source.next_frame().unwrap().has_hand());
        let after = source.next_frame().unwrap();
        assert!(after.hand_present);
    }

    #[test]
    fn hand_hold_follows_frame_time() {
        let mut hand = dogs(1).with_timestamp_ms(0);
        hand.detections.push(Detection::new(DetectorClass::Hand, 0.8, None));
        let inner = ScriptedPerception::new([
            hand,
            dogs(1).with_timestamp_ms(900),
            dogs(1).with_timestamp_ms(1_000),
        ]);
        let mut source = StabilizedPerception::new(inner, Duration::from_secs(1), 1);
        assert!(source.next_frame().unwrap().hand_present);
        assert!(source.next_frame().unwrap().hand_present);
        assert!(!source.next_frame().unwrap().hand_present);
    }
}
