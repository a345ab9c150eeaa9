//! Temporal consistency check over consecutive frames.
//!
//! The detector output is trusted only once a run of consecutive frames agree
//! on how many dog and cat pawns are visible.

use std::collections::VecDeque;

use super::{DetectorClass, Frame};

pub const DEFAULT_CONSISTENCY_FRAMES: usize = 3;

#[derive(Debug, Clone)]
pub struct FrameStabilizer {
    window: usize,
    counts: VecDeque<(usize, usize)>,
}

impl FrameStabilizer {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            counts: VecDeque::with_capacity(window),
        }
    }

    /// Push a frame; returns true when the last `window` frames agree.
    pub fn push(&mut self, frame: &Frame) -> bool {
        if self.counts.len() == self.window {
            self.counts.pop_front();
        }
        self.counts
            .push_back((frame.count(DetectorClass::Dog), frame.count(DetectorClass::Cat)));
        self.is_stable()
    }

    pub fn is_stable(&self) -> bool {
        self.counts.len() == self.window && self.counts.iter().all(|c| *c == self.counts[0])
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }
}

impl Default for FrameStabilizer {
    fn default() -> Self {
        Self::new(DEFAULT_CONSISTENCY_FRAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::Detection;

    fn frame(dogs: usize, cats: usize) -> Frame {
        let mut detections = Vec::new();
        detections.extend((0..dogs).map(|_| Detection::at(DetectorClass::Dog, 0.9, 0.0, 0.0)));
        detections.extend((0..cats).map(|_| Detection::at(DetectorClass::Cat, 0.9, 0.0, 0.0)));
        Frame::new(detections)
    }

    #[test]
    fn needs_a_full_window() {
        let mut stabilizer = FrameStabilizer::default();
        assert!(!stabilizer.push(&frame(1, 0)));
        assert!(!stabilizer.push(&frame(1, 0)));
        assert!(stabilizer.push(&frame(1, 0)));
    }

    #[test]
    fn disagreement_restarts_the_run() {
        let mut stabilizer = FrameStabilizer::default();
        stabilizer.push(&frame(1, 1));
        stabilizer.push(&frame(1, 1));
        assert!(!stabilizer.push(&frame(2, 1)));
        assert!(!stabilizer.push(&frame(2, 1)));
        assert!(stabilizer.push(&frame(2, 1)));
    }

    #[test]
    fn empty_markers_and_hands_are_not_counted() {
        let mut stabilizer = FrameStabilizer::new(2);
        stabilizer.push(&frame(1, 0));
        let mut noisy = frame(1, 0);
        noisy
            .detections
            .push(Detection::at(DetectorClass::Empty, 0.5, 0.0, 0.0));
        assert!(stabilizer.push(&noisy));
    }
}
