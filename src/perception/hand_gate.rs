//! Hand-presence hysteresis.
//!
//! Hand detections flicker from one frame to the next, so a single sighting
//! keeps the gate closed for a hold period after the hand was last seen.

use std::time::{Duration, Instant};

use tracing::debug;

use super::{Detection, DetectorClass};

pub const DEFAULT_HAND_HOLD: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct HandGate {
    hold: Duration,
    last_seen: Option<Instant>,
}

impl HandGate {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            last_seen: None,
        }
    }

    /// Feed one frame's detections; returns whether a hand should be
    /// considered present at `now`.
    pub fn observe(&mut self, detections: &[Detection], now: Instant) -> bool {
        if detections.iter().any(|d| d.class == DetectorClass::Hand) {
            debug!("hand detected");
            self.last_seen = Some(now);
            return true;
        }

        match self.last_seen {
            Some(seen) if now.saturating_duration_since(seen) < self.hold => true,
            Some(_) => {
                self.last_seen = None;
                false
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.last_seen = None;
    }
}

impl Default for HandGate {
    fn default() -> Self {
        Self::new(DEFAULT_HAND_HOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand() -> Detection {
        Detection::new(DetectorClass::Hand, 0.7, None)
    }

    #[test]
    fn no_hand_never_closes() {
        let mut gate = HandGate::default();
        let t0 = Instant::now();
        assert!(!gate.observe(&[], t0));
        assert!(!gate.observe(&[Detection::at(DetectorClass::Dog, 0.9, 0.0, 0.0)], t0));
    }

    #[test]
    fn hand_is_held_for_the_hold_period() {
        let mut gate = HandGate::default();
        let t0 = Instant::now();
        assert!(gate.observe(&[hand()], t0));
        assert!(gate.observe(&[], t0 + Duration::from_millis(500)));
        assert!(gate.observe(&[], t0 + Duration::from_millis(1999)));
        assert!(!gate.observe(&[], t0 + Duration::from_secs(2)));
        assert!(!gate.observe(&[], t0 + Duration::from_secs(3)));
    }

    #[test]
    fn new_sighting_restarts_hold() {
        let mut gate = HandGate::new(Duration::from_secs(1));
        let t0 = Instant::now();
        gate.observe(&[hand()], t0);
        gate.observe(&[hand()], t0 + Duration::from_millis(900));
        assert!(gate.observe(&[], t0 + Duration::from_millis(1800)));
        assert!(!gate.observe(&[], t0 + Duration::from_millis(1900)));
    }
}
