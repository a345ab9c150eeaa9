//! Detector output as seen by the core

use serde::{Deserialize, Deserializer, Serialize};

use crate::{geometry::WorldPoint, tictactoe::PlayerColor};

/// Class label produced by the object detector.
///
/// Distinct from [`PlayerColor`]: the detector also reports empty cell
/// markers and hands. Use [`DetectorClass::player_color`] to map between the
/// two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorClass {
    Dog,
    Cat,
    Empty,
    Hand,
}

impl DetectorClass {
    /// Pawn color for dog and cat detections
    pub fn player_color(self) -> Option<PlayerColor> {
        match self {
            DetectorClass::Dog => Some(PlayerColor::Dog),
            DetectorClass::Cat => Some(PlayerColor::Cat),
            DetectorClass::Empty | DetectorClass::Hand => None,
        }
    }
}

impl From<PlayerColor> for DetectorClass {
    fn from(color: PlayerColor) -> Self {
        match color {
            PlayerColor::Dog => DetectorClass::Dog,
            PlayerColor::Cat => DetectorClass::Cat,
        }
    }
}

/// Bounding box in image pixels, centered on (`x`, `y`)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Median depth inside the box, in millimetres
    pub depth: f64,
}

/// One object seen in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class: DetectorClass,
    #[serde(deserialize_with = "clamped_confidence")]
    pub confidence: f64,
    /// Back-projected table position; `None` when depth could not be resolved
    pub position: Option<WorldPoint>,
    #[serde(default)]
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(class: DetectorClass, confidence: f64, position: Option<WorldPoint>) -> Self {
        Self {
            class,
            confidence: confidence.clamp(0.0, 1.0),
            position,
            bbox: BoundingBox::default(),
        }
    }

    /// Detection with a resolved table position
    pub fn at(class: DetectorClass, confidence: f64, x: f64, z: f64) -> Self {
        Self::new(class, confidence, Some(WorldPoint::new(x, z)))
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }
}

fn clamped_confidence<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(|c| c.clamp(0.0, 1.0))
}

/// Everything the perception collaborator reports for one cycle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub detections: Vec<Detection>,
    /// Debounced hand signal from the perception side (see [`super::HandGate`])
    #[serde(default)]
    pub hand_present: bool,
    /// Capture time in milliseconds on the source's own clock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
}

impl Frame {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            hand_present: false,
            timestamp_ms: None,
        }
    }

    pub fn with_timestamp_ms(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    pub fn with_hand_present(mut self, hand_present: bool) -> Self {
        self.hand_present = hand_present;
        self
    }

    /// A frame is never trusted while a hand is in view
    pub fn has_hand(&self) -> bool {
        self.hand_present
            || self
                .detections
                .iter()
                .any(|d| d.class == DetectorClass::Hand)
    }

    /// Number of detections of a given class
    pub fn count(&self, class: DetectorClass) -> usize {
        self.detections.iter().filter(|d| d.class == class).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_to_color_mapping() {
        assert_eq!(DetectorClass::Dog.player_color(), Some(PlayerColor::Dog));
        assert_eq!(DetectorClass::Cat.player_color(), Some(PlayerColor::Cat));
        assert_eq!(DetectorClass::Empty.player_color(), None);
        assert_eq!(DetectorClass::Hand.player_color(), None);
        assert_eq!(DetectorClass::from(PlayerColor::Cat), DetectorClass::Cat);
    }

    #[test]
    fn hand_from_flag_or_detection() {
        let plain = Frame::new(vec![Detection::at(DetectorClass::Dog, 0.9, 0.0, 0.0)]);
        assert!(!plain.has_hand());
        assert!(plain.clone().with_hand_present(true).has_hand());

        let with_hand = Frame::new(vec![Detection::new(DetectorClass::Hand, 0.5, None)]);
        assert!(with_hand.has_hand());
    }

    #[test]
    fn confidence_is_clamped() {
        let d = Detection::at(DetectorClass::Cat, 1.7, 0.0, 0.0);
        assert_eq!(d.confidence, 1.0);
    }

    #[test]
    fn deserialized_confidence_is_clamped() {
        let json = r#"[
            {"class": "dog", "confidence": 1.4, "position": null},
            {"class": "cat", "confidence": -0.2, "position": null}
        ]"#;
        let detections: Vec<Detection> = serde_json::from_str(json).unwrap();
        assert_eq!(detections[0].confidence, 1.0);
        assert_eq!(detections[1].confidence, 0.0);
    }

    #[test]
    fn timestamp_is_optional() {
        let frame: Frame = serde_json::from_str(r#"{"detections": []}"#).unwrap();
        assert_eq!(frame.timestamp_ms, None);

        let stamped = Frame::default().with_timestamp_ms(250);
        let json = serde_json::to_string(&stamped).unwrap();
        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(back.timestamp_ms, Some(250));
        assert!(!serde_json::to_string(&frame).unwrap().contains("timestamp_ms"));
    }

    #[test]
    fn frame_json_shape() {
        let json = r#"{
            "detections": [
                {"class": "dog", "confidence": 0.92, "position": {"x": -30.0, "z": 30.0}},
                {"class": "hand", "confidence": 0.4, "position": null}
            ]
        }"#;
        let frame: Frame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.detections.len(), 2);
        assert!(!frame.hand_present);
        assert!(frame.has_hand());
        assert_eq!(frame.count(DetectorClass::Dog), 1);
    }
}
