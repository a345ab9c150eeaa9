//! Perception source replaying a fixed list of frames.

use std::{collections::VecDeque, fs, path::Path, time::Duration};

use crate::{Result, error::Error, perception::Frame, ports::PerceptionSource};

/// Spacing given to recorded frames that carry no timestamp
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Replays frames in order, then fails with [`Error::PerceptionExhausted`].
///
/// Frames are usually recorded as a JSON array of [`Frame`] objects. A frame
/// without a timestamp is stamped as if frames arrived every
/// `frame_interval`, so timeouts measured on frame time replay identically.
///
/// # Examples
///
/// ```
/// use emio_tictactoe::{adapters::ScriptedPerception, ports::PerceptionSource};
///
/// let mut source = ScriptedPerception::from_json_str(
///     r#"[{"detections": [{"class": "cat", "confidence": 0.9, "position": {"x": 0.0, "z": 0.0}}]}]"#,
/// )?;
/// assert_eq!(source.next_frame()?.detections.len(), 1);
/// assert!(source.next_frame().is_err());
/// # Ok::<(), emio_tictactoe::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedPerception {
    frames: VecDeque<Frame>,
    served: usize,
    frame_interval: Duration,
}

impl Default for ScriptedPerception {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ScriptedPerception {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            served: 0,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }

    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let frames: Vec<Frame> = serde_json::from_str(json)?;
        Ok(Self::new(frames))
    }

    /// Load a recorded frame list from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read frames from {}", path.display()),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Append frames to the end of the script
    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(frame);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Number of frames handed out so far
    pub fn served(&self) -> usize {
        self.served
    }
}

impl PerceptionSource for ScriptedPerception {
    fn next_frame(&mut self) -> Result<Frame> {
        let mut frame = self.frames.pop_front().ok_or(Error::PerceptionExhausted)?;
        if frame.timestamp_ms.is_none() {
            let elapsed = self.frame_interval.saturating_mul(self.served as u32);
            frame.timestamp_ms = Some(elapsed.as_millis() as u64);
        }
        self.served += 1;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::perception::{Detection, DetectorClass};

    #[test]
    fn frames_come_out_in_order() {
        let mut source = ScriptedPerception::new([
            Frame::new(vec![Detection::at(DetectorClass::Dog, 0.9, 0.0, 0.0)]),
            Frame::default().with_hand_present(true),
        ]);
        assert_eq!(source.next_frame().unwrap().detections.len(), 1);
        assert!(source.next_frame().unwrap().hand_present);
        assert!(matches!(source.next_frame(), Err(Error::PerceptionExhausted)));
        assert_eq!(source.served(), 2);
    }

    #[test]
    fn unstamped_frames_get_frame_time() {
        let mut source = ScriptedPerception::new([
            Frame::default(),
            Frame::default().with_timestamp_ms(5_000),
            Frame::default(),
        ])
        .with_frame_interval(Duration::from_millis(40));
        assert_eq!(source.next_frame().unwrap().timestamp_ms, Some(0));
        assert_eq!(source.next_frame().unwrap().timestamp_ms, Some(5_000));
        assert_eq!(source.next_frame().unwrap().timestamp_ms, Some(80));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"detections": [], "hand_present": true}}, {{"detections": []}}]"#
        )
        .unwrap();
        let source = ScriptedPerception::from_path(file.path()).unwrap();
        assert_eq!(source.remaining(), 2);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ScriptedPerception::from_path(Path::new("/nonexistent/frames.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/frames.json"));
    }
}
