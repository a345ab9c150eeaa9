//! Configuration for a robot game session.
//!
//! Every field has a default matching the physical setup, so a configuration
//! file only needs the values that differ:
//!
//! ```toml
//! [game]
//! strategy = "hard"
//! seed = 7
//!
//! [perception]
//! human_move_timeout_secs = 5.0
//! ```

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    geometry::BoardGeometry,
    motion::MotionSettings,
    perception::{DEFAULT_MIN_CONFIDENCE, hand_gate::DEFAULT_HAND_HOLD, stabilizer::DEFAULT_CONSISTENCY_FRAMES},
    strategy::Strategy,
};

/// Thresholds and timings applied to perception frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Detections at or below this confidence are not acted upon
    pub min_confidence: f64,
    /// How long the first round waits for the human before the robot opens
    pub human_move_timeout_secs: f64,
    pub hand_hold_secs: f64,
    /// Consecutive agreeing frames required by the stabilizing filter
    pub consistency_frames: usize,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            human_move_timeout_secs: 10.0,
            hand_hold_secs: DEFAULT_HAND_HOLD.as_secs_f64(),
            consistency_frames: DEFAULT_CONSISTENCY_FRAMES,
        }
    }
}

impl PerceptionConfig {
    pub fn human_move_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.human_move_timeout_secs).unwrap_or_default()
    }

    pub fn hand_hold(&self) -> Duration {
        Duration::try_from_secs_f64(self.hand_hold_secs).unwrap_or_default()
    }
}

/// Game rules and retry budgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub strategy: Strategy,
    /// Random seed for reproducible games (None = non-deterministic)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Rounds of board correction after each robot move
    pub correction_attempts: usize,
    /// Frames to search for a stored pawn before giving up on a move
    pub pawn_search_attempts: usize,
    /// Upper bound on pawns moved while clearing the board
    pub max_clear_moves: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            seed: None,
            correction_attempts: 2,
            pawn_search_attempts: 20,
            max_clear_moves: 12,
        }
    }
}

/// Complete configuration for a [`super::GameController`].
///
/// # Examples
///
/// ```
/// use emio_tictactoe::{app::GameConfig, strategy::Strategy};
///
/// let config = GameConfig::default()
///     .with_strategy(Strategy::Easy)
///     .with_seed(42)
///     .with_correction_attempts(1);
/// assert_eq!(config.game.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub geometry: BoardGeometry,
    pub perception: PerceptionConfig,
    pub motion: MotionSettings,
    pub game: GameSettings,
}

impl GameConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let toml = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        Self::from_toml_str(&toml)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let toml = self.to_toml_string()?;
        fs::write(path, toml).map_err(|source| Error::Io {
            operation: format!("write config {}", path.display()),
            source,
        })
    }

    /// Check zone geometry and value ranges
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;

        let confidence = self.perception.min_confidence;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(invalid(format!(
                "perception.min_confidence must be within [0, 1], got {confidence}"
            )));
        }
        for (name, secs) in [
            ("perception.human_move_timeout_secs", self.perception.human_move_timeout_secs),
            ("perception.hand_hold_secs", self.perception.hand_hold_secs),
        ] {
            if !(secs.is_finite() && secs >= 0.0) {
                return Err(invalid(format!("{name} must be a non-negative number, got {secs}")));
            }
        }
        if self.perception.consistency_frames == 0 {
            return Err(invalid("perception.consistency_frames must be at least 1".to_string()));
        }
        if self.motion.max_steps_per_command == 0 {
            return Err(invalid("motion.max_steps_per_command must be at least 1".to_string()));
        }
        if self.game.pawn_search_attempts == 0 {
            return Err(invalid("game.pawn_search_attempts must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.game.strategy = strategy;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.game.seed = Some(seed);
        self
    }

    pub fn with_geometry(mut self, geometry: BoardGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_motion(mut self, motion: MotionSettings) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_human_move_timeout(mut self, timeout: Duration) -> Self {
        self.perception.human_move_timeout_secs = timeout.as_secs_f64();
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.perception.min_confidence = min_confidence;
        self
    }

    pub fn with_correction_attempts(mut self, attempts: usize) -> Self {
        self.game.correction_attempts = attempts;
        self
    }

    pub fn with_pawn_search_attempts(mut self, attempts: usize) -> Self {
        self.game.pawn_search_attempts = attempts;
        self
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfig { message }
}
