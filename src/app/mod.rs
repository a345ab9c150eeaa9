//! Application layer: configuration and the game loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              GameController                  │
//! │   clear board → first round → turns → emote  │
//! └───────┬──────────────────┬───────────────────┘
//!         │ frames           │ commands
//!         ▼                  ▼
//!  PerceptionSource     MotionExecutor     (ports)
//!         │                  │
//!         ▼                  ▼
//!  camera + detector    arm + gripper     (adapters)
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use emio_tictactoe::{
//!     adapters::{RecordingMotion, ScriptedPerception},
//!     app::{GameConfig, GameController},
//! };
//!
//! let config = GameConfig::load(Path::new("emio.toml"))?;
//! let frames = ScriptedPerception::from_path(Path::new("game.json"))?;
//! let mut controller = GameController::new(frames, RecordingMotion::new(1), config);
//! let report = controller.play_game()?;
//! println!("{:?}", report.outcome);
//! # Ok::<(), emio_tictactoe::Error>(())
//! ```

pub mod config;
pub mod controller;

pub use config::{GameConfig, GameSettings, PerceptionConfig};
pub use controller::{GameController, GameReport};
