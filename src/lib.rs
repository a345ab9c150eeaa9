//! Board engine for a tic-tac-toe playing robot (Emio)
//!
//! This crate provides:
//! - Mapping between board cells, storage slots and table coordinates
//! - Tic-Tac-Toe board state with win/draw detection
//! - Reconciliation of noisy detector frames into validated human moves
//! - Random, greedy and rule-based optimal move selection
//! - Motion sequences, board correction planning and the full game loop,
//!   behind ports for the camera and the arm

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod geometry;
pub mod motion;
pub mod perception;
pub mod planner;
pub mod ports;
pub mod session;
pub mod storage;
pub mod strategy;
pub mod tictactoe;

pub use error::{Error, Result};
pub use geometry::{BoardGeometry, PlayZone, StorageZone, WorldPoint};
pub use session::GameSession;
pub use strategy::Strategy;
pub use tictactoe::{Board, Cell, CellIndex, Colors, GameResult, PlayerColor};
