//! Error types for the Emio tic-tac-toe crate

use thiserror::Error;

use crate::tictactoe::PlayerColor;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("cell ({row}, {col}) is out of bounds (row and column must be 0-2)")]
    InvalidCell { row: usize, col: usize },

    #[error("board string must have {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid strategy '{input}'. Expected one of: {expected}")]
    InvalidStrategy { input: String, expected: String },

    #[error("invalid player color '{input}' (expected 'dog' or 'cat')")]
    InvalidColor { input: String },

    #[error("invalid zones: {message}")]
    InvalidZones { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("player colors have not been assigned yet")]
    ColorsNotBound,

    #[error("no empty storage slot left to park a pawn")]
    StorageFull,

    #[error("no stored {color} pawn found to play")]
    NoStoredPawn { color: PlayerColor },

    #[error("motion did not complete within {steps} simulation steps")]
    MotionTimeout { steps: usize },

    #[error("perception source has no more frames")]
    PerceptionExhausted,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("configuration encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
