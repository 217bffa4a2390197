//! Error types shared by the loader, simulation and editor
//!
//! Every failure is scoped to a single run or authoring session. Nothing here
//! is fatal to the process and nothing is retried automatically.

use thiserror::Error;

/// Errors produced by the platformer core.
#[derive(Error, Debug)]
pub enum GameError {
    /// Structurally invalid level (bad dimensions, ragged grid, positions
    /// outside the grid, out-of-range metadata).
    #[error("malformed level: {0}")]
    MalformedLevel(String),

    /// The level document could not be decoded at all.
    #[error("level document could not be parsed: {0}")]
    LevelParse(#[from] serde_json::Error),

    /// Corrupt state or timestep handed to `tick`.
    #[error("invalid tick input: {0}")]
    InvalidTickInput(String),

    /// Tuning values that would break the simulation.
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    /// Reading or writing a level file failed.
    #[error("level file i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for platformer operations.
pub type GameResult<T> = Result<T, GameError>;
