//! Error types for the trade evaluator

use thiserror::Error;

/// Result type for trade evaluator operations
pub type Result<T> = std::result::Result<T, TradeError>;

/// Errors that can occur while loading reference data or evaluating a trade
#[derive(Error, Debug)]
pub enum TradeError {
    #[error("Position not found: {0}")]
    PositionNotFound(String),

    #[error("Player not found on consensus board: {0}")]
    PlayerNotFound(String),

    #[error("No graded players for team {team} at position {position}")]
    TeamPositionNotFound { team: String, position: String },

    #[error("Invalid pick number {0}: picks run from 1 to {max}", max = crate::curve::MAX_PICK)]
    InvalidPick(u32),

    #[error("No picks in {0}")]
    EmptyPicks(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid reference data: {0}")]
    InvalidReference(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl TradeError {
    /// True for errors caused by a key missing from a reference table
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            TradeError::PositionNotFound(_)
                | TradeError::PlayerNotFound(_)
                | TradeError::TeamPositionNotFound { .. }
        )
    }
}
