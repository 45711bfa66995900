//! Consensus big board
//!
//! Maps prospect names to a public rank or consensus value so a trade-up can be
//! compared against where the board expected the player to go.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, TradeError};

/// Column holding player names
pub const PLAYER_COLUMN: &str = "Player";

#[derive(Debug, Clone, Default)]
pub struct ConsensusBoard {
    values: HashMap<String, f64>,
}

impl ConsensusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a player's board value
    pub fn insert(&mut self, player: impl Into<String>, value: f64) -> Result<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(TradeError::InvalidReference(format!(
                "board value must be positive, got {value}"
            )));
        }
        self.values.insert(player.into(), value);
        Ok(())
    }

    /// Load a CSV board, reading names from `Player` and values from `value_column`
    pub fn from_csv_path<P: AsRef<Path>>(path: P, value_column: &str) -> Result<Self> {
        info!("Loading consensus board from: {:?}", path.as_ref());
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file, value_column)
    }

    pub fn from_csv_reader<R: Read>(reader: R, value_column: &str) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let column = |name: &str| {
            headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
                TradeError::InvalidReference(format!("board is missing column '{name}'"))
            })
        };
        let player_idx = column(PLAYER_COLUMN)?;
        let value_idx = column(value_column)?;

        let mut board = Self::new();
        for record in csv_reader.records() {
            let record = record?;
            let player = record.get(player_idx).unwrap_or_default().trim();
            let raw = record.get(value_idx).unwrap_or_default().trim();
            if player.is_empty() || raw.is_empty() {
                debug!("Skipping incomplete board row: {:?}", record);
                continue;
            }
            let value: f64 = raw.parse().map_err(|_| {
                TradeError::InvalidReference(format!("bad {value_column} '{raw}' for {player}"))
            })?;
            board.insert(player, value)?;
        }

        info!("Loaded {} board entries", board.len());
        Ok(board)
    }

    pub fn value(&self, player: &str) -> Result<f64> {
        self.values
            .get(player)
            .copied()
            .ok_or_else(|| TradeError::PlayerNotFound(player.to_string()))
    }

    /// Board value over the pick used to select the player.
    ///
    /// Above 1.0 the board expected the player later than `pick`, i.e. the team
    /// moved up further than it needed to.
    pub fn relative_pick(&self, player: &str, pick: u32) -> Result<f64> {
        if pick == 0 {
            return Err(TradeError::InvalidPick(pick));
        }
        Ok(self.value(player)? / f64::from(pick))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
