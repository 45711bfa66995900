//! Positional WAR reference table

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::error::{Result, TradeError};
use crate::position::Position;

/// Mean and coefficient of variation of WAR for one position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionBaseline {
    pub mean_war: f64,
    pub cov_war: f64,
}

impl PositionBaseline {
    pub fn new(mean_war: f64, cov_war: f64) -> Self {
        Self { mean_war, cov_war }
    }

    /// Top-tier baseline: mean plus CoV as an upside allowance
    pub fn ceiling(&self) -> f64 {
        self.mean_war + self.cov_war
    }
}

#[derive(Debug, Deserialize)]
struct PositionRow {
    #[serde(rename = "Position")]
    position: String,
    #[serde(rename = "Mean_WAR")]
    mean_war: f64,
    #[serde(rename = "CoV_WAR")]
    cov_war: f64,
}

/// Immutable position -> baseline mapping. Always contains QB.
#[derive(Debug, Clone)]
pub struct PositionReference {
    baselines: HashMap<Position, PositionBaseline>,
}

impl PositionReference {
    /// Build a reference table, enforcing positive values and a QB row
    pub fn new(baselines: HashMap<Position, PositionBaseline>) -> Result<Self> {
        for (position, baseline) in &baselines {
            let valid = |v: f64| v.is_finite() && v > 0.0;
            if !valid(baseline.mean_war) || !valid(baseline.cov_war) {
                return Err(TradeError::InvalidReference(format!(
                    "{position} baseline must be positive (mean {}, cov {})",
                    baseline.mean_war, baseline.cov_war
                )));
            }
        }
        if !baselines.contains_key(&Position::Quarterback) {
            return Err(TradeError::InvalidReference("missing QB row".to_string()));
        }
        Ok(Self { baselines })
    }

    /// Published per-position WAR table
    pub fn literature() -> Self {
        const TABLE: [(Position, f64, f64); 12] = [
            (Position::Quarterback, 1.63, 0.70),
            (Position::RunningBack, 0.10, 0.64),
            (Position::WideReceiver, 0.28, 0.84),
            (Position::TightEnd, 0.18, 0.62),
            (Position::Tackle, 0.09, 1.09),
            (Position::Guard, 0.10, 1.11),
            (Position::Center, 0.10, 1.08),
            (Position::InteriorDefender, 0.06, 1.34),
            (Position::Edge, 0.06, 1.54),
            (Position::Linebacker, 0.11, 0.83),
            (Position::Cornerback, 0.23, 0.91),
            (Position::Safety, 0.23, 0.77),
        ];

        let baselines = TABLE
            .iter()
            .map(|&(position, mean, cov)| (position, PositionBaseline::new(mean, cov)))
            .collect();
        Self { baselines }
    }

    /// Load a `Position,Mean_WAR,CoV_WAR` CSV file
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Loading position reference from: {:?}", path.as_ref());
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut baselines = HashMap::new();

        for row in csv_reader.deserialize() {
            let row: PositionRow = row?;
            let position: Position = row.position.parse()?;
            let baseline = PositionBaseline::new(row.mean_war, row.cov_war);
            if baselines.insert(position, baseline).is_some() {
                return Err(TradeError::InvalidReference(format!(
                    "duplicate row for {position}"
                )));
            }
        }

        info!("Loaded {} position baselines", baselines.len());
        Self::new(baselines)
    }

    pub fn baseline(&self, position: Position) -> Result<PositionBaseline> {
        self.baselines
            .get(&position)
            .copied()
            .ok_or_else(|| TradeError::PositionNotFound(position.code().to_string()))
    }

    pub fn quarterback(&self) -> PositionBaseline {
        // QB presence is checked at construction
        self.baselines[&Position::Quarterback]
    }

    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }
}

impl Default for PositionReference {
    fn default() -> Self {
        Self::literature()
    }
}
