//! Team offensive grades by position, used to gauge positional need

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Result, TradeError};
use crate::position::Position;

/// Default minimum target count for a player to count toward averages
pub const DEFAULT_USAGE_THRESHOLD: f64 = 35.0;

/// One graded player season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRow {
    pub position: Position,
    pub team_name: String,
    pub grades_offense: f64,
    pub targets: f64,
}

#[derive(Debug, Deserialize)]
struct RawGradeRow {
    position: String,
    team_name: String,
    grades_offense: f64,
    targets: f64,
}

/// League and team averages for one position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeSummary {
    pub league_avg: f64,
    pub team_avg: f64,
    pub league_players: usize,
    pub team_players: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TeamGradeTable {
    rows: Vec<GradeRow>,
}

impl TeamGradeTable {
    /// Build a table, rejecting negative or non-finite grades and targets
    pub fn new(rows: Vec<GradeRow>) -> Result<Self> {
        for row in &rows {
            let valid = |v: f64| v.is_finite() && v >= 0.0;
            if !valid(row.grades_offense) || !valid(row.targets) {
                return Err(TradeError::InvalidReference(format!(
                    "grade {} and targets {} for {} {} must be finite and non-negative",
                    row.grades_offense, row.targets, row.team_name, row.position
                )));
            }
        }
        Ok(Self { rows })
    }

    /// Load a grade export with at least `position,team_name,grades_offense,targets`
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Loading team grades from: {:?}", path.as_ref());
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();

        for row in csv_reader.deserialize() {
            let raw: RawGradeRow = row?;
            let position = match raw.position.parse::<Position>() {
                Ok(position) => position,
                Err(_) => {
                    warn!("Skipping grade row with unknown position '{}'", raw.position);
                    continue;
                }
            };
            rows.push(GradeRow {
                position,
                team_name: raw.team_name.trim().to_string(),
                grades_offense: raw.grades_offense,
                targets: raw.targets,
            });
        }

        let table = Self::new(rows)?;
        info!("Loaded {} grade rows", table.len());
        Ok(table)
    }

    fn qualifying(&self, position: Position, threshold: f64) -> impl Iterator<Item = &GradeRow> {
        self.rows
            .iter()
            .filter(move |row| row.position == position && row.targets > threshold)
    }

    /// Mean offensive grade at `position` across all qualifying players
    pub fn league_average(&self, position: Position, threshold: f64) -> Result<f64> {
        mean(self.qualifying(position, threshold).map(|row| row.grades_offense))
            .map(|(avg, _)| avg)
            .ok_or_else(|| TradeError::PositionNotFound(position.code().to_string()))
    }

    /// Mean offensive grade at `position` for one team's qualifying players
    pub fn team_average(&self, team: &str, position: Position, threshold: f64) -> Result<f64> {
        self.summarize(position, team, threshold).map(|summary| summary.team_avg)
    }

    pub fn summarize(&self, position: Position, team: &str, threshold: f64) -> Result<GradeSummary> {
        let (league_avg, league_players) =
            mean(self.qualifying(position, threshold).map(|row| row.grades_offense))
                .ok_or_else(|| TradeError::PositionNotFound(position.code().to_string()))?;

        let (team_avg, team_players) = mean(
            self.qualifying(position, threshold)
                .filter(|row| row.team_name == team)
                .map(|row| row.grades_offense),
        )
        .ok_or_else(|| TradeError::TeamPositionNotFound {
            team: team.to_string(),
            position: position.code().to_string(),
        })?;

        Ok(GradeSummary { league_avg, team_avg, league_players, team_players })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<(f64, usize)> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| (sum / count as f64, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRADES: &str = "player,position,team_name,grades_offense,targets,yards\n\
                          A,WR,NE,60.0,80,900\n\
                          B,WR,NE,70.0,50,600\n\
                          C,WR,NE,90.0,10,100\n\
                          D,WR,KC,80.0,100,1200\n\
                          E,WR,KC,90.0,36,400\n\
                          F,TE,NE,75.0,40,500\n\
                          G,HB,BUF,65.0,45,300\n\
                          H,XX,BUF,50.0,45,300\n";

    fn table() -> TeamGradeTable {
        TeamGradeTable::from_csv_reader(GRADES.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_skips_unknown_positions() {
        let table = table();
        assert_eq!(table.len(), 7);
        assert!(table.rows.iter().any(|r| r.position == Position::RunningBack));
    }

    #[test]
    fn test_league_average_applies_threshold() {
        // C (10 targets) is excluded
        let avg = table().league_average(Position::WideReceiver, DEFAULT_USAGE_THRESHOLD).unwrap();
        assert!((avg - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize() {
        let summary =
            table().summarize(Position::WideReceiver, "NE", DEFAULT_USAGE_THRESHOLD).unwrap();
        assert!((summary.league_avg - 75.0).abs() < 1e-9);
        assert!((summary.team_avg - 65.0).abs() < 1e-9);
        assert_eq!(summary.league_players, 4);
        assert_eq!(summary.team_players, 2);

        let team_avg =
            table().team_average("KC", Position::WideReceiver, DEFAULT_USAGE_THRESHOLD).unwrap();
        assert!((team_avg - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // E has 36 targets: counted at 35, dropped at 36
        let at_35 = table().team_average("KC", Position::WideReceiver, 35.0).unwrap();
        let at_36 = table().team_average("KC", Position::WideReceiver, 36.0).unwrap();
        assert!((at_35 - 85.0).abs() < 1e-9);
        assert!((at_36 - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_finite_and_negative_rows() {
        for bad_row in ["WR,JAX,NaN,80", "WR,JAX,inf,80", "WR,JAX,70.0,NaN", "WR,JAX,-5.0,80"] {
            let data = format!("position,team_name,grades_offense,targets\nWR,KC,80.0,90\n{bad_row}\n");
            let err = TeamGradeTable::from_csv_reader(data.as_bytes()).unwrap_err();
            assert!(matches!(err, TradeError::InvalidReference(_)), "{bad_row}: {err}");
        }
    }

    #[test]
    fn test_new_validates_rows() {
        let row = GradeRow {
            position: Position::WideReceiver,
            team_name: "KC".to_string(),
            grades_offense: f64::NAN,
            targets: 90.0,
        };
        assert!(matches!(TeamGradeTable::new(vec![row]), Err(TradeError::InvalidReference(_))));
        assert!(TeamGradeTable::new(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_lookups() {
        let table = table();
        assert!(matches!(
            table.summarize(Position::Safety, "NE", DEFAULT_USAGE_THRESHOLD),
            Err(TradeError::PositionNotFound(_))
        ));
        assert!(matches!(
            table.summarize(Position::WideReceiver, "BUF", DEFAULT_USAGE_THRESHOLD),
            Err(TradeError::TeamPositionNotFound { .. })
        ));
    }
}
