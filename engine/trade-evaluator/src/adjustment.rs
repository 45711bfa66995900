//! Adjustment factors applied to the raw pick-value differential
//!
//! The factor is the product of player strength, positional relevance and team
//! need. Every term is non-negative by construction (inputs are validated at the
//! evaluator boundary), so multiplying by it never flips a sign on its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TradeError};
use crate::grades::GradeSummary;
use crate::position::Position;
use crate::reference::PositionReference;

/// Player WAR as a multiple of the position's top-tier baseline (mean + CoV)
pub fn player_strength(reference: &PositionReference, position: Position, war: f64) -> Result<f64> {
    if !war.is_finite() || war < 0.0 {
        return Err(TradeError::InvalidInput(format!("player WAR must be non-negative, got {war}")));
    }
    let baseline = reference.baseline(position)?;
    Ok(war / baseline.ceiling())
}

/// Position's top-tier baseline relative to QB. QB itself is exactly 1.0.
pub fn positional_relevance(reference: &PositionReference, position: Position) -> Result<f64> {
    let baseline = reference.baseline(position)?;
    Ok(baseline.ceiling() / reference.quarterback().ceiling())
}

/// League average over the team's own figure; `None` when the team figure is not positive.
pub fn direct_team_need(team_value: f64, league_avg: f64) -> Option<f64> {
    if team_value > 0.0 {
        Some(league_avg / team_value)
    } else {
        None
    }
}

/// How the adjustment factor is combined with the raw differential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdjustmentPolicy {
    /// `factor < 1` scales the raw differential; otherwise `|raw × factor|`.
    ///
    /// A factor of 1 or more always produces a non-negative differential,
    /// whatever the raw sign, so a strong justification can only move the
    /// verdict toward the acquiring side.
    #[default]
    AsymmetricMultiplicative,

    /// Earlier model: `raw + |raw × factor|`, with the board signal folded
    /// into the factor.
    AdditiveMagnitude,
}

impl AdjustmentPolicy {
    pub fn apply(&self, raw_diff: f64, factor: f64) -> f64 {
        match self {
            AdjustmentPolicy::AsymmetricMultiplicative => {
                if factor < 1.0 {
                    raw_diff * factor
                } else {
                    (raw_diff * factor).abs()
                }
            }
            AdjustmentPolicy::AdditiveMagnitude => raw_diff + (raw_diff * factor).abs(),
        }
    }

    /// Whether the board-relative pick signal multiplies into the factor
    pub fn folds_board_signal(&self) -> bool {
        matches!(self, AdjustmentPolicy::AdditiveMagnitude)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AdjustmentPolicy::AsymmetricMultiplicative => "asymmetric-multiplicative",
            AdjustmentPolicy::AdditiveMagnitude => "additive-magnitude",
        }
    }
}

impl fmt::Display for AdjustmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AdjustmentPolicy {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asymmetric-multiplicative" => Ok(AdjustmentPolicy::AsymmetricMultiplicative),
            "additive-magnitude" => Ok(AdjustmentPolicy::AdditiveMagnitude),
            other => Err(TradeError::InvalidInput(format!("unknown adjustment policy '{other}'"))),
        }
    }
}

/// Each term that went into the adjustment factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentBreakdown {
    pub policy: AdjustmentPolicy,
    pub strength: f64,
    pub relevance: f64,
    /// `None` when need was not supplied or undefined; treated as 1.0
    pub need: Option<f64>,
    /// Board value over the selecting pick, when a board and player name exist
    pub board_signal: Option<f64>,
    pub grades: Option<GradeSummary>,
    pub factor: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_strength() {
        let reference = PositionReference::literature();
        let strength = player_strength(&reference, Position::WideReceiver, 0.9).unwrap();
        assert!((strength - 0.9 / 1.12).abs() < 1e-12);

        assert_eq!(player_strength(&reference, Position::WideReceiver, 0.0).unwrap(), 0.0);
        assert!(matches!(
            player_strength(&reference, Position::WideReceiver, -0.5),
            Err(TradeError::InvalidInput(_))
        ));
        assert!(player_strength(&reference, Position::WideReceiver, f64::NAN).is_err());
    }

    #[test]
    fn test_relevance_normalized_to_qb() {
        let reference = PositionReference::literature();
        assert_eq!(positional_relevance(&reference, Position::Quarterback).unwrap(), 1.0);

        for position in Position::ALL.iter().filter(|p| **p != Position::Quarterback) {
            let relevance = positional_relevance(&reference, *position).unwrap();
            assert!(relevance > 0.0 && relevance < 1.0, "{position}: {relevance}");
        }

        let wr = positional_relevance(&reference, Position::WideReceiver).unwrap();
        assert!((wr - 1.12 / 2.33).abs() < 1e-12);
    }

    #[test]
    fn test_missing_position_in_custom_reference() {
        let data = "Position,Mean_WAR,CoV_WAR\nQB,1.63,0.70\n";
        let reference = PositionReference::from_csv_reader(data.as_bytes()).unwrap();
        assert!(matches!(
            positional_relevance(&reference, Position::TightEnd),
            Err(TradeError::PositionNotFound(_))
        ));
        assert!(matches!(
            player_strength(&reference, Position::TightEnd, 0.5),
            Err(TradeError::PositionNotFound(_))
        ));
    }

    #[test]
    fn test_direct_team_need() {
        assert_eq!(direct_team_need(20.0, 35.0), Some(1.75));
        assert_eq!(direct_team_need(0.0, 35.0), None);
        assert_eq!(direct_team_need(-4.0, 35.0), None);
    }

    #[test]
    fn test_asymmetric_policy() {
        let policy = AdjustmentPolicy::AsymmetricMultiplicative;
        assert_eq!(policy.apply(-0.4, 0.5), -0.2);
        assert_eq!(policy.apply(0.4, 0.5), 0.2);
        // factor >= 1 forces a non-negative result
        assert_eq!(policy.apply(-0.4, 2.0), 0.8);
        assert_eq!(policy.apply(-0.4, 1.0), 0.4);
        assert_eq!(policy.apply(0.4, 2.0), 0.8);
        assert!(!policy.folds_board_signal());
    }

    #[test]
    fn test_additive_policy() {
        let policy = AdjustmentPolicy::AdditiveMagnitude;
        assert_eq!(policy.apply(-0.4, 0.5), -0.2);
        assert!((policy.apply(0.4, 0.5) - 0.6).abs() < 1e-12);
        assert_eq!(policy.apply(-0.4, 2.0), 0.4);
        assert!(policy.folds_board_signal());
    }

    #[test]
    fn test_policy_names_round_trip() {
        for policy in [AdjustmentPolicy::AsymmetricMultiplicative, AdjustmentPolicy::AdditiveMagnitude]
        {
            assert_eq!(policy.name().parse::<AdjustmentPolicy>().unwrap(), policy);
        }
        assert!("multiplicative".parse::<AdjustmentPolicy>().is_err());
    }
}
