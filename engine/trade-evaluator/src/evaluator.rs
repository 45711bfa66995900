//! Trade evaluation and verdict classification

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::adjustment::{
    direct_team_need, player_strength, positional_relevance, AdjustmentBreakdown,
};
use crate::board::ConsensusBoard;
use crate::config::{EvaluatorConfig, ModelParameters};
use crate::curve::{pick_set_value, MAX_PICK};
use crate::error::{Result, TradeError};
use crate::grades::TeamGradeTable;
use crate::position::Position;
use crate::reference::PositionReference;

/// Prospect the trade is made to acquire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTarget {
    pub position: Position,
    /// Projected WAR for the player
    pub war: f64,
    /// Player name, used for the consensus board lookup
    pub name: Option<String>,
}

/// How the acquiring team's need at the target position is measured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TeamNeedInput {
    /// Team figure against the league average figure (e.g. positional cap)
    Direct { team_value: f64, league_avg: f64 },
    /// Team and league offensive grade averages from the grade table
    Grades { team: String },
}

/// A proposed two-party pick trade.
///
/// The giving party sends `picks_given` and receives `picks_received`; a
/// positive differential favors it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub giving_party: String,
    pub receiving_party: String,
    pub picks_given: Vec<u32>,
    pub picks_received: Vec<u32>,
    pub target: Option<PlayerTarget>,
    pub team_need: Option<TeamNeedInput>,
}

impl TradeRequest {
    pub fn new(
        giving_party: impl Into<String>,
        receiving_party: impl Into<String>,
        picks_given: Vec<u32>,
        picks_received: Vec<u32>,
    ) -> Self {
        Self {
            giving_party: giving_party.into(),
            receiving_party: receiving_party.into(),
            picks_given,
            picks_received,
            target: None,
            team_need: None,
        }
    }

    pub fn with_target(mut self, target: PlayerTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_team_need(mut self, team_need: TeamNeedInput) -> Self {
        self.team_need = Some(team_need);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.picks_given.is_empty() {
            return Err(TradeError::EmptyPicks("picks given"));
        }
        if let Some(&pick) = self
            .picks_given
            .iter()
            .chain(&self.picks_received)
            .find(|&&p| p == 0 || p > MAX_PICK)
        {
            return Err(TradeError::InvalidPick(pick));
        }
        if let Some(TeamNeedInput::Direct { team_value, league_avg }) = &self.team_need {
            for (label, value) in [("team value", team_value), ("league average", league_avg)] {
                if !value.is_finite() || *value < 0.0 {
                    return Err(TradeError::InvalidInput(format!(
                        "{label} must be non-negative, got {value}"
                    )));
                }
            }
        }
        if self.team_need.is_some() && self.target.is_none() {
            return Err(TradeError::InvalidInput(
                "team need given without a target player".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which side the trade favors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Favored {
    Giving(String),
    Receiving(String),
    Equal,
}

impl fmt::Display for Favored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Favored::Giving(party) | Favored::Receiving(party) => f.write_str(party),
            Favored::Equal => f.write_str("Equal value"),
        }
    }
}

/// How strongly the trade favors the `Favored` side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degree {
    Equal,
    SlightlyFavors,
    StronglyFavors,
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Degree::Equal => "Equal",
            Degree::SlightlyFavors => "Slightly favors",
            Degree::StronglyFavors => "Strongly favors",
        };
        f.write_str(label)
    }
}

/// Result of evaluating one trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeVerdict {
    pub given_value: f64,
    pub received_value: f64,
    /// `received_value - given_value`
    pub raw_diff: f64,
    /// Present only when a player adjustment was applied
    pub adjusted_diff: Option<f64>,
    /// Degree of favoredness: effective differential over `given_value`
    pub ratio: f64,
    pub favored: Favored,
    pub degree: Degree,
    pub adjustment: Option<AdjustmentBreakdown>,
}

impl TradeVerdict {
    /// Differential the verdict was classified on
    pub fn effective_diff(&self) -> f64 {
        self.adjusted_diff.unwrap_or(self.raw_diff)
    }
}

impl fmt::Display for TradeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.degree {
            Degree::Equal => write!(f, "{}", self.favored)?,
            degree => write!(f, "{} {}", degree, self.favored)?,
        }
        write!(f, " (ratio {:.3}, raw diff {:.4}", self.ratio, self.raw_diff)?;
        if let Some(adjusted) = self.adjusted_diff {
            write!(f, ", adjusted diff {adjusted:.4}")?;
        }
        write!(f, ")")
    }
}

/// Classify a differential relative to the value given up.
///
/// `|ratio| < equal_threshold` is even; positive favors the giving party,
/// otherwise the receiving party. Strong once `|ratio| > strong_threshold`.
pub fn classify(
    diff: f64,
    given_value: f64,
    giving_party: &str,
    receiving_party: &str,
    params: &ModelParameters,
) -> Result<(f64, Favored, Degree)> {
    if given_value <= 0.0 {
        return Err(TradeError::InvalidInput(format!(
            "value given must be positive to classify, got {given_value}"
        )));
    }
    let ratio = diff / given_value;

    if ratio.abs() < params.equal_threshold {
        return Ok((ratio, Favored::Equal, Degree::Equal));
    }
    let degree = if ratio.abs() > params.strong_threshold {
        Degree::StronglyFavors
    } else {
        Degree::SlightlyFavors
    };
    let favored = if ratio > 0.0 {
        Favored::Giving(giving_party.to_string())
    } else {
        Favored::Receiving(receiving_party.to_string())
    };
    Ok((ratio, favored, degree))
}

/// Prices pick trades against immutable reference tables.
///
/// Holds no mutable state, so a single instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct TradeEvaluator {
    reference: PositionReference,
    board: Option<ConsensusBoard>,
    grades: Option<TeamGradeTable>,
    config: EvaluatorConfig,
}

impl TradeEvaluator {
    pub fn new(reference: PositionReference) -> Self {
        Self { reference, board: None, grades: None, config: EvaluatorConfig::default() }
    }

    /// Build an evaluator from the data files named in `config`
    pub fn from_config(config: EvaluatorConfig) -> Result<Self> {
        let reference = match &config.data.position_reference {
            Some(path) => PositionReference::from_csv_path(path)?,
            None => PositionReference::literature(),
        };
        let board = config
            .data
            .consensus_board
            .as_ref()
            .map(|path| ConsensusBoard::from_csv_path(path, &config.model.board_value_column))
            .transpose()?;
        let grades =
            config.data.team_grades.as_ref().map(TeamGradeTable::from_csv_path).transpose()?;

        Ok(Self { reference, board, grades, config })
    }

    pub fn with_board(mut self, board: ConsensusBoard) -> Self {
        self.board = Some(board);
        self
    }

    pub fn with_grades(mut self, grades: TeamGradeTable) -> Self {
        self.grades = Some(grades);
        self
    }

    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn reference(&self) -> &PositionReference {
        &self.reference
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate a trade into a verdict
    pub fn evaluate(&self, request: &TradeRequest) -> Result<TradeVerdict> {
        request.validate()?;

        let given_value = pick_set_value(&request.picks_given)?;
        let received_value = pick_set_value(&request.picks_received)?;
        let raw_diff = received_value - given_value;
        debug!(
            "Pick values for {}: given {:.4}, received {:.4}, raw diff {:.4}",
            request.giving_party, given_value, received_value, raw_diff
        );

        let adjustment = match &request.target {
            Some(target) => Some(self.adjustment(request, target)?),
            None => None,
        };
        let policy = self.config.model.adjustment_policy;
        let adjusted_diff = adjustment.as_ref().map(|a| policy.apply(raw_diff, a.factor));

        let (ratio, favored, degree) = classify(
            adjusted_diff.unwrap_or(raw_diff),
            given_value,
            &request.giving_party,
            &request.receiving_party,
            &self.config.model,
        )?;

        info!(
            "Trade {} <-> {}: {} {} (ratio {:.3})",
            request.giving_party, request.receiving_party, degree, favored, ratio
        );

        Ok(TradeVerdict {
            given_value,
            received_value,
            raw_diff,
            adjusted_diff,
            ratio,
            favored,
            degree,
            adjustment,
        })
    }

    fn adjustment(&self, request: &TradeRequest, target: &PlayerTarget) -> Result<AdjustmentBreakdown> {
        let policy = self.config.model.adjustment_policy;
        let strength = player_strength(&self.reference, target.position, target.war)?;
        let relevance = positional_relevance(&self.reference, target.position)?;

        let mut grades = None;
        let need = match &request.team_need {
            Some(TeamNeedInput::Direct { team_value, league_avg }) => {
                direct_team_need(*team_value, *league_avg)
            }
            Some(TeamNeedInput::Grades { team }) => {
                let table = self.grades.as_ref().ok_or_else(|| {
                    TradeError::InvalidInput("team grades requested but none loaded".to_string())
                })?;
                let summary =
                    table.summarize(target.position, team, self.config.model.usage_threshold)?;
                info!(
                    "{} grades for {}: league avg {:.2}, team avg {:.2}",
                    target.position, team, summary.league_avg, summary.team_avg
                );
                grades = Some(summary);
                direct_team_need(summary.team_avg, summary.league_avg)
            }
            None => None,
        };
        if need.is_none() && request.team_need.is_some() {
            debug!("Team need undefined for {}, treating as neutral", request.giving_party);
        }

        // the selecting pick is the best one coming back
        let board_signal = match (&self.board, &target.name, request.picks_received.iter().min()) {
            (Some(board), Some(name), Some(&pick)) => Some(board.relative_pick(name, pick)?),
            _ => None,
        };

        let mut factor = strength * relevance * need.unwrap_or(1.0);
        if policy.folds_board_signal() {
            factor *= board_signal.unwrap_or(1.0);
        }

        debug!(
            "Adjustment for {}: strength {:.4}, relevance {:.4}, need {:?}, board {:?}, factor {:.4}",
            target.position, strength, relevance, need, board_signal, factor
        );

        Ok(AdjustmentBreakdown { policy, strength, relevance, need, board_signal, grades, factor })
    }
}

impl Default for TradeEvaluator {
    fn default() -> Self {
        Self::new(PositionReference::literature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ModelParameters {
        ModelParameters::default()
    }

    #[test]
    fn test_classify_boundary_is_exclusive() {
        let (ratio, favored, degree) = classify(0.2, 1.0, "A", "B", &params()).unwrap();
        assert_eq!(ratio, 0.2);
        assert_eq!(favored, Favored::Giving("A".to_string()));
        assert_eq!(degree, Degree::SlightlyFavors);

        let (_, favored, degree) = classify(0.1999999, 1.0, "A", "B", &params()).unwrap();
        assert_eq!(favored, Favored::Equal);
        assert_eq!(degree, Degree::Equal);

        let (_, favored, _) = classify(-0.2, 1.0, "A", "B", &params()).unwrap();
        assert_eq!(favored, Favored::Receiving("B".to_string()));
    }

    #[test]
    fn test_classify_strong_threshold() {
        let (_, _, degree) = classify(1.0, 1.0, "A", "B", &params()).unwrap();
        assert_eq!(degree, Degree::SlightlyFavors);

        let (_, favored, degree) = classify(-1.5, 1.0, "A", "B", &params()).unwrap();
        assert_eq!(favored, Favored::Receiving("B".to_string()));
        assert_eq!(degree, Degree::StronglyFavors);
    }

    #[test]
    fn test_classify_requires_positive_given_value() {
        assert!(matches!(
            classify(0.5, 0.0, "A", "B", &params()),
            Err(TradeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_request_validation() {
        let evaluator = TradeEvaluator::default();

        let empty = TradeRequest::new("A", "B", vec![], vec![1]);
        assert!(matches!(evaluator.evaluate(&empty), Err(TradeError::EmptyPicks(_))));

        let zero = TradeRequest::new("A", "B", vec![4], vec![0]);
        assert!(matches!(evaluator.evaluate(&zero), Err(TradeError::InvalidPick(0))));

        let past_last_pick = TradeRequest::new("A", "B", vec![300_000], vec![1]);
        assert!(matches!(
            evaluator.evaluate(&past_last_pick),
            Err(TradeError::InvalidPick(300_000))
        ));

        let negative_need = TradeRequest::new("A", "B", vec![4], vec![2])
            .with_target(PlayerTarget { position: Position::WideReceiver, war: 1.0, name: None })
            .with_team_need(TeamNeedInput::Direct { team_value: -1.0, league_avg: 35.0 });
        assert!(matches!(evaluator.evaluate(&negative_need), Err(TradeError::InvalidInput(_))));

        let need_without_target = TradeRequest::new("A", "B", vec![4], vec![2])
            .with_team_need(TeamNeedInput::Direct { team_value: 20.0, league_avg: 35.0 });
        assert!(evaluator.evaluate(&need_without_target).is_err());
    }

    #[test]
    fn test_empty_received_is_allowed() {
        let verdict = TradeEvaluator::default()
            .evaluate(&TradeRequest::new("A", "B", vec![10], vec![]))
            .unwrap();
        assert_eq!(verdict.received_value, 0.0);
        assert_eq!(verdict.ratio, -1.0);
        assert_eq!(verdict.favored, Favored::Receiving("B".to_string()));
        assert_eq!(verdict.degree, Degree::SlightlyFavors);
    }

    #[test]
    fn test_display() {
        assert_eq!(Favored::Equal.to_string(), "Equal value");
        assert_eq!(Degree::StronglyFavors.to_string(), "Strongly favors");

        let verdict = TradeEvaluator::default()
            .evaluate(&TradeRequest::new("A", "B", vec![1], vec![1]))
            .unwrap();
        assert!(verdict.to_string().starts_with("Equal value (ratio 0.000"));
    }
}
