//! Draft Trade Evaluator
//!
//! Prices a trade of draft picks between two teams on the Massey & Thaler pick
//! value curve, optionally adjusted for the prospect being targeted (player
//! strength, positional relevance and team need), and classifies which side
//! the trade favors.

pub mod adjustment;
pub mod board;
pub mod config;
pub mod curve;
pub mod error;
pub mod evaluator;
pub mod grades;
pub mod logging;
pub mod position;
pub mod reference;


pub use adjustment::{AdjustmentBreakdown, AdjustmentPolicy};
pub use board::ConsensusBoard;
pub use config::EvaluatorConfig;
pub use curve::{performance_value, pick_set_value};
pub use error::{Result, TradeError};
pub use evaluator::{
    classify, Degree, Favored, PlayerTarget, TeamNeedInput, TradeEvaluator, TradeRequest,
    TradeVerdict,
};
pub use grades::{GradeSummary, TeamGradeTable};
pub use position::Position;
pub use reference::{PositionBaseline, PositionReference};
