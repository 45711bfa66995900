//! Configuration for the trade evaluator

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::adjustment::AdjustmentPolicy;
use crate::error::{Result, TradeError};
use crate::grades::DEFAULT_USAGE_THRESHOLD;

/// Environment variable prefix, e.g. `TRADE_EVAL__MODEL__EQUAL_THRESHOLD=0.25`
pub const ENV_PREFIX: &str = "TRADE_EVAL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Valuation model parameters
    pub model: ModelParameters,

    /// Reference data locations
    pub data: DataConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// |ratio| below this is an even trade
    pub equal_threshold: f64,

    /// |ratio| above this strongly favors one side
    pub strong_threshold: f64,

    /// How the adjustment factor is applied
    pub adjustment_policy: AdjustmentPolicy,

    /// Players need more targets than this to count toward grade averages
    pub usage_threshold: f64,

    /// Consensus board column holding the rank or value
    pub board_value_column: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// `Position,Mean_WAR,CoV_WAR` CSV; the literature table is used when unset
    pub position_reference: Option<PathBuf>,

    /// Consensus big board CSV
    pub consensus_board: Option<PathBuf>,

    /// Team offensive grade CSV
    pub team_grades: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            equal_threshold: 0.2,
            strong_threshold: 1.0,
            adjustment_policy: AdjustmentPolicy::default(),
            usage_threshold: DEFAULT_USAGE_THRESHOLD,
            board_value_column: "consensus".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "compact".to_string() }
    }
}

impl EvaluatorConfig {
    /// Load defaults, then an optional TOML file, then `TRADE_EVAL__*` overrides
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            tracing::debug!("Loading configuration from file: {:?}", path);
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__"),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let model = &self.model;
        if !(model.equal_threshold.is_finite() && model.equal_threshold > 0.0) {
            return Err(TradeError::InvalidInput(format!(
                "equal_threshold must be positive, got {}",
                model.equal_threshold
            )));
        }
        if !(model.strong_threshold.is_finite() && model.strong_threshold >= model.equal_threshold)
        {
            return Err(TradeError::InvalidInput(format!(
                "strong_threshold {} must be at least equal_threshold {}",
                model.strong_threshold, model.equal_threshold
            )));
        }
        if !(model.usage_threshold.is_finite() && model.usage_threshold >= 0.0) {
            return Err(TradeError::InvalidInput(format!(
                "usage_threshold must be non-negative, got {}",
                model.usage_threshold
            )));
        }
        if model.board_value_column.trim().is_empty() {
            return Err(TradeError::InvalidInput("board_value_column is empty".to_string()));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(TradeError::InvalidInput(format!("Invalid log level: {other}"))),
        }
        match self.logging.format.as_str() {
            "json" | "pretty" | "compact" => {}
            other => return Err(TradeError::InvalidInput(format!("Invalid log format: {other}"))),
        }

        Ok(())
    }
}
