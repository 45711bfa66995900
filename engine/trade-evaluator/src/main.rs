//! Draft trade evaluator CLI
//!
//! Evaluates one hypothetical pick trade and prints the verdict.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use trade_evaluator::logging::initialize_logging_with_config;
use trade_evaluator::{
    AdjustmentPolicy, EvaluatorConfig, PlayerTarget, Position, TeamNeedInput, TradeEvaluator,
    TradeRequest,
};

/// Evaluate a draft pick trade between two teams
#[derive(Parser, Debug)]
#[command(name = "trade-evaluator")]
#[command(about = "Estimate which side a draft pick trade favors")]
struct Cli {
    /// Team sending the `--given` picks
    #[arg(long)]
    giving_party: String,

    /// Team sending the `--received` picks
    #[arg(long)]
    receiving_party: String,

    /// Picks the giving party sends away (comma separated)
    #[arg(long, value_delimiter = ',', required = true)]
    given: Vec<u32>,

    /// Picks the giving party gets back (comma separated)
    #[arg(long, value_delimiter = ',')]
    received: Vec<u32>,

    /// Position of the targeted prospect (e.g. WR, RB/FB, ED)
    #[arg(long, requires = "war")]
    position: Option<String>,

    /// Projected WAR of the targeted prospect
    #[arg(long, requires = "position")]
    war: Option<f64>,

    /// Prospect name for the consensus board lookup
    #[arg(long, requires = "position")]
    player: Option<String>,

    /// Team's figure at the position for direct team need
    #[arg(long, requires_all = ["league_avg", "position"], conflicts_with = "grades_team")]
    team_value: Option<f64>,

    /// League average figure at the position for direct team need
    #[arg(long, requires = "team_value")]
    league_avg: Option<f64>,

    /// Team name in the grade table for grade-derived team need
    #[arg(long, requires = "position")]
    grades_team: Option<String>,

    /// Override the configured adjustment policy
    #[arg(long)]
    policy: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the verdict as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn request(&self) -> Result<TradeRequest> {
        let mut request = TradeRequest::new(
            self.giving_party.clone(),
            self.receiving_party.clone(),
            self.given.clone(),
            self.received.clone(),
        );

        if let (Some(position), Some(war)) = (&self.position, self.war) {
            let position: Position = position.parse()?;
            request = request.with_target(PlayerTarget { position, war, name: self.player.clone() });
        }

        if let (Some(team_value), Some(league_avg)) = (self.team_value, self.league_avg) {
            request = request.with_team_need(TeamNeedInput::Direct { team_value, league_avg });
        } else if let Some(team) = &self.grades_team {
            request = request.with_team_need(TeamNeedInput::Grades { team: team.clone() });
        }

        Ok(request)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        EvaluatorConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(policy) = &cli.policy {
        config.model.adjustment_policy = policy.parse::<AdjustmentPolicy>()?;
    }

    initialize_logging_with_config(&config.logging)?;
    info!("Starting trade evaluator v{}", env!("CARGO_PKG_VERSION"));
    info!("Adjustment policy: {}", config.model.adjustment_policy);

    let evaluator =
        TradeEvaluator::from_config(config).context("Failed to load reference data")?;
    let request = cli.request()?;
    let verdict = evaluator.evaluate(&request).context("Failed to evaluate trade")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("Value given:    {:.4}", verdict.given_value);
        println!("Value received: {:.4}", verdict.received_value);
        println!("Raw difference: {:.4}", verdict.raw_diff);
        if let Some(adjustment) = &verdict.adjustment {
            println!(
                "Adjustment:     strength {:.3} x relevance {:.3} x need {} = {:.3} ({})",
                adjustment.strength,
                adjustment.relevance,
                adjustment
                    .need
                    .map(|need| format!("{need:.3}"))
                    .unwrap_or_else(|| "n/a".to_string()),
                adjustment.factor,
                adjustment.policy
            );
            if let Some(signal) = adjustment.board_signal {
                println!("Board signal:   {signal:.3}");
            }
        }
        if let Some(adjusted) = verdict.adjusted_diff {
            println!("Adjusted diff:  {adjusted:.4}");
        }
        println!("Verdict:        {verdict}");
    }

    Ok(())
}
