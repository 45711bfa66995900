//! Logging and tracing setup

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, prelude::*, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize logging with the configured level and format.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn initialize_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // stdout carries the verdict, logs go to stderr
    let fmt_layer = match config.format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed(),
        "pretty" => fmt::layer()
            .pretty()
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed(),
        _ => fmt::layer().compact().with_target(false).with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init()?;

    Ok(())
}
