//! Tally CLI - budget panels and insights from a snapshot
//!
//! Usage:
//!   tally panels --budget budget.json --transactions tx.csv
//!   tally insights --budget budget.json --transactions tx.csv --all
//!   tally health --budget budget.json --transactions tx.csv
//!   tally timeline --budget budget.json --transactions tx.csv --scope wants

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tally_core::TallyConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let (config, source) = TallyConfig::load_with_source(cli.config.as_deref())?;
    tracing::debug!(source = %source, "Config loaded");

    match cli.command {
        Commands::Panels { snapshot } => commands::cmd_panels(&config, &snapshot),
        Commands::Insights {
            snapshot,
            scope,
            all,
        } => commands::cmd_insights(&config, &snapshot, scope.as_deref(), all),
        Commands::Health { snapshot } => commands::cmd_health(&config, &snapshot),
        Commands::Timeline { snapshot, scope } => {
            commands::cmd_timeline(&config, &snapshot, scope.as_deref())
        }
        Commands::Period { date, start_day } => {
            commands::cmd_period(&config, date.as_deref(), start_day)
        }
        Commands::Config { json } => commands::cmd_config(&config, &source, json),
    }
}
