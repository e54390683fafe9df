//! Shared utilities for snapshot commands
//!
//! This module contains:
//! - `parse_date` - Parse an evaluation date (defaults to today)
//! - `load_inputs` - Load the snapshot named by the CLI arguments
//! - `resolve_scope` - Turn a bucket name or category id into a `Scope`
//! - `compute_dashboard` - Load inputs and derive every panel and insight

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use tally_core::import::load_snapshot;
use tally_core::{BudgetSnapshot, Bucket, Dashboard, Scope, SelectorCache, TallyConfig};

use crate::cli::SnapshotArgs;

/// Parse a YYYY-MM-DD date, or today when absent
pub fn parse_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s)),
        None => Ok(Local::now().date_naive()),
    }
}

/// Load the budget document and transactions, plus the evaluation date
pub fn load_inputs(args: &SnapshotArgs) -> Result<(BudgetSnapshot, NaiveDate)> {
    let snapshot = load_snapshot(&args.budget, args.transactions.as_deref()).with_context(|| {
        format!("Failed to load budget snapshot from {}", args.budget.display())
    })?;
    let today = parse_date(args.date.as_deref())?;
    Ok((snapshot, today))
}

/// Bucket names win over category ids
pub fn resolve_scope(raw: &str, config: &TallyConfig) -> Result<Scope> {
    if let Ok(bucket) = raw.parse::<Bucket>() {
        return Ok(Scope::Bucket(bucket));
    }
    match config.taxonomy().get(raw) {
        Some(category) => Ok(Scope::Category(category.id.clone())),
        None => {
            let known: Vec<&str> = config.categories.iter().map(|c| c.id.as_str()).collect();
            bail!(
                "Unknown scope: {}. Use needs, wants, savings or a category ({})",
                raw,
                known.join(", ")
            )
        }
    }
}

/// Load inputs and compute the dashboard
pub fn compute_dashboard(config: &TallyConfig, args: &SnapshotArgs) -> Result<Dashboard> {
    let (snapshot, today) = load_inputs(args)?;
    let mut cache = SelectorCache::new();
    match Dashboard::compute(&snapshot, config, today, &mut cache)? {
        Some(dashboard) => Ok(dashboard),
        None => bail!("Budget document is not loaded"),
    }
}

/// Print a JSON value
pub fn print_json(value: serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
