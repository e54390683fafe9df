//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::{Path, PathBuf};

use tally_core::{Bucket, ConfigSource, Scope, TallyConfig};
use tempfile::TempDir;

use crate::cli::SnapshotArgs;
use crate::commands::{self, progress_bar, truncate};

const BUDGET_JSON: &str = r#"{
    "id": "budget-2025-10",
    "monthKey": "2025-10",
    "startDay": 1,
    "percents": {"needs": 0.5, "wants": 0.3, "savings": 0.2},
    "income": 1000,
    "categoryShares": {"dining": 0.5, "housing": 0.6}
}"#;

const TRANSACTIONS_CSV: &str = "date,amount,category,bucket,note\n\
2025-10-01,450.00,housing,,Rent\n\
2025-10-09,150.00,groceries,,\n\
2025-10-10,42.50,dining,,Pizza\n";

/// Write a budget document and transactions CSV, returning the dir and paths
fn setup_snapshot() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let budget = dir.path().join("budget.json");
    let transactions = dir.path().join("transactions.csv");
    std::fs::write(&budget, BUDGET_JSON).unwrap();
    std::fs::write(&transactions, TRANSACTIONS_CSV).unwrap();
    (dir, budget, transactions)
}

fn snapshot_args(budget: &Path, transactions: Option<&Path>, json: bool) -> SnapshotArgs {
    SnapshotArgs {
        budget: budget.to_path_buf(),
        transactions: transactions.map(Path::to_path_buf),
        date: Some("2025-10-15".to_string()),
        json,
    }
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Groceries", 20), "Groceries");
    assert_eq!(truncate("Emergency Fund Contributions", 10), "Emergen...");
    assert_eq!(truncate("Café au lait", 7), "Café...");
}

#[test]
fn test_progress_bar() {
    assert_eq!(progress_bar(0.0, 10), "[----------]");
    assert_eq!(progress_bar(0.5, 10), "[#####-----]");
    assert_eq!(progress_bar(3.0, 10), "[##########]");
    assert_eq!(progress_bar(f64::NAN, 4), "[----]");
}

#[test]
fn test_parse_date() {
    let date = commands::parse_date(Some("2025-10-15")).unwrap();
    assert_eq!(date.to_string(), "2025-10-15");
    assert!(commands::parse_date(Some("15/10/2025")).is_err());
    assert!(commands::parse_date(None).is_ok());
}

#[test]
fn test_resolve_scope_bucket() {
    let config = TallyConfig::default();
    let scope = commands::resolve_scope("Needs", &config).unwrap();
    assert_eq!(scope, Scope::Bucket(Bucket::Needs));
}

#[test]
fn test_resolve_scope_category() {
    let config = TallyConfig::default();
    let scope = commands::resolve_scope("Dining", &config).unwrap();
    assert_eq!(scope, Scope::Category("dining".to_string()));
}

#[test]
fn test_resolve_scope_not_found() {
    let config = TallyConfig::default();
    let err = commands::resolve_scope("yachts", &config).unwrap_err();
    assert!(err.to_string().contains("Unknown scope"));
}

// ========== Snapshot Loading Tests ==========

#[test]
fn test_load_inputs() {
    let (_dir, budget, transactions) = setup_snapshot();
    let args = snapshot_args(&budget, Some(&transactions), false);
    let (snapshot, today) = commands::load_inputs(&args).unwrap();
    assert!(snapshot.is_loaded());
    assert_eq!(snapshot.transactions.len(), 3);
    assert_eq!(today.to_string(), "2025-10-15");
}

#[test]
fn test_load_inputs_missing_budget() {
    let dir = tempfile::tempdir().unwrap();
    let args = snapshot_args(&dir.path().join("nope.json"), None, false);
    assert!(commands::load_inputs(&args).is_err());
}

#[test]
fn test_compute_dashboard() {
    let (_dir, budget, transactions) = setup_snapshot();
    let config = TallyConfig::default();
    let args = snapshot_args(&budget, Some(&transactions), false);

    let dashboard = commands::compute_dashboard(&config, &args).unwrap();
    let needs = dashboard.view(&Scope::Bucket(Bucket::Needs)).unwrap();
    assert_eq!(needs.panel.spent, 600.0);
    assert_eq!(needs.panel.remaining, -100.0);
    assert_eq!(dashboard.bucket_health.attention_count, 1);
}

// ========== Command Tests ==========

#[test]
fn test_cmd_panels() {
    let (_dir, budget, transactions) = setup_snapshot();
    let config = TallyConfig::default();
    let result = commands::cmd_panels(&config, &snapshot_args(&budget, Some(&transactions), false));
    assert!(result.is_ok());
}

#[test]
fn test_cmd_panels_json() {
    let (_dir, budget, transactions) = setup_snapshot();
    let config = TallyConfig::default();
    let result = commands::cmd_panels(&config, &snapshot_args(&budget, Some(&transactions), true));
    assert!(result.is_ok());
}

#[test]
fn test_cmd_panels_without_transactions() {
    let (_dir, budget, _) = setup_snapshot();
    let config = TallyConfig::default();
    let result = commands::cmd_panels(&config, &snapshot_args(&budget, None, false));
    assert!(result.is_ok());
}

#[test]
fn test_cmd_insights() {
    let (_dir, budget, transactions) = setup_snapshot();
    let config = TallyConfig::default();
    let args = snapshot_args(&budget, Some(&transactions), false);

    assert!(commands::cmd_insights(&config, &args, None, false).is_ok());
    assert!(commands::cmd_insights(&config, &args, None, true).is_ok());
    assert!(commands::cmd_insights(&config, &args, Some("dining"), true).is_ok());
}

#[test]
fn test_cmd_insights_json() {
    let (_dir, budget, transactions) = setup_snapshot();
    let config = TallyConfig::default();
    let args = snapshot_args(&budget, Some(&transactions), true);

    assert!(commands::cmd_insights(&config, &args, Some("needs"), false).is_ok());
    assert!(commands::cmd_insights(&config, &args, None, true).is_ok());
}

#[test]
fn test_cmd_insights_unknown_scope() {
    let (_dir, budget, transactions) = setup_snapshot();
    let config = TallyConfig::default();
    let args = snapshot_args(&budget, Some(&transactions), false);
    assert!(commands::cmd_insights(&config, &args, Some("yachts"), false).is_err());
}

#[test]
fn test_cmd_health() {
    let (_dir, budget, transactions) = setup_snapshot();
    let config = TallyConfig::default();
    assert!(commands::cmd_health(&config, &snapshot_args(&budget, Some(&transactions), false)).is_ok());
    assert!(commands::cmd_health(&config, &snapshot_args(&budget, Some(&transactions), true)).is_ok());
}

#[test]
fn test_cmd_timeline() {
    let (_dir, budget, transactions) = setup_snapshot();
    let config = TallyConfig::default();
    let args = snapshot_args(&budget, Some(&transactions), false);

    assert!(commands::cmd_timeline(&config, &args, None).is_ok());
    assert!(commands::cmd_timeline(&config, &args, Some("wants")).is_ok());
}

#[test]
fn test_cmd_timeline_json() {
    let (_dir, budget, transactions) = setup_snapshot();
    let config = TallyConfig::default();
    let args = snapshot_args(&budget, Some(&transactions), true);
    assert!(commands::cmd_timeline(&config, &args, Some("groceries")).is_ok());
}

#[test]
fn test_cmd_period() {
    let config = TallyConfig::default();
    assert!(commands::cmd_period(&config, Some("2025-10-15"), None).is_ok());
    assert!(commands::cmd_period(&config, Some("2025-10-15"), Some(25)).is_ok());
    assert!(commands::cmd_period(&config, Some("2025-10-15"), Some(0)).is_err());
    assert!(commands::cmd_period(&config, Some("not-a-date"), None).is_err());
}

#[test]
fn test_cmd_config() {
    let config = TallyConfig::default();
    assert!(commands::cmd_config(&config, &ConfigSource::Embedded, false).is_ok());
    assert!(commands::cmd_config(&config, &ConfigSource::Embedded, true).is_ok());
}

#[test]
fn test_bad_transactions_file_is_error() {
    let (dir, budget, _) = setup_snapshot();
    let bad = dir.path().join("bad.csv");
    std::fs::write(&bad, "date,amount,category\n2025-10-02,abc,dining\n").unwrap();

    let config = TallyConfig::default();
    let result = commands::cmd_panels(&config, &snapshot_args(&budget, Some(&bad), false));
    assert!(result.is_err());
}
