//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tally - budget panels, pace and insights from a budget snapshot
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Budget panels, spending pace and insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.local/share/tally/config/tally.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Inputs shared by every snapshot command
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Budget document (JSON)
    #[arg(short, long)]
    pub budget: PathBuf,

    /// Transactions (.csv or .json)
    #[arg(short, long)]
    pub transactions: Option<PathBuf>,

    /// Evaluate as of this date (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Output JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show allocated / spent / remaining / progress per bucket and category
    Panels {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Show ranked insights
    Insights {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Only this scope: a bucket (needs, wants, savings) or a category id
        #[arg(short, long)]
        scope: Option<String>,

        /// Include secondary insights, not just the headline
        #[arg(long)]
        all: bool,
    },

    /// Show healthy vs. needs-attention summary
    Health {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Show spending timeline positions
    Timeline {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Scope to project (defaults to all buckets)
        #[arg(short, long)]
        scope: Option<String>,
    },

    /// Show the budget period containing a date
    Period {
        /// Date inside the period (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Period start day (defaults to the configured start day)
        #[arg(long)]
        start_day: Option<u32>,
    },

    /// Show the effective configuration
    Config {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}
