//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (snapshot loading, date and scope parsing)
//! - `panels` - Bucket and category panel tables
//! - `insights` - Ranked insights and health summaries
//! - `timeline` - Spending timeline and period bounds
//! - `config` - Effective configuration

pub mod config;
pub mod core;
pub mod insights;
pub mod panels;
pub mod timeline;

// Re-export command functions for main.rs
pub use config::*;
pub use core::*;
pub use insights::*;
pub use panels::*;
pub use timeline::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Text progress bar, e.g. `[#######---]`
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = (tally_core::format::clamp_ratio(ratio) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
