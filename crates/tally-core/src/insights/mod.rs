//! Insights - short advisory messages per bucket or category
//!
//! Insights are ephemeral: they are rebuilt from the current panels on every
//! recompute and never persisted.
//!
//! ## Pipeline
//!
//! - **Generate** - `generate_candidates` builds the candidate set for a scope
//! - **Rank** - `rank_insights` orders candidates by tone weight and score hints
//! - **Summarize** - `crate::health::HealthSummary` partitions scopes by their
//!   headline insight
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::insights::{generate_candidates, rank_insights, ScopeInputs};
//!
//! let candidates = generate_candidates(&inputs, &config.insights);
//! let ranked = rank_insights(candidates);
//! if let Some(headline) = ranked.headline() {
//!     println!("{}", headline.message);
//! }
//! ```

pub mod generate;
pub mod ranking;
pub mod types;

pub use generate::{generate_candidates, ScopeInputs};
pub use ranking::{compare_insights, rank_insights, RankedInsights};
pub use types::{Insight, InsightTarget, InsightVar, ScoreHint, Tone};
