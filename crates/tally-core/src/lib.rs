//! Tally Core Library
//!
//! Derived presentation state for the Tally budgeting client:
//! - Budget document and transaction models
//! - Currency/date formatting and period bounds
//! - Bucket and category panels (allocated, spent, remaining, progress)
//! - Spend pace and timeline projection
//! - Insight generation, ranking and health summaries
//! - Observable budget store and memoized selectors
//! - Configuration and snapshot import

pub mod config;
pub mod error;
pub mod format;
pub mod health;
pub mod import;
pub mod insights;
pub mod memo;
pub mod models;
pub mod pace;
pub mod panel;
pub mod period;
pub mod store;

pub use config::{ConfigSource, InsightThresholds, TallyConfig};
pub use error::{Error, Result};
pub use format::CurrencyFormat;
pub use health::{HealthDetail, HealthSummary};
pub use insights::{Insight, InsightTarget, InsightVar, RankedInsights, ScoreHint, Tone};
pub use memo::{Dashboard, SelectorCache};
pub use models::{
    Bucket, BucketPercents, BudgetDocument, Category, NewTransaction, Scope, Taxonomy,
    Transaction,
};
pub use pace::{RunoutMarker, SpendPace, Timeline};
pub use panel::{BucketPanel, BudgetPanels};
pub use period::Period;
pub use store::{BudgetSnapshot, BudgetStore, StoreEvent, SubscriptionId};
