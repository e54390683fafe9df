//! Core types for insights

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::format::{format_currency, format_percent, format_short_date, CurrencyFormat};
use crate::models::Bucket;

/// Severity tone of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Warn,
    Danger,
    Info,
    Muted,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Success => "success",
            Tone::Warn => "warn",
            Tone::Danger => "danger",
            Tone::Info => "info",
            Tone::Muted => "muted",
        }
    }

    /// Fixed ranking weight (higher = shown first)
    pub fn weight(&self) -> u32 {
        match self {
            Tone::Danger => 500,
            Tone::Warn => 300,
            Tone::Info => 200,
            Tone::Success => 120,
            Tone::Muted => 0,
        }
    }

    /// Danger and warn need the user's attention
    pub fn needs_attention(&self) -> bool {
        matches!(self, Tone::Danger | Tone::Warn)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Tone::Success),
            "warn" => Ok(Tone::Warn),
            "danger" => Ok(Tone::Danger),
            "info" => Ok(Tone::Info),
            "muted" => Ok(Tone::Muted),
            _ => Err(format!("Unknown tone: {}", s)),
        }
    }
}

/// Where an insight's call-to-action navigates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum InsightTarget {
    Bucket { bucket: Bucket },
    Category { category: String },
    AddTransaction,
    Transactions,
    Allocations,
    Timeline,
}

impl InsightTarget {
    /// Client route for the target view
    pub fn route(&self) -> String {
        match self {
            InsightTarget::Bucket { bucket } => format!("/buckets/{}", bucket),
            InsightTarget::Category { category } => format!("/categories/{}", category),
            InsightTarget::AddTransaction => "/transactions/new".to_string(),
            InsightTarget::Transactions => "/transactions".to_string(),
            InsightTarget::Allocations => "/settings/allocations".to_string(),
            InsightTarget::Timeline => "/timeline".to_string(),
        }
    }
}

/// A typed message variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InsightVar {
    Amount(f64),
    /// Ratio, 1.0 = 100%
    Percent(f64),
    Days(i64),
    Date(NaiveDate),
    Text(String),
}

impl InsightVar {
    /// Display form for interpolation into a resolved message
    pub fn render(&self, currency: &CurrencyFormat) -> String {
        match self {
            InsightVar::Amount(v) => format_currency(*v, currency),
            InsightVar::Percent(v) => format_percent(*v, 0),
            InsightVar::Days(d) if *d == 1 => "1 day".to_string(),
            InsightVar::Days(d) => format!("{} days", d),
            InsightVar::Date(d) => format_short_date(*d),
            InsightVar::Text(s) => s.clone(),
        }
    }
}

/// Non-rendered ranking hints
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_to_zero: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_per_day_ratio: Option<f64>,
}

/// A short advisory message with a tone
///
/// `message` and `title` are i18n keys; `vars` fill their placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub tone: Tone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, InsightVar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_target: Option<InsightTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(rename = "_scoreHint", default, skip_serializing_if = "Option::is_none")]
    pub score_hint: Option<ScoreHint>,
}

impl Insight {
    pub fn new(id: impl Into<String>, tone: Tone, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tone,
            title: None,
            message: message.into(),
            vars: BTreeMap::new(),
            subtext: None,
            cta_label: None,
            cta_target: None,
            chip: None,
            group: None,
            score_hint: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_var(mut self, name: impl Into<String>, value: InsightVar) -> Self {
        self.vars.insert(name.into(), value);
        self
    }

    pub fn with_subtext(mut self, subtext: impl Into<String>) -> Self {
        self.subtext = Some(subtext.into());
        self
    }

    pub fn with_cta(mut self, label: impl Into<String>, target: InsightTarget) -> Self {
        self.cta_label = Some(label.into());
        self.cta_target = Some(target);
        self
    }

    pub fn with_chip(mut self, chip: impl Into<String>) -> Self {
        self.chip = Some(chip.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_score_hint(mut self, hint: ScoreHint) -> Self {
        self.score_hint = Some(hint);
        self
    }

    /// Message key followed by its rendered vars, e.g.
    /// `insight.overspent (amount=$100.00)`. Used where no string table is
    /// available.
    pub fn describe(&self, currency: &CurrencyFormat) -> String {
        if self.vars.is_empty() {
            return self.message.clone();
        }
        let vars: Vec<String> = self
            .vars
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.render(currency)))
            .collect();
        format!("{} ({})", self.message, vars.join(", "))
    }
}
