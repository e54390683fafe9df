//! Tally configuration
//!
//! Currency formatting, the default period start day, insight thresholds,
//! and the category taxonomy.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path, or the override in the data dir
//!    (~/.local/share/tally/config/tally.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::format::CurrencyFormat;
use crate::models::{Bucket, Category, Taxonomy};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

/// Thresholds used when generating insight candidates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightThresholds {
    /// Progress ratio at which a scope is "near its limit"
    pub near_limit_ratio: f64,
    /// Allowed lead of spend pace over elapsed time
    pub pace_tolerance: f64,
    /// Running out at least this many days early is a danger
    pub runout_danger_days: i64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            near_limit_ratio: 0.9,
            pace_tolerance: 0.15,
            runout_danger_days: 7,
        }
    }
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyConfig {
    pub currency: CurrencyFormat,
    /// Default period start day for new documents
    pub start_day: u32,
    pub insights: InsightThresholds,
    pub categories: Vec<Category>,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyFormat::default(),
            start_day: 1,
            insights: InsightThresholds::default(),
            categories: default_categories(),
        }
    }
}

/// Where the effective config came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl TallyConfig {
    /// Load config (override first, then embedded default)
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        Self::load_with_source(override_path).map(|(config, _)| config)
    }

    /// Load config and report which layer it came from
    pub fn load_with_source(override_path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let candidate = match override_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        if let Some(path) = candidate {
            if path.exists() {
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                let config = parse_config(&content)?;
                tracing::debug!(path = %path.display(), "Loaded config override");
                return Ok((config, ConfigSource::File(path)));
            }
            if override_path.is_some() {
                tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            }
        }

        Ok((Self::embedded()?, ConfigSource::Embedded))
    }

    /// The embedded default configuration
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }

    /// Parse config from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        parse_config(content)
    }

    pub fn taxonomy(&self) -> Taxonomy {
        Taxonomy::new(self.categories.clone())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("tally.toml"))
}

fn default_categories() -> Vec<Category> {
    vec![
        Category::new("housing", "Housing", Bucket::Needs),
        Category::new("utilities", "Utilities", Bucket::Needs),
        Category::new("groceries", "Groceries", Bucket::Needs),
        Category::new("transport", "Transport", Bucket::Needs),
        Category::new("dining", "Dining", Bucket::Wants),
        Category::new("entertainment", "Entertainment", Bucket::Wants),
        Category::new("shopping", "Shopping", Bucket::Wants),
        Category::new("emergency_fund", "Emergency Fund", Bucket::Savings),
        Category::new("investments", "Investments", Bucket::Savings),
    ]
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    currency: Option<RawCurrency>,
    period: Option<RawPeriod>,
    insights: Option<RawInsights>,
    categories: Option<Vec<Category>>,
}

#[derive(Debug, Deserialize)]
struct RawCurrency {
    symbol: Option<String>,
    thousands_separator: Option<String>,
    decimal_separator: Option<String>,
    decimals: Option<u8>,
    symbol_after: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawPeriod {
    start_day: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawInsights {
    near_limit_ratio: Option<f64>,
    pace_tolerance: Option<f64>,
    runout_danger_days: Option<i64>,
}

fn parse_config(content: &str) -> Result<TallyConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let mut config = TallyConfig::default();

    if let Some(currency) = raw.currency {
        if let Some(symbol) = currency.symbol {
            config.currency.symbol = symbol;
        }
        if let Some(sep) = currency.thousands_separator {
            config.currency.thousands_separator = sep;
        }
        if let Some(sep) = currency.decimal_separator {
            config.currency.decimal_separator = sep;
        }
        if let Some(decimals) = currency.decimals {
            config.currency.decimals = decimals;
        }
        if let Some(after) = currency.symbol_after {
            config.currency.symbol_after = after;
        }
    }

    if let Some(start_day) = raw.period.and_then(|p| p.start_day) {
        config.start_day = start_day;
    }

    if let Some(insights) = raw.insights {
        if let Some(ratio) = insights.near_limit_ratio {
            config.insights.near_limit_ratio = ratio;
        }
        if let Some(tolerance) = insights.pace_tolerance {
            config.insights.pace_tolerance = tolerance;
        }
        if let Some(days) = insights.runout_danger_days {
            config.insights.runout_danger_days = days;
        }
    }

    if let Some(categories) = raw.categories {
        config.categories = categories;
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &TallyConfig) -> Result<()> {
    if !(1..=31).contains(&config.start_day) {
        return Err(Error::Config(format!(
            "period.start_day must be 1-31, got {}",
            config.start_day
        )));
    }

    let ratio = config.insights.near_limit_ratio;
    if !(ratio > 0.0 && ratio <= 1.0) {
        return Err(Error::Config(format!(
            "insights.near_limit_ratio must be in (0, 1], got {}",
            ratio
        )));
    }
    if !(config.insights.pace_tolerance >= 0.0) {
        return Err(Error::Config(
            "insights.pace_tolerance must not be negative".into(),
        ));
    }
    if config.insights.runout_danger_days < 0 {
        return Err(Error::Config(
            "insights.runout_danger_days must not be negative".into(),
        ));
    }

    for (i, category) in config.categories.iter().enumerate() {
        if category.id.trim().is_empty() {
            return Err(Error::Config(format!("categories[{}] has an empty id", i)));
        }
        let duplicate = config.categories[..i]
            .iter()
            .any(|c| c.id.eq_ignore_ascii_case(&category.id));
        if duplicate {
            return Err(Error::Config(format!(
                "Duplicate category id: {}",
                category.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = TallyConfig::embedded().unwrap();
        assert_eq!(config, TallyConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = TallyConfig::from_toml_str(
            r#"
            [currency]
            symbol = "€"

            [insights]
            near_limit_ratio = 0.8
            "#,
        )
        .unwrap();

        assert_eq!(config.currency.symbol, "€");
        assert_eq!(config.currency.decimals, 2);
        assert_eq!(config.insights.near_limit_ratio, 0.8);
        assert_eq!(config.insights.pace_tolerance, 0.15);
        assert_eq!(config.categories.len(), 9);
    }

    #[test]
    fn test_categories_replace_taxonomy() {
        let config = TallyConfig::from_toml_str(
            r#"
            [[categories]]
            id = "rent"
            name = "Rent"
            bucket = "needs"
            "#,
        )
        .unwrap();

        let taxonomy = config.taxonomy();
        assert_eq!(taxonomy.categories().len(), 1);
        assert_eq!(taxonomy.bucket_for("rent"), Some(Bucket::Needs));
        assert_eq!(taxonomy.bucket_for("groceries"), None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(TallyConfig::from_toml_str("[period]\nstart_day = 0").is_err());
        assert!(TallyConfig::from_toml_str("[insights]\nnear_limit_ratio = 1.5").is_err());
        assert!(TallyConfig::from_toml_str("[insights]\npace_tolerance = -0.1").is_err());
        assert!(TallyConfig::from_toml_str("not toml = = =").is_err());

        let duplicate = r#"
            [[categories]]
            id = "rent"
            name = "Rent"
            bucket = "needs"

            [[categories]]
            id = "Rent"
            name = "Rent again"
            bucket = "wants"
        "#;
        assert!(TallyConfig::from_toml_str(duplicate).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[period]\nstart_day = 25").unwrap();

        let (config, source) = TallyConfig::load_with_source(Some(file.path())).unwrap();
        assert_eq!(config.start_day, 25);
        assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_missing_override_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let (config, source) = TallyConfig::load_with_source(Some(&missing)).unwrap();
        assert_eq!(source, ConfigSource::Embedded);
        assert_eq!(config.start_day, 1);
    }
}
