//! Domain models for Tally

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::period::Period;

/// Top-level spending group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Needs,
    Wants,
    Savings,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Needs => "needs",
            Self::Wants => "wants",
            Self::Savings => "savings",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Needs => "Needs",
            Self::Wants => "Wants",
            Self::Savings => "Savings",
        }
    }

    /// All buckets in display order
    pub fn all() -> &'static [Bucket] {
        &[Self::Needs, Self::Wants, Self::Savings]
    }
}

impl std::str::FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "needs" | "need" => Ok(Self::Needs),
            "wants" | "want" => Ok(Self::Wants),
            "savings" | "saving" => Ok(Self::Savings),
            _ => Err(format!("Unknown bucket: {}", s)),
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Share of income allocated to each bucket
///
/// The three values are expected to sum to 1.0 but nothing enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketPercents {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
}

impl BucketPercents {
    pub fn new(needs: f64, wants: f64, savings: f64) -> Self {
        Self {
            needs,
            wants,
            savings,
        }
    }

    pub fn get(&self, bucket: Bucket) -> f64 {
        match bucket {
            Bucket::Needs => self.needs,
            Bucket::Wants => self.wants,
            Bucket::Savings => self.savings,
        }
    }

    pub fn total(&self) -> f64 {
        self.needs + self.wants + self.savings
    }

    /// True when the percents reconcile to 100% (within rounding)
    pub fn is_balanced(&self) -> bool {
        (self.total() - 1.0).abs() < 1e-6
    }
}

impl Default for BucketPercents {
    fn default() -> Self {
        Self::new(0.5, 0.3, 0.2)
    }
}

/// A spending label mapped to exactly one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub bucket: Bucket,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, bucket: Bucket) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bucket,
        }
    }
}

/// The category list used to map transactions onto buckets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by id (case-insensitive)
    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.id.eq_ignore_ascii_case(id))
    }

    pub fn bucket_for(&self, category_id: &str) -> Option<Bucket> {
        self.get(category_id).map(|c| c.bucket)
    }

    /// Categories belonging to a bucket, in taxonomy order
    pub fn in_bucket(&self, bucket: Bucket) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(move |c| c.bucket == bucket)
    }
}

/// The budget for one period
///
/// Replaced wholesale when the user edits allocations or the period rolls over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDocument {
    pub id: String,
    /// Month the period starts in, "YYYY-MM"
    pub month_key: String,
    /// Day of month the period starts on (1-31, clamped to short months)
    pub start_day: u32,
    pub percents: BucketPercents,
    pub income: f64,
    /// Category id -> fraction of the parent bucket's allocation
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category_shares: BTreeMap<String, f64>,
}

impl BudgetDocument {
    pub fn new(
        id: impl Into<String>,
        month_key: impl Into<String>,
        start_day: u32,
        percents: BucketPercents,
        income: f64,
    ) -> Self {
        Self {
            id: id.into(),
            month_key: month_key.into(),
            start_day,
            percents,
            income,
            category_shares: BTreeMap::new(),
        }
    }

    /// Add a category share
    pub fn with_category_share(mut self, category: impl Into<String>, share: f64) -> Self {
        self.category_shares.insert(category.into(), share);
        self
    }

    /// The active period window
    pub fn period(&self) -> Result<Period> {
        Period::from_month_key(&self.month_key, self.start_day)
    }

    /// Amount allocated to a bucket: `income * percent`, never negative
    pub fn alloc(&self, bucket: Bucket) -> f64 {
        non_negative(self.income * self.percents.get(bucket))
    }

    /// Amount allocated to a category out of its bucket's allocation
    pub fn category_alloc(&self, category: &Category) -> f64 {
        let share = self
            .category_shares
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(&category.id))
            .map(|(_, share)| *share)
            .unwrap_or(0.0);
        non_negative(self.alloc(category.bucket) * share)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub amount: f64,
    pub category: String,
    /// Explicit bucket; falls back to the category's bucket when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Bucket>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    /// Bucket this transaction counts toward, if any
    pub fn resolve_bucket(&self, taxonomy: &Taxonomy) -> Option<Bucket> {
        self.bucket.or_else(|| taxonomy.bucket_for(&self.category))
    }
}

/// A transaction before the store assigns it an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub bucket: Option<Bucket>,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewTransaction {
    pub fn new(amount: f64, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            amount,
            category: category.into(),
            bucket: None,
            date,
            note: None,
        }
    }

    pub fn with_bucket(mut self, bucket: Bucket) -> Self {
        self.bucket = Some(bucket);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Amounts are positive decimals
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Transaction amount must be positive, got {}",
                self.amount
            )));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidData("Transaction category is empty".into()));
        }
        Ok(())
    }

    pub fn into_transaction(self, id: i64) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            category: self.category,
            bucket: self.bucket,
            date: self.date,
            note: self.note,
        }
    }
}

/// What a panel, insight set or health entry is about
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Scope {
    Bucket(Bucket),
    Category(String),
}

impl Scope {
    /// Stable cache/display key, e.g. "bucket:needs"
    pub fn key(&self) -> String {
        match self {
            Self::Bucket(b) => format!("bucket:{}", b),
            Self::Category(id) => format!("category:{}", id),
        }
    }

    pub fn is_bucket(&self) -> bool {
        matches!(self, Self::Bucket(_))
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bucket(b) => write!(f, "{}", b),
            Self::Category(id) => write!(f, "{}", id),
        }
    }
}
