//! Budget panel selector
//!
//! Derives allocated / spent / remaining / progress for each bucket and each
//! taxonomy category from a budget document and the transaction list.
//! Only transactions dated inside the document's period are counted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format::{clamp_ratio, safe_ratio};
use crate::models::{Bucket, BudgetDocument, Category, Scope, Taxonomy, Transaction};
use crate::period::Period;

/// Derived numeric summary for one bucket or category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketPanel {
    pub alloc: f64,
    pub spent: f64,
    /// May be negative when overspent
    pub remaining: f64,
    /// `spent / alloc` clamped to [0, 1]; 0 when nothing is allocated
    pub progress: f64,
}

impl BucketPanel {
    pub fn from_totals(alloc: f64, spent: f64) -> Self {
        let progress = if alloc > 0.0 {
            clamp_ratio(spent / alloc)
        } else {
            0.0
        };
        Self {
            alloc,
            spent,
            remaining: alloc - spent,
            progress,
        }
    }

    /// Unclamped `spent / alloc`, for over-limit detection
    pub fn over_ratio(&self) -> Option<f64> {
        safe_ratio(self.spent, self.alloc)
    }

    pub fn is_overspent(&self) -> bool {
        self.remaining < 0.0
    }
}

/// Sum of in-period transaction amounts matching `filter`
fn sum_spent<'a, I, F>(period: &Period, transactions: I, mut filter: F) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
    F: FnMut(&Transaction) -> bool,
{
    transactions
        .into_iter()
        .filter(|tx| period.contains(tx.date) && filter(tx))
        .map(|tx| tx.amount)
        .sum()
}

/// Panel for one bucket
pub fn bucket_panel(
    doc: &BudgetDocument,
    period: &Period,
    transactions: &[Transaction],
    taxonomy: &Taxonomy,
    bucket: Bucket,
) -> BucketPanel {
    let spent = sum_spent(period, transactions, |tx| {
        tx.resolve_bucket(taxonomy) == Some(bucket)
    });
    BucketPanel::from_totals(doc.alloc(bucket), spent)
}

/// Panel for one taxonomy category
pub fn category_panel(
    doc: &BudgetDocument,
    period: &Period,
    transactions: &[Transaction],
    category: &Category,
) -> BucketPanel {
    let spent = sum_spent(period, transactions, |tx| {
        tx.category.eq_ignore_ascii_case(&category.id)
    });
    BucketPanel::from_totals(doc.category_alloc(category), spent)
}

/// All panels for the active period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPanels {
    pub period: Period,
    pub buckets: BTreeMap<Bucket, BucketPanel>,
    /// Keyed by category id, one entry per taxonomy category
    pub categories: BTreeMap<String, BucketPanel>,
}

impl BudgetPanels {
    /// Compute every panel.
    ///
    /// Returns `Ok(None)` when no document is loaded yet.
    pub fn compute(
        doc: Option<&BudgetDocument>,
        transactions: &[Transaction],
        taxonomy: &Taxonomy,
    ) -> Result<Option<Self>> {
        let Some(doc) = doc else {
            return Ok(None);
        };
        let period = doc.period()?;

        if !doc.percents.is_balanced() {
            tracing::warn!(
                document = doc.id.as_str(),
                total = doc.percents.total(),
                "Bucket percents do not sum to 1.0"
            );
        }

        let buckets = Bucket::all()
            .iter()
            .map(|b| (*b, bucket_panel(doc, &period, transactions, taxonomy, *b)))
            .collect();

        let categories = taxonomy
            .categories()
            .iter()
            .map(|c| (c.id.clone(), category_panel(doc, &period, transactions, c)))
            .collect();

        tracing::debug!(
            document = doc.id.as_str(),
            transactions = transactions.len(),
            "Computed budget panels"
        );

        Ok(Some(Self {
            period,
            buckets,
            categories,
        }))
    }

    /// Panel for a bucket; every bucket is always present
    pub fn bucket(&self, bucket: Bucket) -> BucketPanel {
        self.buckets.get(&bucket).copied().unwrap_or_default()
    }

    pub fn category(&self, id: &str) -> Option<BucketPanel> {
        self.categories.get(id).copied()
    }

    pub fn scope(&self, scope: &Scope) -> Option<BucketPanel> {
        match scope {
            Scope::Bucket(b) => Some(self.bucket(*b)),
            Scope::Category(id) => self.category(id),
        }
    }

    /// Sum across all three buckets
    pub fn total(&self) -> BucketPanel {
        let (alloc, spent) = self
            .buckets
            .values()
            .fold((0.0, 0.0), |(a, s), p| (a + p.alloc, s + p.spent));
        BucketPanel::from_totals(alloc, spent)
    }
}
