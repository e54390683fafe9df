//! Insight ranking
//!
//! Orders candidates by tone weight (highest first). Within a tone, fewer
//! days-to-zero ranks first, then higher burn. Anything still tied keeps its
//! input order: `sort_by` is stable, and the order candidates were generated
//! in is meaningful.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::types::Insight;

/// Candidates in display order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankedInsights {
    pub items: Vec<Insight>,
}

impl RankedInsights {
    /// The insight for single-item display contexts
    pub fn headline(&self) -> Option<&Insight> {
        self.items.first()
    }

    /// Everything after the headline, for the chip list
    pub fn secondary(&self) -> &[Insight] {
        self.items.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Rank a candidate set
pub fn rank_insights(mut candidates: Vec<Insight>) -> RankedInsights {
    candidates.sort_by(compare_insights);
    RankedInsights { items: candidates }
}

/// Ranking comparator: `Less` means `a` is shown before `b`
pub fn compare_insights(a: &Insight, b: &Insight) -> Ordering {
    b.tone
        .weight()
        .cmp(&a.tone.weight())
        .then_with(|| days_to_zero(a).total_cmp(&days_to_zero(b)))
        .then_with(|| burn(b).total_cmp(&burn(a)))
}

// Missing or NaN counts as "never runs out"
fn days_to_zero(insight: &Insight) -> f64 {
    insight
        .score_hint
        .and_then(|h| h.days_to_zero)
        .filter(|d| !d.is_nan())
        .unwrap_or(f64::INFINITY)
}

// Missing or NaN counts as no spending
fn burn(insight: &Insight) -> f64 {
    insight
        .score_hint
        .and_then(|h| h.burn)
        .filter(|b| !b.is_nan())
        .unwrap_or(0.0)
}
