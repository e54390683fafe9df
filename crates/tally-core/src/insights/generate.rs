//! Insight candidate generation
//!
//! Builds the unranked candidate set for one scope from its panel and pace.
//! Every candidate carries the scope's pace as its score hint so ranking can
//! break ties between scopes and within a scope.

use chrono::NaiveDate;

use crate::config::InsightThresholds;
use crate::models::Scope;
use crate::pace::SpendPace;
use crate::panel::BucketPanel;
use crate::period::Period;

use super::types::{Insight, InsightTarget, InsightVar, Tone};

/// Everything the generator needs to know about one scope
#[derive(Debug, Clone, Copy)]
pub struct ScopeInputs<'a> {
    pub scope: &'a Scope,
    pub panel: &'a BucketPanel,
    pub pace: &'a SpendPace,
    pub period: &'a Period,
    pub today: NaiveDate,
}

impl ScopeInputs<'_> {
    fn target(&self) -> InsightTarget {
        match self.scope {
            Scope::Bucket(bucket) => InsightTarget::Bucket { bucket: *bucket },
            Scope::Category(id) => InsightTarget::Category {
                category: id.clone(),
            },
        }
    }

    fn insight(&self, kind: &str, tone: Tone) -> Insight {
        Insight::new(
            format!("{}:{}", self.scope.key(), kind),
            tone,
            format!("insight.{}", kind),
        )
        .with_title(format!("insight.{}.title", kind))
        .with_chip(format!("chip.{}", kind))
        .with_group(self.scope.key())
        .with_var("scope", InsightVar::Text(self.scope.to_string()))
        .with_score_hint(self.pace.score_hint())
    }
}

/// Candidate insights for one scope, in generation order
pub fn generate_candidates(inputs: &ScopeInputs<'_>, thresholds: &InsightThresholds) -> Vec<Insight> {
    let panel = inputs.panel;
    let pace = inputs.pace;
    let mut candidates = Vec::new();

    if panel.alloc <= 0.0 {
        if panel.spent > 0.0 {
            candidates.push(
                inputs
                    .insight("no_allocation", Tone::Info)
                    .with_var("spent", InsightVar::Amount(panel.spent))
                    .with_cta("cta.set_allocation", InsightTarget::Allocations),
            );
        } else {
            candidates.push(inputs.insight("not_budgeted", Tone::Muted));
        }
        return candidates;
    }

    if panel.is_overspent() {
        let mut overspent = inputs
            .insight("overspent", Tone::Danger)
            .with_var("amount", InsightVar::Amount(-panel.remaining))
            .with_cta("cta.review", inputs.target());
        if let Some(ratio) = panel.over_ratio() {
            overspent = overspent.with_var("ratio", InsightVar::Percent(ratio));
        }
        candidates.push(overspent);
    } else {
        if let Some(run_out) = pace.run_out_date {
            let days_short = (inputs.period.end - run_out).num_days();
            // Running out on the last day of the period is still on budget
            if pace.runs_out_early(inputs.period) {
                let tone = if days_short >= thresholds.runout_danger_days {
                    Tone::Danger
                } else {
                    Tone::Warn
                };
                candidates.push(
                    inputs
                        .insight("runs_out_early", tone)
                        .with_var("date", InsightVar::Date(run_out))
                        .with_var("days", InsightVar::Days(days_short))
                        .with_subtext("insight.runs_out_early.subtext")
                        .with_cta("cta.view_timeline", InsightTarget::Timeline),
                );
            }
        }

        if panel.progress >= thresholds.near_limit_ratio {
            candidates.push(
                inputs
                    .insight("near_limit", Tone::Warn)
                    .with_var("progress", InsightVar::Percent(panel.progress))
                    .with_var("remaining", InsightVar::Amount(panel.remaining))
                    .with_cta("cta.review", inputs.target()),
            );
        }

        if let Some(ratio) = pace.pace {
            if ratio > 1.0 + thresholds.pace_tolerance {
                candidates.push(
                    inputs
                        .insight("ahead_of_pace", Tone::Warn)
                        .with_var("pace", InsightVar::Percent(ratio))
                        .with_var("burn", InsightVar::Amount(pace.burn)),
                );
            }
        }
    }

    if panel.spent <= 0.0 {
        candidates.push(
            inputs
                .insight("no_spending", Tone::Muted)
                .with_cta("cta.add_transaction", InsightTarget::AddTransaction),
        );
    } else if !candidates.iter().any(|c| c.tone.needs_attention()) {
        let mut on_track = inputs
            .insight("on_track", Tone::Success)
            .with_var("remaining", InsightVar::Amount(panel.remaining));
        if pace.days_left > 0 {
            on_track = on_track.with_var(
                "per_day",
                InsightVar::Amount(panel.remaining / pace.days_left as f64),
            );
        }
        candidates.push(on_track);
    }

    tracing::trace!(
        scope = %inputs.scope,
        today = %inputs.today,
        count = candidates.len(),
        "Generated insight candidates"
    );

    candidates
}
