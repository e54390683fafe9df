//! Health summary selector
//!
//! Partitions scopes into healthy and needing attention by the tone of each
//! scope's headline insight. A scope with no insights counts as healthy, so
//! every evaluated scope lands in exactly one side.

use serde::{Deserialize, Serialize};

use crate::insights::{compare_insights, Insight, RankedInsights, Tone};
use crate::models::Scope;

/// One attention entry for the detail panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDetail {
    pub scope: Scope,
    pub tone: Tone,
    pub insight: Insight,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub healthy_count: usize,
    pub attention_count: usize,
    /// Headline insight of each attention scope, most urgent first
    pub details: Vec<HealthDetail>,
}

impl HealthSummary {
    pub fn from_scopes<'a, I>(scopes: I) -> Self
    where
        I: IntoIterator<Item = (&'a Scope, &'a RankedInsights)>,
    {
        let mut summary = Self::default();

        for (scope, ranked) in scopes {
            match ranked.headline() {
                Some(top) if top.tone.needs_attention() => {
                    summary.attention_count += 1;
                    summary.details.push(HealthDetail {
                        scope: scope.clone(),
                        tone: top.tone,
                        insight: top.clone(),
                    });
                }
                _ => summary.healthy_count += 1,
            }
        }

        summary
            .details
            .sort_by(|a, b| compare_insights(&a.insight, &b.insight));
        summary
    }

    /// Number of scopes evaluated
    pub fn total(&self) -> usize {
        self.healthy_count + self.attention_count
    }

    pub fn all_healthy(&self) -> bool {
        self.attention_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::{rank_insights, ScoreHint};
    use crate::models::Bucket;

    fn ranked(items: Vec<Insight>) -> RankedInsights {
        rank_insights(items)
    }

    fn insight(id: &str, tone: Tone) -> Insight {
        Insight::new(id, tone, format!("insight.{}", id))
    }

    #[test]
    fn test_partition_is_total() {
        let needs = Scope::Bucket(Bucket::Needs);
        let wants = Scope::Bucket(Bucket::Wants);
        let savings = Scope::Bucket(Bucket::Savings);

        let needs_insights = ranked(vec![
            insight("on_track", Tone::Success),
            insight("overspent", Tone::Danger),
        ]);
        let wants_insights = ranked(vec![insight("on_track", Tone::Success)]);
        let savings_insights = ranked(vec![]);

        let summary = HealthSummary::from_scopes(vec![
            (&needs, &needs_insights),
            (&wants, &wants_insights),
            (&savings, &savings_insights),
        ]);

        assert_eq!(summary.attention_count, 1);
        assert_eq!(summary.healthy_count, 2);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.details.len(), 1);
        assert_eq!(summary.details[0].scope, needs);
        assert_eq!(summary.details[0].tone, Tone::Danger);
        assert_eq!(summary.details[0].insight.id, "overspent");
    }

    #[test]
    fn test_info_headline_is_healthy() {
        let scope = Scope::Category("dining".into());
        let insights = ranked(vec![insight("no_allocation", Tone::Info)]);
        let summary = HealthSummary::from_scopes(vec![(&scope, &insights)]);
        assert!(summary.all_healthy());
        assert!(summary.details.is_empty());
    }

    #[test]
    fn test_details_in_ranked_order() {
        let wants = Scope::Bucket(Bucket::Wants);
        let needs = Scope::Bucket(Bucket::Needs);
        let dining = Scope::Category("dining".into());

        let wants_insights = ranked(vec![insight("near_limit", Tone::Warn)]);
        let needs_insights = ranked(vec![insight("overspent", Tone::Danger)]);
        let dining_insights = ranked(vec![insight("runs_out_early", Tone::Warn)
            .with_score_hint(ScoreHint {
                days_to_zero: Some(2.0),
                ..Default::default()
            })]);

        let summary = HealthSummary::from_scopes(vec![
            (&wants, &wants_insights),
            (&needs, &needs_insights),
            (&dining, &dining_insights),
        ]);

        let order: Vec<&Scope> = summary.details.iter().map(|d| &d.scope).collect();
        assert_eq!(order, vec![&needs, &dining, &wants]);
        assert_eq!(summary.attention_count, 3);
        assert_eq!(summary.healthy_count, 0);
    }

    #[test]
    fn test_empty_scope_set() {
        let summary = HealthSummary::from_scopes(Vec::<(&Scope, &RankedInsights)>::new());
        assert_eq!(summary.total(), 0);
        assert!(summary.all_healthy());
    }
}
