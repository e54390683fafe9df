//! Spend pace and timeline projection
//!
//! `SpendPace` turns a panel into burn rate, days-to-zero and a projected
//! run-out date. `Timeline` positions "today" and the run-out date along the
//! period as percentages for the spending-timeline bar.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::format::{clamp_ratio, safe_ratio};
use crate::insights::ScoreHint;
use crate::panel::BucketPanel;
use crate::period::Period;

/// Pace figures for one scope at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendPace {
    /// Days counted as elapsed, including today
    pub days_elapsed: i64,
    /// Days left after today
    pub days_left: i64,
    /// Average spend per elapsed day
    pub burn: f64,
    /// Days until the allocation is exhausted at the current burn;
    /// 0 once overspent, `None` when nothing is being spent
    pub days_to_zero: Option<f64>,
    /// Spent ratio divided by elapsed ratio (1.0 = exactly on pace)
    pub pace: Option<f64>,
    /// Affordable spend per remaining day relative to the planned daily spend
    pub remaining_per_day_ratio: Option<f64>,
    /// Projected day the allocation runs out, if that happens by period end
    pub run_out_date: Option<NaiveDate>,
}

impl SpendPace {
    pub fn compute(panel: &BucketPanel, period: &Period, today: NaiveDate) -> Self {
        let total_days = period.days();
        // Today counts as elapsed so same-day spending has a day to spread over
        let days_elapsed = (period.days_elapsed(today) + 1).clamp(1, total_days);
        let days_left = total_days - days_elapsed;

        let burn = panel.spent / days_elapsed as f64;

        let days_to_zero = if panel.remaining <= 0.0 {
            Some(0.0)
        } else if burn > 0.0 {
            Some(panel.remaining / burn)
        } else {
            None
        };

        let elapsed_ratio = days_elapsed as f64 / total_days as f64;
        let pace = safe_ratio(panel.spent, panel.alloc).and_then(|r| safe_ratio(r, elapsed_ratio));

        let planned_per_day = panel.alloc / total_days as f64;
        let remaining_per_day_ratio = if days_left > 0 {
            safe_ratio(panel.remaining / days_left as f64, planned_per_day)
        } else {
            None
        };

        // Projections beyond the window are dropped before any date math
        let run_out_date = days_to_zero
            .filter(|days| days.is_finite() && *days <= total_days as f64)
            .and_then(|days| today.checked_add_signed(Duration::days(days.floor() as i64)))
            .filter(|date| *date <= period.end);

        Self {
            days_elapsed,
            days_left,
            burn,
            days_to_zero,
            pace,
            remaining_per_day_ratio,
            run_out_date,
        }
    }

    /// Ranking hint for insights about this scope
    pub fn score_hint(&self) -> ScoreHint {
        ScoreHint {
            days_to_zero: self.days_to_zero,
            burn: Some(self.burn),
            pace: self.pace,
            remaining_per_day_ratio: self.remaining_per_day_ratio,
        }
    }

    /// True when the allocation is projected to run out before the period's
    /// last day
    pub fn runs_out_early(&self, period: &Period) -> bool {
        self.run_out_date.is_some_and(|d| d < period.last_day())
    }
}

/// How the run-out projection is drawn on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunoutMarker {
    /// No projection
    None,
    /// Runs out on the period's last day; drawn as a badge
    AtPeriodEnd,
    /// Positioned marker at `pct` percent along the bar
    Marker { pct: f64 },
}

/// Spending-timeline positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub elapsed_pct: f64,
    pub runout_pct: Option<f64>,
    pub marker: RunoutMarker,
}

impl Timeline {
    pub fn compute(period: &Period, now: NaiveDate, run_out_date: Option<NaiveDate>) -> Self {
        let elapsed_pct = position_pct(period, now);
        let runout_pct = run_out_date.map(|d| position_pct(period, d));

        // Date-only comparison against the last day inside the window
        let marker = match (run_out_date, runout_pct) {
            (Some(d), _) if d >= period.last_day() => RunoutMarker::AtPeriodEnd,
            (Some(_), Some(pct)) => RunoutMarker::Marker { pct },
            _ => RunoutMarker::None,
        };

        Self {
            elapsed_pct,
            runout_pct,
            marker,
        }
    }
}

/// Percentage of the way through the period `date` falls, clamped to [0, 100]
pub fn position_pct(period: &Period, date: NaiveDate) -> f64 {
    let span = period.days() as f64;
    let offset = (date - period.start).num_days() as f64;
    clamp_ratio(offset / span) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn october() -> Period {
        Period::from_month_key("2025-10", 1).unwrap()
    }

    #[test]
    fn test_timeline_scenario() {
        let timeline = Timeline::compute(
            &october(),
            date(2025, 10, 15),
            Some(date(2025, 10, 31)),
        );
        assert!((timeline.elapsed_pct - 45.16).abs() < 0.01);
        let runout = timeline.runout_pct.unwrap();
        assert!((runout - 96.77).abs() < 0.01);
        assert_eq!(timeline.marker, RunoutMarker::AtPeriodEnd);
    }

    #[test]
    fn test_runout_on_exclusive_end_is_badge() {
        let timeline = Timeline::compute(
            &october(),
            date(2025, 10, 15),
            Some(date(2025, 11, 1)),
        );
        assert_eq!(timeline.marker, RunoutMarker::AtPeriodEnd);
        assert_eq!(timeline.runout_pct, Some(100.0));
    }

    #[test]
    fn test_runout_before_last_day_is_marker() {
        let timeline = Timeline::compute(
            &october(),
            date(2025, 10, 15),
            Some(date(2025, 10, 30)),
        );
        match timeline.marker {
            RunoutMarker::Marker { pct } => assert!((pct - 93.55).abs() < 0.01),
            other => panic!("expected positioned marker, got {:?}", other),
        }
    }

    #[test]
    fn test_no_projection() {
        let timeline = Timeline::compute(&october(), date(2025, 10, 15), None);
        assert_eq!(timeline.runout_pct, None);
        assert_eq!(timeline.marker, RunoutMarker::None);
    }

    #[test]
    fn test_elapsed_pct_clamps() {
        let period = october();
        assert_eq!(position_pct(&period, date(2025, 9, 1)), 0.0);
        assert_eq!(position_pct(&period, date(2025, 12, 1)), 100.0);
    }

    #[test]
    fn test_pace_on_track() {
        // 31-day period, 10 days elapsed (Oct 1-10), 100 of 310 spent
        let panel = BucketPanel::from_totals(310.0, 100.0);
        let pace = SpendPace::compute(&panel, &october(), date(2025, 10, 10));

        assert_eq!(pace.days_elapsed, 10);
        assert_eq!(pace.days_left, 21);
        assert!((pace.burn - 10.0).abs() < 1e-9);
        assert!((pace.days_to_zero.unwrap() - 21.0).abs() < 1e-9);
        assert!((pace.pace.unwrap() - 1.0).abs() < 1e-9);
        assert!((pace.remaining_per_day_ratio.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(pace.run_out_date, Some(date(2025, 10, 31)));
        assert!(!pace.runs_out_early(&october()));
    }

    #[test]
    fn test_pace_overspent() {
        let panel = BucketPanel::from_totals(500.0, 600.0);
        let pace = SpendPace::compute(&panel, &october(), date(2025, 10, 15));
        assert_eq!(pace.days_to_zero, Some(0.0));
        assert_eq!(pace.run_out_date, Some(date(2025, 10, 15)));
        assert!(pace.remaining_per_day_ratio.unwrap() < 0.0);
    }

    #[test]
    fn test_pace_no_spending() {
        let panel = BucketPanel::from_totals(300.0, 0.0);
        let pace = SpendPace::compute(&panel, &october(), date(2025, 10, 15));
        assert_eq!(pace.burn, 0.0);
        assert_eq!(pace.days_to_zero, None);
        assert_eq!(pace.run_out_date, None);
        assert_eq!(pace.pace, Some(0.0));
    }

    #[test]
    fn test_projection_past_period_end_is_dropped() {
        let panel = BucketPanel::from_totals(1000.0, 10.0);
        let pace = SpendPace::compute(&panel, &october(), date(2025, 10, 10));
        assert!(pace.days_to_zero.unwrap() > 31.0);
        assert_eq!(pace.run_out_date, None);
        assert!(!pace.runs_out_early(&october()));
    }

    #[test]
    fn test_large_allocation_tiny_spend() {
        let panel = BucketPanel::from_totals(50_000.0, 0.01);
        let pace = SpendPace::compute(&panel, &october(), date(2025, 10, 31));
        assert!(pace.days_to_zero.unwrap() > 1e6);
        assert_eq!(pace.run_out_date, None);

        let panel = BucketPanel::from_totals(1e6, 1e-9);
        let pace = SpendPace::compute(&panel, &october(), date(2025, 10, 1));
        assert!(pace.burn > 0.0);
        assert_eq!(pace.run_out_date, None);
        assert!(!pace.runs_out_early(&october()));

        let timeline = Timeline::compute(&october(), date(2025, 10, 1), pace.run_out_date);
        assert_eq!(timeline.marker, RunoutMarker::None);
    }

    #[test]
    fn test_runs_out_early_before_last_day() {
        // 31-day period, 10 days elapsed, 150 of 310 spent: 16 days left of budget
        let panel = BucketPanel::from_totals(310.0, 150.0);
        let pace = SpendPace::compute(&panel, &october(), date(2025, 10, 10));
        assert_eq!(pace.run_out_date, Some(date(2025, 10, 20)));
        assert!(pace.runs_out_early(&october()));
    }

    #[test]
    fn test_zero_allocation_has_no_ratios() {
        let panel = BucketPanel::from_totals(0.0, 40.0);
        let pace = SpendPace::compute(&panel, &october(), date(2025, 10, 10));
        assert_eq!(pace.pace, None);
        assert_eq!(pace.remaining_per_day_ratio, None);
        assert_eq!(pace.days_to_zero, Some(0.0));
    }

    #[test]
    fn test_score_hint_carries_pace() {
        let panel = BucketPanel::from_totals(310.0, 100.0);
        let hint = SpendPace::compute(&panel, &october(), date(2025, 10, 10)).score_hint();
        assert_eq!(hint.burn, Some(10.0));
        assert!(hint.days_to_zero.is_some());
    }
}
