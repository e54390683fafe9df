//! Timeline and period command implementations

use anyhow::{bail, Result};
use tally_core::format::{format_currency, format_short_date};
use tally_core::memo::ScopeView;
use tally_core::{Period, RunoutMarker, TallyConfig};

use super::{compute_dashboard, parse_date, print_json, resolve_scope};
use crate::cli::SnapshotArgs;

const BAR_WIDTH: usize = 31;

/// Render the period as a bar: `━` elapsed, `│` today, `✕` run-out
fn timeline_bar(view: &ScopeView) -> String {
    let slot = |pct: f64| ((pct / 100.0) * (BAR_WIDTH - 1) as f64).round() as usize;
    let today = slot(view.timeline.elapsed_pct);
    let runout = match view.timeline.marker {
        RunoutMarker::Marker { pct } => Some(slot(pct)),
        _ => None,
    };

    (0..BAR_WIDTH)
        .map(|i| {
            if Some(i) == runout {
                '✕'
            } else if i == today {
                '│'
            } else if i < today {
                '━'
            } else {
                '─'
            }
        })
        .collect()
}

fn print_timeline(view: &ScopeView, config: &TallyConfig) {
    let pace = &view.pace;
    println!("   {:10} {}", view.label, timeline_bar(view));

    let runout = match view.timeline.marker {
        RunoutMarker::AtPeriodEnd => "runs out at period end".to_string(),
        RunoutMarker::Marker { .. } => match pace.run_out_date {
            Some(d) => format!("runs out {}", format_short_date(d)),
            None => "runs out early".to_string(),
        },
        RunoutMarker::None => "lasts the period".to_string(),
    };
    println!(
        "   {:10} {:.1}% elapsed, {}/day, {}",
        "",
        view.timeline.elapsed_pct,
        format_currency(pace.burn, &config.currency),
        runout
    );
}

pub fn cmd_timeline(config: &TallyConfig, args: &SnapshotArgs, scope: Option<&str>) -> Result<()> {
    let dashboard = compute_dashboard(config, args)?;

    let views: Vec<&ScopeView> = match scope {
        Some(raw) => {
            let scope = resolve_scope(raw, config)?;
            match dashboard.view(&scope) {
                Some(view) => vec![view],
                None => bail!("No data for scope {}", scope),
            }
        }
        None => dashboard.buckets.iter().collect(),
    };

    if args.json {
        let items: Vec<_> = views
            .iter()
            .map(|v| {
                serde_json::json!({
                    "scope": v.scope,
                    "timeline": v.timeline,
                    "pace": v.pace,
                })
            })
            .collect();
        return print_json(serde_json::Value::Array(items));
    }

    println!();
    println!(
        "📅 Spending timeline: {} to {}",
        format_short_date(dashboard.period.start),
        format_short_date(dashboard.period.end)
    );
    println!();
    for view in views {
        print_timeline(view, config);
    }

    Ok(())
}

pub fn cmd_period(config: &TallyConfig, date: Option<&str>, start_day: Option<u32>) -> Result<()> {
    let today = parse_date(date)?;
    let start_day = start_day.unwrap_or(config.start_day);
    let period = Period::containing(today, start_day)?;

    println!();
    println!("📅 Budget period {}", period.month_key());
    println!("   Start:      {}", period.start);
    println!("   End:        {} (exclusive)", period.end);
    println!("   Days:       {}", period.days());
    println!("   Elapsed:    {}", period.days_elapsed(today));
    println!("   Remaining:  {}", period.days_remaining(today));

    Ok(())
}
