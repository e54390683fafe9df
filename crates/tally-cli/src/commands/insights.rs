//! Insight and health command implementations

use anyhow::{bail, Result};
use tally_core::memo::ScopeView;
use tally_core::{HealthSummary, Insight, TallyConfig, Tone};

use super::{compute_dashboard, print_json, resolve_scope};
use crate::cli::SnapshotArgs;

fn tone_icon(tone: Tone) -> &'static str {
    match tone {
        Tone::Danger => "🔴",
        Tone::Warn => "🟡",
        Tone::Info => "🔵",
        Tone::Success => "🟢",
        Tone::Muted => "⚪",
    }
}

fn print_insight(insight: &Insight, config: &TallyConfig) {
    println!(
        "     {} [{}] {}",
        tone_icon(insight.tone),
        insight.tone,
        insight.describe(&config.currency)
    );
    if let Some(target) = &insight.cta_target {
        println!("        → {}", target.route());
    }
}

fn print_view(view: &ScopeView, config: &TallyConfig, all: bool) {
    println!("   {}", view.label);
    if all {
        for insight in &view.insights.items {
            print_insight(insight, config);
        }
    } else {
        match view.insights.headline() {
            Some(insight) => print_insight(insight, config),
            None => println!("     (no insights)"),
        }
    }
}

pub fn cmd_insights(
    config: &TallyConfig,
    args: &SnapshotArgs,
    scope: Option<&str>,
    all: bool,
) -> Result<()> {
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
        let value = if all {
            serde_json::to_value(&views)?
        } else {
            let headlines: Vec<_> = views
                .iter()
                .map(|v| {
                    serde_json::json!({
                        "scope": v.scope,
                        "headline": v.insights.headline(),
                        "secondary": v.insights.secondary(),
                    })
                })
                .collect();
            serde_json::to_value(headlines)?
        };
        return print_json(value);
    }

    println!();
    println!("💡 Insights (as of {})", dashboard.today);
    println!();
    for view in views {
        print_view(view, config, all);
    }

    Ok(())
}

fn print_health(title: &str, summary: &HealthSummary, config: &TallyConfig) {
    println!(
        "   {}: {} healthy, {} need attention",
        title, summary.healthy_count, summary.attention_count
    );
    for detail in &summary.details {
        println!(
            "     {} {} - {}",
            tone_icon(detail.tone),
            detail.scope,
            detail.insight.describe(&config.currency)
        );
    }
}

pub fn cmd_health(config: &TallyConfig, args: &SnapshotArgs) -> Result<()> {
    let dashboard = compute_dashboard(config, args)?;

    if args.json {
        return print_json(serde_json::json!({
            "buckets": dashboard.bucket_health,
            "categories": dashboard.category_health,
        }));
    }

    println!();
    if dashboard.bucket_health.all_healthy() && dashboard.category_health.all_healthy() {
        println!("✅ Budget is healthy");
    } else {
        println!("⚠️  Budget needs attention");
    }
    println!();
    print_health("Buckets", &dashboard.bucket_health, config);
    print_health("Categories", &dashboard.category_health, config);

    Ok(())
}
