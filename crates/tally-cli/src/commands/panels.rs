//! Panel command implementation

use anyhow::Result;
use tally_core::format::{format_currency, format_percent};
use tally_core::memo::ScopeView;
use tally_core::{Scope, TallyConfig};

use super::{compute_dashboard, print_json, progress_bar, truncate};
use crate::cli::SnapshotArgs;

pub fn cmd_panels(config: &TallyConfig, args: &SnapshotArgs) -> Result<()> {
    let dashboard = compute_dashboard(config, args)?;

    if args.json {
        return print_json(serde_json::json!({
            "period": dashboard.period,
            "today": dashboard.today,
            "total": dashboard.total,
            "buckets": dashboard.buckets,
            "categories": dashboard.categories,
        }));
    }

    let money = |v: f64| format_currency(v, &config.currency);

    println!();
    println!("📊 Budget Panels");
    println!(
        "   Period: {} to {} (as of {})",
        dashboard.period.start,
        dashboard.period.end.pred_opt().unwrap_or(dashboard.period.end),
        dashboard.today
    );
    println!("   ─────────────────────────────────────────────────────────────────────────");
    println!(
        "   {:18} │ {:>12} │ {:>12} │ {:>12} │ {:>6} │ {:12}",
        "Scope", "Allocated", "Spent", "Remaining", "Used", ""
    );
    println!("   ───────────────────┼──────────────┼──────────────┼──────────────┼────────┼─────────────");

    let print_row = |view: &ScopeView, indent: usize| {
        let prefix = "  ".repeat(indent);
        let panel = &view.panel;
        let used = match panel.over_ratio() {
            Some(ratio) => format_percent(ratio, 0),
            None => "-".to_string(),
        };
        println!(
            "   {:18} │ {:>12} │ {:>12} │ {:>12} │ {:>6} │ {}",
            format!("{}{}", prefix, truncate(&view.label, 18 - prefix.len())),
            money(panel.alloc),
            money(panel.spent),
            money(panel.remaining),
            used,
            progress_bar(panel.progress, 10)
        );
    };

    let taxonomy = config.taxonomy();
    for bucket in &dashboard.buckets {
        print_row(bucket, 0);
        let Scope::Bucket(bucket_id) = bucket.scope else {
            continue;
        };
        for category in &dashboard.categories {
            let Scope::Category(id) = &category.scope else {
                continue;
            };
            let in_bucket = taxonomy.bucket_for(id) == Some(bucket_id);
            if in_bucket && (category.panel.alloc > 0.0 || category.panel.spent > 0.0) {
                print_row(category, 1);
            }
        }
    }

    println!("   ───────────────────┼──────────────┼──────────────┼──────────────┼────────┼─────────────");
    let total = &dashboard.total;
    println!(
        "   {:18} │ {:>12} │ {:>12} │ {:>12} │ {:>6} │ {}",
        "Total",
        money(total.alloc),
        money(total.spent),
        money(total.remaining),
        total
            .over_ratio()
            .map(|r| format_percent(r, 0))
            .unwrap_or_else(|| "-".to_string()),
        progress_bar(total.progress, 10)
    );

    Ok(())
}
