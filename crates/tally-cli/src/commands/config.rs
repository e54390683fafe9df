//! Config command implementation

use anyhow::Result;
use tally_core::{Bucket, ConfigSource, TallyConfig};

use super::print_json;

pub fn cmd_config(config: &TallyConfig, source: &ConfigSource, json: bool) -> Result<()> {
    if json {
        return print_json(serde_json::to_value(config)?);
    }

    let currency = &config.currency;
    let thresholds = &config.insights;

    println!();
    println!("⚙️  Configuration ({})", source);
    println!();
    println!(
        "   Currency:   symbol '{}' {}, thousands '{}', decimal '{}', {} decimals",
        currency.symbol,
        if currency.symbol_after { "after" } else { "before" },
        currency.thousands_separator,
        currency.decimal_separator,
        currency.decimals
    );
    println!("   Start day:  {}", config.start_day);
    println!(
        "   Insights:   near limit {:.0}%, pace tolerance {:.0}%, run-out danger {} days",
        thresholds.near_limit_ratio * 100.0,
        thresholds.pace_tolerance * 100.0,
        thresholds.runout_danger_days
    );
    println!();

    let taxonomy = config.taxonomy();
    for bucket in Bucket::all() {
        let names: Vec<&str> = taxonomy.in_bucket(*bucket).map(|c| c.id.as_str()).collect();
        println!("   {:8} {}", bucket.label(), names.join(", "));
    }

    Ok(())
}
