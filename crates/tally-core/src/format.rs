//! Formatting and numeric helpers shared by panels and the CLI

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How currency amounts are rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
    pub decimals: u8,
    /// Render the symbol after the amount ("12,00 €")
    pub symbol_after: bool,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            decimals: 2,
            symbol_after: false,
        }
    }
}

/// Clamp `value` into `[min, max]`; NaN maps to `min`
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.max(min).min(max)
    }
}

/// Clamp a ratio into `[0, 1]`
pub fn clamp_ratio(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// `numerator / denominator`, or `None` when the denominator is not positive
pub fn safe_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 && denominator.is_finite() && numerator.is_finite() {
        Some(numerator / denominator)
    } else {
        None
    }
}

/// Format a currency amount, e.g. `-1,234.50` -> `-$1,234.50`
pub fn format_currency(amount: f64, fmt: &CurrencyFormat) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.*}", fmt.decimals as usize, amount.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut number = group_thousands(int_part, &fmt.thousands_separator);
    if let Some(frac) = frac_part {
        number.push_str(&fmt.decimal_separator);
        number.push_str(frac);
    }

    // "-0.00" reads as a bug
    let negative = amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    let sign = if negative { "-" } else { "" };

    if fmt.symbol_after {
        format!("{}{} {}", sign, number, fmt.symbol)
    } else {
        format!("{}{}{}", sign, fmt.symbol, number)
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

/// Format a ratio as a percentage, e.g. `0.452` -> `45.2%`
pub fn format_percent(ratio: f64, digits: usize) -> String {
    let ratio = if ratio.is_finite() { ratio } else { 0.0 };
    format!("{:.*}%", digits, ratio * 100.0)
}

/// Short display date, e.g. "Oct 15"
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Month key for a date, e.g. "2025-10"
pub fn format_month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
