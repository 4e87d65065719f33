//! Money and date formatting for page text.

use chrono::{DateTime, Utc};

/// Symbol for currencies whose sign is in Latin-1.
fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" | "CAD" | "AUD" | "NZD" | "SGD" | "HKD" | "MXN" => Some("$"),
        "GBP" => Some("£"),
        "JPY" | "CNY" => Some("¥"),
        _ => None,
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an amount with two decimals and thousands separators.
///
/// Known codes get their symbol (`$1,200.00`); others are prefixed with the
/// ISO code (`EUR 1,200.00`). Non-finite amounts format as zero.
pub fn format_currency(amount: f64, code: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let cents = (amount.abs() * 100.0).round() as u64;
    let number = format!("{}.{:02}", group_thousands(cents / 100), cents % 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    let code = code.trim().to_ascii_uppercase();
    match currency_symbol(&code) {
        Some(symbol) => format!("{}{}{}", sign, symbol, number),
        None if code.is_empty() => format!("{}{}", sign, number),
        None => format!("{}{} {}", sign, code, number),
    }
}

/// Format a date as `January 1, 2025`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Format a timestamp as `January 1, 2025 at 14:05 UTC`.
pub fn format_datetime(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y at %H:%M UTC").to_string()
}
