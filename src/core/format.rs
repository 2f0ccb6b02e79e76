//! Display formatting for amounts and dates. The engine itself never rounds;
//! rounding happens only here, at the presentation boundary.

use chrono::NaiveDate;

/// Formats an amount in rupees with Indian digit grouping, e.g. `₹12,34,567`.
///
/// Amounts are rounded to two decimals; a fractional part is printed only
/// when non-zero. Unusable values render as `₹0`.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹0".into();
    }
    let rounded = (amount * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let magnitude = rounded.abs();
    let whole = magnitude.trunc() as u64;
    let paise = ((magnitude - magnitude.trunc()) * 100.0).round() as u64;

    let mut formatted = group_indian(whole);
    if paise > 0 {
        formatted.push_str(&format!(".{:02}", paise));
    }
    if negative {
        format!("₹-{formatted}")
    } else {
        format!("₹{formatted}")
    }
}

/// Formats a date as DD/MM/YYYY.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

// Indian grouping: last three digits, then groups of two.
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut index = head.len();
    while index > 0 {
        let start = index.saturating_sub(2);
        groups.push(&head[start..index]);
        index = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
