//! Amount formatting for the summary panel and tables.
//!
//! Amounts are shown rounded to whole units with space-grouped thousands and
//! the currency symbol as a suffix (`1 234 €`).

const GROUPING_SEPARATOR: char = ' ';

pub fn symbol_for(code: &str) -> String {
    match code {
        "EUR" => "€".into(),
        "USD" => "$".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "CHF" => "CHF".into(),
        _ => code.into(),
    }
}

/// Formats `amount` rounded to whole units.
pub fn format_currency(amount: f64, code: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let body = group_digits(&digits, GROUPING_SEPARATOR);
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{body} {}", symbol_for(code))
}

/// Screen-reader variant: spells the sign and uses the ISO code.
pub fn format_currency_spoken(amount: f64, code: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    if rounded < 0.0 {
        format!("minus {digits} {code}")
    } else {
        format!("{digits} {code}")
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
