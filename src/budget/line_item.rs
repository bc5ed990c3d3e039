use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One labeled amount in a rent-detail or charges table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub amount: f64,
}

impl LineItem {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount: sanitize_amount(amount),
        }
    }

    /// Blank row as produced by the "add row" action.
    pub fn blank() -> Self {
        Self::new("", 0.0)
    }

    /// Builds an item from a loosely-typed persisted value. Missing or
    /// non-string labels become `""`, amounts go through [`coerce_amount`].
    pub fn from_json(value: &Value) -> Self {
        let label = value
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let amount = value.get("amount").map(coerce_amount).unwrap_or(0.0);
        Self::new(label, amount)
    }
}

/// Clamps an amount to a finite, non-negative value.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Coerces an arbitrary JSON value to a monetary amount: numbers and numeric
/// strings are kept, `true` counts as 1, everything else is 0.
pub fn coerce_amount(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => parse_stored_number(text),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    sanitize_amount(raw)
}

/// Numeric reading of a stored string: surrounding whitespace is ignored, an
/// empty string is 0 and `0x`/`0o`/`0b` integers are accepted. Anything else
/// that is not a plain decimal number is 0.
fn parse_stored_number(text: &str) -> f64 {
    let trimmed = text.trim();
    let radix = match trimmed.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&trimmed[2..], radix)
            .map(|value| value as f64)
            .unwrap_or(0.0);
    }
    let decimal = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(0.0)
}

/// Coerces user-typed text to an amount. Blank or unparsable input is 0; a
/// decimal comma is accepted.
pub fn coerce_amount_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let parsed = trimmed
        .parse::<f64>()
        .or_else(|_| trimmed.replacen(',', ".", 1).parse::<f64>())
        .unwrap_or(0.0);
    sanitize_amount(parsed)
}

/// Sum of the amounts of `items`.
pub fn sum_amounts(items: &[LineItem]) -> f64 {
    items.iter().map(|item| sanitize_amount(item.amount)).sum()
}
