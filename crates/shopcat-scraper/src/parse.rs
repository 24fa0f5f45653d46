//! Defensive scalar parsing for loosely typed storefront fields.
//!
//! Nothing here fails: unparseable input becomes `None` and the caller picks
//! a default.

use serde_json::Value;

/// Parses a price that may arrive as a decimal string or a JSON number.
///
/// Strings are trimmed before parsing. Returns `None` for absent, empty,
/// non-numeric, negative, NaN and infinite values.
#[must_use]
pub fn parse_price(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };

    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

/// Renders a scalar JSON value as text. Objects, arrays and null yield `None`.
#[must_use]
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric weight of a variant, when it is one.
#[must_use]
pub(crate) fn parse_weight(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|w| w.is_finite())
}

/// Formats `"{weight}{unit}"` the way the store wrote the weight.
///
/// Zero, empty and missing weights yield `None`.
#[must_use]
pub(crate) fn format_weight(value: Option<&Value>, unit: Option<&str>) -> Option<String> {
    let text = match value? {
        Value::Number(n) if n.as_f64() == Some(0.0) => return None,
        Value::String(s) if s.is_empty() => return None,
        Value::Bool(false) => return None,
        other => scalar_text(other)?,
    };
    Some(format!("{text}{}", unit.unwrap_or("kg")))
}

/// Discount off `original`, as a percentage rounded to two decimals.
///
/// Zero unless both prices are known and `original` exceeds `current`.
#[must_use]
pub(crate) fn discount_percentage(current: Option<f64>, original: Option<f64>) -> f64 {
    match (current, original) {
        (Some(current), Some(original)) if original > current && original > 0.0 => {
            round2((original - current) / original * 100.0)
        }
        _ => 0.0,
    }
}

/// First `max_chars` characters of `text`.
#[must_use]
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_owned(),
        None => text.to_owned(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
