//! Scalar helpers shared by the resolver, the box model and the composite builder.
//!
//! Bag values are loosely typed JSON: a user may have stored `10`, `"10"` or
//! `"10px"` for the same field. These helpers give every read path one
//! consistent interpretation. Empty strings and `null` are unset; `0` and
//! `false` are values.

use serde_json::Value;

/// Whether a value counts as unset (`null`, empty or whitespace-only string).
#[must_use]
pub fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Text form of a scalar value.
///
/// Numbers are formatted without a trailing `.0`. Objects and arrays have no
/// text form.
#[must_use]
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => n.as_f64().map(format_number),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Numeric reading of a value: JSON numbers directly, strings by their
/// leading numeric prefix (`"12px"` reads as 12).
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => leading_number(s).map(|(n, _)| n),
        _ => None,
    }
}

/// Truthiness of a flag value.
///
/// Strings `"true"`, `"1"`, `"yes"` and `"on"` are true; other strings are false.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Parse the leading number of a string, returning it with the unparsed rest.
///
/// Accepts an optional sign, digits and a fractional part. At least one digit
/// is required.
#[must_use]
pub fn leading_number(input: &str) -> Option<(f64, &str)> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        let mut frac_digits = 0;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            frac_digits += 1;
        }
        if frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return None;
    }
    let number: f64 = s[..end].parse().ok()?;
    number.is_finite().then_some((number, &s[end..]))
}

/// Format a number the way CSS authors write it: `4`, `1.2`, `-0.5`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    format!("{n}")
}

/// CSS length from a stored value: bare numbers gain `px`, anything else is
/// kept verbatim (`2em`, `50%`, `auto`).
#[must_use]
pub fn css_length(value: &Value) -> Option<String> {
    let text = as_text(value)?;
    match leading_number(&text) {
        Some((n, rest)) if rest.trim().is_empty() => Some(format!("{}px", format_number(n))),
        _ => Some(text),
    }
}

/// Normalize user input for a box side.
///
/// Bare numbers gain `px`, numbers with a unit keep it, and empty or
/// unparseable input becomes `"0px"`.
#[must_use]
pub fn normalize_length(value: &Value) -> String {
    let Some(text) = as_text(value) else {
        return "0px".to_string();
    };
    let Some((n, rest)) = leading_number(&text) else {
        return "0px".to_string();
    };
    let unit = rest.trim();
    let number = format_number(n);
    if !unit.is_empty() && (unit == "%" || unit.chars().all(|c| c.is_ascii_alphabetic())) {
        format!("{number}{unit}")
    } else {
        format!("{number}px")
    }
}

/// Whether a CSS length reads as zero (`0`, `0px`, `0%`).
#[must_use]
pub fn is_zero_length(text: &str) -> bool {
    leading_number(text).is_some_and(|(n, _)| n == 0.0)
}
