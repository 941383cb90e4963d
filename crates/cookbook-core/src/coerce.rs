//! Lenient coercion of loosely-typed scraped values.
//!
//! The wiki scraper emits numbers as numbers, as numeric strings, as strings
//! with comparison glyphs (`"≥600"`) or as placeholders (`"Unknown"`). These
//! helpers turn any of those into a typed value without ever failing.

use serde_json::Value;

/// Returns whether a value is "truthy" in the scraper's sense.
///
/// `null`, `false`, `0`, `NaN` and the empty string are falsy; everything
/// else, including empty arrays and objects, is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Renders a value as text, mapping falsy values to the empty string.
#[must_use]
pub fn text(value: &Value) -> String {
    if is_truthy(value) {
        display(value)
    } else {
        String::new()
    }
}

/// Renders a value as text; `null` becomes the empty string.
///
/// Numbers are rendered without a trailing `.0` when integral.
#[must_use]
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                format_number(n.as_f64().unwrap_or(f64::NAN))
            }
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Formats a number the way the wiki frontend prints it (`5`, `2.5`).
#[must_use]
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Avoid "-0"
        return "0".to_string();
    }
    format!("{n}")
}

/// Converts a value to a number; `NaN` when it has no numeric reading.
///
/// Strings are trimmed; the empty string reads as `0`.
#[must_use]
pub fn number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return 0.0;
            }
            // Rust accepts "inf"/"nan" spellings that are not numbers here
            if trimmed
                .chars()
                .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
            {
                return f64::NAN;
            }
            trimmed.parse().unwrap_or(f64::NAN)
        },
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Returns the numeric reading of a value when it is finite and non-zero.
#[must_use]
pub fn truthy_number(value: &Value) -> Option<f64> {
    let n = number(value);
    (n.is_finite() && n != 0.0).then_some(n)
}

/// Returns the numeric reading of a truthy value, if finite.
///
/// Unlike [`truthy_number`], a truthy string such as `"0"` yields `Some(0.0)`.
#[must_use]
pub fn number_if_truthy(value: &Value) -> Option<f64> {
    if !is_truthy(value) {
        return None;
    }
    let n = number(value);
    n.is_finite().then_some(n)
}

/// Keeps only ASCII digits and dots.
#[must_use]
pub fn strip_to_numeric(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Parses the longest decimal prefix of a string (`"1.5.2"` reads as `1.5`).
///
/// Leading whitespace and a sign are accepted. Returns `None` when no digit
/// is found.
#[must_use]
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut digits = 0;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if digits == 0 {
        return None;
    }
    s[..end].trim_end_matches('.').parse().ok()
}

/// Parses the leading integer of a string (`"3x"` reads as `3`).
#[must_use]
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let start_digits = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == start_digits {
        return None;
    }
    s[..end].parse().ok()
}

/// Strips glyphs and units, then parses; anything unparsable reads as `0`.
///
/// `"12 sec"` → `12`, `"≥600"` → `600`, `""` → `0`, `"Unknown"` → `0`.
#[must_use]
pub fn parse_numeric(value: &Value) -> f64 {
    parse_float_prefix(&strip_to_numeric(&text(value))).unwrap_or(0.0)
}

/// Reads a duration: numbers as-is, strings through [`parse_numeric`].
///
/// Any other shape reads as `0`.
#[must_use]
pub fn duration_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Value::String(_) => parse_numeric(value),
        _ => 0.0,
    }
}

/// Reads an ingredient quantity; the result is always at least 1.
#[must_use]
pub fn parse_quantity(value: &Value) -> u32 {
    let raw = match value {
        Value::String(s) => parse_int_prefix(s).map_or(0.0, |i| i as f64),
        other => truthy_number(other).unwrap_or(0.0),
    };
    clamp_count(raw)
}

/// Truncates a count to an integer in `1..=u32::MAX`.
#[must_use]
pub fn clamp_count(raw: f64) -> u32 {
    if raw.is_nan() || raw < 1.0 {
        1
    } else if raw >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        raw.trunc() as u32
    }
}

/// Returns the value when it is an image URL worth using verbatim.
///
/// Non-strings, blank strings and the literal `"undefined"` are rejected.
#[must_use]
pub fn usable_url(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.trim().is_empty() && s != "undefined" => Some(s),
        _ => None,
    }
}

/// Collects the string elements of an array value.
#[must_use]
pub fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn test_text_rendering() {
        assert_eq!(text(&json!("Flour")), "Flour");
        assert_eq!(text(&json!(5)), "5");
        assert_eq!(text(&json!(2.5)), "2.5");
        assert_eq!(text(&json!(0)), "");
        assert_eq!(text(&json!(null)), "");
        assert_eq!(text(&json!(true)), "true");
    }

    #[test]
    fn test_number_reading() {
        assert_eq!(number(&json!("  42 ")), 42.0);
        assert_eq!(number(&json!("")), 0.0);
        assert!(number(&json!("12abc")).is_nan());
        assert!(number(&json!("inf")).is_nan());
        assert_eq!(number(&json!("1e2")), 100.0);
        assert_eq!(truthy_number(&json!("0")), None);
        assert_eq!(number_if_truthy(&json!("0")), Some(0.0));
        assert_eq!(truthy_number(&json!(15)), Some(15.0));
    }

    #[test]
    fn test_parse_numeric_glyphs() {
        assert_eq!(parse_numeric(&json!("≥600")), 600.0);
        assert_eq!(parse_numeric(&json!("12 seconds")), 12.0);
        assert_eq!(parse_numeric(&json!("1.5.2")), 1.5);
        assert_eq!(parse_numeric(&json!("Unknown")), 0.0);
        assert_eq!(parse_numeric(&json!(".")), 0.0);
        assert_eq!(parse_numeric(&json!(null)), 0.0);
        assert_eq!(parse_numeric(&json!(30)), 30.0);
    }

    #[test]
    fn test_parse_prefixes() {
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("-2.5x"), Some(-2.5));
        assert_eq!(parse_float_prefix("x"), None);
        assert_eq!(parse_int_prefix(" 3x"), Some(3));
        assert_eq!(parse_int_prefix("2.9"), Some(2));
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn test_parse_quantity_defaults() {
        assert_eq!(parse_quantity(&json!("3")), 3);
        assert_eq!(parse_quantity(&json!("abc")), 1);
        assert_eq!(parse_quantity(&json!("0")), 1);
        assert_eq!(parse_quantity(&json!(4)), 4);
        assert_eq!(parse_quantity(&json!(2.7)), 2);
        assert_eq!(parse_quantity(&json!(null)), 1);
        assert_eq!(parse_quantity(&json!(-5)), 1);
    }

    #[test]
    fn test_duration_value_shapes() {
        assert_eq!(duration_value(&json!(20)), 20.0);
        assert_eq!(duration_value(&json!("20s")), 20.0);
        assert_eq!(duration_value(&json!({"s": 1})), 0.0);
    }

    #[test]
    fn test_usable_url() {
        assert_eq!(usable_url(&json!("https://x/y.png")), Some("https://x/y.png"));
        assert_eq!(usable_url(&json!("undefined")), None);
        assert_eq!(usable_url(&json!("   ")), None);
        assert_eq!(usable_url(&json!(7)), None);
    }

    #[test]
    fn test_string_list() {
        assert_eq!(
            string_list(&json!(["Trader", 3, "Cook"])),
            Some(vec!["Trader".to_string(), "Cook".to_string()])
        );
        assert_eq!(string_list(&json!("Trader")), None);
    }
}
