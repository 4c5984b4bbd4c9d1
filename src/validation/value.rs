//! Loose readings of request values, shared by the rules and the input DTOs.

use serde_json::Value;

/// Whether a value counts as supplied. Missing, null, blank strings and empty
/// collections do not.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(_) => true,
    }
}

/// Numeric reading of a JSON number or a numeric string.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}

/// Parses a numeric string, tolerating surrounding whitespace. Rejects
/// `inf`/`NaN` spellings that `f64::from_str` would otherwise accept.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Text reading of a scalar value. Arrays, objects and null have none.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        _ => None,
    }
}

/// Text used to look a value up in storage. Integral floats such as `1.0`
/// read as the integer they hold, so they match integer keys.
pub fn as_key(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) if n.as_i64().is_none() && n.as_u64().is_none() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
                Some((f as i64).to_string())
            }
            _ => Some(n.to_string()),
        },
        other => as_text(other),
    }
}

/// Size compared by `between`: numeric value, character count or item count.
pub fn size_of(value: &Value) -> Option<f64> {
    match value {
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(map) => Some(map.len() as f64),
        other => as_number(other).or_else(|| other.as_str().map(|s| s.chars().count() as f64)),
    }
}

/// Leading-integer cast used for query parameters: `"10abc"` is 10,
/// `"abc"` is 0.
pub fn leading_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(0)
}

/// Loose "equals zero or null" test used to decide whether a parent
/// reference needs an existence check.
pub fn is_zero_or_null(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => parse_numeric(s).is_none_or(|n| n == 0.0),
        Some(_) => false,
    }
}
