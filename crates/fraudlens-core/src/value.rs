//! Tagged field values and the normalization functions shared by every
//! engine component.
//!
//! Record fields arrive in mixed encodings (CSV strings, JSON numbers,
//! booleans, "Yes"/"No" flags). Each field class has exactly one
//! normalization function here so comparisons never operate on raw
//! mixed types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder rendered for a missing or null cell
pub const MISSING_PLACEHOLDER: &str = "—";

/// One loosely-typed field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Explicit null
    Null,
}

impl FieldValue {
    /// Build from a JSON value. Arrays and objects degrade to their
    /// JSON text form rather than erroring.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => n
                .as_f64()
                .map(FieldValue::Number)
                .unwrap_or(FieldValue::Null),
            Value::String(s) => FieldValue::Text(s.clone()),
            other => FieldValue::Text(other.to_string()),
        }
    }

    /// Convert back to a JSON value
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Number(n) if n.is_finite() => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Number(_) => Value::Null,
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Null => Value::Null,
        }
    }

    /// Whether the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Numeric view, if the value is or parses as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Bool(_) | FieldValue::Null => None,
        }
    }

    /// Display form used by search, sort fallback, and rendering.
    /// Null has no display form (search skips it).
    pub fn display(&self) -> Option<String> {
        match self {
            FieldValue::Number(n) => {
                // Render integral numbers without a trailing ".0" so
                // "1" round-trips through display unchanged
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Null => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.display() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "{}", MISSING_PLACEHOLDER),
        }
    }
}

// ==================== Normalization Functions ====================

/// Coerce an amount-class field to a finite non-negative number.
/// Invalid, missing, non-finite, and negative inputs all coerce to 0.
pub fn coerce_amount(value: Option<&FieldValue>) -> f64 {
    let n = value.and_then(|v| v.as_number()).unwrap_or(0.0);
    if n.is_finite() && n >= 0.0 {
        n
    } else {
        0.0
    }
}

/// Coerce a numeric field with invalid-to-zero semantics, keeping sign
pub fn coerce_number(value: Option<&FieldValue>) -> f64 {
    let n = value.and_then(|v| v.as_number()).unwrap_or(0.0);
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Normalize a binary label field (`is_fraud`, `predicted`) to {0, 1}.
/// Accepts boolean, numeric 0/1, and string "0"/"1" encodings; anything
/// else is unresolvable.
pub fn normalize_label(value: Option<&FieldValue>) -> Option<u8> {
    match value? {
        FieldValue::Bool(true) => Some(1),
        FieldValue::Bool(false) => Some(0),
        FieldValue::Number(n) if *n == 1.0 => Some(1),
        FieldValue::Number(n) if *n == 0.0 => Some(0),
        FieldValue::Text(s) => match s.trim() {
            "1" => Some(1),
            "0" => Some(0),
            _ => None,
        },
        _ => None,
    }
}

/// Normalize a tri-state flag field (`kyc_verified`): boolean, "Yes"/"No",
/// or absent.
pub fn normalize_flag(value: Option<&FieldValue>) -> Option<bool> {
    match value? {
        FieldValue::Bool(b) => Some(*b),
        FieldValue::Text(s) => match s.trim().to_lowercase().as_str() {
            "yes" => Some(true),
            "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Parse a timestamp in ISO-8601 or the known alternate formats.
/// A bare date resolves to midnight.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        assert_eq!(FieldValue::from_json(&json!(12.5)), FieldValue::Number(12.5));
        assert_eq!(
            FieldValue::from_json(&json!("abc")),
            FieldValue::Text("abc".to_string())
        );
        assert_eq!(FieldValue::from_json(&json!(true)), FieldValue::Bool(true));
        assert_eq!(FieldValue::from_json(&json!(null)), FieldValue::Null);
    }

    #[test]
    fn test_display_integral_number() {
        assert_eq!(FieldValue::Number(1.0).display().unwrap(), "1");
        assert_eq!(FieldValue::Number(12.5).display().unwrap(), "12.5");
        assert!(FieldValue::Null.display().is_none());
    }

    #[test]
    fn test_coerce_amount_invalid_to_zero() {
        assert_eq!(coerce_amount(Some(&FieldValue::Text("150000".into()))), 150_000.0);
        assert_eq!(coerce_amount(Some(&FieldValue::Text("oops".into()))), 0.0);
        assert_eq!(coerce_amount(Some(&FieldValue::Null)), 0.0);
        assert_eq!(coerce_amount(None), 0.0);
        assert_eq!(coerce_amount(Some(&FieldValue::Number(-5.0))), 0.0);
        assert_eq!(coerce_amount(Some(&FieldValue::Number(f64::NAN))), 0.0);
    }

    #[test]
    fn test_normalize_label_encodings() {
        assert_eq!(normalize_label(Some(&FieldValue::Bool(true))), Some(1));
        assert_eq!(normalize_label(Some(&FieldValue::Bool(false))), Some(0));
        assert_eq!(normalize_label(Some(&FieldValue::Number(1.0))), Some(1));
        assert_eq!(normalize_label(Some(&FieldValue::Number(0.0))), Some(0));
        assert_eq!(normalize_label(Some(&FieldValue::Text("1".into()))), Some(1));
        assert_eq!(normalize_label(Some(&FieldValue::Text("0".into()))), Some(0));
        assert_eq!(normalize_label(Some(&FieldValue::Text("maybe".into()))), None);
        assert_eq!(normalize_label(Some(&FieldValue::Number(2.0))), None);
        assert_eq!(normalize_label(None), None);
    }

    #[test]
    fn test_normalize_flag() {
        assert_eq!(normalize_flag(Some(&FieldValue::Text("Yes".into()))), Some(true));
        assert_eq!(normalize_flag(Some(&FieldValue::Text("no".into()))), Some(false));
        assert_eq!(normalize_flag(Some(&FieldValue::Bool(true))), Some(true));
        assert_eq!(normalize_flag(Some(&FieldValue::Text("unknown".into()))), None);
        assert_eq!(normalize_flag(None), None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-06-15T10:30:00Z").is_some());
        assert!(parse_timestamp("2024-06-15T10:30:00").is_some());
        assert!(parse_timestamp("2024-06-15 10:30:00").is_some());
        assert!(parse_timestamp("2024-06-15").is_some());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
