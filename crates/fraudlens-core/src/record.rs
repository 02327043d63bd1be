//! Core record model
//!
//! A record is an ordered mapping from column name to a tagged value.
//! No canonical transaction shape is assumed; the well-known field
//! names below are accessors over whatever columns the batch carries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::{
    coerce_amount, normalize_flag, normalize_label, FieldValue, MISSING_PLACEHOLDER,
};

// Well-known column names
pub const COL_TRANSACTION_ID: &str = "transaction_id";
pub const COL_CUSTOMER_ID: &str = "customer_id";
pub const COL_AMOUNT: &str = "transaction_amount";
pub const COL_CHANNEL: &str = "channel";
pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_KYC_VERIFIED: &str = "kyc_verified";
pub const COL_ACCOUNT_AGE_DAYS: &str = "account_age_days";
pub const COL_IS_FRAUD: &str = "is_fraud";
pub const COL_PREDICTED: &str = "predicted";
pub const COL_FAILED_LOGINS: &str = "failed_login_attempts";
pub const COL_HOUR: &str = "hour";
pub const COL_WEEKDAY: &str = "weekday";
pub const COL_HIGH_VALUE: &str = "is_high_value";

/// One transaction record, fields in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field, keeping insertion order. A repeated key replaces
    /// the earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    /// Look up a field by column name
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether the record carries a column at all
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Column names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Display form of a cell; missing and null cells render as an
    /// explicit placeholder, never error.
    pub fn display(&self, key: &str) -> String {
        self.get(key)
            .and_then(|v| v.display())
            .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string())
    }

    // ==================== Well-Known Field Accessors ====================

    /// Display key for the record (transaction id)
    pub fn transaction_id(&self) -> String {
        self.display(COL_TRANSACTION_ID)
    }

    /// Transaction amount, coerced to a finite non-negative number
    pub fn amount(&self) -> f64 {
        coerce_amount(self.get(COL_AMOUNT))
    }

    /// Ground-truth label normalized to {0, 1}, if resolvable
    pub fn actual_label(&self) -> Option<u8> {
        normalize_label(self.get(COL_IS_FRAUD))
    }

    /// Classifier output label normalized to {0, 1}, if resolvable
    pub fn predicted_label(&self) -> Option<u8> {
        normalize_label(self.get(COL_PREDICTED))
    }

    /// KYC verification flag, if resolvable
    pub fn kyc_verified(&self) -> Option<bool> {
        normalize_flag(self.get(COL_KYC_VERIFIED))
    }

    /// Raw timestamp text, if present and non-null
    pub fn timestamp_text(&self) -> Option<String> {
        self.get(COL_TIMESTAMP).and_then(|v| v.display())
    }

    // ==================== Conversions ====================

    /// Serialize to a JSON object, preserving column order
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.to_json());
        }
        Value::Object(map)
    }

    /// Canonical text form of the row, used for synthetic id hashing
    pub fn content_key(&self) -> String {
        let mut content = String::new();
        for (key, value) in &self.fields {
            content.push_str(key);
            content.push('=');
            content.push_str(&value.to_string());
            content.push(';');
        }
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        let mut r = Record::new();
        r.insert(COL_TRANSACTION_ID, FieldValue::Text("t1".into()));
        r.insert(COL_AMOUNT, FieldValue::Text("150000".into()));
        r.insert(COL_IS_FRAUD, FieldValue::Text("1".into()));
        r.insert("note", FieldValue::Null);
        r
    }

    #[test]
    fn test_ordered_keys() {
        let r = sample();
        let keys: Vec<&str> = r.keys().collect();
        assert_eq!(keys, vec![COL_TRANSACTION_ID, COL_AMOUNT, COL_IS_FRAUD, "note"]);
    }

    #[test]
    fn test_display_placeholder() {
        let r = sample();
        assert_eq!(r.display("missing_column"), MISSING_PLACEHOLDER);
        assert_eq!(r.display("note"), MISSING_PLACEHOLDER);
        assert_eq!(r.display(COL_AMOUNT), "150000");
    }

    #[test]
    fn test_accessors() {
        let r = sample();
        assert_eq!(r.amount(), 150_000.0);
        assert_eq!(r.actual_label(), Some(1));
        assert_eq!(r.predicted_label(), None);
        assert_eq!(r.transaction_id(), "t1");
    }

    #[test]
    fn test_to_json_preserves_order() {
        let r = sample();
        let json = r.to_json();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys[0], COL_TRANSACTION_ID);
        assert_eq!(keys[1], COL_AMOUNT);
    }

    #[test]
    fn test_content_key_stable() {
        assert_eq!(sample().content_key(), sample().content_key());
    }
}
