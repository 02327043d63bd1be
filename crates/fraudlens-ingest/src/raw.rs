//! Raw record representation shared by every ingestion path
//!
//! A raw record is an ordered key/value row as produced by parsing an
//! uploaded delimited file (header row defines keys) or by decoding an
//! API response. No shape is assumed beyond "keyed values"; downstream
//! enrichment decides what the values mean.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::IngestError;

/// One loosely-typed input row, keys in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: Vec<(String, Value)>,
}

impl RawRecord {
    /// Create an empty row
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field, keeping insertion order. A repeated key replaces
    /// the earlier value in place so order stays stable.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    /// Look up a field by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether the row carries a key at all (even if the value is null)
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build from a JSON object, preserving document key order
    pub fn from_json_object(value: &Value) -> Result<Self, IngestError> {
        let object = value.as_object().ok_or_else(|| IngestError::InvalidJson {
            message: format!("expected an object row, got {}", json_type_name(value)),
        })?;

        let mut record = RawRecord::new();
        for (key, val) in object {
            record.insert(key.clone(), val.clone());
        }
        Ok(record)
    }
}

/// Decode a JSON array of objects into raw records.
///
/// This is the shape the API fetch collaborator hands over; a non-array
/// payload (e.g. an error object) is rejected so the caller can fall
/// back to an empty record set.
pub fn decode_json_rows(payload: &Value) -> Result<Vec<RawRecord>, IngestError> {
    let rows = payload.as_array().ok_or_else(|| IngestError::InvalidJson {
        message: format!("expected an array of rows, got {}", json_type_name(payload)),
    })?;

    rows.iter().map(RawRecord::from_json_object).collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_preserves_order() {
        let mut row = RawRecord::new();
        row.insert("zeta", json!("1"));
        row.insert("alpha", json!("2"));
        row.insert("mid", json!("3"));

        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_insert_duplicate_replaces_in_place() {
        let mut row = RawRecord::new();
        row.insert("a", json!("1"));
        row.insert("b", json!("2"));
        row.insert("a", json!("3"));

        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&json!("3")));
    }

    #[test]
    fn test_decode_json_rows() {
        let payload = json!([
            {"transaction_id": "t1", "transaction_amount": 500},
            {"transaction_id": "t2", "transaction_amount": "900"}
        ]);
        let rows = decode_json_rows(&payload).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("transaction_id"), Some(&json!("t1")));
        assert_eq!(rows[1].get("transaction_amount"), Some(&json!("900")));
    }

    #[test]
    fn test_decode_json_rejects_non_array() {
        let payload = json!({"error": "unauthorized"});
        assert!(decode_json_rows(&payload).is_err());
    }

    #[test]
    fn test_decode_json_rejects_scalar_row() {
        let payload = json!([42]);
        assert!(decode_json_rows(&payload).is_err());
    }
}
