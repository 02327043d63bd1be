//! Record enrichment
//!
//! Normalizes raw parsed rows into records: numeric coercion, synthetic
//! ids, the fallback prediction rule, and calendar-derived fields. The
//! enricher is a total function over the batch; a malformed row degrades
//! to defaults instead of failing.

use chrono::Timelike;
use fraudlens_config::EngineConfig;
use fraudlens_ingest::RawRecord;
use log::debug;

use crate::record::{
    Record, COL_ACCOUNT_AGE_DAYS, COL_AMOUNT, COL_FAILED_LOGINS, COL_HIGH_VALUE, COL_HOUR,
    COL_PREDICTED, COL_TRANSACTION_ID, COL_WEEKDAY,
};
use crate::value::{coerce_number, parse_timestamp, FieldValue};

// Numeric columns coerced with invalid-to-zero semantics
const NUMERIC_COLUMNS: [&str; 5] = [
    COL_AMOUNT,
    COL_ACCOUNT_AGE_DAYS,
    COL_FAILED_LOGINS,
    COL_HOUR,
    COL_WEEKDAY,
];

/// Record enricher, parameterized by the engine thresholds
#[derive(Debug, Clone)]
pub struct Enricher {
    config: EngineConfig,
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Enricher {
    /// Create an enricher with the given thresholds
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Enrich a batch of raw rows into records.
    ///
    /// The fallback prediction rule runs only when no row in the batch
    /// carries a `predicted` field, and then applies to every row.
    pub fn enrich(&self, raw_rows: &[RawRecord]) -> Vec<Record> {
        let batch_has_predictions = raw_rows.iter().any(|row| row.contains_key(COL_PREDICTED));
        if !batch_has_predictions && !raw_rows.is_empty() {
            debug!(
                "no predicted column in batch of {} rows, applying fallback rule",
                raw_rows.len()
            );
        }

        raw_rows
            .iter()
            .enumerate()
            .map(|(index, raw)| self.enrich_row(raw, index, batch_has_predictions))
            .collect()
    }

    fn enrich_row(&self, raw: &RawRecord, index: usize, batch_has_predictions: bool) -> Record {
        let mut record = Record::new();
        for (key, value) in raw.iter() {
            let field = FieldValue::from_json(value);
            if NUMERIC_COLUMNS.contains(&key) {
                record.insert(key, FieldValue::Number(coerce_number(Some(&field))));
            } else {
                record.insert(key, field);
            }
        }

        // Display key: assign a synthetic id when the row has none
        let needs_id = record
            .get(COL_TRANSACTION_ID)
            .and_then(|v| v.display())
            .map(|s| s.is_empty())
            .unwrap_or(true);
        if needs_id {
            let id = fraudlens_utils::synthetic_record_id(index, &record.content_key());
            record.insert(COL_TRANSACTION_ID, FieldValue::Text(id));
        }

        if !batch_has_predictions {
            let label = self.fallback_label(&record);
            record.insert(COL_PREDICTED, FieldValue::Number(label as f64));
        }

        self.derive_calendar_fields(&mut record);
        self.derive_high_value(&mut record);

        record
    }

    /// Deterministic fallback rule used when the batch carries no
    /// classifier output
    fn fallback_label(&self, record: &Record) -> u8 {
        let amount = record.amount();
        let failed_logins = coerce_number(record.get(COL_FAILED_LOGINS));
        if amount > self.config.fallback_amount_threshold
            || failed_logins > self.config.fallback_failed_login_threshold
        {
            1
        } else {
            0
        }
    }

    /// Derive `hour` and `weekday` from the timestamp when the row does
    /// not already carry them. Weekday 0 is Sunday.
    fn derive_calendar_fields(&self, record: &mut Record) {
        if record.contains_key(COL_HOUR) && record.contains_key(COL_WEEKDAY) {
            return;
        }
        let parsed = record
            .timestamp_text()
            .and_then(|text| parse_timestamp(&text));
        let Some(dt) = parsed else {
            return;
        };

        if !record.contains_key(COL_HOUR) {
            record.insert(COL_HOUR, FieldValue::Number(dt.hour() as f64));
        }
        if !record.contains_key(COL_WEEKDAY) {
            use chrono::Datelike;
            let weekday = dt.weekday().num_days_from_sunday();
            record.insert(COL_WEEKDAY, FieldValue::Number(weekday as f64));
        }
    }

    fn derive_high_value(&self, record: &mut Record) {
        if record.contains_key(COL_HIGH_VALUE) {
            return;
        }
        let high = record.amount() > self.config.high_value_threshold;
        record.insert(COL_HIGH_VALUE, FieldValue::Bool(high));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(pairs: &[(&str, serde_json::Value)]) -> RawRecord {
        let mut row = RawRecord::new();
        for (key, value) in pairs {
            row.insert(*key, value.clone());
        }
        row
    }

    #[test]
    fn test_fallback_rule_applied_uniformly() {
        let rows = vec![
            raw(&[("transaction_amount", json!("150000")), ("is_fraud", json!("1"))]),
            raw(&[("transaction_amount", json!("500")), ("is_fraud", json!("0"))]),
        ];
        let records = Enricher::default().enrich(&rows);

        assert_eq!(records[0].predicted_label(), Some(1));
        assert_eq!(records[1].predicted_label(), Some(0));
    }

    #[test]
    fn test_fallback_rule_failed_logins() {
        let rows = vec![raw(&[
            ("transaction_amount", json!("50")),
            ("failed_login_attempts", json!("4")),
        ])];
        let records = Enricher::default().enrich(&rows);
        assert_eq!(records[0].predicted_label(), Some(1));
    }

    #[test]
    fn test_fallback_skipped_when_any_row_has_prediction() {
        let rows = vec![
            raw(&[("transaction_amount", json!("150000")), ("predicted", json!("1"))]),
            raw(&[("transaction_amount", json!("200000"))]),
        ];
        let records = Enricher::default().enrich(&rows);

        assert_eq!(records[0].predicted_label(), Some(1));
        // Second row keeps its missing prediction; the rule never runs
        // partially on a batch
        assert_eq!(records[1].predicted_label(), None);
    }

    #[test]
    fn test_numeric_coercion_invalid_to_zero() {
        let rows = vec![raw(&[
            ("transaction_amount", json!("not-a-number")),
            ("account_age_days", json!("")),
        ])];
        let records = Enricher::default().enrich(&rows);
        assert_eq!(records[0].amount(), 0.0);
        assert_eq!(
            records[0].get(COL_ACCOUNT_AGE_DAYS),
            Some(&FieldValue::Number(0.0))
        );
    }

    #[test]
    fn test_synthetic_id_assigned() {
        let rows = vec![
            raw(&[("transaction_amount", json!("10"))]),
            raw(&[("transaction_amount", json!("10"))]),
        ];
        let records = Enricher::default().enrich(&rows);
        let id0 = records[0].transaction_id();
        let id1 = records[1].transaction_id();
        assert!(id0.starts_with("txn-"));
        assert_ne!(id0, id1);
    }

    #[test]
    fn test_existing_id_kept() {
        let rows = vec![raw(&[("transaction_id", json!("abc-123"))])];
        let records = Enricher::default().enrich(&rows);
        assert_eq!(records[0].transaction_id(), "abc-123");
    }

    #[test]
    fn test_calendar_fields_derived() {
        // 2024-06-16 is a Sunday
        let rows = vec![raw(&[("timestamp", json!("2024-06-16 14:30:00"))])];
        let records = Enricher::default().enrich(&rows);
        assert_eq!(records[0].get(COL_HOUR), Some(&FieldValue::Number(14.0)));
        assert_eq!(records[0].get(COL_WEEKDAY), Some(&FieldValue::Number(0.0)));
    }

    #[test]
    fn test_high_value_derived() {
        let rows = vec![
            raw(&[("transaction_amount", json!("60000"))]),
            raw(&[("transaction_amount", json!("500"))]),
        ];
        let records = Enricher::default().enrich(&rows);
        assert_eq!(records[0].get(COL_HIGH_VALUE), Some(&FieldValue::Bool(true)));
        assert_eq!(records[1].get(COL_HIGH_VALUE), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn test_unparsable_timestamp_degrades() {
        let rows = vec![raw(&[("timestamp", json!("garbage"))])];
        let records = Enricher::default().enrich(&rows);
        assert!(!records[0].contains_key(COL_HOUR));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_batch() {
        let records = Enricher::default().enrich(&[]);
        assert!(records.is_empty());
    }
}
