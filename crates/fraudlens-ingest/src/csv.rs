//! CSV ingestion
//!
//! Header row defines the keys; every cell arrives as a string, the
//! same shape an uploaded delimited file produces. Rows shorter than
//! the header are padded with empty strings rather than rejected.

use serde_json::Value;

use crate::error::IngestError;
use crate::raw::RawRecord;

/// CSV reader for uploaded transaction batches
pub struct CsvRecordReader;

impl CsvRecordReader {
    /// Parse delimited content into raw records
    pub fn parse(content: &str) -> Result<Vec<RawRecord>, IngestError> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(::csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| IngestError::CsvError {
                location: "header".to_string(),
                message: e.to_string(),
            })?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let row = result.map_err(|e| IngestError::CsvError {
                location: format!("row {}", index + 1),
                message: e.to_string(),
            })?;

            // Skip fully empty lines
            if row.iter().all(|cell| cell.is_empty()) {
                continue;
            }

            let mut record = RawRecord::new();
            for (col, header) in headers.iter().enumerate() {
                let cell = row.get(col).unwrap_or("");
                record.insert(header.clone(), Value::String(cell.to_string()));
            }
            records.push(record);
        }

        Ok(records)
    }
}
