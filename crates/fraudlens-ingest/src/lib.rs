//! Record-set ingestion for fraudlens
//!
//! Turns the two supported input shapes (uploaded delimited files and
//! API-style JSON dumps) into ordered raw records for enrichment.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub mod csv;
pub mod error;
pub mod raw;

pub use crate::csv::CsvRecordReader;
pub use error::IngestError;
pub use raw::{decode_json_rows, RawRecord};

// ==================== Ingestion Trait ====================

/// Record source reference type
pub type SourceRef = Arc<dyn RecordSourceTrait>;

/// Trait for record-set sources
#[async_trait]
pub trait RecordSourceTrait: Send + Sync {
    /// Parse in-memory content in the given format
    async fn parse(&self, content: &str, format: InputFormat) -> Result<Vec<RawRecord>, IngestError>;

    /// Load a record set from a file path, format inferred from extension
    async fn load_file(&self, path: PathBuf) -> Result<Vec<RawRecord>, IngestError>;
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Delimited file with a header row
    Csv,
    /// JSON array of objects
    Json,
}

impl InputFormat {
    /// Infer the format from a file extension
    pub fn from_extension(ext: &str) -> Result<Self, IngestError> {
        match ext.to_lowercase().as_str() {
            "csv" => Ok(InputFormat::Csv),
            "json" => Ok(InputFormat::Json),
            other => Err(IngestError::UnsupportedFormat {
                extension: other.to_string(),
            }),
        }
    }
}

/// Default source implementation
#[derive(Debug, Default)]
pub struct DefaultRecordSource;

#[async_trait]
impl RecordSourceTrait for DefaultRecordSource {
    async fn parse(&self, content: &str, format: InputFormat) -> Result<Vec<RawRecord>, IngestError> {
        match format {
            InputFormat::Csv => CsvRecordReader::parse(content),
            InputFormat::Json => {
                let payload: serde_json::Value =
                    serde_json::from_str(content).map_err(|e| IngestError::InvalidJson {
                        message: e.to_string(),
                    })?;
                decode_json_rows(&payload)
            }
        }
    }

    async fn load_file(&self, path: PathBuf) -> Result<Vec<RawRecord>, IngestError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        let format = InputFormat::from_extension(&extension)?;

        let content = tokio::fs::read_to_string(&path).await?;
        self.parse(&content, format).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_extension("csv").unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_extension("CSV").unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_extension("json").unwrap(), InputFormat::Json);
        assert!(InputFormat::from_extension("xlsx").is_err());
        assert!(InputFormat::from_extension("").is_err());
    }

    #[tokio::test]
    async fn test_parse_json_content() {
        let source = DefaultRecordSource;
        let rows = source
            .parse(r#"[{"a": 1}, {"a": 2}]"#, InputFormat::Json)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_parse_csv_content() {
        let source = DefaultRecordSource;
        let rows = source.parse("a,b\n1,2\n", InputFormat::Csv).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains_key("b"));
    }
}
