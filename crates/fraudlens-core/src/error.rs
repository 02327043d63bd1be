//! Error types for the analytics engine

use thiserror::Error;

use fraudlens_ingest::IngestError;

/// Stable machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Ingest,
    InvalidQuery,
    Serialization,
}

impl CoreErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoreErrorCode::Ingest => "INGEST",
            CoreErrorCode::InvalidQuery => "INVALID_QUERY",
            CoreErrorCode::Serialization => "SERIALIZATION",
        }
    }
}

/// Errors raised while building or querying a dataset
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub fn code(&self) -> CoreErrorCode {
        match self {
            CoreError::Ingest(_) => CoreErrorCode::Ingest,
            CoreError::InvalidQuery { .. } => CoreErrorCode::InvalidQuery,
            CoreError::Serialization(_) => CoreErrorCode::Serialization,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_stable() {
        let err = CoreError::InvalidQuery {
            reason: "bad group key".to_string(),
        };
        assert_eq!(err.code(), CoreErrorCode::InvalidQuery);
        assert_eq!(err.code().as_str(), "INVALID_QUERY");
        assert!(err.to_string().contains("bad group key"));
    }

    #[test]
    fn test_ingest_error_converts() {
        let inner = IngestError::UnsupportedFormat {
            extension: "xml".to_string(),
        };
        let err: CoreError = inner.into();
        assert_eq!(err.code(), CoreErrorCode::Ingest);
    }
}
