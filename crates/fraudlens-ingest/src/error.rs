//! Error types for fraudlens-ingest

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("CSV error at {location}: {message}")]
    CsvError {
        location: String,
        message: String,
    },

    #[error("Invalid JSON record set: {message}")]
    InvalidJson { message: String },

    #[error("Unsupported input format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("IO error")]
    IoError(#[from] io::Error),
}
