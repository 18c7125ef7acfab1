//! Error types for parts-list ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a parts list.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Parts list file not found.
    #[error("parts list not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Required column not found in the header row.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::MissingColumn {
            column: "Item".to_string(),
            path: PathBuf::from("parts.csv"),
        };
        assert_eq!(
            err.to_string(),
            "required column 'Item' not found in parts.csv"
        );
    }
}
