//! Error types for library indexing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an index build.
#[derive(Debug, Error)]
pub enum IndexError {
    // === File System Errors ===
    /// Library root does not exist or is not a directory.
    #[error("library root not found: {path}")]
    RootNotFound { path: PathBuf },

    /// Failed to read the library root.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Scan was cancelled through an [`AbortSignal`](crate::AbortSignal).
    #[error("index build aborted after {scanned} files")]
    Aborted { scanned: usize },

    // === Configuration Errors ===
    /// Custom revision pattern failed to compile.
    #[error("invalid revision pattern '{pattern}': {source}")]
    InvalidRevisionPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Custom revision pattern has no `rev` capture group.
    #[error("revision pattern '{pattern}' has no named group 'rev'")]
    MissingRevisionGroup { pattern: String },
}

/// Result type for indexing operations.
pub type Result<T> = std::result::Result<T, IndexError>;
