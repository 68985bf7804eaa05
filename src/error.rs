//! Error types for recordstore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::record::RecordId;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for recordstore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("Invalid record format in line {line}: {content} ({reason})")]
    Format {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("Snapshot content is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Record with ID {id} already exists")]
    DuplicateKey { id: RecordId },

    #[error("Record with ID {id} not found")]
    RecordNotFound { id: RecordId },

    #[error("Snapshot not found: {name}")]
    SnapshotNotFound { name: String },

    #[error("Invalid snapshot name: {name:?}")]
    InvalidName { name: String },

    #[error("No snapshot content supplied for upload: {name}")]
    MissingUpload { name: String },

    // -------------------------------------------------------------------------
    // Backend Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document table corruption detected: {0}")]
    Corruption(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`StoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed snapshot text or field value
    Format,
    /// Create with an id already present
    DuplicateKey,
    /// Unknown record id or snapshot name
    NotFound,
    /// I/O or on-disk format failure inside a backend
    Backend,
    /// Caller-supplied input rejected before touching a backend
    InvalidInput,
}

impl StoreError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Format { .. }
            | StoreError::InvalidEncoding(_)
            | StoreError::InvalidField { .. } => ErrorKind::Format,
            StoreError::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            StoreError::RecordNotFound { .. } | StoreError::SnapshotNotFound { .. } => {
                ErrorKind::NotFound
            }
            StoreError::Io(_) | StoreError::Corruption(_) | StoreError::Serialization(_) => {
                ErrorKind::Backend
            }
            StoreError::InvalidName { .. }
            | StoreError::MissingUpload { .. }
            | StoreError::Config(_) => ErrorKind::InvalidInput,
        }
    }

    /// Whether this error was caused by the caller's input rather than the backend
    pub fn is_client_error(&self) -> bool {
        self.kind() != ErrorKind::Backend
    }
}

impl From<bincode::Error> for StoreError {
    fn from(e: bincode::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
