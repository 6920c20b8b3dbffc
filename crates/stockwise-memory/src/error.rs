//! Memory error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during memory operations.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The source CSV does not exist.
    #[error("Inventory CSV not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The source CSV holds no data rows.
    #[error("Inventory CSV has no data rows: {}", .0.display())]
    EmptySource(PathBuf),

    /// A CSV row could not be turned into an inventory row.
    #[error("Invalid inventory row at line {line}: {message}")]
    InvalidRow { line: u64, message: String },

    /// Embedding generation failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector store error.
    #[error("Store error: {0}")]
    Store(String),

    /// The index has not been built or opened yet.
    #[error("Index is not ready")]
    NotReady,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MemoryError {
    /// Create an embedding error.
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Whether the failure came from the embedding service.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Embedding(_))
    }
}
