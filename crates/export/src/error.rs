//! Error types for export operations.

use thiserror::Error;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Error types for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Format-specific error.
    #[error("Format error: {message}")]
    FormatError { message: String },
}

impl ExportError {
    pub(crate) fn format(error: impl std::fmt::Display) -> Self {
        ExportError::FormatError {
            message: error.to_string(),
        }
    }
}
