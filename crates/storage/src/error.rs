//! Error types for the story storage system.

use thiserror::Error;

/// Errors that can occur while talking to the story store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid database configuration")]
    InvalidConfiguration {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to acquire a database connection")]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Storage operation failed: {operation}")]
    StorageOperationFailed {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Story not found: {id}")]
    StoryNotFound { id: i32 },
}

impl StorageError {
    pub(crate) fn operation<E>(operation: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StorageOperationFailed {
            operation,
            source: Box::new(source),
        }
    }
}

/// Result type alias for story storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
