use std::process::ExitCode;

use storyconv_engine::ConvertError;
use storyconv_storage::StorageError;

use crate::config::ConfigError;

/// Process exit codes, one per failure class.
pub mod exit_code {
    pub const CONFIGURATION: u8 = 2;
    pub const DATABASE: u8 = 3;
    pub const FETCH: u8 = 4;
    pub const DOCUMENT: u8 = 5;
    pub const TIMEOUT: u8 = 6;
    pub const OUTPUT: u8 = 7;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error")]
    Configuration(#[from] ConfigError),

    #[error("Database error")]
    Database(#[from] StorageError),

    #[error("Conversion failed")]
    Conversion(#[from] ConvertError),

    #[error("Failed to write output")]
    Output(#[from] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Configuration(_) => exit_code::CONFIGURATION,
            AppError::Database(_) => exit_code::DATABASE,
            AppError::Conversion(error) => match error {
                ConvertError::InvalidUrl { .. }
                | ConvertError::Fetch(_)
                | ConvertError::ContentNotFound { .. } => exit_code::FETCH,
                ConvertError::Document(_) | ConvertError::Io { .. } => exit_code::DOCUMENT,
                ConvertError::Timeout { .. } | ConvertError::NoResult { .. } => {
                    exit_code::TIMEOUT
                }
            },
            AppError::Output(_) => exit_code::OUTPUT,
        }
    }
}

impl From<&AppError> for ExitCode {
    fn from(error: &AppError) -> Self {
        ExitCode::from(error.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use storyconv_engine::FetchError;

    #[test]
    fn test_exit_codes_are_distinct_per_class() {
        let missing = AppError::from(ConfigError::Missing { key: "DB_PATH" });
        let database = AppError::from(StorageError::StoryNotFound { id: 1 });
        let fetch = AppError::from(ConvertError::Fetch(FetchError::Status {
            url: "https://example.com".to_string(),
            status: 500,
        }));
        let timeout = AppError::from(ConvertError::Timeout {
            url: "https://example.com".to_string(),
            after: Duration::from_secs(1),
        });
        let document = AppError::from(ConvertError::Io {
            path: "storage/x".into(),
            source: std::io::Error::other("disk full"),
        });

        assert_eq!(missing.exit_code(), exit_code::CONFIGURATION);
        assert_eq!(database.exit_code(), exit_code::DATABASE);
        assert_eq!(fetch.exit_code(), exit_code::FETCH);
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);
        assert_eq!(document.exit_code(), exit_code::DOCUMENT);
    }
}
