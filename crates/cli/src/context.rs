use std::sync::Arc;

use storyconv_engine::{ConverterOptions, PageConverter, ReqwestFetcher, StoryConverter};
use storyconv_storage::{PostgresRepository, StoryRepository};

use crate::config::Settings;
use crate::error::AppError;

/// Everything a command needs, built once at startup and passed down.
pub struct AppContext {
    pub repository: Arc<dyn StoryRepository>,
    pub converter: Arc<dyn StoryConverter>,
}

impl AppContext {
    pub fn new(repository: Arc<dyn StoryRepository>, converter: Arc<dyn StoryConverter>) -> Self {
        Self {
            repository,
            converter,
        }
    }

    /// Wire the PostgreSQL repository and the scraping converter.
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let repository = PostgresRepository::new(&settings.db_path, settings.db_pool_size)?;

        let fetcher = ReqwestFetcher::new(settings.user_agent.as_deref())
            .map_err(storyconv_engine::ConvertError::from)?;
        let converter = PageConverter::new(
            Arc::new(fetcher),
            ConverterOptions {
                storage_root: settings.storage_root.clone(),
                timeout: settings.fetch_timeout,
            },
        );

        Ok(Self::new(Arc::new(repository), Arc::new(converter)))
    }
}
