mod reqwest;

use async_trait::async_trait;
use url::Url;

use crate::error::FetchError;

pub use self::reqwest::ReqwestFetcher;

/// A fetched HTML page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final address after redirects; relative links resolve against it.
    pub url: Url,
    pub html: String,
}

impl Page {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
        }
    }
}

/// Network capability used by the converter.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch an HTML page.
    async fn fetch_page(&self, url: &Url) -> Result<Page, FetchError>;

    /// Download a binary resource such as an image.
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}
