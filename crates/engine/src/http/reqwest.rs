use async_trait::async_trait;
use url::Url;

use super::{Page, PageFetcher};
use crate::error::FetchError;

pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl ReqwestFetcher {
    pub fn new(user_agent: Option<&str>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent.to_string());
        }

        let client = builder.build().map_err(|e| FetchError::Request {
            url: String::new(),
            source: Box::new(e),
        })?;

        Ok(Self { client })
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response, FetchError> {
        tracing::debug!("Executing HTTP request: method=GET, url={}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch_page(&self, url: &Url) -> Result<Page, FetchError> {
        let response = self.get(url).await?;
        let final_url = response.url().clone();
        let html = response.text().await.map_err(|e| request_error(url, e))?;

        Ok(Page::new(final_url, html))
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url).await?;
        let data = response.bytes().await.map_err(|e| request_error(url, e))?;

        Ok(data.to_vec())
    }
}

fn request_error(url: &Url, error: reqwest::Error) -> FetchError {
    FetchError::Request {
        url: url.to_string(),
        source: Box::new(error),
    }
}
