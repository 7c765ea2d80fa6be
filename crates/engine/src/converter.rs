//! Story page to e-book conversion.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::ImageFormat;
use storyconv_export::{Book, BookAsset, EpubExporter, Exporter, book_file_name, write_epub};
use storyconv_storage::Story;
use tokio::sync::oneshot;
use url::Url;

use crate::assets::{COVER_FILE, fetch_asset, inline_image_file};
use crate::error::{ConvertError, Result};
use crate::extract::{BODY_SELECTOR, extract};
use crate::folder::{prepare_story_folder, story_folder_name};
use crate::http::PageFetcher;

/// Turns a story into an e-book file on disk.
#[async_trait]
pub trait StoryConverter: Send + Sync {
    /// Convert `story` and return the path of the produced file.
    async fn convert(&self, story: &Story) -> Result<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct ConverterOptions {
    /// Directory holding one folder per story.
    pub storage_root: PathBuf,
    /// Upper bound on a whole conversion, downloads included.
    pub timeout: Duration,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("storage"),
            timeout: Duration::from_secs(120),
        }
    }
}

/// [`StoryConverter`] that scrapes the story page and writes an EPUB.
///
/// The fetch and everything after it run on a spawned task that hands its
/// single result back through a oneshot channel. The caller waits at most
/// [`ConverterOptions::timeout`] for it.
pub struct PageConverter {
    fetcher: Arc<dyn PageFetcher>,
    options: ConverterOptions,
}

impl PageConverter {
    pub fn new(fetcher: Arc<dyn PageFetcher>, options: ConverterOptions) -> Self {
        Self { fetcher, options }
    }
}

#[async_trait]
impl StoryConverter for PageConverter {
    #[tracing::instrument(skip_all, fields(id = story.id, url = %story.url))]
    async fn convert(&self, story: &Story) -> Result<PathBuf> {
        let url = Url::parse(&story.url).map_err(|source| ConvertError::InvalidUrl {
            url: story.url.clone(),
            source,
        })?;

        let folder_name = story_folder_name(story, &url);
        let folder = prepare_story_folder(&self.options.storage_root, &folder_name)
            .await
            .map_err(|source| ConvertError::Io {
                path: self.options.storage_root.join(&folder_name),
                source,
            })?;

        let job = ConversionJob {
            fetcher: self.fetcher.clone(),
            story: story.clone(),
            url,
            folder,
        };

        let (sender, receiver) = oneshot::channel();
        let task = tokio::spawn(async move {
            let result = job.run().await;
            // The receiver is gone only if the caller stopped waiting.
            let _ = sender.send(result);
        });

        match tokio::time::timeout(self.options.timeout, receiver).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ConvertError::NoResult {
                url: story.url.clone(),
            }),
            Err(_) => {
                task.abort();
                Err(ConvertError::Timeout {
                    url: story.url.clone(),
                    after: self.options.timeout,
                })
            }
        }
    }
}

/// Everything the background task owns.
struct ConversionJob {
    fetcher: Arc<dyn PageFetcher>,
    story: Story,
    url: Url,
    folder: PathBuf,
}

impl ConversionJob {
    async fn run(self) -> Result<PathBuf> {
        let page = self.fetcher.fetch_page(&self.url).await?;
        tracing::debug!(url = %page.url, bytes = page.html.len(), "Page fetched");

        let parts = extract(&page, &self.story.title);
        let body = parts.body.ok_or_else(|| ConvertError::ContentNotFound {
            url: page.url.to_string(),
            selector: BODY_SELECTOR,
        })?;

        let cover = match &parts.cover {
            Some(url) => self.asset(url, COVER_FILE, ImageFormat::Png).await,
            None => {
                tracing::debug!("Page has no cover image");
                None
            }
        };

        let mut images = Vec::new();
        for url in &parts.images {
            let Some(file_name) = inline_image_file(url) else {
                continue;
            };
            if let Some(asset) = self.asset(url, &file_name, ImageFormat::Jpeg).await {
                images.push(asset);
            }
        }

        // Only pictures the text refers to go into the book.
        images.retain(|asset| body.images.contains(&asset.file_name));

        let embedded = |file_name: &str| images.iter().any(|asset| asset.file_name == file_name);
        for file_name in body.images.iter().filter(|name| !embedded(name.as_str())) {
            tracing::warn!(file_name = %file_name, "Leaving missing image out of the text");
        }
        let markup = body.markup_with(embedded);

        let book = Book::new(self.story.title.clone())
            .with_author(self.story.author.clone())
            .with_cover(cover)
            .with_body(markup)
            .with_images(images);

        let path = self.book_path();
        write_epub(&book, &path).await?;

        tracing::info!(path = %path.display(), "Story converted");
        Ok(path)
    }

    /// Download and transcode one image; failures are logged and skipped.
    async fn asset(&self, url: &Url, file_name: &str, format: ImageFormat) -> Option<BookAsset> {
        match fetch_asset(self.fetcher.as_ref(), url, &self.folder, file_name, format).await {
            Ok(asset) => Some(asset),
            Err(e) => {
                tracing::warn!(%url, error = %e, "Skipping image");
                None
            }
        }
    }

    fn book_path(&self) -> PathBuf {
        let extension = EpubExporter::new().format_info().extension;
        let name = book_file_name(self.story.author_name(), &self.story.title);
        book_path(&self.folder, &name, &extension)
    }
}

fn book_path(folder: &Path, name: &str, extension: &str) -> PathBuf {
    folder.join(format!("{name}.{extension}"))
}
