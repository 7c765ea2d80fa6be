//! Storyconv Export - EPUB packaging for scraped stories
//!
//! This crate turns an assembled [`Book`] (title, author, cover, body markup
//! and images) into an EPUB container, and derives the transliterated file
//! name the container is written under.

pub mod error;
pub mod formats;
pub mod naming;
pub mod traits;
pub mod types;

use std::path::Path;

// Re-export main types
pub use error::{ExportError, Result};
pub use naming::book_file_name;
pub use traits::Exporter;
pub use types::{Book, BookAsset, ExportResult, FormatInfo};

// Re-export exporters
pub use formats::EpubExporter;

/// Write `book` as an EPUB file at `path`, replacing any existing file.
pub async fn write_epub(book: &Book, path: &Path) -> Result<ExportResult> {
    let file = tokio::fs::File::create(path).await?;
    let result = EpubExporter::new().export(book, Box::new(file)).await?;

    tracing::debug!(
        path = %path.display(),
        size = result.total_size,
        "EPUB written"
    );
    Ok(result)
}
