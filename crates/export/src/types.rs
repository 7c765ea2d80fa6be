//! Core types for export operations.

use chrono::Duration;

/// Information about an export format.
#[derive(Debug, Clone)]
pub struct FormatInfo {
    /// Unique identifier (e.g., "epub").
    pub id: String,
    /// Human-readable name (e.g., "EPUB E-book").
    pub name: String,
    /// File extension without the dot.
    pub extension: String,
    /// MIME type of the produced file.
    pub mime_type: Option<String>,
}

impl FormatInfo {
    /// Create new format info.
    pub fn new(id: String, name: String) -> Self {
        Self {
            extension: id.clone(),
            id,
            name,
            mime_type: None,
        }
    }

    /// Set MIME type.
    pub fn with_mime_type(mut self, mime_type: String) -> Self {
        self.mime_type = Some(mime_type);
        self
    }
}

/// A binary resource embedded in the book, such as an illustration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookAsset {
    /// Name inside the container's `images/` directory.
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl BookAsset {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Path of the asset inside the container.
    pub fn container_path(&self) -> String {
        format!("images/{}", self.file_name)
    }
}

/// Everything needed to package one story.
#[derive(Debug, Clone, Default)]
pub struct Book {
    pub title: String,
    pub author: Option<String>,
    /// Language tag for the package metadata.
    pub language: String,
    pub cover: Option<BookAsset>,
    /// XHTML body markup of the single content section.
    pub body: String,
    pub images: Vec<BookAsset>,
}

impl Book {
    /// Create a book with the given title and Russian language metadata.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            language: "ru".to_string(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author.filter(|author| !author.trim().is_empty());
        self
    }

    pub fn with_cover(mut self, cover: Option<BookAsset>) -> Self {
        self.cover = cover;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_images(mut self, images: Vec<BookAsset>) -> Self {
        self.images = images;
        self
    }
}

/// Result of an export operation.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Number of embedded images, cover included.
    pub assets_embedded: u32,
    /// Total output size in bytes.
    pub total_size: u64,
    /// Time taken.
    pub export_duration: Duration,
}

impl ExportResult {
    pub fn new(assets_embedded: u32, total_size: u64, duration: Duration) -> Self {
        Self {
            assets_embedded,
            total_size,
            export_duration: duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_author_is_dropped() {
        let book = Book::new("Колобок").with_author(Some("   ".to_string()));
        assert_eq!(book.author, None);
        assert_eq!(book.language, "ru");
    }

    #[test]
    fn test_asset_container_path() {
        let asset = BookAsset::new("picture.jpg", "image/jpeg", vec![1, 2, 3]);
        assert_eq!(asset.container_path(), "images/picture.jpg");
        assert_eq!(asset.mime_type, "image/jpeg");
    }
}
