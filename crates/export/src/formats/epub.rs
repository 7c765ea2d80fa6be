//! EPUB export format implementation.

use async_trait::async_trait;
use chrono::Utc;
use epub_builder::{EpubBuilder, EpubContent, ReferenceType, ZipLibrary};

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{ExportError, Result};
use crate::traits::Exporter;
use crate::types::{Book, ExportResult, FormatInfo};

/// Location of the single content section inside the container.
///
/// Images live under `images/`, so markup in this section refers to them as
/// `../images/<name>`.
pub const CONTENT_PATH: &str = "text/story.xhtml";

/// EPUB format exporter.
pub struct EpubExporter;

impl EpubExporter {
    /// Create new EPUB exporter.
    pub fn new() -> Self {
        Self
    }

    /// Build the container in memory.
    pub fn build(&self, book: &Book) -> Result<Vec<u8>> {
        let mut epub_builder =
            EpubBuilder::new(ZipLibrary::new().map_err(ExportError::format)?)
                .map_err(ExportError::format)?;

        // Set metadata
        epub_builder
            .metadata("title", &book.title)
            .map_err(ExportError::format)?;
        if let Some(author) = &book.author {
            epub_builder
                .metadata("author", author)
                .map_err(ExportError::format)?;
        }
        epub_builder
            .metadata("lang", &book.language)
            .map_err(ExportError::format)?;

        if let Some(cover) = &book.cover {
            epub_builder
                .add_cover_image(
                    cover.container_path(),
                    cover.data.as_slice(),
                    cover.mime_type.as_str(),
                )
                .map_err(ExportError::format)?;
        }

        for image in &book.images {
            epub_builder
                .add_resource(
                    image.container_path(),
                    image.data.as_slice(),
                    image.mime_type.as_str(),
                )
                .map_err(ExportError::format)?;
        }

        let section = xhtml_document(&book.title, &book.body);
        epub_builder
            .add_content(
                EpubContent::new(CONTENT_PATH, section.as_bytes())
                    .title(&book.title)
                    .reftype(ReferenceType::Text),
            )
            .map_err(ExportError::format)?;

        let mut epub_data = Vec::new();
        epub_builder
            .generate(&mut epub_data)
            .map_err(ExportError::format)?;

        Ok(epub_data)
    }
}

#[async_trait]
impl Exporter for EpubExporter {
    fn format_info(&self) -> FormatInfo {
        FormatInfo::new("epub".to_string(), "EPUB E-book".to_string())
            .with_mime_type("application/epub+zip".to_string())
    }

    async fn export(
        &self,
        book: &Book,
        mut writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<ExportResult> {
        let start_time = Utc::now();

        let epub_data = self.build(book)?;

        // Write to output
        writer.write_all(&epub_data).await?;
        writer.flush().await?;

        let duration = Utc::now().signed_duration_since(start_time);
        let assets = book.images.len() + usize::from(book.cover.is_some());

        Ok(ExportResult::new(
            assets as u32,
            epub_data.len() as u64,
            duration,
        ))
    }
}

impl Default for EpubExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap body markup into a standalone XHTML document.
fn xhtml_document(title: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head>
    <title>{}</title>
</head>
<body>
{}
</body>
</html>"#,
        html_escape(title),
        body
    )
}

/// Escape HTML special characters.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BookAsset;

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|window| window == needle.as_bytes())
    }

    #[test]
    fn test_exporter_creation() {
        let exporter = EpubExporter::new();
        let format_info = exporter.format_info();

        assert_eq!(format_info.id, "epub");
        assert_eq!(format_info.extension, "epub");
        assert_eq!(
            format_info.mime_type,
            Some("application/epub+zip".to_string())
        );
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("Hello & <world>"), "Hello &amp; &lt;world&gt;");
        assert_eq!(html_escape("\"Test\""), "&quot;Test&quot;");
    }

    #[test]
    fn test_xhtml_document_escapes_title() {
        let document = xhtml_document("A & B", "<p>text</p>");
        assert!(document.contains("<title>A &amp; B</title>"));
        assert!(document.contains("<p>text</p>"));
    }

    #[test]
    fn test_build_embeds_cover_and_images() {
        let book = Book::new("Стрекоза и муравей")
            .with_author(Some("Крылов".to_string()))
            .with_cover(Some(BookAsset::new(
                "cover.png",
                "image/png",
                vec![0x89, b'P', b'N', b'G'],
            )))
            .with_body("<h1>Стрекоза и муравей</h1><p>Попрыгунья Стрекоза</p>")
            .with_images(vec![BookAsset::new(
                "leaf.jpg",
                "image/jpeg",
                vec![0xFF, 0xD8, 0xFF],
            )]);

        let data = EpubExporter::new().build(&book).unwrap();

        assert!(data.starts_with(b"PK"));
        assert!(contains(&data, "mimetype"));
        assert!(contains(&data, "images/cover.png"));
        assert!(contains(&data, "images/leaf.jpg"));
        assert!(contains(&data, CONTENT_PATH));
    }

    #[test]
    fn test_build_accepts_empty_title() {
        let book = Book::new("").with_body("<h1></h1><p>Жили-были</p>");
        let data = EpubExporter::new().build(&book).unwrap();

        assert!(data.starts_with(b"PK"));
        assert!(contains(&data, CONTENT_PATH));
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("book.epub");

        let book = Book::new("Колобок").with_body("<p>Жили-были</p>");
        let result = crate::write_epub(&book, &path).await.unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(result.total_size, written.len() as u64);
        assert_eq!(result.assets_embedded, 0);
        assert!(written.starts_with(b"PK"));
    }
}
