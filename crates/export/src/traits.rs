//! Core trait for export functionality.

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::error::Result;
use crate::types::{Book, ExportResult, FormatInfo};

/// Core trait for packaging a book into a file format.
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Get format information.
    fn format_info(&self) -> FormatInfo;

    /// Export a book to a writer.
    async fn export(
        &self,
        book: &Book,
        writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<ExportResult>;
}
