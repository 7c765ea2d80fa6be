//! Trait definitions for the story storage system.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Story;
use crate::types::SearchQuery;

/// Read and bookkeeping operations over the `story` table.
///
/// Every operation is its own unit of work: it acquires a connection, runs a
/// single statement and releases the connection before returning, on the
/// error path as well.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Find stories whose title (and author, when the query carries one)
    /// contains the query fragments, ignoring case.
    ///
    /// Zero and multiple matches are both valid results.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Story>>;

    /// Persist the produced e-book path and count the lookup.
    async fn record_conversion(&self, story: &Story, filepath: &str) -> Result<()>;

    /// Count a lookup that was served from an existing e-book.
    async fn record_access(&self, story: &Story) -> Result<()>;
}
