//! Story storage for storyconv.
//!
//! This crate owns the [`Story`] record, the parsing of free-form search text
//! into a [`SearchQuery`], and the [`StoryRepository`] trait with its
//! PostgreSQL backend. Rows are created by an external ingestion process;
//! repositories only read them and update the conversion columns.

pub mod backends;
pub mod error;
pub mod models;
pub mod traits;
pub mod types;

pub use error::{Result, StorageError};
pub use models::Story;
pub use traits::StoryRepository;
pub use types::{AUTHOR_MARKER, SearchQuery};

#[cfg(feature = "postgres")]
pub use backends::{PostgresRepository, tls_connector};
