//! The story record as stored in the `story` table.

use serde::{Deserialize, Serialize};

/// One narrative work and its conversion state.
///
/// The optional columns keep their three states apart: `None` is SQL `NULL`,
/// `Some("")` is a present but empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub filepath: Option<String>,
    pub access_count: i32,
}

impl Story {
    /// Path of an already produced e-book, if any.
    ///
    /// An empty path is not a usable cache entry; such rows are converted again.
    pub fn cached_file(&self) -> Option<&str> {
        self.filepath.as_deref().filter(|path| !path.is_empty())
    }

    /// The author, if one is recorded and non-empty.
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|author| !author.is_empty())
    }
}
