//! Supporting types for the story storage system.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Word that separates the title part of a search from the author part.
pub const AUTHOR_MARKER: &str = "автор";

static AUTHOR_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(?i){AUTHOR_MARKER}")).expect("author marker pattern is valid")
});

/// Search text split into the fragments matched against the `story` table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub title: String,
    pub author: Option<String>,
}

impl SearchQuery {
    /// Parse free-form search text such as `"Стрекоза и муравей автор Крылов"`.
    ///
    /// The text is split once, at the first occurrence of [`AUTHOR_MARKER`]
    /// (any case). An author part that trims to nothing is dropped.
    pub fn parse(text: &str) -> Self {
        let mut parts = AUTHOR_MARKER_RE.splitn(text, 2);
        let title = trim_fragment(parts.next().unwrap_or_default());
        let author = parts
            .next()
            .map(trim_fragment)
            .filter(|author| !author.is_empty());

        Self { title, author }
    }

    /// `ILIKE` pattern for the title column.
    pub fn title_pattern(&self) -> String {
        like_pattern(&self.title)
    }

    /// `ILIKE` pattern for the author column, when an author was given.
    pub fn author_pattern(&self) -> Option<String> {
        self.author.as_deref().map(like_pattern)
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.author {
            Some(author) => write!(f, "{} {AUTHOR_MARKER} {}", self.title, author),
            None => write!(f, "{}", self.title),
        }
    }
}

/// Strip everything that is not a letter or digit from both ends.
fn trim_fragment(fragment: &str) -> String {
    fragment
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

fn like_pattern(fragment: &str) -> String {
    format!("%{fragment}%")
}
