//! Per-story output folders.

use std::path::{Path, PathBuf};

use storyconv_storage::Story;
use url::Url;

/// Keep only characters that are safe in a file or folder name.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// Last non-empty path segment of `url`, e.g. `42-kolobok.html`.
pub fn last_path_segment(url: &Url) -> Option<&str> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
}

/// Folder name derived from the last path segment of a story URL.
///
/// Returns `None` when nothing usable survives sanitizing, including names
/// made of dots only.
pub fn folder_name_from_url(url: &Url) -> Option<String> {
    let name = sanitize_name(last_path_segment(url)?);
    if name.chars().all(|c| c == '.') {
        return None;
    }
    Some(name)
}

/// Folder name for a story, falling back to its id.
pub fn story_folder_name(story: &Story, url: &Url) -> String {
    folder_name_from_url(url).unwrap_or_else(|| format!("story-{}", story.id))
}

/// Remove whatever is at `root/name` and recreate it empty.
pub async fn prepare_story_folder(root: &Path, name: &str) -> std::io::Result<PathBuf> {
    let folder = root.join(name);

    match tokio::fs::remove_dir_all(&folder).await {
        Ok(()) => tracing::debug!(folder = %folder.display(), "Removed previous output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    tokio::fs::create_dir_all(&folder).await?;
    Ok(folder)
}
