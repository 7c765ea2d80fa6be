use std::io::Write;

use storyconv_storage::{SearchQuery, Story};
use tracing::{debug, info};

use crate::context::AppContext;
use crate::error::AppError;
use crate::report;

/// How a lookup ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NotFound,
    /// The story was converted during this run.
    Converted { story: Story, path: String },
    /// The story already had an e-book.
    Cached { story: Story, path: String },
    /// Several stories matched; nothing was converted.
    Ambiguous(Vec<Story>),
}

/// Search for a story and make sure it has an e-book.
///
/// A single match without a file is converted and the produced path stored.
/// A single match with a file only has its access counted. Failed conversions
/// leave the row untouched.
pub async fn handle_lookup_command(
    ctx: &AppContext,
    query: &SearchQuery,
    out: &mut dyn Write,
) -> Result<Outcome, AppError> {
    info!(%query, "Searching for story");
    let mut stories = ctx.repository.search(query).await?;
    debug!(matches = stories.len(), "Search finished");

    if stories.len() > 1 {
        report::ambiguous(out, &stories)?;
        return Ok(Outcome::Ambiguous(stories));
    }

    let Some(story) = stories.pop() else {
        report::not_found(out)?;
        return Ok(Outcome::NotFound);
    };

    report::story(out, &story)?;

    if let Some(path) = story.cached_file() {
        let path = path.to_string();
        ctx.repository.record_access(&story).await?;
        debug!(%path, "Already converted story");
        report::file(out, &path)?;
        return Ok(Outcome::Cached { story, path });
    }

    debug!("Starting story conversion");
    let path = ctx.converter.convert(&story).await?;
    let path = path.to_string_lossy().into_owned();

    ctx.repository.record_conversion(&story, &path).await?;
    debug!(%path, "Story converted");
    report::file(out, &path)?;

    Ok(Outcome::Converted { story, path })
}
