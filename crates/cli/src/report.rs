//! Console messages shown to the reader.

use std::io::{Result, Write};

use storyconv_storage::{AUTHOR_MARKER, Story};

pub const NOT_FOUND: &str = "Не найдено ни одной книги";

fn author(story: &Story) -> &str {
    story.author.as_deref().unwrap_or_default()
}

pub fn not_found(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{NOT_FOUND}")
}

pub fn story(out: &mut dyn Write, story: &Story) -> Result<()> {
    writeln!(out, "Название: {}", story.title)?;
    writeln!(out, "Автор: {}", author(story))?;
    writeln!(out, "Адрес: {}", story.url)
}

pub fn file(out: &mut dyn Write, path: &str) -> Result<()> {
    writeln!(out, "Файл: {path}")
}

/// Guidance for a search that matched several stories.
pub fn ambiguous(out: &mut dyn Write, stories: &[Story]) -> Result<()> {
    writeln!(
        out,
        "Найдено несколько рассказов, уточните автора в формате \"<название> {AUTHOR_MARKER} <автор>\"."
    )?;
    if let Some(example) = stories.last() {
        writeln!(
            out,
            "Например попробуйте в таком формате: \"{} {AUTHOR_MARKER} {}\":",
            example.title,
            author(example)
        )?;
    }
    writeln!(out, "Список найденных рассказов ({} шт):", stories.len())?;
    for story in stories {
        writeln!(out, "Название: {}, автор: {}", story.title, author(story))?;
    }
    Ok(())
}
