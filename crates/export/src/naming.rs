//! File names for produced books.

/// Name used when transliteration leaves nothing behind.
const FALLBACK_NAME: &str = "story";

/// Transliterated, filesystem-safe file stem for a book.
///
/// The stem is built from `"<author> - <title>"`, or from the title alone when
/// there is no author, and mapped to a lowercase Latin slug.
pub fn book_file_name(author: Option<&str>, title: &str) -> String {
    let base = match author.map(str::trim).filter(|author| !author.is_empty()) {
        Some(author) => format!("{author} - {title}"),
        None => title.to_string(),
    };

    let name = slug::slugify(base);
    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}
