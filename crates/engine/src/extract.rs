//! Extraction rules applied to a fetched story page.
//!
//! The parsed document never leaves this module: everything the converter
//! needs is copied into [`PageParts`] before the document is dropped.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use storyconv_export::formats::epub::html_escape;
use url::Url;

use crate::assets::inline_image_file;
use crate::http::Page;

pub const COVER_SELECTOR: &str = "#dle-content div.story-cover figure.cover img";
pub const IMAGE_SELECTOR: &str = "div.story-text figure.image img";
pub const BODY_SELECTOR: &str = "div.story-text div.ftext";

static COVER: Lazy<Selector> = Lazy::new(|| parse_selector(COVER_SELECTOR));
static IMAGES: Lazy<Selector> = Lazy::new(|| parse_selector(IMAGE_SELECTOR));
static BODY: Lazy<Selector> = Lazy::new(|| parse_selector(BODY_SELECTOR));

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements left out of the book altogether.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "iframe", "template"];

/// Image attributes that only make sense on the live site.
const DROPPED_IMAGE_ATTRS: &[&str] = &["src", "loading", "srcset", "sizes", "data-src"];

fn parse_selector(selector: &str) -> Selector {
    Selector::parse(selector).expect("built-in selector is valid")
}

/// What the extraction rules found on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParts {
    /// Absolute address of the cover image.
    pub cover: Option<Url>,
    /// Absolute addresses of inline images, without duplicates.
    pub images: Vec<Url>,
    pub body: Option<StoryBody>,
}

/// Serialized story text.
///
/// Figure images are kept apart from the surrounding markup so that a
/// picture which never made it into the book can be left out of the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryBody {
    pieces: Vec<Piece>,
    /// JPEG file names the markup refers to through `../images/`.
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Markup(String),
    Image { file_name: String, tag: String },
}

impl StoryBody {
    /// XHTML markup starting with the title heading, keeping only the figure
    /// images `keep` accepts.
    pub fn markup_with(&self, keep: impl Fn(&str) -> bool) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Markup(markup) => out.push_str(markup),
                Piece::Image { file_name, tag } if keep(file_name) => out.push_str(tag),
                Piece::Image { .. } => {}
            }
        }
        out
    }
}

/// Run the cover, inline-image and body-text rules against `page`.
pub fn extract(page: &Page, title: &str) -> PageParts {
    let document = Html::parse_document(&page.html);
    let mut parts = PageParts::default();

    parts.cover = document
        .select(&COVER)
        .find_map(|img| resolve_src(img, &page.url));

    for img in document.select(&IMAGES) {
        if let Some(url) = resolve_src(img, &page.url) {
            push_unique(&mut parts.images, url);
        }
    }

    if let Some(container) = document.select(&BODY).next() {
        let mut writer = BodyWriter::new(&page.url);
        writer.out.push_str(&format!("<h1>{}</h1>", html_escape(title)));
        writer.children(container, false);
        writer.flush();

        // Figures outside `figure.image` still need their picture downloaded.
        for url in writer.sources {
            push_unique(&mut parts.images, url);
        }

        parts.body = Some(StoryBody {
            pieces: writer.pieces,
            images: writer.images,
        });
    }

    tracing::debug!(
        cover = parts.cover.is_some(),
        images = parts.images.len(),
        body = parts.body.is_some(),
        "Extracted page parts"
    );
    parts
}

fn resolve_src(img: ElementRef<'_>, base: &Url) -> Option<Url> {
    let src = img.value().attr("src")?.trim();
    if src.is_empty() {
        return None;
    }

    match base.join(src) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(src, error = %e, "Ignoring image with invalid address");
            None
        }
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Serializes the body container as XHTML, visiting every node once.
struct BodyWriter<'a> {
    base: &'a Url,
    out: String,
    pieces: Vec<Piece>,
    images: Vec<String>,
    sources: Vec<Url>,
}

impl<'a> BodyWriter<'a> {
    fn new(base: &'a Url) -> Self {
        Self {
            base,
            out: String::new(),
            pieces: Vec::new(),
            images: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Move the markup written so far into its own piece.
    fn flush(&mut self) {
        if !self.out.is_empty() {
            let markup = std::mem::take(&mut self.out);
            self.pieces.push(Piece::Markup(markup));
        }
    }

    fn children(&mut self, element: ElementRef<'_>, in_figure: bool) {
        for child in element.children() {
            if let Some(child) = ElementRef::wrap(child) {
                self.element(child, in_figure);
            } else if let Some(text) = child.value().as_text() {
                self.out.push_str(&html_escape(text));
            }
        }
    }

    fn element(&mut self, element: ElementRef<'_>, in_figure: bool) {
        let name = element.value().name();
        if SKIPPED_ELEMENTS.contains(&name) {
            return;
        }
        if name == "img" && in_figure {
            self.figure_image(element);
            return;
        }

        self.out.push('<');
        self.out.push_str(name);
        for (attr, value) in element.value().attrs() {
            self.attr(attr, value);
        }

        if VOID_ELEMENTS.contains(&name) {
            self.out.push_str(" />");
            return;
        }

        self.out.push('>');
        self.children(element, in_figure || name == "figure");
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    /// Point a figure image at its local copy and register that copy.
    fn figure_image(&mut self, img: ElementRef<'_>) {
        let Some(url) = resolve_src(img, self.base) else {
            return;
        };
        let Some(file_name) = inline_image_file(&url) else {
            tracing::warn!(%url, "Ignoring image without a usable file name");
            return;
        };

        self.flush();
        self.out.push_str("<img");
        for (attr, value) in img.value().attrs() {
            if !DROPPED_IMAGE_ATTRS.contains(&attr) {
                self.attr(attr, value);
            }
        }
        self.attr("src", &format!("../images/{file_name}"));
        self.out.push_str(" />");

        let tag = std::mem::take(&mut self.out);
        self.pieces.push(Piece::Image {
            file_name: file_name.clone(),
            tag,
        });
        push_unique(&mut self.images, file_name);
        push_unique(&mut self.sources, url);
    }

    fn attr(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(&html_escape(value));
        self.out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div id="dle-content">
  <div class="story-cover"><figure class="cover"><img src="/uploads/covers/strekoza.webp"></figure></div>
  <div class="story-text">
    <div class="ftext"><p>Попрыгунья <b>Стрекоза</b> лето красное пропела;</p><figure class="image"><img loading="lazy" src="/uploads/leaf.webp" alt="Лист"></figure><script>track()</script><p>Оглянуться не успела &amp; зима</p></div>
  </div>
</div>
</body></html>"#;

    fn markup(body: &StoryBody) -> String {
        body.markup_with(|_| true)
    }

    fn page(html: &str) -> Page {
        Page::new(
            Url::parse("https://skazki.example/basni/17-strekoza.html").unwrap(),
            html,
        )
    }

    #[test]
    fn test_extract_cover_and_images() {
        let parts = extract(&page(STORY_PAGE), "Стрекоза и муравей");

        assert_eq!(
            parts.cover.unwrap().as_str(),
            "https://skazki.example/uploads/covers/strekoza.webp"
        );
        assert_eq!(parts.images.len(), 1);
        assert_eq!(
            parts.images[0].as_str(),
            "https://skazki.example/uploads/leaf.webp"
        );
    }

    #[test]
    fn test_extract_body_markup() {
        let body = extract(&page(STORY_PAGE), "Стрекоза и муравей").body.unwrap();

        assert_eq!(
            markup(&body),
            "<h1>Стрекоза и муравей</h1>\
             <p>Попрыгунья <b>Стрекоза</b> лето красное пропела;</p>\
             <figure class=\"image\"><img alt=\"Лист\" src=\"../images/leaf.jpg\" /></figure>\
             <p>Оглянуться не успела &amp; зима</p>"
        );
        assert_eq!(body.images, vec!["leaf.jpg".to_string()]);
    }

    #[test]
    fn test_nested_markup_is_serialized_once() {
        let html = r#"<div class="story-text"><div class="ftext"><div><p>Раз <i>два <b>три</b></i></p></div></div></div>"#;
        let body = extract(&page(html), "Счёт").body.unwrap();

        assert_eq!(
            markup(&body),
            "<h1>Счёт</h1><div><p>Раз <i>два <b>три</b></i></p></div>"
        );
        assert_eq!(markup(&body).matches("три").count(), 1);
    }

    #[test]
    fn test_any_figure_image_is_rewritten_and_downloaded() {
        let html = r#"<div class="story-text"><div class="ftext"><figure><img src="https://cdn.example/pics/owl.gif"><figcaption>Сова</figcaption></figure><p><img src="/smile.png"></p></div></div>"#;
        let parts = extract(&page(html), "Сова");
        let body = parts.body.unwrap();

        assert!(markup(&body).contains("<img src=\"../images/owl.jpg\" />"));
        assert!(markup(&body).contains("<figcaption>Сова</figcaption>"));
        // Images outside figures keep their address.
        assert!(markup(&body).contains("<p><img src=\"/smile.png\" /></p>"));
        assert_eq!(body.images, vec!["owl.jpg".to_string()]);
        assert_eq!(parts.images.len(), 1);
        assert_eq!(parts.images[0].as_str(), "https://cdn.example/pics/owl.gif");
    }

    #[test]
    fn test_missing_figure_image_is_left_out() {
        let html = r#"<div class="story-text"><div class="ftext"><p>До</p><figure class="image"><img src="/a/owl.png"><figcaption>Сова</figcaption></figure><figure class="image"><img src="/a/fox.png"></figure><p>После</p></div></div>"#;
        let body = extract(&page(html), "Звери").body.unwrap();

        assert_eq!(body.images, vec!["owl.jpg".to_string(), "fox.jpg".to_string()]);
        assert_eq!(
            body.markup_with(|name| name == "fox.jpg"),
            "<h1>Звери</h1><p>До</p>\
             <figure class=\"image\"><figcaption>Сова</figcaption></figure>\
             <figure class=\"image\"><img src=\"../images/fox.jpg\" /></figure>\
             <p>После</p>"
        );
        assert!(!body.markup_with(|_| false).contains("<img"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = r#"<div class="story-text"><div class="ftext"><p>Текст</p></div></div>"#;
        let body = extract(&page(html), "Кот & <пёс>").body.unwrap();
        assert!(markup(&body).starts_with("<h1>Кот &amp; &lt;пёс&gt;</h1>"));
    }

    #[test]
    fn test_page_without_story_text() {
        let parts = extract(&page("<html><body><p>404</p></body></html>"), "Нет");
        assert_eq!(parts, PageParts::default());
    }
}
