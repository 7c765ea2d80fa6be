//! Page conversion engine for storyconv.
//!
//! Fetches a story page, applies the cover, inline-image and body-text
//! extraction rules, transcodes the images and packages everything into an
//! EPUB inside a per-story folder.

pub mod assets;
pub mod converter;
pub mod error;
pub mod extract;
pub mod folder;
pub mod http;

pub use converter::{ConverterOptions, PageConverter, StoryConverter};
pub use error::{AssetError, ConvertError, FetchError, Result};
pub use http::{Page, PageFetcher, ReqwestFetcher};
