//! Image download and transcoding.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use storyconv_export::BookAsset;
use url::Url;

use crate::error::AssetError;
use crate::folder::{last_path_segment, sanitize_name};
use crate::http::PageFetcher;

/// File name of the transcoded cover inside the story folder.
pub const COVER_FILE: &str = "cover.png";

/// File stem of an image address: last path segment without its extension.
pub fn image_stem(url: &Url) -> Option<String> {
    let segment = last_path_segment(url)?;
    let stem = Path::new(segment).file_stem()?.to_str()?;
    let stem = sanitize_name(stem);
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        return None;
    }
    Some(stem)
}

/// Name of the JPEG produced for an inline image.
pub fn inline_image_file(url: &Url) -> Option<String> {
    image_stem(url).map(|stem| format!("{stem}.jpg"))
}

/// Decode `data` (first frame for animated sources) and re-encode it.
///
/// JPEG has no alpha channel, so images are flattened to RGB first.
pub fn transcode(data: &[u8], format: ImageFormat) -> Result<Vec<u8>, AssetError> {
    let image = image::load_from_memory(data)?;
    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => image,
    };

    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format)?;
    Ok(out.into_inner())
}

/// Download an image, transcode it into `folder/file_name` and return it as
/// an embeddable asset.
pub async fn fetch_asset(
    fetcher: &dyn PageFetcher,
    url: &Url,
    folder: &Path,
    file_name: &str,
    format: ImageFormat,
) -> Result<BookAsset, AssetError> {
    let source = fetcher.fetch_bytes(url).await?;
    let data = transcode(&source, format)?;

    let path: PathBuf = folder.join(file_name);
    tokio::fs::write(&path, &data)
        .await
        .map_err(|source| AssetError::Write {
            path: path.clone(),
            source,
        })?;

    tracing::debug!(%url, path = %path.display(), "Image saved");
    Ok(BookAsset::new(file_name, format.to_mime_type(), data))
}
