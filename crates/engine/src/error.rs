use std::path::PathBuf;
use std::time::Duration;

use storyconv_export::ExportError;

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Failure to retrieve a page or an image over the network.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("Request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-success status.
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Failure to produce one image asset. Never fatal for a conversion.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error(transparent)]
    Download(#[from] FetchError),

    #[error("Could not transcode image")]
    Transcode(#[from] image::ImageError),

    #[error("Could not write image to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// This defines the error types returned by a conversion
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Invalid story url: {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The story page could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The page was fetched but carries no story text.
    #[error("No element matching '{selector}' on {url}")]
    ContentNotFound { url: String, selector: &'static str },

    /// The e-book could not be assembled or written.
    #[error(transparent)]
    Document(#[from] ExportError),

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The conversion task did not deliver a result in time.
    #[error("Conversion of {url} did not finish within {after:?}")]
    Timeout { url: String, after: Duration },

    /// The conversion task ended without delivering a result.
    #[error("Conversion of {url} ended without a result")]
    NoResult { url: String },
}
