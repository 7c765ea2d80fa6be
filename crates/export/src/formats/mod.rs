//! Export format implementations.

pub mod epub;

// Re-export exporters
pub use epub::EpubExporter;
