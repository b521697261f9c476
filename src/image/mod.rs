//! Thumbnail export
//!
//! Converts the bytes returned by the AI facade into the downloadable
//! `youtube_thumbnail.jpeg` deliverable.

pub mod exporter;
pub mod mock;

pub use exporter::ThumbnailExporter;
pub use mock::MockThumbnailExporter;

use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Filename offered for download, matching the original application.
pub const THUMBNAIL_FILENAME: &str = "youtube_thumbnail.jpeg";

#[async_trait]
pub trait ImageService: Send + Sync {
    /// Write the image bytes out as a JPEG thumbnail, returning the path.
    async fn export_thumbnail(&self, image_data: &[u8]) -> Result<PathBuf>;
}
