use super::{ImageService, THUMBNAIL_FILENAME};
use crate::{Error, Result};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::{Path, PathBuf};

// YouTube's recommended thumbnail dimensions.
const THUMBNAIL_WIDTH: u32 = 1280;
const THUMBNAIL_HEIGHT: u32 = 720;

pub struct ThumbnailExporter {
    output_dir: PathBuf,
}

impl ThumbnailExporter {
    pub fn new(output_dir: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    fn save_jpeg_sync(image: DynamicImage, path: PathBuf) -> Result<()> {
        let resized = image.resize_exact(
            THUMBNAIL_WIDTH,
            THUMBNAIL_HEIGHT,
            image::imageops::FilterType::Lanczos3,
        );
        resized.save_with_format(path, ImageFormat::Jpeg)?;
        Ok(())
    }
}

#[async_trait]
impl ImageService for ThumbnailExporter {
    async fn export_thumbnail(&self, image_data: &[u8]) -> Result<PathBuf> {
        let img = image::load_from_memory(image_data)?;
        let path = self.output_dir.join(THUMBNAIL_FILENAME);

        tokio::task::spawn_blocking({
            let path = path.clone();
            move || Self::save_jpeg_sync(img, path)
        })
        .await
        .map_err(|e| Error::Invariant(format!("Thumbnail export task join error: {}", e)))??;

        tracing::info!("Exported thumbnail to {}", path.display());
        Ok(path)
    }
}
