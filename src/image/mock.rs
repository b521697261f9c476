use super::{ImageService, THUMBNAIL_FILENAME};
use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockThumbnailExporter {
    export_count: Arc<Mutex<usize>>,
    base_path: String,
    should_fail: Arc<Mutex<bool>>,
}

impl MockThumbnailExporter {
    pub fn new() -> Self {
        Self {
            export_count: Arc::new(Mutex::new(0)),
            base_path: "/tmp".to_string(),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_base_path(mut self, path: String) -> Self {
        self.base_path = path;
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_export_count(&self) -> usize {
        *self.export_count.lock().unwrap()
    }
}

impl Default for MockThumbnailExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageService for MockThumbnailExporter {
    async fn export_thumbnail(&self, _image_data: &[u8]) -> Result<PathBuf> {
        if *self.should_fail.lock().unwrap() {
            return Err(crate::Error::Image(image::ImageError::IoError(
                std::io::Error::other("Mock failure"),
            )));
        }

        let mut count = self.export_count.lock().unwrap();
        *count += 1;

        Ok(PathBuf::from(&self.base_path).join(THUMBNAIL_FILENAME))
    }
}
