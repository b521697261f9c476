use super::{ImageEditService, ImageGenerationService};
use crate::models::Logo;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// A tiny valid 1x1 PNG used as the default mock payload.
fn placeholder_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 pixel
        0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49,
        0x44, 0x41, // IDAT chunk
        0x54, 0x08, 0x99, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0xE2,
        0x25, 0x00, 0xBC, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, // IEND chunk
        0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

#[derive(Clone)]
pub struct MockImageGenerationClient {
    image_responses: Arc<Mutex<Vec<Vec<u8>>>>,
    call_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
    last_description: Arc<Mutex<Option<String>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            image_responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
            last_description: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_image_response(self, response: Vec<u8>) -> Self {
        self.image_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Description received on the most recent call, if any.
    pub fn last_description(&self) -> Option<String> {
        self.last_description.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, description: &str) -> Result<Vec<u8>> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        *self.last_description.lock().unwrap() = Some(description.to_string());

        if *self.should_fail.lock().unwrap() {
            return Err(Error::Generation("Mock generation failure".to_string()));
        }

        let responses = self.image_responses.lock().unwrap();
        if responses.is_empty() {
            Ok(placeholder_png())
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

/// Arguments received by [`MockImageEditClient::edit_image`], recorded per call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEdit {
    pub image: Vec<u8>,
    pub title: String,
    pub logo: Option<Logo>,
}

#[derive(Clone)]
pub struct MockImageEditClient {
    edit_responses: Arc<Mutex<Vec<Vec<u8>>>>,
    call_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
    recorded_calls: Arc<Mutex<Vec<RecordedEdit>>>,
}

impl MockImageEditClient {
    pub fn new() -> Self {
        Self {
            edit_responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
            recorded_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_edit_response(self, response: Vec<u8>) -> Self {
        self.edit_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Every call received so far, in order.
    pub fn recorded_calls(&self) -> Vec<RecordedEdit> {
        self.recorded_calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<RecordedEdit> {
        self.recorded_calls.lock().unwrap().last().cloned()
    }
}

impl Default for MockImageEditClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageEditService for MockImageEditClient {
    async fn edit_image(
        &self,
        image: &[u8],
        title: &str,
        logo: Option<&Logo>,
    ) -> Result<Vec<u8>> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.recorded_calls.lock().unwrap().push(RecordedEdit {
            image: image.to_vec(),
            title: title.to_string(),
            logo: logo.cloned(),
        });

        if *self.should_fail.lock().unwrap() {
            return Err(Error::Edit("Mock edit failure".to_string()));
        }

        let responses = self.edit_responses.lock().unwrap();
        if responses.is_empty() {
            Ok(placeholder_png())
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}
