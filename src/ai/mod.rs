//! AI service integration for thumbnail generation and editing
//!
//! Defines the facade traits the session orchestrator talks to, plus the
//! Gemini-backed implementations and mock doubles.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::{GeminiImageClient, GeminiImageEditClient};
pub use mock::{MockImageEditClient, MockImageGenerationClient};

use crate::models::Logo;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Generate thumbnail image bytes from a video description.
    async fn generate_image(&self, description: &str) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait ImageEditService: Send + Sync {
    /// Overlay a title (and optional logo) onto an existing image, returning
    /// the edited image bytes.
    async fn edit_image(&self, image: &[u8], title: &str, logo: Option<&Logo>)
        -> Result<Vec<u8>>;
}
