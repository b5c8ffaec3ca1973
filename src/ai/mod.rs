//! AI service integration for image generation
//!
//! Provides the interface to the generative model that turns a text
//! prompt into image bytes, plus a scripted mock for tests.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiImageClient;
pub use mock::MockImageModel;

use crate::Result;
use async_trait::async_trait;

/// Model used when the environment does not override `IMAGE_MODEL`.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

/// Decoded image returned by the model, with the mime type the provider
/// reported for it.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[async_trait]
pub trait ImageModelService: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage>;
}
