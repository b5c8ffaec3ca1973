use super::{GeneratedImage, ImageModelService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

enum ScriptedResponse {
    Image(GeneratedImage),
    Failure(String),
}

/// Scripted stand-in for the generative model.
///
/// Responses are consumed in order and cycle when exhausted; with no
/// script configured every call returns a tiny valid PNG.
#[derive(Clone)]
pub struct MockImageModel {
    responses: Arc<Mutex<Vec<ScriptedResponse>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockImageModel {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_image_response(self, bytes: Vec<u8>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(ScriptedResponse::Image(GeneratedImage {
                bytes,
                mime_type: "image/png".to_string(),
            }));
        self
    }

    pub fn with_image_response_mime(self, bytes: Vec<u8>, mime_type: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(ScriptedResponse::Image(GeneratedImage {
                bytes,
                mime_type: mime_type.to_string(),
            }));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(ScriptedResponse::Failure(message.to_string()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Prompts received so far, in arrival order.
    pub fn received_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageModel {
    fn default() -> Self {
        Self::new()
    }
}

// 1x1 PNG used when no responses are scripted.
const DEFAULT_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 pixel
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44,
    0x41, // IDAT chunk
    0x54, 0x08, 0x99, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0xE2, 0x25,
    0x00, 0xBC, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, // IEND chunk
    0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[async_trait]
impl ImageModelService for MockImageModel {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.prompts.lock().unwrap().push(prompt.to_string());

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(GeneratedImage {
                bytes: DEFAULT_PNG.to_vec(),
                mime_type: "image/png".to_string(),
            });
        }

        let index = (*count - 1) % responses.len();
        match &responses[index] {
            ScriptedResponse::Image(image) => Ok(image.clone()),
            ScriptedResponse::Failure(message) => Err(Error::AiProvider(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_response_is_valid_png() {
        let model = MockImageModel::new();

        let image = model.generate_image("anything").await.unwrap();
        assert_eq!(&image.bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(image.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_scripted_responses_cycle() {
        let model = MockImageModel::new()
            .with_image_response(vec![1])
            .with_image_response(vec![2]);

        assert_eq!(model.generate_image("a").await.unwrap().bytes, vec![1]);
        assert_eq!(model.generate_image("b").await.unwrap().bytes, vec![2]);
        // Cycles back to the first response.
        assert_eq!(model.generate_image("c").await.unwrap().bytes, vec![1]);
    }

    #[tokio::test]
    async fn test_scripted_failures_interleave() {
        let model = MockImageModel::new()
            .with_image_response(vec![1])
            .with_failure("model offline");

        assert!(model.generate_image("a").await.is_ok());
        let err = model.generate_image("b").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
        assert!(err.to_string().contains("model offline"));
    }

    #[tokio::test]
    async fn test_prompts_and_calls_are_recorded() {
        let model = MockImageModel::new();
        assert_eq!(model.get_call_count(), 0);

        model.generate_image("first").await.unwrap();
        model.generate_image("second").await.unwrap();

        assert_eq!(model.get_call_count(), 2);
        assert_eq!(model.received_prompts(), vec!["first", "second"]);
    }
}
