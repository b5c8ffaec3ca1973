//! Image generation pipeline: a prompt goes through the model and the
//! media host and comes back as a public URL.
//!
//! Both operations are total. Provider failures never escape: each
//! failed attempt degrades to a fixed placeholder URL, so a caller
//! always receives exactly one URL per requested image.

use crate::ai::ImageModelService;
use crate::media::MediaHostService;
use crate::Result;
use chrono::Utc;
use futures::future::join_all;
use tracing::{error, info};

/// Placeholder returned when generation or upload fails.
pub const FALLBACK_IMAGE_URL: &str =
    "https://via.placeholder.com/1024x1024/b33e38/FFFFFF?text=AI+Generation+Failed";

/// Upper bound on batch size; larger requests are clamped, not rejected.
pub const MAX_BATCH_IMAGES: usize = 10;

const MEDIA_FOLDER: &str = "nft-app";
const PUBLIC_ID_PREFIX_CHARS: usize = 40;

/// Result of one generation attempt.
///
/// A degraded attempt carries the fallback URL plus the reason it
/// failed; the reason stays server-side for logging and never crosses
/// the HTTP boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated { url: String },
    Degraded { url: String, reason: String },
}

impl GenerationOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Generated { url } | Self::Degraded { url, .. } => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            Self::Generated { url } | Self::Degraded { url, .. } => url,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Coordinates the generative model and the media host for single and
/// batch image generation.
pub struct ImageGenerator {
    model: Box<dyn ImageModelService>,
    media: Box<dyn MediaHostService>,
}

impl ImageGenerator {
    pub fn new(model: Box<dyn ImageModelService>, media: Box<dyn MediaHostService>) -> Self {
        Self { model, media }
    }

    /// Generate one image for `prompt` and host it publicly.
    ///
    /// Never fails outward: any model or media-host error is logged and
    /// replaced with [`FALLBACK_IMAGE_URL`].
    pub async fn generate_one(&self, prompt: &str) -> GenerationOutcome {
        match self.try_generate(prompt).await {
            Ok(url) => {
                info!("Hosted generated image at {}", url);
                GenerationOutcome::Generated { url }
            }
            Err(e) => {
                error!("Image generation pipeline failed: {}", e);
                GenerationOutcome::Degraded {
                    url: FALLBACK_IMAGE_URL.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_generate(&self, prompt: &str) -> Result<String> {
        let image = self.model.generate_image(prompt).await?;

        let public_id = derive_public_id(prompt, Utc::now().timestamp_millis());
        let key = format!(
            "{}/{}.{}",
            MEDIA_FOLDER,
            public_id,
            extension_for_mime(&image.mime_type)
        );

        self.media
            .upload_file(&key, &image.bytes, &image.mime_type)
            .await
    }

    /// Generate `count` images (clamped into `[1, MAX_BATCH_IMAGES]`),
    /// one per prompt variant.
    ///
    /// All attempts are issued before any is awaited, so batch latency
    /// is bounded by the slowest item. Because [`Self::generate_one`]
    /// is total, the returned vector always has exactly the clamped
    /// length; failed slots hold the fallback URL.
    pub async fn generate_batch(&self, prompt: &str, count: usize) -> Vec<GenerationOutcome> {
        let count = count.clamp(1, MAX_BATCH_IMAGES);
        info!("Generating batch of {} images", count);

        let attempts = (1..=count).map(|k| {
            let varied = vary_prompt(prompt, k);
            async move { self.generate_one(&varied).await }
        });

        join_all(attempts).await
    }
}

/// Derive the stable, URL-safe identifier for a hosted image: the first
/// 40 prompt characters with non-alphanumerics replaced by `_`, then
/// the wall-clock milliseconds so repeated prompts do not collide.
///
/// Uniqueness is best-effort: two identical prompts in the same
/// millisecond share an identifier, which is accepted.
pub fn derive_public_id(prompt: &str, timestamp_millis: i64) -> String {
    let prefix: String = prompt
        .chars()
        .take(PUBLIC_ID_PREFIX_CHARS)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}", prefix, timestamp_millis)
}

/// Prompt variant for batch slot `k` (1-based), so the provider is not
/// asked to produce N identical outputs from one prompt.
pub fn vary_prompt(prompt: &str, k: usize) -> String {
    format!("{}, high quality, digital art #{}", prompt, k)
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        // Gemini defaults to PNG; unknown types get the same treatment.
        _ => "png",
    }
}
