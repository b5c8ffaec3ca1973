//! Data models and structures
//!
//! Defines the wire payloads shared by the relay endpoints and the
//! orchestrator-side relay client, plus the server configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateBatchImagesRequest {
    pub prompt: Option<String>,
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBatchImagesResponse {
    pub image_urls: Vec<String>,
}

/// JSON error body returned by the relay for 4xx/5xx responses.
///
/// `details` carries the underlying error text and is only present on
/// unexpected (500) failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub image_model: String,
    pub media_access_key_id: String,
    pub media_secret_access_key: String,
    pub media_endpoint: String,
    pub media_bucket: String,
    pub media_base_url: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Config {
    /// Missing required keys fail here, at startup, not per request.
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let media_endpoint = std::env::var("MEDIA_ENDPOINT")
            .unwrap_or_else(|_| "https://nyc3.digitaloceanspaces.com".to_string());
        let media_bucket = std::env::var("MEDIA_BUCKET")
            .map_err(|_| crate::Error::Config("MEDIA_BUCKET not set".to_string()))?;
        let media_base_url = std::env::var("MEDIA_BASE_URL").unwrap_or_else(|_| {
            format!("{}/{}", media_endpoint.trim_end_matches('/'), media_bucket)
        });

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| {
                crate::Error::Config(format!("PORT must be a number, got '{}'", raw))
            })?,
            Err(_) => 8000,
        };

        Ok(Self {
            google_api_key: std::env::var("GOOGLE_API_KEY")
                .map_err(|_| crate::Error::Config("GOOGLE_API_KEY not set".to_string()))?,
            image_model: std::env::var("IMAGE_MODEL")
                .unwrap_or_else(|_| crate::ai::DEFAULT_IMAGE_MODEL.to_string()),
            media_access_key_id: std::env::var("MEDIA_ACCESS_KEY_ID")
                .map_err(|_| crate::Error::Config("MEDIA_ACCESS_KEY_ID not set".to_string()))?,
            media_secret_access_key: std::env::var("MEDIA_SECRET_ACCESS_KEY")
                .map_err(|_| crate::Error::Config("MEDIA_SECRET_ACCESS_KEY not set".to_string()))?,
            media_endpoint,
            media_bucket,
            media_base_url,
            port,
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_image_response_uses_camel_case() {
        let response = GenerateImageResponse {
            image_url: "https://cdn.test/nft-app/a_1.png".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"imageUrl":"https://cdn.test/nft-app/a_1.png"}"#);
    }

    #[test]
    fn test_batch_response_uses_camel_case() {
        let response = GenerateBatchImagesResponse {
            image_urls: vec!["a".to_string(), "b".to_string()],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"imageUrls":["a","b"]}"#);
    }

    #[test]
    fn test_batch_request_accepts_missing_fields() {
        let request: GenerateBatchImagesRequest = serde_json::from_str("{}").unwrap();
        assert!(request.prompt.is_none());
        assert!(request.count.is_none());

        let request: GenerateBatchImagesRequest =
            serde_json::from_str(r#"{"prompt":"lion","count":15}"#).unwrap();
        assert_eq!(request.prompt.as_deref(), Some("lion"));
        assert_eq!(request.count, Some(15));
    }

    #[test]
    fn test_error_response_omits_empty_details() {
        let body = ErrorResponse {
            error: "Prompt is required".to_string(),
            details: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Prompt is required"}"#
        );

        let body = ErrorResponse {
            error: "Something went wrong".to_string(),
            details: Some("boom".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Something went wrong","details":"boom"}"#
        );
    }
}
