//! Typed client for the relay's generation endpoints.
//!
//! This is the transport the mint workflow talks through. Unlike the
//! relay's own provider calls, a failure here is a real failure (the
//! relay already degraded provider errors before responding), so
//! transport and non-2xx errors are surfaced to the caller.

use crate::models::{
    ErrorResponse, GenerateBatchImagesRequest, GenerateBatchImagesResponse, GenerateImageRequest,
    GenerateImageResponse,
};
use crate::{Error, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

// A full batch can hold ten concurrent model calls open server-side.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// HTTP client for a running relay instance.
pub struct RelayClient {
    client: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Self {
        Self::new_with_client(base_url, Client::new())
    }

    pub fn new_with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Request a single image; returns its hosted URL.
    pub async fn generate_image(&self, prompt: &str) -> Result<String> {
        let request = GenerateImageRequest {
            prompt: Some(prompt.to_string()),
        };
        let response = self.post_json("/generate-image", &request).await?;
        let body: GenerateImageResponse = response.json().await?;
        Ok(body.image_url)
    }

    /// Request `count` images; returns their hosted URLs in slot order.
    pub async fn generate_batch_images(&self, prompt: &str, count: usize) -> Result<Vec<String>> {
        let request = GenerateBatchImagesRequest {
            prompt: Some(prompt.to_string()),
            count: Some(count as i64),
        };
        let response = self.post_json("/generate-batch-images", &request).await?;
        let body: GenerateBatchImagesResponse = response.json().await?;
        Ok(body.image_urls)
    }

    async fn post_json(&self, path: &str, body: &impl Serialize) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to relay: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            // The relay answers errors with an { error } body; fall back
            // to the raw text when it does not.
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            tracing::error!("Relay request to {} failed (status {}): {}", path, status, message);
            return Err(Error::Relay(format!(
                "Relay error (status {}): {}",
                status, message
            )));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_image_posts_prompt_and_returns_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/generate-image"))
            .and(header("content-type", "application/json"))
            .and(body_string_contains("pokemon of fire"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "imageUrl": "https://cdn.test/nft-app/pokemon_of_fire_1.png"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = RelayClient::new(&mock_server.uri());
        let url = client.generate_image("pokemon of fire").await.unwrap();

        assert_eq!(url, "https://cdn.test/nft-app/pokemon_of_fire_1.png");
    }

    #[tokio::test]
    async fn test_generate_batch_images_returns_urls_in_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/generate-batch-images"))
            .and(body_string_contains("\"count\":3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "imageUrls": ["https://cdn.test/a.png", "https://cdn.test/b.png", "https://cdn.test/c.png"]
            })))
            .mount(&mock_server)
            .await;

        let client = RelayClient::new(&mock_server.uri());
        let urls = client.generate_batch_images("lion", 3).await.unwrap();

        assert_eq!(
            urls,
            vec![
                "https://cdn.test/a.png",
                "https://cdn.test/b.png",
                "https://cdn.test/c.png",
            ]
        );
    }

    #[tokio::test]
    async fn test_relay_error_body_is_surfaced() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/generate-image"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "Prompt is required" })),
            )
            .mount(&mock_server)
            .await;

        let client = RelayClient::new(&mock_server.uri());
        let error = client.generate_image("").await.unwrap_err();

        match error {
            Error::Relay(message) => {
                assert!(message.contains("400"));
                assert!(message.contains("Prompt is required"));
            }
            other => panic!("expected relay error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_falls_back_to_raw_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/generate-batch-images"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let client = RelayClient::new(&mock_server.uri());
        let error = client.generate_batch_images("lion", 2).await.unwrap_err();

        match error {
            Error::Relay(message) => {
                assert!(message.contains("502"));
                assert!(message.contains("bad gateway"));
            }
            other => panic!("expected relay error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url_is_tolerated() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/generate-image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "imageUrl": "https://cdn.test/x.png"
            })))
            .mount(&mock_server)
            .await;

        let base = format!("{}/", mock_server.uri());
        let client = RelayClient::new(&base);
        let url = client.generate_image("x").await.unwrap();

        assert_eq!(url, "https://cdn.test/x.png");
    }
}
