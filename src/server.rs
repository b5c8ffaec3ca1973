//! HTTP boundary for the relay: generation endpoints plus static assets.
//!
//! Route order matters: API routes are registered first and the static
//! directory is mounted as the router's fallback service, so API paths
//! are never shadowed by files on disk.

use crate::generator::ImageGenerator;
use crate::models::{
    ErrorResponse, GenerateBatchImagesRequest, GenerateBatchImagesResponse, GenerateImageRequest,
    GenerateImageResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::{error, info, Level};

/// Shared state handed to every request handler.
pub struct AppState {
    pub generator: ImageGenerator,
}

impl AppState {
    pub fn new(generator: ImageGenerator) -> Self {
        Self { generator }
    }
}

/// Errors surfaced to HTTP clients.
///
/// Input validation maps to 400 with a short message and no external
/// calls made; anything unexpected maps to 500 with the underlying
/// error text in `details`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Prompt is required")]
    MissingPrompt,
    #[error("Count must be a positive integer")]
    InvalidCount,
    #[error("{0}")]
    InvalidBody(String),
    #[error("{0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "Something went wrong".to_string(),
                    details: Some(details),
                },
            ),
            validation => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: validation.to_string(),
                    details: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

async fn generate_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<Json<GenerateImageResponse>, ApiError> {
    let Json(request) = payload?;
    let prompt = require_prompt(request.prompt.as_deref())?;
    info!("Received prompt: {:?}", prompt);

    let outcome = state.generator.generate_one(prompt).await;
    Ok(Json(GenerateImageResponse {
        image_url: outcome.into_url(),
    }))
}

async fn generate_batch_images(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateBatchImagesRequest>, JsonRejection>,
) -> Result<Json<GenerateBatchImagesResponse>, ApiError> {
    let Json(request) = payload?;
    let prompt = require_prompt(request.prompt.as_deref())?;
    let count = require_count(request.count)?;
    info!("Received batch prompt: {:?} (count {})", prompt, count);

    let outcomes = state.generator.generate_batch(prompt, count).await;
    let image_urls = outcomes.into_iter().map(|o| o.into_url()).collect();
    Ok(Json(GenerateBatchImagesResponse { image_urls }))
}

fn require_prompt(prompt: Option<&str>) -> Result<&str, ApiError> {
    match prompt {
        Some(p) if !p.trim().is_empty() => Ok(p),
        _ => Err(ApiError::MissingPrompt),
    }
}

// Counts above the batch cap are clamped downstream, not rejected here.
fn require_count(count: Option<i64>) -> Result<usize, ApiError> {
    match count {
        Some(n) if n >= 1 => Ok(n as usize),
        _ => Err(ApiError::InvalidCount),
    }
}

/// Convert an escaped panic into the catch-all 500 JSON shape so one
/// bad request cannot take the process down.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Request handler panicked: {}", details);
    ApiError::Internal(details).into_response()
}

/// Build the relay router over the shared generator state.
pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/generate-image", post(generate_image))
        .route("/generate-batch-images", post(generate_batch_images))
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(panic_response))
}
