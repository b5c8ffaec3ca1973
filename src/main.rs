use anyhow::Result;
use nft_relay::ai::GeminiImageClient;
use nft_relay::generator::ImageGenerator;
use nft_relay::media::MediaHostClient;
use nft_relay::models::Config;
use nft_relay::server::{self, AppState};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nft_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting nft-relay");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let model = GeminiImageClient::new(config.google_api_key, config.image_model);
    let media = match MediaHostClient::new(
        config.media_access_key_id,
        config.media_secret_access_key,
        config.media_endpoint,
        config.media_bucket,
        config.media_base_url,
    )
    .await
    {
        Ok(media) => media,
        Err(e) => {
            error!("Failed to initialize media host client: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(ImageGenerator::new(
        Box::new(model),
        Box::new(media),
    )));
    let app = server::router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("Relay listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
