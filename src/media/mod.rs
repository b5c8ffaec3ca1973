//! Media hosting integration for generated images
//!
//! Handles uploading image bytes to S3-compatible storage
//! (DigitalOcean Spaces) and returning the stable public URL the NFT
//! will reference.

pub mod client;
pub mod mock;

pub use client::MediaHostClient;
pub use mock::MockMediaHost;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait MediaHostService: Send + Sync {
    /// Store `data` under `key` and return its public URL.
    async fn upload_file(&self, key: &str, data: &[u8], content_type: &str) -> Result<String>;
}
