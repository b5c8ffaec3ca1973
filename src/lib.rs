//! AI image relay for NFT minting - turns prompts into hosted image URLs
//!
//! The relay exposes HTTP endpoints that generate images from prompts and
//! host them publicly, degrading to a placeholder URL when a provider
//! fails. The workflow side drives the full generate-then-mint flow
//! against a running relay and a wallet signer.

pub mod ai;
pub mod error;
pub mod generator;
pub mod media;
pub mod models;
pub mod relay;
pub mod server;
pub mod wallet;
pub mod workflow;

pub use error::{Error, Result};
