//! Client-side mint workflow: generate images through the relay, then
//! mint them on-chain through the wallet capability.
//!
//! The workflow mirrors a dapp form. One operation runs at a time,
//! moving from idle into generating or minting and back to idle, and
//! re-entry is refused while a phase is in flight. Relay transport errors and
//! wallet errors are surfaced to the user verbatim; by the time a
//! response reaches this layer, provider failures have already been
//! degraded to fallback URLs on the server side.

use crate::relay::RelayClient;
use crate::wallet::{CallArg, Transaction, WalletService};
use thiserror::Error;
use tracing::info;

/// Move entry point invoked once per minted image.
const MINT_FUNCTION: &str = "loyalty_card::mint_loyalty";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Generating,
    Minting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Single,
    Batch(usize),
}

/// Workflow errors, worded for direct display to the end user.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("an operation is already in progress")]
    Busy,
    #[error("wallet is not connected")]
    WalletNotConnected,
    #[error("package ID is required")]
    MissingPackageId,
    #[error("recipient address is required")]
    MissingRecipient,
    #[error("no generated image to mint")]
    NoGeneratedImage,
    #[error("prompt is required")]
    MissingPrompt,
    #[error("image generation failed: {0}")]
    Generation(String),
    #[error("mint failed: {0}")]
    Wallet(String),
}

/// Form state plus the two capabilities it drives.
pub struct MintWorkflow {
    relay: RelayClient,
    wallet: Box<dyn WalletService>,
    phase: Phase,
    package_id: String,
    recipient: String,
    prompt: String,
    image_urls: Vec<String>,
    wallet_address: Option<String>,
    last_error: Option<String>,
}

impl MintWorkflow {
    pub fn new(relay: RelayClient, wallet: Box<dyn WalletService>) -> Self {
        Self {
            relay,
            wallet,
            phase: Phase::Idle,
            package_id: String::new(),
            recipient: String::new(),
            prompt: String::new(),
            image_urls: Vec::new(),
            wallet_address: None,
            last_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn set_package_id(&mut self, package_id: &str) {
        self.package_id = package_id.to_string();
    }

    pub fn set_recipient(&mut self, recipient: &str) {
        self.recipient = recipient.to_string();
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    pub fn image_urls(&self) -> &[String] {
        &self.image_urls
    }

    pub fn wallet_address(&self) -> Option<&str> {
        self.wallet_address.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Query the wallet for its active address. A connected wallet
    /// auto-fills the recipient field; a disconnected one clears it.
    pub async fn connect_wallet(&mut self) -> Result<Option<String>, WorkflowError> {
        let address = self
            .wallet
            .active_address()
            .await
            .map_err(|e| WorkflowError::Wallet(e.to_string()))?;

        match &address {
            Some(addr) => {
                self.recipient = addr.clone();
                self.wallet_address = Some(addr.clone());
            }
            None => {
                self.recipient.clear();
                self.wallet_address = None;
            }
        }
        Ok(address)
    }

    /// Everything the mint button needs before it is worth pressing.
    pub fn can_mint(&self) -> bool {
        self.phase == Phase::Idle
            && self.wallet_address.is_some()
            && !self.package_id.trim().is_empty()
            && !self.recipient.trim().is_empty()
            && !self.image_urls.is_empty()
    }

    /// Ask the relay for one image or a batch, storing the returned
    /// URLs as the form's current image references.
    pub async fn generate(&mut self, mode: GenerationMode) -> Result<(), WorkflowError> {
        if self.phase != Phase::Idle {
            return Err(WorkflowError::Busy);
        }
        if self.prompt.trim().is_empty() {
            return Err(WorkflowError::MissingPrompt);
        }

        self.phase = Phase::Generating;
        // Previous results are stale the moment a new request starts.
        self.image_urls.clear();

        let result = match mode {
            GenerationMode::Single => self
                .relay
                .generate_image(&self.prompt)
                .await
                .map(|url| vec![url]),
            GenerationMode::Batch(count) => {
                self.relay.generate_batch_images(&self.prompt, count).await
            }
        };
        self.phase = Phase::Idle;

        match result {
            Ok(urls) => {
                info!("Generated {} image(s)", urls.len());
                self.image_urls = urls;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.last_error = Some(message.clone());
                Err(WorkflowError::Generation(message))
            }
        }
    }

    /// Mint every generated image in one signed transaction: one move
    /// call per URL. On success the image and prompt fields reset for
    /// the next creation; on failure every field is left intact so the
    /// user can retry.
    pub async fn mint(&mut self) -> Result<String, WorkflowError> {
        if self.phase != Phase::Idle {
            return Err(WorkflowError::Busy);
        }
        if self.wallet_address.is_none() {
            return Err(WorkflowError::WalletNotConnected);
        }
        if self.package_id.trim().is_empty() {
            return Err(WorkflowError::MissingPackageId);
        }
        if self.recipient.trim().is_empty() {
            return Err(WorkflowError::MissingRecipient);
        }
        if self.image_urls.is_empty() {
            return Err(WorkflowError::NoGeneratedImage);
        }

        self.phase = Phase::Minting;

        let target = format!("{}::{}", self.package_id.trim(), MINT_FUNCTION);
        let mut transaction = Transaction::new();
        for url in &self.image_urls {
            transaction.move_call(
                target.clone(),
                vec![
                    CallArg::Address(self.recipient.trim().to_string()),
                    CallArg::Str(url.clone()),
                ],
            );
        }

        let result = self.wallet.sign_and_execute(&transaction).await;
        self.phase = Phase::Idle;

        match result {
            Ok(response) => {
                info!(
                    "Minted {} image(s), digest {}",
                    transaction.calls.len(),
                    response.digest
                );
                self.image_urls.clear();
                self.prompt.clear();
                self.last_error = None;
                Ok(response.digest)
            }
            Err(e) => {
                let message = e.to_string();
                self.last_error = Some(message.clone());
                Err(WorkflowError::Wallet(message))
            }
        }
    }
}
