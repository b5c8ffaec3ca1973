//! Wallet capability: connected identity plus transaction signing.
//!
//! The [`WalletService`] trait is the seam between the mint workflow
//! and whatever actually holds keys. [`WalletRpcClient`] speaks to a
//! local signer service over HTTP; [`MockWallet`] scripts outcomes for
//! tests.

mod client;
mod mock;

pub use client::WalletRpcClient;
pub use mock::MockWallet;

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One argument to a move call, tagged for the JSON wire shape
/// (`{"type": "address", "value": "0x.."}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CallArg {
    Address(String),
    #[serde(rename = "string")]
    Str(String),
}

/// A single on-chain function invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveCall {
    /// Fully qualified `package::module::function` target.
    pub target: String,
    pub arguments: Vec<CallArg>,
}

/// Transaction under construction: an ordered list of move calls the
/// signer executes atomically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub calls: Vec<MoveCall>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move call; returns `&mut self` so calls can be chained.
    pub fn move_call(&mut self, target: impl Into<String>, arguments: Vec<CallArg>) -> &mut Self {
        self.calls.push(MoveCall {
            target: target.into(),
            arguments,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// Result of a signed, executed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub digest: String,
}

/// Capability boundary for the user's wallet.
///
/// `active_address` answers `None` while no wallet is connected;
/// `sign_and_execute` submits the whole transaction in one signature.
#[async_trait]
pub trait WalletService: Send + Sync {
    async fn active_address(&self) -> Result<Option<String>>;

    async fn sign_and_execute(&self, transaction: &Transaction) -> Result<ExecuteResponse>;
}
