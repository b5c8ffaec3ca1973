//! Scripted wallet for workflow tests.

use super::{ExecuteResponse, Transaction, WalletService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

const DEFAULT_DIGEST: &str = "mock-digest-0000";

/// In-memory wallet double. Starts disconnected; configure an address,
/// a digest, or a scripted failure before handing it to a workflow.
/// Executed transactions are recorded for inspection.
#[derive(Clone)]
pub struct MockWallet {
    address: Arc<Mutex<Option<String>>>,
    digest: Arc<Mutex<String>>,
    executed: Arc<Mutex<Vec<Transaction>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            address: Arc::new(Mutex::new(None)),
            digest: Arc::new(Mutex::new(DEFAULT_DIGEST.to_string())),
            executed: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_address(self, address: &str) -> Self {
        *self.address.lock().unwrap() = Some(address.to_string());
        self
    }

    pub fn with_digest(self, digest: &str) -> Self {
        *self.digest.lock().unwrap() = digest.to_string();
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn executed_transactions(&self) -> Vec<Transaction> {
        self.executed.lock().unwrap().clone()
    }

    pub fn get_execution_count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletService for MockWallet {
    async fn active_address(&self) -> Result<Option<String>> {
        Ok(self.address.lock().unwrap().clone())
    }

    async fn sign_and_execute(&self, transaction: &Transaction) -> Result<ExecuteResponse> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::Wallet(message));
        }

        self.executed.lock().unwrap().push(transaction.clone());
        Ok(ExecuteResponse {
            digest: self.digest.lock().unwrap().clone(),
        })
    }
}
