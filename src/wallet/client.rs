//! HTTP client for a local wallet signer service.

use super::{ExecuteResponse, Transaction, WalletService};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct AddressResponse {
    address: Option<String>,
}

/// Talks to a signer service that owns the keypair; this process never
/// sees key material.
pub struct WalletRpcClient {
    client: Client,
    base_url: String,
}

impl WalletRpcClient {
    pub fn new(base_url: &str) -> Self {
        Self::new_with_client(base_url, Client::new())
    }

    pub fn new_with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl WalletService for WalletRpcClient {
    async fn active_address(&self) -> Result<Option<String>> {
        let url = format!("{}/wallet/address", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach wallet service: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(Error::Wallet(format!(
                "Wallet address lookup failed (status {}): {}",
                status, text
            )));
        }

        let body: AddressResponse = response.json().await?;
        Ok(body.address)
    }

    async fn sign_and_execute(&self, transaction: &Transaction) -> Result<ExecuteResponse> {
        let url = format!("{}/wallet/sign-and-execute", self.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(transaction)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to submit transaction to wallet service: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            tracing::error!("Wallet rejected transaction (status {}): {}", status, text);
            return Err(Error::Wallet(format!(
                "Transaction failed (status {}): {}",
                status, text
            )));
        }

        let body: ExecuteResponse = response.json().await?;
        tracing::info!("Transaction executed with digest {}", body.digest);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::super::CallArg;
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_active_address_returns_connected_address() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wallet/address"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": "0x12ab"
            })))
            .mount(&mock_server)
            .await;

        let client = WalletRpcClient::new(&mock_server.uri());
        let address = client.active_address().await.unwrap();

        assert_eq!(address, Some("0x12ab".to_string()));
    }

    #[tokio::test]
    async fn test_active_address_none_when_disconnected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wallet/address"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": null
            })))
            .mount(&mock_server)
            .await;

        let client = WalletRpcClient::new(&mock_server.uri());
        let address = client.active_address().await.unwrap();

        assert_eq!(address, None);
    }

    #[tokio::test]
    async fn test_sign_and_execute_posts_tagged_calls_and_returns_digest() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/wallet/sign-and-execute"))
            .and(body_string_contains("\"type\":\"address\""))
            .and(body_string_contains("mint_loyalty"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "digest": "9WzSXd"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut transaction = Transaction::new();
        transaction.move_call(
            "0xabc::loyalty_card::mint_loyalty",
            vec![
                CallArg::Address("0x12".to_string()),
                CallArg::Str("https://cdn.test/a.png".to_string()),
            ],
        );

        let client = WalletRpcClient::new(&mock_server.uri());
        let response = client.sign_and_execute(&transaction).await.unwrap();

        assert_eq!(response.digest, "9WzSXd");
    }

    #[tokio::test]
    async fn test_rejected_transaction_surfaces_wallet_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/wallet/sign-and-execute"))
            .respond_with(ResponseTemplate::new(422).set_body_string("insufficient gas"))
            .mount(&mock_server)
            .await;

        let client = WalletRpcClient::new(&mock_server.uri());
        let error = client
            .sign_and_execute(&Transaction::new())
            .await
            .unwrap_err();

        match error {
            Error::Wallet(message) => {
                assert!(message.contains("422"));
                assert!(message.contains("insufficient gas"));
            }
            other => panic!("expected wallet error, got: {:?}", other),
        }
    }
}
