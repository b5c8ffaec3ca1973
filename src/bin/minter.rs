//! Command-line mint workflow: generate images through a running relay,
//! then mint them as loyalty cards in one signed transaction.

use anyhow::Result as AnyResult;
use clap::Parser;
use nft_relay::relay::RelayClient;
use nft_relay::wallet::WalletRpcClient;
use nft_relay::workflow::{GenerationMode, MintWorkflow};
use nft_relay::{Error, Result};

#[derive(Debug, Parser)]
#[command(name = "minter")]
#[command(about = "Generate AI images via the relay and mint them on-chain")]
struct CliArgs {
    /// Image prompt.
    prompt: String,

    /// Base URL of the running relay.
    #[arg(long, default_value = "http://localhost:8000")]
    relay_url: String,

    /// Base URL of the wallet signer service.
    #[arg(long, default_value = "http://localhost:9000")]
    wallet_url: String,

    /// Deployed package ID holding the loyalty_card module.
    #[arg(long)]
    package_id: String,

    /// Recipient address; defaults to the wallet's active address.
    #[arg(long)]
    recipient: Option<String>,

    /// Number of images to mint (a batch request when above one).
    #[arg(long, default_value_t = 1)]
    count: usize,
}

impl CliArgs {
    fn parse_for_app() -> Result<Self> {
        let args = Self::try_parse().map_err(|e| Error::Config(e.to_string()))?;
        args.validate()
    }

    #[cfg(test)]
    fn parse_from_for_test<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let collected: Vec<String> = args.into_iter().map(Into::into).collect();
        let args = Self::try_parse_from(collected).map_err(|e| Error::Config(e.to_string()))?;
        args.validate()
    }

    fn generation_mode(&self) -> GenerationMode {
        if self.count > 1 {
            GenerationMode::Batch(self.count)
        } else {
            GenerationMode::Single
        }
    }

    fn validate(self) -> Result<Self> {
        if self.count == 0 {
            return Err(Error::Config("--count must be >= 1".to_string()));
        }
        if self.package_id.trim().is_empty() {
            return Err(Error::Config("--package-id must not be empty".to_string()));
        }
        Ok(self)
    }
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    run().await
}

async fn run() -> AnyResult<()> {
    let args = CliArgs::parse_for_app()?;

    let relay = RelayClient::new(&args.relay_url);
    let wallet = WalletRpcClient::new(&args.wallet_url);
    let mut workflow = MintWorkflow::new(relay, Box::new(wallet));

    match workflow.connect_wallet().await? {
        Some(address) => println!("Wallet connected: {}", address),
        None => println!("No wallet connected"),
    }

    workflow.set_package_id(&args.package_id);
    if let Some(recipient) = &args.recipient {
        workflow.set_recipient(recipient);
    }
    workflow.set_prompt(&args.prompt);

    println!("Generating {} image(s)...", args.count);
    workflow.generate(args.generation_mode()).await?;
    for url in workflow.image_urls() {
        println!("  {}", url);
    }

    let digest = workflow.mint().await?;
    println!("Minted successfully. Digest: {}", digest);
    Ok(())
}
