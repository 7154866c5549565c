//! # Fetch Subcommand
//!
//! Fetches a path from the PIX endpoint configured in the environment
//! (`PIX_URL`, `PIX_API_TOKEN`, `PIX_TIMEOUT_SECS`, plus the retry settings
//! `PIX_MAX_RETRIES` and `PIX_RETRY_DELAY_MS`).

use anyhow::Context;
use clap::Args;
use pix_client::{PixConfig, Session};
use pix_core::Factory;

/// Arguments for the fetch subcommand.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Request path, relative to `PIX_URL`.
    pub path: String,

    /// List every promoted object in the response instead of printing it.
    #[arg(long, conflicts_with = "raw")]
    pub children: bool,

    /// Print the response without promotion.
    #[arg(long)]
    pub raw: bool,
}

/// Run the fetch subcommand.
pub fn run_fetch(args: &FetchArgs, factory: &Factory) -> anyhow::Result<u8> {
    let config = PixConfig::from_env().context("loading PIX configuration")?;
    tracing::debug!(?config, "PIX configuration");
    let session = Session::new(config, factory.clone())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    runtime.block_on(async {
        if args.children {
            for object in session.children(&args.path).await? {
                println!("{}", crate::describe(&object));
            }
        } else {
            let tree = if args.raw {
                session.get_raw(&args.path).await?
            } else {
                session.get(&args.path).await?
            };
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        Ok::<u8, anyhow::Error>(0)
    })
}
