//! Connectivity check (`cite probe`).

use anyhow::{bail, Result};

use crate::client::ChatClient;
use crate::config::Config;

/// CLI entry point: report whether the configured server answers
/// `GET /api/models` with 200.
pub async fn run_probe(config: &Config) -> Result<()> {
    let client = ChatClient::from_config(config)?;

    if client.probe().await {
        println!("ok: {} is reachable", config.api.base_url);
        Ok(())
    } else {
        bail!("{} is not reachable", config.api.base_url)
    }
}
