//! Question answering (`cite ask`).
//!
//! Sends one question through [`ChatClient::ask`] and prints the answer
//! followed by its numbered sources, or the whole [`NormalizedResult`] as
//! JSON with `--json`.

use anyhow::{bail, Result};
use citation_harness_core::format::format_sources;
use citation_harness_core::NormalizedResult;

use crate::client::ChatClient;
use crate::config::Config;

/// CLI entry point for `cite ask`.
///
/// Error-shaped results are still printed, then reported as a failed
/// command so the exit status reflects them.
pub async fn run_ask(
    config: &Config,
    question: &str,
    collection: Option<String>,
    json: bool,
) -> Result<()> {
    if question.trim().is_empty() {
        bail!("question must not be empty");
    }

    let client = ChatClient::from_config(config)?;
    let result = client.ask(question, collection.as_deref()).await?;

    print_result(&result, json)?;

    if let Some(error) = &result.error {
        bail!("chat request failed: {}", error);
    }
    Ok(())
}

/// Print a result either as pretty JSON or as answer text plus sources.
pub fn print_result(result: &NormalizedResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("{}", result.content);
    println!();

    if result.sources.is_empty() {
        println!("No sources.");
        return Ok(());
    }

    println!("Sources:");
    for entry in format_sources(&result.sources) {
        println!("{}", entry);
    }

    Ok(())
}
