//! Offline normalization (`cite normalize`).
//!
//! Runs a saved chat-completion response body through the normalizer
//! without contacting any server. Handy for checking how a new upstream
//! response shape is interpreted.

use anyhow::{Context, Result};
use citation_harness_core::{normalize, NormalizedResult};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use crate::ask::print_result;

/// Read a response body from `path`, or stdin when `path` is `-`.
pub fn read_response(path: &Path) -> Result<Value> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read response from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read response file: {}", path.display()))?
    };

    serde_json::from_str(&text).with_context(|| format!("Not valid JSON: {}", path.display()))
}

/// Normalize the response stored at `path`.
pub fn normalize_file(path: &Path) -> Result<NormalizedResult> {
    let raw = read_response(path)?;
    Ok(normalize(raw, None))
}

/// CLI entry point for `cite normalize`.
pub fn run_normalize(path: &Path, json: bool) -> Result<()> {
    let result = normalize_file(path)?;
    print_result(&result, json)
}
