//! TOML configuration parsing and validation.
//!
//! Citation Harness reads its settings from a TOML file (default
//! `./config/cite.toml`). The API credential is deliberately not stored in
//! the file; `[api].api_key_env` names the environment variable that holds
//! it, and it is read once when the client is built
//! (see [`crate::client::ClientSettings::from_config`]).
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:3000"
//! model = "llama3.1:8b"
//! default_collection = "kb-engineering"
//! timeout_secs = 60
//!
//! [logging]
//! filter = "info"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Server root, e.g. `http://localhost:3000`. A trailing `/` is removed.
    pub base_url: String,
    /// Model identifier sent with every chat request.
    pub model: String,
    /// Collection used when a call does not name one.
    #[serde(default)]
    pub default_collection: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_timeout_secs() -> u64 {
    60
}
fn default_probe_timeout_secs() -> u64 {
    10
}
fn default_api_key_env() -> String {
    "OPENWEBUI_API_KEY".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Read, parse, and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<Config> {
    let mut config: Config =
        toml::from_str(content).with_context(|| "Failed to parse config file")?;

    // Validate api
    let base_url = config.api.base_url.trim().trim_end_matches('/').to_string();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        bail!(
            "api.base_url must start with http:// or https:// (got '{}')",
            config.api.base_url
        );
    }
    config.api.base_url = base_url;

    if config.api.model.trim().is_empty() {
        bail!("api.model must not be empty");
    }
    if config.api.timeout_secs == 0 {
        bail!("api.timeout_secs must be > 0");
    }
    if config.api.probe_timeout_secs == 0 {
        bail!("api.probe_timeout_secs must be > 0");
    }
    if config.api.api_key_env.trim().is_empty() {
        bail!("api.api_key_env must name an environment variable");
    }

    config.api.default_collection = config
        .api
        .default_collection
        .take()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[api]
base_url = "http://localhost:3000/"
model = "llama3.1"
"#;

    #[test]
    fn defaults_applied() {
        let config = parse_config(MINIMAL).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.timeout_secs, 60);
        assert_eq!(config.api.probe_timeout_secs, 10);
        assert_eq!(config.api.api_key_env, "OPENWEBUI_API_KEY");
        assert_eq!(config.api.default_collection, None);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn full_config() {
        let config = parse_config(
            r#"
[api]
base_url = "https://chat.example.org"
model = "gpt-4o"
default_collection = "kb-1"
timeout_secs = 30
api_key_env = "CHAT_TOKEN"

[logging]
filter = "citation_harness=debug"
"#,
        )
        .unwrap();
        assert_eq!(config.api.default_collection.as_deref(), Some("kb-1"));
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.api_key_env, "CHAT_TOKEN");
        assert_eq!(config.logging.filter, "citation_harness=debug");
    }

    #[test]
    fn blank_collection_is_none() {
        let config = parse_config(
            r#"
[api]
base_url = "http://localhost:3000"
model = "m"
default_collection = "  "
"#,
        )
        .unwrap();
        assert_eq!(config.api.default_collection, None);
    }

    #[test]
    fn rejects_bad_base_url() {
        let err = parse_config(
            r#"
[api]
base_url = "localhost:3000"
model = "m"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    fn rejects_empty_model_and_zero_timeout() {
        let err = parse_config(
            r#"
[api]
base_url = "http://h"
model = " "
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("api.model"));

        let err = parse_config(
            r#"
[api]
base_url = "http://h"
model = "m"
timeout_secs = 0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn missing_api_section_fails() {
        assert!(parse_config("[logging]\nfilter = \"warn\"\n").is_err());
    }
}
