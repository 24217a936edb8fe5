//! Chat client for retrieval-backed completion APIs.
//!
//! [`ChatClient`] sends one user question, scoped to a document collection,
//! to `POST {base_url}/api/chat/completions` and returns a
//! [`NormalizedResult`].
//!
//! Request body:
//!
//! ```json
//! {
//!   "model": "llama3.1",
//!   "messages": [{"role": "user", "content": "How do we deploy?"}],
//!   "files": [{"type": "collection", "id": "kb-ops"}]
//! }
//! ```
//!
//! # Failure handling
//!
//! Transport failures never surface as `Err`. A timeout, a refused
//! connection, a non-200 status, or a body that is not JSON all produce an
//! error-shaped [`NormalizedResult`] (bracketed `content`, no sources,
//! `status`/`error` filled in). `Err` is reserved for caller mistakes, such
//! as asking without any collection.

use anyhow::{anyhow, bail, Result};
use citation_harness_core::format::truncate_with_ellipsis;
use citation_harness_core::{normalize, NormalizedResult, RequestContext};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

use crate::config::{ApiConfig, Config};
use crate::transport::{HttpTransport, ResponseBody, Transport, TransportError};

pub const CHAT_COMPLETIONS_PATH: &str = "/api/chat/completions";
pub const MODELS_PATH: &str = "/api/models";

const ERROR_BODY_CHARS: usize = 200;

/// Immutable settings a [`ChatClient`] is built from.
#[derive(Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub model: String,
    pub default_collection: Option<String>,
    pub api_key: String,
    pub timeout: Duration,
    pub probe_timeout: Duration,
}

impl ClientSettings {
    /// Combine the `[api]` config section with the credential read from the
    /// environment variable it names.
    ///
    /// # Errors
    ///
    /// Fails when that variable is unset or empty.
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        let api_key = std::env::var(&api.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("{} environment variable not set", api.api_key_env))?;

        Ok(Self {
            base_url: api.base_url.clone(),
            model: api.model.clone(),
            default_collection: api.default_collection.clone(),
            api_key,
            timeout: Duration::from_secs(api.timeout_secs),
            probe_timeout: Duration::from_secs(api.probe_timeout_secs),
        })
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("default_collection", &self.default_collection)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}

pub struct ChatClient<T: Transport = HttpTransport> {
    settings: ClientSettings,
    transport: T,
}

impl ChatClient<HttpTransport> {
    /// Build a client talking HTTP to the configured server.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = ClientSettings::from_config(&config.api)?;
        let transport = HttpTransport::new(&settings.base_url, &settings.api_key)?;
        Self::with_transport(settings, transport)
    }
}

impl<T: Transport> ChatClient<T> {
    /// Build a client over an arbitrary transport.
    ///
    /// # Errors
    ///
    /// Refuses to build without an API key. A missing default collection is
    /// only logged; it becomes an error on the first call that names none.
    pub fn with_transport(settings: ClientSettings, transport: T) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            bail!("API key is required; refusing to build the chat client");
        }
        if settings.default_collection.is_none() {
            tracing::warn!("no default collection configured; every request must name one");
        }
        tracing::info!(base_url = %settings.base_url, model = %settings.model, "chat client ready");
        Ok(Self {
            settings,
            transport,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// The JSON body sent for `query` against `collection`.
    pub fn request_payload(&self, query: &str, collection: &str) -> Value {
        json!({
            "model": self.settings.model,
            "messages": [{"role": "user", "content": query}],
            "files": [{"type": "collection", "id": collection}],
        })
    }

    /// Ask `query` against `collection`, or the default collection.
    ///
    /// # Errors
    ///
    /// Only when neither a collection nor a default is available. Every
    /// network-side failure is returned as an error-shaped result instead.
    pub async fn ask(&self, query: &str, collection: Option<&str>) -> Result<NormalizedResult> {
        let collection = collection
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .or_else(|| self.settings.default_collection.clone())
            .ok_or_else(|| anyhow!("no collection given and no default collection configured"))?;

        let payload = self.request_payload(query, &collection);
        tracing::info!(model = %self.settings.model, %collection, "sending chat request");

        let response = match self
            .transport
            .post_json(CHAT_COMPLETIONS_PATH, &payload, self.settings.timeout)
            .await
        {
            Ok(response) => response,
            Err(err) => return Ok(transport_failure(err)),
        };

        if response.status != 200 {
            tracing::warn!(status = response.status, "chat API returned an error status");
            return Ok(NormalizedResult::failure(
                format!("[ERROR: API returned status {}]", response.status),
                Some(response.status),
                body_excerpt(&response.body),
            ));
        }

        match response.body {
            ResponseBody::Json(raw) => {
                let context = RequestContext {
                    query: Some(query.to_string()),
                    collection_id: Some(collection),
                };
                let result = normalize(raw, Some(&context));
                tracing::info!(sources = result.sources.len(), "chat response normalized");
                Ok(result)
            }
            ResponseBody::Text(text) => {
                tracing::error!("chat API returned a non-JSON body");
                Ok(NormalizedResult::failure(
                    "[ERROR: Invalid JSON in API response]",
                    Some(response.status),
                    truncate_with_ellipsis(&text, ERROR_BODY_CHARS),
                ))
            }
        }
    }

    /// `true` iff `GET /api/models` answers 200.
    pub async fn probe(&self) -> bool {
        match self
            .transport
            .get(MODELS_PATH, self.settings.probe_timeout)
            .await
        {
            Ok(response) => {
                tracing::debug!(status = response.status, "probe response");
                response.status == 200
            }
            Err(err) => {
                tracing::warn!(error = %err, "connectivity probe failed");
                false
            }
        }
    }
}

fn transport_failure(err: TransportError) -> NormalizedResult {
    tracing::error!(error = %err, "chat request failed");
    let content = match &err {
        TransportError::Timeout(_) => "[ERROR: Request timed out]",
        TransportError::Connect(_) => "[ERROR: Could not connect to API]",
        TransportError::Other(_) => "[ERROR: Request failed]",
    };
    NormalizedResult::failure(content, None, err.to_string())
}

fn body_excerpt(body: &ResponseBody) -> String {
    let text = match body {
        ResponseBody::Json(json) => json.to_string(),
        ResponseBody::Text(text) => text.clone(),
    };
    truncate_with_ellipsis(&text, ERROR_BODY_CHARS)
}
