//! HTTP transport abstraction.
//!
//! [`Transport`] is the single seam between the chat client and the network.
//! [`HttpTransport`] is the production implementation on top of `reqwest`;
//! tests substitute their own implementations or point `HttpTransport` at a
//! mock server.
//!
//! Transports report what happened and nothing more: the status code and
//! the body (decoded JSON when it parses, raw text otherwise). Deciding what
//! a non-200 status means is left to the caller.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Body of an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: ResponseBody,
}

/// Failures that prevented any HTTP response from arriving.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("could not connect: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Other(String),
}

/// Sends requests relative to a server's base URL.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `POST {base}{path}` with a JSON body.
    async fn post_json(
        &self,
        path: &str,
        payload: &Value,
        timeout: Duration,
    ) -> std::result::Result<TransportResponse, TransportError>;

    /// `GET {base}{path}`.
    async fn get(
        &self,
        path: &str,
        timeout: Duration,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport sending a bearer token on every request.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        path: &str,
        payload: &Value,
        timeout: Duration,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let resp = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        read_response(resp, timeout).await
    }

    async fn get(
        &self,
        path: &str,
        timeout: Duration,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let resp = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        read_response(resp, timeout).await
    }
}

async fn read_response(
    resp: reqwest::Response,
    timeout: Duration,
) -> std::result::Result<TransportResponse, TransportError> {
    let status = resp.status().as_u16();
    let text = resp.text().await.map_err(|e| classify(e, timeout))?;

    let body = match serde_json::from_str::<Value>(&text) {
        Ok(json) => ResponseBody::Json(json),
        Err(_) => ResponseBody::Text(text),
    };

    Ok(TransportResponse { status, body })
}

fn classify(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
