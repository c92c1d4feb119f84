//! Graph-builder collaborator: the trait the coordinator awaits, an HTTP
//! client for the visualize service, and an offline source.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BuilderError;
use crate::model::{GraphResult, VisualizeRequest};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Turns config documents into a finished graph, or fails with a message.
#[async_trait]
pub trait GraphBuilder {
    async fn build(&self, request: &VisualizeRequest) -> Result<GraphResult, BuilderError>;
}

/// Pull the human-readable `detail` out of an error body.
///
/// Accepts `{"detail": "text"}` and the validation shape
/// `{"detail": [{"msg": "..."}, ...]}`; anything else yields `None`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<String> = items
                .iter()
                .filter_map(|item| match item.get("msg") {
                    Some(Value::String(m)) => Some(m.clone()),
                    _ => None,
                })
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}

// ─── StaticGraphSource ───────────────────────────────────────────────────────

/// Serves one pre-built outcome for every request.
#[derive(Debug, Clone)]
pub struct StaticGraphSource {
    outcome: Result<GraphResult, BuilderError>,
}

impl StaticGraphSource {
    pub fn new(result: GraphResult) -> Self {
        Self {
            outcome: Ok(result),
        }
    }

    pub fn failing(error: BuilderError) -> Self {
        Self {
            outcome: Err(error),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, BuilderError> {
        let result: GraphResult =
            serde_json::from_str(text).map_err(|e| BuilderError::Decode(e.to_string()))?;
        Ok(Self::new(result))
    }
}

#[async_trait]
impl GraphBuilder for StaticGraphSource {
    async fn build(&self, _request: &VisualizeRequest) -> Result<GraphResult, BuilderError> {
        self.outcome.clone()
    }
}

// ─── HttpGraphBuilder ────────────────────────────────────────────────────────

/// Client for the visualize service (`POST /visualize`, `GET /healthz`).
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpGraphBuilder {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpGraphBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Use a preconfigured client (timeouts, proxies, TLS roots).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The service's reported status, e.g. `"ok"`.
    pub async fn healthz(&self) -> Result<String, BuilderError> {
        let url = format!("{}/healthz", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BuilderError::Transport(e.to_string()))?;
        let body = Self::checked_body(resp).await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| BuilderError::Decode(e.to_string()))?;
        Ok(value
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string())
    }

    async fn checked_body(resp: reqwest::Response) -> Result<String, BuilderError> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| BuilderError::Transport(e.to_string()))?;
        if status.is_success() {
            return Ok(body);
        }
        let detail = extract_detail(&body)
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| format!("request failed with status {}", status));
        Err(BuilderError::Service {
            status: status.as_u16(),
            detail,
        })
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl GraphBuilder for HttpGraphBuilder {
    async fn build(&self, request: &VisualizeRequest) -> Result<GraphResult, BuilderError> {
        let url = format!("{}/visualize", self.base_url);
        log::debug!("POST {} ({} configs)", url, request.configs.len());
        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| BuilderError::Transport(e.to_string()))?;
        let body = Self::checked_body(resp).await?;
        serde_json::from_str(&body).map_err(|e| BuilderError::Decode(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_client.rs"]
mod tests;
