//! HTTP Reasoning Client

use crate::parse::parse_analysis;
use crate::request::ReasoningRequest;
use crate::service::ReasoningService;
use crate::RemoteError;
use async_trait::async_trait;
use diagnostic_report::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Remote reasoning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Use the remote service when a request does not say otherwise
    pub enabled: bool,
    /// Endpoint receiving the diagnosis POST
    pub endpoint: Option<String>,
    /// Bearer token, if the service requires one
    pub api_key: Option<String>,
    /// Model name forwarded in the request body
    pub model: String,
    /// Per-request deadline in milliseconds
    pub deadline_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            model: "generator-diagnostic".to_string(),
            deadline_ms: 30_000,
        }
    }
}

impl RemoteConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

/// [`ReasoningService`] over a single JSON POST
#[derive(Debug, Clone)]
pub struct HttpReasoningClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl HttpReasoningClient {
    /// Create a client. Fails with `NotConfigured` when no endpoint is set.
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(RemoteError::NotConfigured)?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReasoningService for HttpReasoningClient {
    async fn query(
        &self,
        request: &ReasoningRequest<'_>,
        deadline: Duration,
    ) -> Result<AnalysisResult, RemoteError> {
        let deadline_ms = deadline.as_millis() as u64;
        let as_error = |e: reqwest::Error| {
            if e.is_timeout() {
                RemoteError::Timeout(deadline_ms)
            } else {
                RemoteError::Network(e.to_string())
            }
        };

        let mut builder = self
            .client
            .post(&self.endpoint)
            .timeout(deadline)
            .json(&request.to_json(&self.model));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        debug!("POST {} ({} readings)", self.endpoint, request.snapshot.len());
        let response = builder.send().await.map_err(as_error)?;

        let status = response.status();
        let body = response.text().await.map_err(as_error)?;
        if !status.is_success() {
            warn!("Remote reasoning returned {}", status);
            return Err(RemoteError::status(status.as_u16(), &body));
        }

        parse_analysis(&body, request)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_endpoint() {
        let err = HttpReasoningClient::new(&RemoteConfig::default()).unwrap_err();
        assert_eq!(err, RemoteError::NotConfigured);

        let blank = RemoteConfig {
            endpoint: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(HttpReasoningClient::new(&blank).is_err());
    }

    #[test]
    fn test_new_client() {
        let config = RemoteConfig {
            endpoint: Some("http://localhost:9000/diagnose".to_string()),
            api_key: Some(String::new()),
            ..Default::default()
        };
        let client = HttpReasoningClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/diagnose");
        assert!(client.api_key.is_none());
        assert_eq!(client.name(), "http");
    }

    #[test]
    fn test_default_deadline() {
        assert_eq!(RemoteConfig::default().deadline(), Duration::from_secs(30));
    }
}
