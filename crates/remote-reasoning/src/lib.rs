//! Remote Reasoning Adapter
//!
//! Optional, richer diagnosis from an external reasoning service. The
//! [`ReasoningService`] trait is the seam the orchestrator talks to;
//! [`HttpReasoningClient`] is the production implementation. Every response
//! is shape-checked before it is trusted.

mod client;
mod parse;
mod request;
mod service;

pub use client::{HttpReasoningClient, RemoteConfig};
pub use parse::parse_analysis;
pub use request::{DiagnosticContext, ReasoningRequest};
pub use service::ReasoningService;

use thiserror::Error;

/// Longest response body kept in a [`RemoteError::Status`]
pub const MAX_ERROR_BODY: usize = 512;

/// Remote reasoning errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote service returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Timed out after {0}ms")]
    Timeout(u64),

    #[error("Remote reasoning is not configured")]
    NotConfigured,
}

impl RemoteError {
    /// Short, user-presentable reason
    pub fn reason(&self) -> String {
        match self {
            RemoteError::Network(msg) => format!("network error ({msg})"),
            RemoteError::Status { code, .. } => format!("service returned HTTP {code}"),
            RemoteError::Malformed(msg) => format!("malformed response ({msg})"),
            RemoteError::Timeout(ms) => format!("timed out after {ms}ms"),
            RemoteError::NotConfigured => "not configured".to_string(),
        }
    }

    /// Stable label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteError::Network(_) => "network",
            RemoteError::Status { .. } => "status",
            RemoteError::Malformed(_) => "malformed",
            RemoteError::Timeout(_) => "timeout",
            RemoteError::NotConfigured => "not_configured",
        }
    }

    /// Build a status error, truncating long bodies on a char boundary
    pub fn status(code: u16, body: &str) -> Self {
        let body = match body.char_indices().nth(MAX_ERROR_BODY) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        RemoteError::Status { code, body }
    }
}
