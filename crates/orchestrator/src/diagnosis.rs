//! Diagnosis request options and outcome

use diagnostic_report::AnalysisResult;
use remote_reasoning::DiagnosticContext;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which engine produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remote,
    Local,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Remote => "remote",
            Source::Local => "local",
        }
    }
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct DiagnoseOptions {
    /// Override the configured remote preference
    pub use_remote: Option<bool>,
    /// Override the configured deadline
    pub deadline: Option<Duration>,
    /// Operator context forwarded to the remote service
    pub context: Option<DiagnosticContext>,
}

impl DiagnoseOptions {
    pub fn local() -> Self {
        Self {
            use_remote: Some(false),
            ..Default::default()
        }
    }

    pub fn remote() -> Self {
        Self {
            use_remote: Some(true),
            ..Default::default()
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Outcome of one diagnosis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub result: AnalysisResult,
    pub source: Source,
    /// Why the remote path was abandoned, when it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub processing_time_ms: u64,
}

impl Diagnosis {
    pub fn fell_back(&self) -> bool {
        self.error.is_some()
    }
}

/// Orchestrator configuration snapshot for health reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub remote_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_name: Option<String>,
    pub default_use_remote: bool,
    pub deadline_ms: u64,
}
