//! Hybrid Orchestrator Implementation

use crate::diagnosis::{DiagnoseOptions, Diagnosis, ServiceStatus, Source};
use data_validator::ReadingSnapshot;
use diagnostic_report::AnalysisResult;
use metrics::{counter, histogram};
use remote_reasoning::{ReasoningRequest, ReasoningService, RemoteConfig, RemoteError};
use rule_evaluator::LocalEvaluator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Orchestrator defaults, overridable per request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Try the remote service when the request does not say
    pub use_remote: bool,
    /// Remote deadline in milliseconds
    pub deadline_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            use_remote: false,
            deadline_ms: 30_000,
        }
    }
}

impl From<&RemoteConfig> for OrchestratorConfig {
    fn from(remote: &RemoteConfig) -> Self {
        Self {
            use_remote: remote.enabled,
            deadline_ms: remote.deadline_ms,
        }
    }
}

/// Remote-first diagnosis with guaranteed local fallback
#[derive(Clone)]
pub struct HybridOrchestrator {
    local: LocalEvaluator,
    remote: Option<Arc<dyn ReasoningService>>,
    config: OrchestratorConfig,
}

impl HybridOrchestrator {
    pub fn new(
        local: LocalEvaluator,
        remote: Option<Arc<dyn ReasoningService>>,
        config: OrchestratorConfig,
    ) -> Self {
        info!(
            "Orchestrator ready: remote {}, default {}, deadline {}ms",
            remote.as_ref().map(|r| r.name()).unwrap_or("none"),
            if config.use_remote { "remote" } else { "local" },
            config.deadline_ms
        );
        Self { local, remote, config }
    }

    /// Local evaluation only
    pub fn local_only(local: LocalEvaluator) -> Self {
        Self::new(local, None, OrchestratorConfig::default())
    }

    /// Diagnose a snapshot. Never fails; remote problems degrade to local.
    pub async fn diagnose(&self, snapshot: &ReadingSnapshot, options: &DiagnoseOptions) -> Diagnosis {
        let started = Instant::now();
        let use_remote = options.use_remote.unwrap_or(self.config.use_remote);

        let (result, source, error) = if use_remote {
            match self.query_remote(snapshot, options).await {
                Ok(result) => (result, Source::Remote, None),
                Err(err) => {
                    warn!("Remote reasoning failed, using local evaluation: {}", err);
                    counter!("remote_fallbacks_total", "reason" => err.kind()).increment(1);
                    let advisory = format!("remote reasoning unavailable: {}", err.reason());
                    (self.local.evaluate(snapshot), Source::Local, Some(advisory))
                }
            }
        } else {
            (self.local.evaluate(snapshot), Source::Local, None)
        };

        let elapsed = started.elapsed();
        counter!("diagnoses_total", "source" => source.as_str()).increment(1);
        histogram!("diagnosis_duration_seconds").record(elapsed.as_secs_f64());
        debug!(
            "Diagnosis from {} in {}ms (score {})",
            source.as_str(),
            elapsed.as_millis(),
            result.health_score
        );

        Diagnosis {
            result,
            source,
            error,
            processing_time_ms: elapsed.as_millis() as u64,
        }
    }

    async fn query_remote(
        &self,
        snapshot: &ReadingSnapshot,
        options: &DiagnoseOptions,
    ) -> Result<AnalysisResult, RemoteError> {
        let service = self.remote.as_ref().ok_or(RemoteError::NotConfigured)?;
        let deadline = options.deadline.unwrap_or_else(|| self.deadline());
        let request = ReasoningRequest::new(snapshot, self.local.catalog())
            .with_context(options.context.as_ref());

        // Dropping the query future on expiry abandons the in-flight request
        match tokio::time::timeout(deadline, service.query(&request, deadline)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(RemoteError::Timeout(deadline.as_millis() as u64)),
        }
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.config.deadline_ms)
    }

    pub fn local(&self) -> &LocalEvaluator {
        &self.local
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            remote_configured: self.remote.is_some(),
            remote_name: self.remote.as_ref().map(|r| r.name().to_string()),
            default_use_remote: self.config.use_remote,
            deadline_ms: self.config.deadline_ms,
        }
    }
}

impl std::fmt::Debug for HybridOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridOrchestrator")
            .field("remote", &self.remote.as_ref().map(|r| r.name().to_string()))
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
