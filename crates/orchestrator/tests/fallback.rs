//! Orchestrator behaviour against stub reasoning services

use async_trait::async_trait;
use data_validator::ReadingSnapshot;
use diagnostic_report::AnalysisResult;
use orchestrator::{DiagnoseOptions, HybridOrchestrator, OrchestratorConfig, Source};
use remote_reasoning::{ReasoningRequest, ReasoningService, RemoteError};
use rule_evaluator::LocalEvaluator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct FailingService {
    calls: AtomicUsize,
}

#[async_trait]
impl ReasoningService for FailingService {
    async fn query(&self, _: &ReasoningRequest<'_>, _: Duration) -> Result<AnalysisResult, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RemoteError::Network("connection refused".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

struct PendingService;

#[async_trait]
impl ReasoningService for PendingService {
    async fn query(&self, _: &ReasoningRequest<'_>, _: Duration) -> Result<AnalysisResult, RemoteError> {
        std::future::pending().await
    }

    fn name(&self) -> &str {
        "pending"
    }
}

/// Answers with the local result, lightly edited so the source is visible
struct EchoService;

#[async_trait]
impl ReasoningService for EchoService {
    async fn query(&self, request: &ReasoningRequest<'_>, _: Duration) -> Result<AnalysisResult, RemoteError> {
        let mut result = LocalEvaluator::builtin()
            .map_err(|e| RemoteError::Malformed(e.to_string()))?
            .evaluate(request.snapshot);
        result.executive_summary = format!("remote: {}", result.executive_summary);
        Ok(result)
    }

    fn name(&self) -> &str {
        "echo"
    }
}

fn local() -> LocalEvaluator {
    LocalEvaluator::builtin().expect("built-in evaluator")
}

fn with_remote(service: Arc<dyn ReasoningService>, use_remote: bool) -> HybridOrchestrator {
    HybridOrchestrator::new(
        local(),
        Some(service),
        OrchestratorConfig {
            use_remote,
            deadline_ms: 5_000,
        },
    )
}

fn degraded() -> ReadingSnapshot {
    ReadingSnapshot::new()
        .with("coolantTemp", 115.0)
        .with("oilPressure", 12.0)
}

#[tokio::test]
async fn test_failure_falls_back_to_identical_local_result() {
    let service = Arc::new(FailingService {
        calls: AtomicUsize::new(0),
    });
    let orchestrator = with_remote(service.clone(), true);
    let snapshot = degraded();

    let diagnosis = orchestrator.diagnose(&snapshot, &DiagnoseOptions::default()).await;
    assert_eq!(diagnosis.source, Source::Local);
    assert_eq!(
        diagnosis.error.as_deref(),
        Some("remote reasoning unavailable: network error (connection refused)")
    );
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);

    let direct = local().evaluate_at(&snapshot, diagnosis.result.timestamp);
    assert_eq!(
        serde_json::to_value(&diagnosis.result).unwrap(),
        serde_json::to_value(&direct).unwrap()
    );
}

#[tokio::test]
async fn test_deadline_abandons_pending_service() {
    let orchestrator = with_remote(Arc::new(PendingService), true);
    let options = DiagnoseOptions::default().with_deadline(Duration::from_millis(50));

    let started = Instant::now();
    let diagnosis = orchestrator.diagnose(&degraded(), &options).await;
    assert!(started.elapsed() < Duration::from_secs(1));

    assert_eq!(diagnosis.source, Source::Local);
    assert_eq!(
        diagnosis.error.as_deref(),
        Some("remote reasoning unavailable: timed out after 50ms")
    );
    assert_eq!(diagnosis.result.issues.len(), 2);
}

#[tokio::test]
async fn test_remote_success() {
    let orchestrator = with_remote(Arc::new(EchoService), true);
    let diagnosis = orchestrator.diagnose(&degraded(), &DiagnoseOptions::default()).await;
    assert_eq!(diagnosis.source, Source::Remote);
    assert!(diagnosis.error.is_none());
    assert!(diagnosis.result.executive_summary.starts_with("remote: "));
}

#[tokio::test]
async fn test_request_can_disable_remote() {
    let service = Arc::new(FailingService {
        calls: AtomicUsize::new(0),
    });
    let orchestrator = with_remote(service.clone(), true);
    let diagnosis = orchestrator.diagnose(&degraded(), &DiagnoseOptions::local()).await;
    assert_eq!(diagnosis.source, Source::Local);
    assert!(diagnosis.error.is_none());
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_request_can_enable_remote() {
    let orchestrator = with_remote(Arc::new(EchoService), false);
    let default = orchestrator.diagnose(&degraded(), &DiagnoseOptions::default()).await;
    assert_eq!(default.source, Source::Local);

    let remote = orchestrator.diagnose(&degraded(), &DiagnoseOptions::remote()).await;
    assert_eq!(remote.source, Source::Remote);
}

#[tokio::test]
async fn test_status_names_remote() {
    let status = with_remote(Arc::new(EchoService), true).status();
    assert!(status.remote_configured);
    assert_eq!(status.remote_name.as_deref(), Some("echo"));
    assert!(status.default_use_remote);
    assert_eq!(status.deadline_ms, 5_000);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["remoteConfigured"], true);
    assert_eq!(json["deadlineMs"], 5_000);
}

#[tokio::test]
async fn test_diagnosis_wire_shape() {
    let orchestrator = HybridOrchestrator::local_only(local());
    let diagnosis = orchestrator
        .diagnose(&ReadingSnapshot::new().with("oilPressure", 5.0), &DiagnoseOptions::default())
        .await;
    let json = serde_json::to_value(&diagnosis).unwrap();
    assert_eq!(json["source"], "local");
    assert!(json.get("error").is_none());
    assert!(json["processingTimeMs"].is_u64());
    assert_eq!(json["result"]["healthScore"], 80);
}
