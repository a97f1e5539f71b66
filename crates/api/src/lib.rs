//! Generator Diagnostics API Server
//!
//! REST surface over the hybrid diagnosis orchestrator: diagnosis, the
//! parameter catalog, health and Prometheus metrics.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use fault_knowledge::KnowledgeBase;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use orchestrator::{HybridOrchestrator, OrchestratorConfig, ServiceStatus};
use parameter_catalog::ParameterCatalog;
use remote_reasoning::{HttpReasoningClient, ReasoningService};
use rule_evaluator::{LocalEvaluator, RuleSet};
use serde::Serialize;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
pub mod rate_limit;
mod routes;

pub use config::{AppConfig, ConfigError, LoggingConfig, ServerConfig};
pub use error::{ApiError, StartupError};
pub use rate_limit::{create_governor_config, DefaultGovernorConfig, RateLimitConfig};
pub use routes::diagnose::{DiagnoseRequest, DiagnoseResponse};

/// Application state shared across handlers
pub struct AppState {
    pub orchestrator: HybridOrchestrator,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus handle, when the recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(orchestrator: HybridOrchestrator) -> Self {
        Self {
            orchestrator,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Assemble catalog, knowledge, evaluator and orchestrator from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let knowledge = match &config.knowledge_path {
            Some(path) => KnowledgeBase::from_path(path)?,
            None => KnowledgeBase::embedded()?,
        };
        let local = LocalEvaluator::new(
            Arc::new(ParameterCatalog::builtin()),
            Arc::new(knowledge),
            RuleSet::builtin(),
            config.evaluator(),
        )?;

        let remote: Option<Arc<dyn ReasoningService>> = match &config.remote.endpoint {
            Some(_) => Some(Arc::new(HttpReasoningClient::new(&config.remote)?)),
            None => {
                if config.remote.enabled {
                    warn!("Remote reasoning enabled but no endpoint configured; diagnoses will fall back to local");
                }
                None
            }
        };

        let orchestrator = HybridOrchestrator::new(local, remote, OrchestratorConfig::from(&config.remote));
        Ok(Self::new(orchestrator))
    }
}

/// Health response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
    pub parameters: usize,
    pub knowledge_entries: usize,
    pub orchestrator: ServiceStatus,
}

/// Create the application router
///
/// `rate_limit` guards only the diagnose endpoint.
pub fn create_router(state: Arc<AppState>, rate_limit: Option<Arc<DefaultGovernorConfig>>) -> Router {
    let mut diagnose = Router::new().route("/api/v1/diagnose", post(routes::diagnose::diagnose));
    if let Some(config) = rate_limit {
        diagnose = diagnose.layer(GovernorLayer { config });
    }

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/parameters", get(routes::parameters::list_parameters))
        .route("/api/v1/parameters/:key", get(routes::parameters::get_parameter))
        .route("/metrics", get(metrics_handler))
        .merge(diagnose)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let local = state.orchestrator.local();
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        parameters: local.catalog().len(),
        knowledge_entries: local.knowledge().len(),
        orchestrator: state.orchestrator.status(),
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

/// Install the global Prometheus recorder
pub fn install_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder().with_max_level(level).with_target(true);
    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

/// Build the router described by `config`
pub fn build_app(config: &AppConfig, metrics: Option<PrometheusHandle>) -> Result<Router, StartupError> {
    let mut state = AppState::from_config(config)?;
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }

    let rate_limit = if config.rate_limit.enabled {
        info!(
            "Rate limiting diagnose: one request per {}s, burst {}",
            config.rate_limit.per_second, config.rate_limit.burst_size
        );
        Some(create_governor_config(&config.rate_limit)?)
    } else {
        None
    };

    Ok(create_router(Arc::new(state), rate_limit))
}
