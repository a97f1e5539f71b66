//! Diagnosis Route

use axum::{extract::State, Json};
use data_validator::Validator;
use diagnostic_report::AnalysisResult;
use metrics::counter;
use orchestrator::{DiagnoseOptions, Source};
use remote_reasoning::DiagnosticContext;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Diagnose request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnoseRequest {
    /// Raw parameter readings, validated permissively. Absent means none.
    #[serde(default = "no_readings")]
    pub readings: serde_json::Value,
    pub use_remote: Option<bool>,
    pub context: Option<DiagnosticContext>,
}

fn no_readings() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Diagnose response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnoseResponse {
    pub request_id: Uuid,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub processing_time_ms: u64,
    /// Readings removed before diagnosis, with the reason
    pub dropped: Vec<String>,
    pub result: AnalysisResult,
}

/// Diagnose a snapshot of generator readings
pub async fn diagnose(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DiagnoseRequest>,
) -> Result<Json<DiagnoseResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let validated = Validator::default()
        .validate(&request.readings)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if !validated.dropped.is_empty() {
        counter!("readings_dropped_total").increment(validated.dropped.len() as u64);
    }

    let options = DiagnoseOptions {
        use_remote: request.use_remote,
        deadline: None,
        context: request.context,
    };
    let diagnosis = state.orchestrator.diagnose(&validated.snapshot, &options).await;

    info!(
        "Request {}: {} readings ({} dropped), {} issues from {}",
        request_id,
        validated.snapshot.len(),
        validated.dropped.len(),
        diagnosis.result.issues.len(),
        diagnosis.source.as_str()
    );

    Ok(Json(DiagnoseResponse {
        request_id,
        source: diagnosis.source,
        error: diagnosis.error,
        processing_time_ms: diagnosis.processing_time_ms,
        dropped: validated.dropped.iter().map(ToString::to_string).collect(),
        result: diagnosis.result,
    }))
}
