//! Parameter Catalog Routes

use axum::{
    extract::{Path, State},
    Json,
};
use parameter_catalog::{Category, ParameterSpec};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Catalog grouped by category
#[derive(Debug, Serialize)]
pub struct ParametersResponse {
    pub categories: BTreeMap<Category, Vec<ParameterSpec>>,
    pub count: usize,
}

/// List all monitored parameters
pub async fn list_parameters(State(state): State<Arc<AppState>>) -> Json<ParametersResponse> {
    let catalog = state.orchestrator.local().catalog();
    let categories = catalog
        .by_category()
        .into_iter()
        .map(|(category, specs)| (category, specs.into_iter().cloned().collect()))
        .collect();

    Json(ParametersResponse {
        categories,
        count: catalog.len(),
    })
}

/// Get one parameter spec
pub async fn get_parameter(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<ParameterSpec>, ApiError> {
    state
        .orchestrator
        .local()
        .catalog()
        .get(&key)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown parameter: {key}")))
}
