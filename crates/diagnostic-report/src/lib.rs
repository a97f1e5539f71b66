//! Diagnostic Report Model
//!
//! The structured result of a generator diagnosis. Local and remote
//! reasoning produce the same shape, so a caller cannot tell them apart
//! except through the orchestrator's `source` field.

mod analysis;
mod result;
mod validate;

pub use analysis::{CostRange, DetailedAnalysis, Issue, PartRecommendation, RepairStep, RootCause};
pub use result::{
    AnalysisResult, Correlation, HealthLabel, MaintenanceTask, PredictedFailure, PrimaryDiagnosis,
    Priority,
};
pub use validate::ReportError;

pub use parameter_catalog::{Deviation, Status};
