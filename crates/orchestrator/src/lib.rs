//! Hybrid Diagnosis Orchestrator
//!
//! Chooses between the remote reasoning service and the local rule
//! evaluator for each request. Remote failures of any kind degrade to a
//! local result with an advisory message; a diagnosis is always produced.

mod diagnosis;
mod hybrid;

pub use diagnosis::{DiagnoseOptions, Diagnosis, ServiceStatus, Source};
pub use hybrid::{HybridOrchestrator, OrchestratorConfig};
