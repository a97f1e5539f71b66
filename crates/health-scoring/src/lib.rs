//! Health Scoring
//!
//! Turns per-parameter severities into a 0-100 health score and an
//! overall health label.

mod scorer;

pub use scorer::{HealthScorer, LabelThresholds, Penalties, ScoringConfig, StatusCounts};

use thiserror::Error;

/// Scoring configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("Penalties must strictly increase with severity: warning {warning}, critical {critical}, emergency {emergency}")]
    PenaltyOrder {
        warning: u32,
        critical: u32,
        emergency: u32,
    },
    #[error("Label thresholds must be strictly descending and at most 100: {0:?}")]
    ThresholdOrder([u8; 4]),
}
