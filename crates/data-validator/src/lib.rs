//! Reading Validation and Normalization
//!
//! Provides the sparse reading snapshot and the permissive input policy:
//! unknown keys pass through untouched, non-numeric entries are dropped.

mod error;
mod snapshot;
mod validator;

pub use error::ValidationError;
pub use snapshot::ReadingSnapshot;
pub use validator::{ValidationConfig, ValidationResult, Validator};
