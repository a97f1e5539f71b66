//! Validation Error Types

use thiserror::Error;

/// Problems found while normalizing raw readings.
///
/// Only `NotAnObject` rejects a request; the other variants describe single
/// entries that were dropped from the snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Input is not a key/value mapping
    #[error("Readings must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// Entry value is not a number
    #[error("{field} is not numeric (got {found})")]
    NotNumeric { field: String, found: String },

    /// Entry value is NaN or infinite
    #[error("{field} is not a finite number")]
    NotFinite { field: String },

    /// Entry key is empty or whitespace
    #[error("Reading with an empty parameter key")]
    EmptyKey,
}
