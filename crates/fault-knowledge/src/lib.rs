//! Fault Knowledge Base
//!
//! Authored diagnostic content per (parameter, severity, direction):
//! ranked root causes, repair procedure, parts and background text.

mod base;
mod entry;
mod template;

pub use base::KnowledgeBase;
pub use entry::{DeviationMatch, FaultKnowledge};
pub use template::{render, Substitution};

use thiserror::Error;

/// Knowledge base errors
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Knowledge parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid knowledge entry for {parameter}: {reason}")]
    Invalid { parameter: String, reason: String },
}
