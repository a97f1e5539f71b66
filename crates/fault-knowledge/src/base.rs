//! Knowledge Base Loading and Lookup

use crate::entry::FaultKnowledge;
use crate::KnowledgeError;
use parameter_catalog::{Deviation, Status};
use std::path::Path;
use tracing::{debug, info};

const EMBEDDED: &str = include_str!("../data/knowledge.json");

/// Immutable collection of fault knowledge entries
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<FaultKnowledge>,
}

impl KnowledgeBase {
    /// Knowledge compiled into the binary
    pub fn embedded() -> Result<Self, KnowledgeError> {
        Self::from_json(EMBEDDED)
    }

    /// Parse a JSON array of entries
    pub fn from_json(json: &str) -> Result<Self, KnowledgeError> {
        let entries: Vec<FaultKnowledge> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Load entries from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let base = Self::from_json(&json)?;
        info!("Loaded {} knowledge entries from {}", base.len(), path.display());
        Ok(base)
    }

    /// Build from already parsed entries
    pub fn from_entries(entries: Vec<FaultKnowledge>) -> Result<Self, KnowledgeError> {
        for entry in &entries {
            entry.check().map_err(|reason| KnowledgeError::Invalid {
                parameter: entry.parameter.clone(),
                reason,
            })?;
        }
        debug!("Knowledge base ready with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// First entry covering `key` at `status`, regardless of direction
    pub fn lookup(&self, key: &str, status: Status) -> Option<&FaultKnowledge> {
        self.entries.iter().find(|e| e.covers(key, status))
    }

    /// Entry covering `key` at `status` for the observed direction.
    /// An exact low/high entry wins over one marked `any`.
    pub fn lookup_directed(
        &self,
        key: &str,
        status: Status,
        deviation: Option<Deviation>,
    ) -> Option<&FaultKnowledge> {
        let mut candidates = self
            .entries
            .iter()
            .filter(|e| e.covers(key, status) && e.deviation.matches(deviation));

        let first = candidates.next()?;
        if first.deviation.is_exact(deviation) {
            return Some(first);
        }
        candidates
            .find(|e| e.deviation.is_exact(deviation))
            .or(Some(first))
    }

    /// All entries in authored order
    pub fn entries(&self) -> &[FaultKnowledge] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the base has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
