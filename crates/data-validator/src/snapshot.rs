//! Reading Snapshot

use crate::error::ValidationError;
use crate::validator::Validator;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One-shot set of sensor readings keyed by parameter.
///
/// Sparse: a missing key means "not measured" and is never treated as zero.
/// Every stored value is finite.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReadingSnapshot {
    readings: BTreeMap<String, f64>,
}

impl ReadingSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reading, rejecting empty keys and non-finite values
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Result<(), ValidationError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ValidationError::EmptyKey);
        }
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field: key });
        }
        self.readings.insert(key, value);
        Ok(())
    }

    /// Build a snapshot from raw JSON with the default validator.
    /// Invalid entries are dropped; a non-object payload is an error.
    pub fn from_json(raw: &serde_json::Value) -> Result<Self, ValidationError> {
        Validator::default().validate(raw).map(|result| result.snapshot)
    }

    /// Builder-style insert that silently drops invalid readings
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        let _ = self.insert(key, value);
        self
    }

    /// Get a reading
    pub fn get(&self, key: &str) -> Option<f64> {
        self.readings.get(key).copied()
    }

    /// Whether a reading is present
    pub fn contains(&self, key: &str) -> bool {
        self.readings.contains_key(key)
    }

    /// Remove a reading
    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.readings.remove(key)
    }

    /// Iterate readings in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.readings.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of readings
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the snapshot holds no readings
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ReadingSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (key, value) in iter {
            let _ = snapshot.insert(key, value);
        }
        snapshot
    }
}

impl<'de> Deserialize<'de> for ReadingSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Self::from_json(&raw).map_err(serde::de::Error::custom)
    }
}
