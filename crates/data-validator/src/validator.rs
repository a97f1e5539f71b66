//! Raw Reading Validator
//!
//! Turns untrusted JSON into a [`ReadingSnapshot`]. Anomalous entries are
//! dropped and reported, never escalated to a request-level error.

use crate::error::ValidationError;
use crate::snapshot::ReadingSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Accept numbers sent as strings, e.g. `"12.5"` from form inputs
    pub accept_numeric_strings: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            accept_numeric_strings: true,
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Readings that survived normalization
    pub snapshot: ReadingSnapshot,
    /// Entries that were dropped, with the reason
    pub dropped: Vec<ValidationError>,
    /// Number of entries inspected
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Whether every entry was kept
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Validator for raw reading payloads
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a raw JSON mapping of parameter key to value
    pub fn validate(&self, raw: &Value) -> Result<ValidationResult, ValidationError> {
        let entries = raw
            .as_object()
            .ok_or_else(|| ValidationError::NotAnObject(json_kind(raw)))?;

        let mut snapshot = ReadingSnapshot::new();
        let mut dropped = Vec::new();

        for (key, value) in entries {
            let outcome = self
                .numeric_value(key, value)
                .and_then(|v| snapshot.insert(key.as_str(), v));

            if let Err(err) = outcome {
                debug!("Dropping reading: {}", err);
                dropped.push(err);
            }
        }

        Ok(ValidationResult {
            snapshot,
            dropped,
            fields_checked: entries.len(),
        })
    }

    /// Extract a finite number from a single entry
    fn numeric_value(&self, field: &str, value: &Value) -> Result<f64, ValidationError> {
        let not_numeric = || ValidationError::NotNumeric {
            field: field.to_string(),
            found: json_kind(value).to_string(),
        };

        match value {
            Value::Number(n) => n.as_f64().ok_or_else(not_numeric),
            Value::String(s) if self.config.accept_numeric_strings => {
                s.trim().parse::<f64>().map_err(|_| not_numeric())
            }
            _ => Err(not_numeric()),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_readings() {
        let validator = Validator::default();
        let result = validator
            .validate(&json!({"oilPressure": 45, "coolantTemp": 88.5}))
            .unwrap();
        assert!(result.is_clean());
        assert_eq!(result.fields_checked, 2);
        assert_eq!(result.snapshot.get("coolantTemp"), Some(88.5));
    }

    #[test]
    fn test_non_numeric_entries_dropped() {
        let validator = Validator::default();
        let result = validator
            .validate(&json!({
                "oilPressure": 45,
                "rpm": "unknown",
                "fuelLevel": null,
                "frequency": true,
                "voltageL1N": [230]
            }))
            .unwrap();
        assert_eq!(result.snapshot.len(), 1);
        assert_eq!(result.dropped.len(), 4);
        assert!(matches!(
            &result.dropped[0],
            ValidationError::NotNumeric { .. }
        ));
    }

    #[test]
    fn test_numeric_strings() {
        let lenient = Validator::default();
        let result = lenient.validate(&json!({"batteryVoltage": " 24.6 "})).unwrap();
        assert_eq!(result.snapshot.get("batteryVoltage"), Some(24.6));

        let strict = Validator::new(ValidationConfig {
            accept_numeric_strings: false,
        });
        let result = strict.validate(&json!({"batteryVoltage": "24.6"})).unwrap();
        assert!(result.snapshot.is_empty());
    }

    #[test]
    fn test_non_finite_string_dropped() {
        let validator = Validator::default();
        let result = validator.validate(&json!({"rpm": "NaN", "frequency": "inf"})).unwrap();
        assert!(result.snapshot.is_empty());
        assert_eq!(result.dropped.len(), 2);
    }

    #[test]
    fn test_empty_object_is_valid() {
        let validator = Validator::default();
        let result = validator.validate(&json!({})).unwrap();
        assert!(result.snapshot.is_empty());
        assert!(result.is_clean());
    }

    #[test]
    fn test_not_an_object() {
        let validator = Validator::default();
        assert_eq!(
            validator.validate(&json!([1, 2])).unwrap_err(),
            ValidationError::NotAnObject("array")
        );
        assert!(validator.validate(&json!(42)).is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_finite_numbers_always_kept(key in "[a-zA-Z]{1,12}", value in -1.0e9f64..1.0e9) {
            let validator = Validator::default();
            let result = validator.validate(&json!({ key.clone(): value })).unwrap();
            proptest::prop_assert_eq!(result.snapshot.get(&key), Some(value));
        }
    }
}
