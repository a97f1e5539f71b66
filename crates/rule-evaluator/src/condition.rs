//! Rule Conditions
//!
//! A small predicate language over a reading snapshot. Every condition is
//! false when a reading it needs is absent, so sparse snapshots never
//! trigger rules they cannot support.

use data_validator::ReadingSnapshot;
use parameter_catalog::{ParameterCatalog, Status};
use serde::{Deserialize, Serialize};

/// Single predicate over one or more readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Condition {
    /// Classified status of a registered parameter is at least `status`
    StatusAtLeast { key: String, status: Status },
    /// `key < value`
    Below { key: String, value: f64 },
    /// `key > value`
    Above { key: String, value: f64 },
    /// `min < key < max`
    Between { key: String, min: f64, max: f64 },
    /// `key > reference + margin`
    OffsetAbove {
        key: String,
        reference: String,
        margin: f64,
    },
    /// `|nominal - key| < tolerance`
    NearNominal {
        key: String,
        nominal: f64,
        tolerance: f64,
    },
    /// `|nominal - key| > tolerance`
    AwayFromNominal {
        key: String,
        nominal: f64,
        tolerance: f64,
    },
    /// `min < |nominal - key| < max`
    DeviationBetween {
        key: String,
        nominal: f64,
        min: f64,
        max: f64,
    },
    /// `max - min` across all keys exceeds `exceeds`
    Spread { keys: Vec<String>, exceeds: f64 },
    /// Mean above `min_mean` and `(max - min) / mean` exceeds `exceeds`
    RelativeSpread {
        keys: Vec<String>,
        min_mean: f64,
        exceeds: f64,
    },
}

impl Condition {
    /// Evaluate against a snapshot
    pub fn holds(&self, snapshot: &ReadingSnapshot, catalog: &ParameterCatalog) -> bool {
        match self {
            Condition::StatusAtLeast { key, status } => {
                match (catalog.get(key), snapshot.get(key)) {
                    (Some(spec), Some(v)) => spec.status_of(v) >= *status,
                    _ => false,
                }
            }
            Condition::Below { key, value } => snapshot.get(key).is_some_and(|v| v < *value),
            Condition::Above { key, value } => snapshot.get(key).is_some_and(|v| v > *value),
            Condition::Between { key, min, max } => {
                snapshot.get(key).is_some_and(|v| v > *min && v < *max)
            }
            Condition::OffsetAbove {
                key,
                reference,
                margin,
            } => match (snapshot.get(key), snapshot.get(reference)) {
                (Some(v), Some(r)) => v > r + margin,
                _ => false,
            },
            Condition::NearNominal {
                key,
                nominal,
                tolerance,
            } => snapshot
                .get(key)
                .is_some_and(|v| (nominal - v).abs() < *tolerance),
            Condition::AwayFromNominal {
                key,
                nominal,
                tolerance,
            } => snapshot
                .get(key)
                .is_some_and(|v| (nominal - v).abs() > *tolerance),
            Condition::DeviationBetween { key, nominal, min, max } => {
                snapshot.get(key).is_some_and(|v| {
                    let d = (nominal - v).abs();
                    d > *min && d < *max
                })
            }
            Condition::Spread { keys, exceeds } => {
                values(snapshot, keys).is_some_and(|vs| range(&vs) > *exceeds)
            }
            Condition::RelativeSpread {
                keys,
                min_mean,
                exceeds,
            } => values(snapshot, keys).is_some_and(|vs| {
                let mean = vs.iter().sum::<f64>() / vs.len() as f64;
                mean > *min_mean && range(&vs) / mean > *exceeds
            }),
        }
    }

    /// Keys this condition reads
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Condition::StatusAtLeast { key, .. }
            | Condition::Below { key, .. }
            | Condition::Above { key, .. }
            | Condition::Between { key, .. }
            | Condition::NearNominal { key, .. }
            | Condition::AwayFromNominal { key, .. }
            | Condition::DeviationBetween { key, .. } => vec![key.as_str()],
            Condition::OffsetAbove { key, reference, .. } => {
                vec![key.as_str(), reference.as_str()]
            }
            Condition::Spread { keys, .. } | Condition::RelativeSpread { keys, .. } => {
                keys.iter().map(String::as_str).collect()
            }
        }
    }
}

/// All readings for `keys`, or `None` if any is missing
fn values(snapshot: &ReadingSnapshot, keys: &[String]) -> Option<Vec<f64>> {
    if keys.is_empty() {
        return None;
    }
    keys.iter().map(|k| snapshot.get(k)).collect()
}

fn range(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    max - min
}

/// Every condition holds (empty list never holds)
pub fn all_hold(
    conditions: &[Condition],
    snapshot: &ReadingSnapshot,
    catalog: &ParameterCatalog,
) -> bool {
    !conditions.is_empty() && conditions.iter().all(|c| c.holds(snapshot, catalog))
}
