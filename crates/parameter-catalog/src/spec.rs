//! Parameter Specifications and Band Classification

use serde::{Deserialize, Serialize};

/// Subsystem a parameter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Engine,
    Electrical,
    Fuel,
    Cooling,
    Battery,
    Load,
}

impl Category {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Engine => "engine",
            Category::Electrical => "electrical",
            Category::Fuel => "fuel",
            Category::Cooling => "cooling",
            Category::Battery => "battery",
            Category::Load => "load",
        }
    }
}

/// Severity of a single reading, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Warning,
    Critical,
    Emergency,
}

impl Status {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::Warning => "warning",
            Status::Critical => "critical",
            Status::Emergency => "emergency",
        }
    }

    /// Whether the reading is outside its normal band
    pub fn is_abnormal(&self) -> bool {
        *self != Status::Normal
    }

    /// Emergency readings are reported in the critical count
    pub fn counts_as_critical(&self) -> bool {
        *self >= Status::Critical
    }
}

/// Which side of the normal band a reading fell on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deviation {
    Low,
    High,
}

/// Closed range with optional bounds. An absent bound never triggers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Band {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Band {
    /// Band bounded on both sides
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Band with only a lower bound
    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Band with only an upper bound
    pub const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Band that contains every value
    pub const fn unbounded() -> Self {
        Self { min: None, max: None }
    }

    /// Where the value sits outside the band, if it does
    pub fn outside(&self, value: f64) -> Option<Deviation> {
        match (self.min, self.max) {
            (Some(min), _) if value < min => Some(Deviation::Low),
            (_, Some(max)) if value > max => Some(Deviation::High),
            _ => None,
        }
    }

    /// Whether the value lies inside the band (bounds inclusive)
    pub fn contains(&self, value: f64) -> bool {
        self.outside(value).is_none()
    }
}

/// Result of classifying one reading against its specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: Status,
    /// Set for every non-normal reading
    pub deviation: Option<Deviation>,
    /// Outside the normal band but still inside the warning band
    pub marginal: bool,
}

/// Specification of one monitored generator parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub key: String,
    pub name: String,
    pub unit: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub normal: Band,
    pub warning: Band,
    pub critical: Band,
    #[serde(default)]
    pub emergency: Band,
}

impl ParameterSpec {
    /// Classify a reading. Bands are checked from most to least severe and
    /// the first one the value falls outside of wins.
    pub fn classify(&self, value: f64) -> Classification {
        let tiers = [
            (Status::Emergency, &self.emergency),
            (Status::Critical, &self.critical),
            (Status::Warning, &self.warning),
        ];

        for (status, band) in tiers {
            if let Some(deviation) = band.outside(value) {
                return Classification {
                    status,
                    deviation: Some(deviation),
                    marginal: false,
                };
            }
        }

        match self.normal.outside(value) {
            None => Classification {
                status: Status::Normal,
                deviation: None,
                marginal: false,
            },
            Some(deviation) => Classification {
                status: Status::Warning,
                deviation: Some(deviation),
                marginal: true,
            },
        }
    }

    /// Shorthand for the status alone
    pub fn status_of(&self, value: f64) -> Status {
        self.classify(value).status
    }
}
