//! Per-Issue Analysis Types

use parameter_catalog::{Deviation, Status};
use serde::{Deserialize, Serialize};

/// A registered parameter whose reading fell outside its normal band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Parameter key, suffixed `-N` if the key already appeared in this result
    pub id: String,
    /// Parameter key
    #[serde(default)]
    pub key: String,
    /// Parameter display name
    pub parameter: String,
    pub value: f64,
    pub unit: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation: Option<Deviation>,
    /// Outside the normal band but inside the warning band
    #[serde(default)]
    pub marginal: bool,
    #[serde(default)]
    pub title: String,
    pub description: String,
}

/// Candidate explanation for an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCause {
    pub cause: String,
    /// Independent likelihood estimate (0-100)
    pub probability: u8,
    pub explanation: String,
    #[serde(default)]
    pub verification_steps: Vec<String>,
    #[serde(default)]
    pub tools_required: Vec<String>,
    #[serde(default)]
    pub time_to_verify: String,
}

/// One numbered step of a repair procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairStep {
    pub step: u32,
    pub action: String,
    #[serde(default)]
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    #[serde(default)]
    pub time_estimate: String,
    /// Numeric estimate used when totalling repair time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
}

/// Part needed for a repair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecommendation {
    pub name: String,
    pub quantity: u32,
    #[serde(rename = "unitCostKES")]
    pub unit_cost_kes: f64,
    #[serde(default)]
    pub alternative_options: Vec<String>,
    #[serde(default)]
    pub where_to_source: Vec<String>,
}

impl PartRecommendation {
    /// Quantity times unit cost
    pub fn line_cost(&self) -> f64 {
        f64::from(self.quantity) * self.unit_cost_kes
    }
}

/// Currency range in Kenyan shillings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostRange {
    pub min: f64,
    pub max: f64,
}

/// Full remediation analysis for one issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    pub issue: Issue,
    /// Sorted by descending probability
    #[serde(default)]
    pub root_causes: Vec<RootCause>,
    #[serde(default)]
    pub technical_explanation: String,
    #[serde(default)]
    pub system_impact: String,
    #[serde(default)]
    pub repair_procedure: Vec<RepairStep>,
    #[serde(default)]
    pub parts_required: Vec<PartRecommendation>,
    #[serde(default)]
    pub tools_required: Vec<String>,
    #[serde(default)]
    pub preventive_measures: Vec<String>,
    #[serde(default)]
    pub related_faults: Vec<String>,
    #[serde(default)]
    pub estimated_repair_time: String,
    #[serde(rename = "estimatedCostKES", default)]
    pub estimated_cost_kes: CostRange,
}

impl DetailedAnalysis {
    /// Action of the first repair step, if any
    pub fn first_action(&self) -> Option<&str> {
        self.repair_procedure.first().map(|s| s.action.as_str())
    }

    /// Most likely root cause
    pub fn top_cause(&self) -> Option<&RootCause> {
        self.root_causes.first()
    }
}
