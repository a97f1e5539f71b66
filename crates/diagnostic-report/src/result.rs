//! Analysis Result

use crate::analysis::{DetailedAnalysis, Issue, RootCause};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall health label derived from the health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthLabel {
    #[serde(alias = "critical", alias = "CRITICAL")]
    Critical,
    #[serde(alias = "poor", alias = "POOR")]
    Poor,
    #[serde(alias = "fair", alias = "FAIR")]
    Fair,
    #[serde(alias = "good", alias = "GOOD")]
    Good,
    #[serde(alias = "excellent", alias = "EXCELLENT")]
    Excellent,
}

impl HealthLabel {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthLabel::Critical => "Critical",
            HealthLabel::Poor => "Poor",
            HealthLabel::Fair => "Fair",
            HealthLabel::Good => "Good",
            HealthLabel::Excellent => "Excellent",
        }
    }
}

impl std::fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notable relationship across two or more parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub parameters: Vec<String>,
    pub finding: String,
    pub implication: String,
    pub action_required: String,
}

/// Component expected to fail if current trends continue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedFailure {
    pub component: String,
    pub probability: u8,
    pub timeframe: String,
    pub cost_if_ignored: f64,
    pub preventive_action: String,
}

/// Maintenance urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Priority for a predicted failure of the given probability
    pub fn from_probability(probability: u8) -> Self {
        match probability {
            p if p > 70 => Priority::Critical,
            p if p > 50 => Priority::High,
            _ => Priority::Medium,
        }
    }
}

/// Scheduled maintenance item derived from a predicted failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTask {
    pub task: String,
    pub due_in: String,
    pub priority: Priority,
}

impl From<&PredictedFailure> for MaintenanceTask {
    fn from(failure: &PredictedFailure) -> Self {
        Self {
            task: failure.preventive_action.clone(),
            due_in: failure.timeframe.clone(),
            priority: Priority::from_probability(failure.probability),
        }
    }
}

/// Headline finding of an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryDiagnosis {
    pub title: String,
    pub summary: String,
    pub confidence: u8,
    #[serde(default)]
    pub root_causes: Vec<RootCause>,
}

/// Complete structured diagnostic report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub health_score: u8,
    pub overall_health: HealthLabel,
    /// Critical and emergency readings
    pub critical_count: usize,
    pub warning_count: usize,
    pub normal_count: usize,
    #[serde(default)]
    pub issues: Vec<Issue>,
    pub primary_diagnosis: PrimaryDiagnosis,
    pub executive_summary: String,
    #[serde(default)]
    pub immediate_actions: Vec<String>,
    #[serde(default)]
    pub detailed_analysis: Vec<DetailedAnalysis>,
    #[serde(default)]
    pub correlations: Vec<Correlation>,
    #[serde(default)]
    pub predicted_failures: Vec<PredictedFailure>,
    #[serde(default)]
    pub scheduled_maintenance: Vec<MaintenanceTask>,
    #[serde(default)]
    pub technician_notes: String,
}

impl AnalysisResult {
    /// Number of classified parameters
    pub fn classified_count(&self) -> usize {
        self.critical_count + self.warning_count + self.normal_count
    }

    /// Issues as reported, falling back to those embedded in the detailed
    /// analyses when the flat list is absent
    pub fn reported_issues(&self) -> Vec<&Issue> {
        if self.issues.is_empty() {
            self.detailed_analysis.iter().map(|a| &a.issue).collect()
        } else {
            self.issues.iter().collect()
        }
    }
}
