//! Issue Expansion
//!
//! Turns an issue plus (optional) authored knowledge into a full
//! [`DetailedAnalysis`].

use diagnostic_report::{CostRange, DetailedAnalysis, Issue, PartRecommendation, RepairStep, RootCause};
use fault_knowledge::{FaultKnowledge, Substitution};
use parameter_catalog::ParameterSpec;
use serde::{Deserialize, Serialize};

/// Confidence assigned when no knowledge covers an issue
pub const GAP_CONFIDENCE: u8 = 50;

/// Repair cost estimation parameters (KES)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Multiplier on parts total for the low estimate
    pub min_factor: f64,
    /// Multiplier on parts total for the high estimate
    pub max_factor: f64,
    /// Flat labour added to the high estimate
    pub labour_kes: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            min_factor: 0.8,
            max_factor: 1.2,
            labour_kes: 5000.0,
        }
    }
}

impl CostModel {
    /// Cost range for a parts list
    pub fn estimate(&self, parts: &[PartRecommendation]) -> CostRange {
        let total: f64 = parts.iter().map(PartRecommendation::line_cost).sum();
        CostRange {
            min: total * self.min_factor,
            max: total * self.max_factor + self.labour_kes,
        }
    }
}

/// Analysis together with the confidence of its source
#[derive(Debug, Clone)]
pub struct Expansion {
    pub analysis: DetailedAnalysis,
    pub confidence: u8,
}

/// Human-readable total of step estimates
pub fn repair_time(steps: &[RepairStep]) -> String {
    if steps.iter().all(|s| s.minutes.is_none()) {
        return "To be assessed on site".to_string();
    }
    let total: u32 = steps.iter().filter_map(|s| s.minutes).sum();
    match (total / 60, total % 60) {
        (0, m) => format!("{m} minutes"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} min"),
    }
}

/// Expand an issue into a detailed analysis
pub fn expand(
    issue: &Issue,
    spec: &ParameterSpec,
    knowledge: Option<&FaultKnowledge>,
    cost: &CostModel,
) -> Expansion {
    match knowledge {
        Some(entry) => from_knowledge(issue, spec, entry, cost),
        None => generic(issue, spec, cost),
    }
}

fn from_knowledge(
    issue: &Issue,
    spec: &ParameterSpec,
    entry: &FaultKnowledge,
    cost: &CostModel,
) -> Expansion {
    let sub = Substitution {
        name: &spec.name,
        value: issue.value,
        unit: &spec.unit,
    };

    let FaultKnowledge {
        confidence,
        mut causes,
        repair_procedure,
        parts,
        tools,
        technical_explanation,
        system_impact,
        preventive_measures,
        related_faults,
        ..
    } = entry.rendered(&sub);
    // stable: equal probabilities keep authored order
    causes.sort_by(|a, b| b.probability.cmp(&a.probability));

    let analysis = DetailedAnalysis {
        issue: issue.clone(),
        root_causes: causes,
        technical_explanation,
        system_impact,
        estimated_repair_time: repair_time(&repair_procedure),
        estimated_cost_kes: cost.estimate(&parts),
        repair_procedure,
        parts_required: parts,
        tools_required: tools,
        preventive_measures,
        related_faults,
    };

    Expansion { analysis, confidence }
}

fn band_text(spec: &ParameterSpec) -> String {
    match (spec.normal.min, spec.normal.max) {
        (Some(min), Some(max)) => format!("{min}-{max} {}", spec.unit),
        (Some(min), None) => format!("at least {min} {}", spec.unit),
        (None, Some(max)) => format!("at most {max} {}", spec.unit),
        (None, None) => "unrestricted".to_string(),
    }
}

fn generic(issue: &Issue, spec: &ParameterSpec, cost: &CostModel) -> Expansion {
    let root_causes = vec![RootCause {
        cause: "Parameter out of range — consult technician".to_string(),
        probability: GAP_CONFIDENCE,
        explanation: format!(
            "No specific fault knowledge is recorded for {} in this condition.",
            spec.name
        ),
        verification_steps: vec![format!(
            "Confirm the {} reading with an independent instrument",
            spec.name
        )],
        tools_required: Vec::new(),
        time_to_verify: String::new(),
    }];

    let repair_procedure = vec![RepairStep {
        step: 1,
        action: format!("Have a qualified technician inspect the {}", spec.name),
        details: format!(
            "Reading of {} {} is outside the normal range ({}).",
            issue.value,
            spec.unit,
            band_text(spec)
        ),
        safety_warning: None,
        tip: None,
        time_estimate: String::new(),
        minutes: None,
    }];

    let analysis = DetailedAnalysis {
        issue: issue.clone(),
        root_causes,
        technical_explanation: format!(
            "{} at {} {} is outside its normal range of {}. {}",
            spec.name,
            issue.value,
            spec.unit,
            band_text(spec),
            spec.description
        )
        .trim_end()
        .to_string(),
        system_impact: String::new(),
        estimated_repair_time: repair_time(&repair_procedure),
        repair_procedure,
        parts_required: Vec::new(),
        tools_required: Vec::new(),
        preventive_measures: Vec::new(),
        related_faults: Vec::new(),
        estimated_cost_kes: cost.estimate(&[]),
    };

    Expansion {
        analysis,
        confidence: GAP_CONFIDENCE,
    }
}
