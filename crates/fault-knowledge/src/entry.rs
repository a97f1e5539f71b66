//! Knowledge Entries

use crate::template::{render, Substitution};
use diagnostic_report::{PartRecommendation, RepairStep, RootCause};
use parameter_catalog::{Deviation, Status};
use serde::{Deserialize, Serialize};

/// Which side of the normal band an entry applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviationMatch {
    Low,
    High,
    Any,
}

impl DeviationMatch {
    /// Whether this entry covers the observed deviation
    pub fn matches(&self, deviation: Option<Deviation>) -> bool {
        match (self, deviation) {
            (DeviationMatch::Any, _) => true,
            (DeviationMatch::Low, Some(Deviation::Low)) => true,
            (DeviationMatch::High, Some(Deviation::High)) => true,
            _ => false,
        }
    }

    /// Whether this entry targets exactly the observed deviation
    pub fn is_exact(&self, deviation: Option<Deviation>) -> bool {
        *self != DeviationMatch::Any && self.matches(deviation)
    }
}

fn render_all(items: &[String], sub: &Substitution<'_>) -> Vec<String> {
    items.iter().map(|s| render(s, sub)).collect()
}

fn abnormal_statuses() -> Vec<Status> {
    vec![Status::Warning, Status::Critical, Status::Emergency]
}

fn default_confidence() -> u8 {
    50
}

/// Authored diagnostic content for one fault condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultKnowledge {
    pub parameter: String,
    pub deviation: DeviationMatch,
    /// Severities this entry covers
    #[serde(default = "abnormal_statuses")]
    pub statuses: Vec<Status>,
    /// Tie-break weight when choosing the primary diagnosis
    #[serde(default = "default_confidence")]
    pub confidence: u8,
    pub causes: Vec<RootCause>,
    pub repair_procedure: Vec<RepairStep>,
    #[serde(default)]
    pub parts: Vec<PartRecommendation>,
    #[serde(default)]
    pub tools: Vec<String>,
    /// May contain `{name}`, `{value}` and `{unit}` placeholders
    #[serde(default)]
    pub technical_explanation: String,
    #[serde(default)]
    pub system_impact: String,
    #[serde(default)]
    pub preventive_measures: Vec<String>,
    #[serde(default)]
    pub related_faults: Vec<String>,
}

impl FaultKnowledge {
    /// Whether this entry applies to the given key and status
    pub fn covers(&self, key: &str, status: Status) -> bool {
        self.parameter == key && self.statuses.contains(&status)
    }

    /// Copy of this entry with placeholders in every authored text replaced
    pub fn rendered(&self, sub: &Substitution<'_>) -> Self {
        let text = |s: &String| render(s, sub);
        let list = |items: &Vec<String>| render_all(items, sub);

        Self {
            causes: self
                .causes
                .iter()
                .map(|c| RootCause {
                    cause: text(&c.cause),
                    explanation: text(&c.explanation),
                    verification_steps: list(&c.verification_steps),
                    tools_required: list(&c.tools_required),
                    time_to_verify: text(&c.time_to_verify),
                    ..c.clone()
                })
                .collect(),
            repair_procedure: self
                .repair_procedure
                .iter()
                .map(|s| RepairStep {
                    action: text(&s.action),
                    details: text(&s.details),
                    safety_warning: s.safety_warning.as_ref().map(text),
                    tip: s.tip.as_ref().map(text),
                    time_estimate: text(&s.time_estimate),
                    ..s.clone()
                })
                .collect(),
            parts: self
                .parts
                .iter()
                .map(|p| PartRecommendation {
                    name: text(&p.name),
                    alternative_options: list(&p.alternative_options),
                    where_to_source: list(&p.where_to_source),
                    ..p.clone()
                })
                .collect(),
            tools: list(&self.tools),
            technical_explanation: text(&self.technical_explanation),
            system_impact: text(&self.system_impact),
            preventive_measures: list(&self.preventive_measures),
            related_faults: list(&self.related_faults),
            ..self.clone()
        }
    }

    /// Check authored values are in range
    pub(crate) fn check(&self) -> Result<(), String> {
        if self.parameter.trim().is_empty() {
            return Err("empty parameter key".to_string());
        }
        if self.confidence > 100 {
            return Err(format!("confidence {} exceeds 100", self.confidence));
        }
        if self.statuses.contains(&Status::Normal) {
            return Err("entries cannot cover normal status".to_string());
        }
        if let Some(cause) = self.causes.iter().find(|c| c.probability > 100) {
            return Err(format!(
                "probability {} of '{}' exceeds 100",
                cause.probability, cause.cause
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deviation_match() {
        assert!(DeviationMatch::Any.matches(None));
        assert!(DeviationMatch::Any.matches(Some(Deviation::High)));
        assert!(DeviationMatch::Low.matches(Some(Deviation::Low)));
        assert!(!DeviationMatch::Low.matches(Some(Deviation::High)));
        assert!(!DeviationMatch::Any.is_exact(Some(Deviation::Low)));
        assert!(DeviationMatch::High.is_exact(Some(Deviation::High)));
    }

    #[test]
    fn test_sparse_entry_defaults() {
        let entry: FaultKnowledge = serde_json::from_str(
            r#"{"parameter":"rpm","deviation":"any","causes":[],"repairProcedure":[]}"#,
        )
        .unwrap();
        assert_eq!(entry.confidence, 50);
        assert!(entry.covers("rpm", Status::Critical));
        assert!(!entry.covers("rpm", Status::Normal));
        assert!(entry.check().is_ok());
    }

    #[test]
    fn test_rendered_fills_every_text_field() {
        let entry: FaultKnowledge = serde_json::from_str(
            r#"{
                "parameter": "rpm",
                "deviation": "low",
                "causes": [{
                    "cause": "{name} governor droop",
                    "probability": 60,
                    "explanation": "{name} reads {value} {unit}",
                    "verificationSteps": ["Log {name} under load"],
                    "timeToVerify": "10 min"
                }],
                "repairProcedure": [{
                    "step": 1,
                    "action": "Adjust governor",
                    "details": "Bring {name} from {value} {unit} to 1500",
                    "safetyWarning": "Stop the set before touching the {name} linkage",
                    "tip": "Record {value} {unit} in the log"
                }],
                "parts": [{"name": "Governor actuator", "quantity": 1, "unitCostKES": 100.0,
                           "whereToSource": ["Dealer for {name} controls"]}],
                "preventiveMeasures": ["Check {name} monthly"],
                "relatedFaults": ["Low {name} frequency"]
            }"#,
        )
        .unwrap();
        let sub = Substitution {
            name: "Engine Speed",
            value: 1300.0,
            unit: "RPM",
        };
        let out = entry.rendered(&sub);

        assert_eq!(out.causes[0].cause, "Engine Speed governor droop");
        assert_eq!(out.causes[0].explanation, "Engine Speed reads 1300 RPM");
        assert_eq!(out.causes[0].verification_steps, vec!["Log Engine Speed under load"]);
        assert_eq!(out.causes[0].probability, 60);
        let step = &out.repair_procedure[0];
        assert_eq!(step.details, "Bring Engine Speed from 1300 RPM to 1500");
        assert_eq!(
            step.safety_warning.as_deref(),
            Some("Stop the set before touching the Engine Speed linkage")
        );
        assert_eq!(step.tip.as_deref(), Some("Record 1300 RPM in the log"));
        assert_eq!(out.parts[0].where_to_source, vec!["Dealer for Engine Speed controls"]);
        assert_eq!(out.preventive_measures, vec!["Check Engine Speed monthly"]);
        assert_eq!(out.related_faults, vec!["Low Engine Speed frequency"]);
        assert_eq!(out.parameter, "rpm");
    }
}
