//! Report Narrative
//!
//! Headline diagnosis, summaries and action lists built from the
//! classified issues and their analyses.

use crate::expand::Expansion;
use diagnostic_report::{Issue, PrimaryDiagnosis};
use health_scoring::StatusCounts;
use parameter_catalog::{Deviation, ParameterSpec, Status};

const MAX_TOOLS: usize = 5;

/// Issue title, e.g. `CRITICAL: Oil Pressure`
pub fn issue_title(name: &str, status: Status, marginal: bool) -> String {
    let prefix = match status {
        Status::Emergency => "EMERGENCY",
        Status::Critical => "CRITICAL",
        Status::Warning if marginal => "MARGINAL",
        Status::Warning => "WARNING",
        Status::Normal => "NORMAL",
    };
    format!("{prefix}: {name}")
}

/// One-sentence issue description
pub fn issue_description(
    spec: &ParameterSpec,
    value: f64,
    status: Status,
    deviation: Option<Deviation>,
    marginal: bool,
) -> String {
    let low = deviation == Some(Deviation::Low);
    let state = match status {
        Status::Emergency if low => "is at EMERGENCY LOW level",
        Status::Emergency => "is at EMERGENCY HIGH level",
        Status::Critical if low => "is critically low",
        Status::Critical => "is critically high",
        Status::Warning if marginal => "is outside optimal but within acceptable range",
        Status::Warning if low => "is below normal",
        Status::Warning => "is above normal",
        Status::Normal => "is within optimal range",
    };
    format!("{} at {} {} {}", spec.name, value, spec.unit, state)
}

/// Index of the issue to headline: highest status, then highest knowledge
/// confidence, then earliest
pub fn primary_index(issues: &[Issue], expansions: &[Expansion]) -> Option<usize> {
    issues
        .iter()
        .zip(expansions)
        .enumerate()
        .max_by(|(ia, (a, ea)), (ib, (b, eb))| {
            a.status
                .cmp(&b.status)
                .then(ea.confidence.cmp(&eb.confidence))
                .then(ib.cmp(ia))
        })
        .map(|(i, _)| i)
}

/// Headline diagnosis
pub fn primary_diagnosis(issue: Option<(&Issue, &Expansion)>) -> PrimaryDiagnosis {
    match issue {
        None => PrimaryDiagnosis {
            title: "All Systems Normal".to_string(),
            summary: "All monitored parameters are within normal operating ranges.".to_string(),
            confidence: 100,
            root_causes: Vec::new(),
        },
        Some((issue, expansion)) => PrimaryDiagnosis {
            title: issue.title.clone(),
            summary: format!(
                "The primary concern is {} at {} {}. {}.",
                issue.parameter, issue.value, issue.unit, issue.description
            ),
            confidence: expansion.confidence,
            root_causes: expansion.analysis.root_causes.clone(),
        },
    }
}

/// First repair action of every critical or emergency analysis, in issue order
pub fn immediate_actions(expansions: &[Expansion]) -> Vec<String> {
    expansions
        .iter()
        .filter(|e| e.analysis.issue.status.counts_as_critical())
        .filter_map(|e| e.analysis.first_action().map(str::to_string))
        .collect()
}

/// Short management-level summary
pub fn executive_summary(counts: &StatusCounts, primary: Option<&Issue>) -> String {
    let critical = counts.critical_reported();
    let detail = primary
        .map(|i| format!(" {}.", i.description))
        .unwrap_or_default();

    if critical > 0 {
        format!(
            "CRITICAL: Generator has {critical} critical issue(s) requiring immediate attention.{detail} Stop operation and address before continuing."
        )
    } else if counts.warning > 0 {
        format!(
            "WARNING: Generator has {} warning(s) that should be investigated.{detail} Plan service soon.",
            counts.warning
        )
    } else if counts.normal > 0 {
        format!(
            "HEALTHY: All {} monitored parameters are within normal ranges. Generator is operating optimally.",
            counts.normal
        )
    } else {
        "NO DATA: No recognised parameters were supplied, so generator health could not be assessed."
            .to_string()
    }
}

/// Notes pointing a technician at where to start
pub fn technician_notes(expansions: &[Expansion], primary: Option<usize>) -> String {
    if expansions.is_empty() {
        return "No issues detected. Recommend routine service inspection to maintain reliability."
            .to_string();
    }

    let focus: Vec<&str> = expansions
        .iter()
        .map(|e| e.analysis.issue.parameter.as_str())
        .collect();
    let mut notes = format!("Focus diagnosis on: {}.", focus.join(", "));

    if let Some(lead) = primary.and_then(|i| expansions.get(i)) {
        let cause = lead
            .analysis
            .top_cause()
            .map(|c| c.cause.as_str())
            .unwrap_or("Unknown");
        notes.push_str(&format!(
            " Most likely root cause for {}: {}.",
            lead.analysis.issue.parameter, cause
        ));
    }

    let mut tools: Vec<&str> = Vec::new();
    for tool in expansions.iter().flat_map(|e| e.analysis.tools_required.iter()) {
        if tools.len() == MAX_TOOLS {
            break;
        }
        if !tools.contains(&tool.as_str()) {
            tools.push(tool);
        }
    }
    if !tools.is_empty() {
        notes.push_str(&format!(" Recommended tools: {}.", tools.join(", ")));
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::{expand, CostModel};
    use parameter_catalog::ParameterCatalog;

    fn build(key: &str, value: f64) -> (Issue, Expansion) {
        let catalog = ParameterCatalog::builtin();
        let spec = catalog.get(key).unwrap();
        let c = spec.classify(value);
        let issue = Issue {
            id: key.to_string(),
            key: key.to_string(),
            parameter: spec.name.clone(),
            value,
            unit: spec.unit.clone(),
            status: c.status,
            deviation: c.deviation,
            marginal: c.marginal,
            title: issue_title(&spec.name, c.status, c.marginal),
            description: issue_description(spec, value, c.status, c.deviation, c.marginal),
        };
        let expansion = expand(&issue, spec, None, &CostModel::default());
        (issue, expansion)
    }

    #[test]
    fn test_titles() {
        assert_eq!(issue_title("Oil Pressure", Status::Critical, false), "CRITICAL: Oil Pressure");
        assert_eq!(issue_title("Fuel Level", Status::Warning, true), "MARGINAL: Fuel Level");
        assert_eq!(issue_title("RPM", Status::Emergency, false), "EMERGENCY: RPM");
    }

    #[test]
    fn test_primary_prefers_severity_then_order() {
        let (a, ea) = build("intakeAirTemp", 58.0); // warning
        let (b, eb) = build("oilPressure", 5.0); // critical
        let (c, ec) = build("fuelPressure", 1.0); // critical
        let issues = vec![a, b, c];
        let expansions = vec![ea, eb, ec];
        assert_eq!(primary_index(&issues, &expansions), Some(1));
    }

    #[test]
    fn test_primary_prefers_confidence() {
        let (a, ea) = build("oilPressure", 5.0);
        let (b, mut eb) = build("fuelPressure", 1.0);
        eb.confidence = 90;
        assert_eq!(primary_index(&[a, b], &[ea, eb]), Some(1));
    }

    #[test]
    fn test_no_issues() {
        assert_eq!(primary_index(&[], &[]), None);
        let primary = primary_diagnosis(None);
        assert_eq!(primary.title, "All Systems Normal");
        assert_eq!(primary.confidence, 100);

        let counts = StatusCounts {
            normal: 4,
            ..Default::default()
        };
        assert!(executive_summary(&counts, None).starts_with("HEALTHY: All 4"));
        assert!(technician_notes(&[], None).starts_with("No issues detected"));
    }

    #[test]
    fn test_immediate_actions_only_critical() {
        let (_, warning) = build("intakeAirTemp", 58.0);
        let (_, critical) = build("oilPressure", 5.0);
        let actions = immediate_actions(&[warning, critical]);
        assert_eq!(actions, vec!["Have a qualified technician inspect the Oil Pressure"]);
    }

    #[test]
    fn test_summary_mentions_primary() {
        let (issue, _) = build("oilPressure", 5.0);
        let counts = StatusCounts {
            critical: 1,
            ..Default::default()
        };
        let summary = executive_summary(&counts, Some(&issue));
        assert!(summary.starts_with("CRITICAL: Generator has 1 critical issue(s)"));
        assert!(summary.contains("Oil Pressure at 5 PSI is critically low."));
    }
}
