//! Local Evaluator Implementation

use crate::expand::{expand, CostModel, Expansion};
use crate::rules::RuleSet;
use crate::summary;
use chrono::{DateTime, Utc};
use data_validator::ReadingSnapshot;
use diagnostic_report::{AnalysisResult, Issue, MaintenanceTask};
use fault_knowledge::{KnowledgeBase, KnowledgeError};
use health_scoring::{HealthScorer, ScoringConfig, ScoringError, StatusCounts};
use parameter_catalog::ParameterCatalog;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Evaluator construction errors
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),
    #[error("Scoring configuration error: {0}")]
    Scoring(#[from] ScoringError),
}

/// Tunable evaluator settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub scoring: ScoringConfig,
    pub cost: CostModel,
}

/// Deterministic, offline diagnosis
///
/// Shares its catalog, knowledge and rule tables through `Arc`, so clones
/// are cheap and can be handed to concurrent requests.
#[derive(Debug, Clone)]
pub struct LocalEvaluator {
    catalog: Arc<ParameterCatalog>,
    knowledge: Arc<KnowledgeBase>,
    rules: Arc<RuleSet>,
    scorer: HealthScorer,
    cost: CostModel,
}

impl LocalEvaluator {
    /// Create an evaluator from its parts
    pub fn new(
        catalog: Arc<ParameterCatalog>,
        knowledge: Arc<KnowledgeBase>,
        rules: RuleSet,
        config: EvaluatorConfig,
    ) -> Result<Self, EvaluatorError> {
        let scorer = HealthScorer::new(config.scoring)?;
        info!(
            "Local evaluator ready: {} parameters, {} knowledge entries, {} correlation rules, {} predictive rules",
            catalog.len(),
            knowledge.len(),
            rules.correlations.len(),
            rules.predictions.len()
        );
        Ok(Self {
            catalog,
            knowledge,
            rules: Arc::new(rules),
            scorer,
            cost: config.cost,
        })
    }

    /// Built-in catalog, embedded knowledge and built-in rules
    pub fn builtin() -> Result<Self, EvaluatorError> {
        Self::new(
            Arc::new(ParameterCatalog::builtin()),
            Arc::new(KnowledgeBase::embedded()?),
            RuleSet::builtin(),
            EvaluatorConfig::default(),
        )
    }

    /// Evaluate a snapshot, stamping the result with the current time
    pub fn evaluate(&self, snapshot: &ReadingSnapshot) -> AnalysisResult {
        self.evaluate_at(snapshot, Utc::now())
    }

    /// Evaluate a snapshot with a fixed timestamp
    pub fn evaluate_at(&self, snapshot: &ReadingSnapshot, timestamp: DateTime<Utc>) -> AnalysisResult {
        let mut counts = StatusCounts::default();
        let mut issues = Vec::new();
        let mut expansions = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for spec in self.catalog.all() {
            let Some(value) = snapshot.get(&spec.key) else {
                continue;
            };
            let c = spec.classify(value);
            counts.record(c.status);
            if !c.status.is_abnormal() {
                continue;
            }

            let uses = seen.entry(spec.key.as_str()).or_insert(0);
            let id = match *uses {
                0 => spec.key.clone(),
                n => format!("{}-{}", spec.key, n),
            };
            *uses += 1;

            let issue = Issue {
                id,
                key: spec.key.clone(),
                parameter: spec.name.clone(),
                value,
                unit: spec.unit.clone(),
                status: c.status,
                deviation: c.deviation,
                marginal: c.marginal,
                title: summary::issue_title(&spec.name, c.status, c.marginal),
                description: summary::issue_description(spec, value, c.status, c.deviation, c.marginal),
            };
            debug!("{}: {} ({})", issue.id, issue.status.as_str(), issue.value);

            let knowledge = self
                .knowledge
                .lookup_directed(&spec.key, c.status, c.deviation);
            expansions.push(expand(&issue, spec, knowledge, &self.cost));
            issues.push(issue);
        }

        let health_score = self.scorer.score(&counts);
        let overall_health = self.scorer.label(health_score);

        let correlations = self.rules.correlations(snapshot, &self.catalog);
        let predicted_failures = self.rules.predictions(snapshot, &self.catalog);
        let scheduled_maintenance = predicted_failures.iter().map(MaintenanceTask::from).collect();

        let primary = summary::primary_index(&issues, &expansions);
        let primary_issue = primary.map(|i| &issues[i]);
        let primary_diagnosis = summary::primary_diagnosis(primary.map(|i| (&issues[i], &expansions[i])));
        let executive_summary = summary::executive_summary(&counts, primary_issue);
        let technician_notes = summary::technician_notes(&expansions, primary);
        let immediate_actions = summary::immediate_actions(&expansions);

        info!(
            "Local evaluation: {} classified, {} issues, {} correlations, score {}",
            counts.total(),
            issues.len(),
            correlations.len(),
            health_score
        );

        AnalysisResult {
            timestamp,
            health_score,
            overall_health,
            critical_count: counts.critical_reported(),
            warning_count: counts.warning,
            normal_count: counts.normal,
            issues,
            primary_diagnosis,
            executive_summary,
            immediate_actions,
            detailed_analysis: expansions.into_iter().map(|e: Expansion| e.analysis).collect(),
            correlations,
            predicted_failures,
            scheduled_maintenance,
            technician_notes,
        }
    }

    /// Number of snapshot keys with a registered spec
    pub fn registered_count(&self, snapshot: &ReadingSnapshot) -> usize {
        snapshot
            .iter()
            .filter(|(key, _)| self.catalog.contains(key))
            .count()
    }

    /// Parameter catalog in use
    pub fn catalog(&self) -> &Arc<ParameterCatalog> {
        &self.catalog
    }

    /// Knowledge base in use
    pub fn knowledge(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagnostic_report::HealthLabel;
    use parameter_catalog::Status;

    fn evaluator() -> LocalEvaluator {
        LocalEvaluator::builtin().unwrap()
    }

    #[test]
    fn test_empty_snapshot() {
        let result = evaluator().evaluate(&ReadingSnapshot::new());
        assert_eq!(result.health_score, 100);
        assert_eq!(result.overall_health, HealthLabel::Excellent);
        assert!(result.issues.is_empty());
        assert_eq!(result.classified_count(), 0);
        assert_eq!(result.primary_diagnosis.title, "All Systems Normal");
    }

    #[test]
    fn test_all_normal() {
        let snapshot = ReadingSnapshot::new()
            .with("oilPressure", 45.0)
            .with("coolantTemp", 85.0)
            .with("frequency", 50.0);
        let result = evaluator().evaluate(&snapshot);
        assert_eq!(result.normal_count, 3);
        assert_eq!(result.health_score, 100);
        assert!(result.detailed_analysis.is_empty());
        assert!(result.executive_summary.starts_with("HEALTHY"));
    }

    #[test]
    fn test_unregistered_keys_ignored() {
        let snapshot = ReadingSnapshot::new()
            .with("oilPressure", 45.0)
            .with("engineHours", 12000.0)
            .with("ambientHumidity", 80.0);
        let ev = evaluator();
        let result = ev.evaluate(&snapshot);
        assert_eq!(result.classified_count(), 1);
        assert_eq!(ev.registered_count(&snapshot), 1);
    }

    #[test]
    fn test_emergency_counted_as_critical() {
        let snapshot = ReadingSnapshot::new().with("coolantTemp", 125.0);
        let result = evaluator().evaluate(&snapshot);
        assert_eq!(result.critical_count, 1);
        assert_eq!(result.issues[0].status, Status::Emergency);
        assert_eq!(result.issues[0].title, "EMERGENCY: Coolant Temperature");
        assert_eq!(result.health_score, 65);
    }

    #[test]
    fn test_marginal_warning() {
        let snapshot = ReadingSnapshot::new().with("fuelLevel", 25.0);
        let result = evaluator().evaluate(&snapshot);
        let issue = &result.issues[0];
        assert_eq!(issue.status, Status::Warning);
        assert!(issue.marginal);
        assert!(issue.title.starts_with("MARGINAL"));
        assert_eq!(result.health_score, 92);
    }

    #[test]
    fn test_scheduled_maintenance_from_predictions() {
        let snapshot = ReadingSnapshot::new().with("batteryVoltage", 23.0);
        let result = evaluator().evaluate(&snapshot);
        assert_eq!(result.predicted_failures.len(), 1);
        assert_eq!(result.scheduled_maintenance.len(), 1);
        assert_eq!(
            result.scheduled_maintenance[0].priority,
            diagnostic_report::Priority::Critical
        );
    }

    #[test]
    fn test_invalid_scoring_config() {
        let config = EvaluatorConfig {
            scoring: ScoringConfig {
                penalties: health_scoring::Penalties {
                    warning: 50,
                    critical: 10,
                    emergency: 60,
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let result = LocalEvaluator::new(
            Arc::new(ParameterCatalog::builtin()),
            Arc::new(KnowledgeBase::default()),
            RuleSet::builtin(),
            config,
        );
        assert!(matches!(result, Err(EvaluatorError::Scoring(_))));
    }

    #[test]
    fn test_local_result_passes_shape_validation() {
        let snapshot = ReadingSnapshot::new()
            .with("coolantTemp", 115.0)
            .with("oilPressure", 12.0)
            .with("rpm", 1500.0);
        let ev = evaluator();
        let result = ev.evaluate(&snapshot);
        assert!(result.validate_for(ev.registered_count(&snapshot)).is_ok());
    }
}
