//! Shape Validation
//!
//! Checks applied to results that did not come from the local evaluator.

use crate::result::AnalysisResult;
use parameter_catalog::Status;
use thiserror::Error;

/// Report shape violations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("{field} out of range: {value} (max 100)")]
    OutOfRange { field: String, value: u32 },

    #[error("{field} mismatch: reported {reported}, issues imply {derived}")]
    CountMismatch {
        field: &'static str,
        reported: usize,
        derived: usize,
    },

    #[error("classified {reported} parameters, snapshot has {expected}")]
    TotalMismatch { reported: usize, expected: usize },

    #[error("correlation {0} references fewer than two parameters")]
    LoneCorrelation(usize),

    #[error("issue {0} has normal status")]
    NormalIssue(String),
}

fn check_percent(field: impl Into<String>, value: u8) -> Result<(), ReportError> {
    if value > 100 {
        return Err(ReportError::OutOfRange {
            field: field.into(),
            value: u32::from(value),
        });
    }
    Ok(())
}

impl AnalysisResult {
    /// Validate internal consistency of the report
    pub fn validate(&self) -> Result<(), ReportError> {
        check_percent("healthScore", self.health_score)?;
        check_percent("primaryDiagnosis.confidence", self.primary_diagnosis.confidence)?;

        let analysis_causes = self
            .detailed_analysis
            .iter()
            .flat_map(|a| a.root_causes.iter());
        for cause in self.primary_diagnosis.root_causes.iter().chain(analysis_causes) {
            check_percent(format!("probability of '{}'", cause.cause), cause.probability)?;
        }
        for failure in &self.predicted_failures {
            check_percent(format!("probability of '{}'", failure.component), failure.probability)?;
        }

        for (i, correlation) in self.correlations.iter().enumerate() {
            if correlation.parameters.len() < 2 {
                return Err(ReportError::LoneCorrelation(i));
            }
        }

        let issues = self.reported_issues();
        if let Some(issue) = issues.iter().find(|i| i.status == Status::Normal) {
            return Err(ReportError::NormalIssue(issue.id.clone()));
        }

        let critical = issues.iter().filter(|i| i.status.counts_as_critical()).count();
        let warning = issues.iter().filter(|i| i.status == Status::Warning).count();
        if critical != self.critical_count {
            return Err(ReportError::CountMismatch {
                field: "criticalCount",
                reported: self.critical_count,
                derived: critical,
            });
        }
        if warning != self.warning_count {
            return Err(ReportError::CountMismatch {
                field: "warningCount",
                reported: self.warning_count,
                derived: warning,
            });
        }

        Ok(())
    }

    /// Validate and additionally require the counts to cover exactly
    /// `expected` registered parameters
    pub fn validate_for(&self, expected: usize) -> Result<(), ReportError> {
        self.validate()?;
        if self.classified_count() != expected {
            return Err(ReportError::TotalMismatch {
                reported: self.classified_count(),
                expected,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisResult {
        serde_json::from_str(
            r#"{
                "timestamp": "2026-01-01T00:00:00Z",
                "healthScore": 80,
                "overallHealth": "Good",
                "criticalCount": 1,
                "warningCount": 0,
                "normalCount": 2,
                "issues": [{
                    "id": "oilPressure", "key": "oilPressure", "parameter": "Oil Pressure",
                    "value": 5, "unit": "PSI", "status": "critical", "deviation": "low",
                    "title": "CRITICAL: Oil Pressure", "description": "Oil Pressure is 5 PSI"
                }],
                "primaryDiagnosis": {
                    "title": "CRITICAL: Oil Pressure", "summary": "low oil pressure", "confidence": 85,
                    "rootCauses": [{"cause": "Low Oil Level", "probability": 35, "explanation": "level"}]
                },
                "executiveSummary": "1 critical issue",
                "correlations": [{
                    "parameters": ["oilPressure", "coolantTemp"],
                    "finding": "f", "implication": "i", "actionRequired": "a"
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_report() {
        let result = sample();
        assert!(result.validate().is_ok());
        assert!(result.validate_for(3).is_ok());
    }

    #[test]
    fn test_score_out_of_range() {
        let mut result = sample();
        result.health_score = 140;
        assert!(matches!(
            result.validate(),
            Err(ReportError::OutOfRange { value: 140, .. })
        ));
    }

    #[test]
    fn test_probability_out_of_range() {
        let mut result = sample();
        result.primary_diagnosis.root_causes[0].probability = 101;
        assert!(result.validate().is_err());
    }

    #[test]
    fn test_counts_must_match_issues() {
        let mut result = sample();
        result.critical_count = 2;
        assert_eq!(
            result.validate(),
            Err(ReportError::CountMismatch {
                field: "criticalCount",
                reported: 2,
                derived: 1
            })
        );
    }

    #[test]
    fn test_counts_without_issues() {
        let mut result = sample();
        result.issues.clear();
        assert!(result.validate().is_err());
    }

    #[test]
    fn test_total_must_match_snapshot() {
        let result = sample();
        assert_eq!(
            result.validate_for(5),
            Err(ReportError::TotalMismatch {
                reported: 3,
                expected: 5
            })
        );
    }

    #[test]
    fn test_lone_correlation() {
        let mut result = sample();
        result.correlations[0].parameters.pop();
        assert_eq!(result.validate(), Err(ReportError::LoneCorrelation(0)));
    }
}
