//! Health Scorer Implementation

use crate::ScoringError;
use diagnostic_report::HealthLabel;
use parameter_catalog::Status;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Points deducted from 100 per parameter in each status
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Penalties {
    pub warning: u32,
    pub critical: u32,
    pub emergency: u32,
}

impl Default for Penalties {
    fn default() -> Self {
        Self {
            warning: 8,
            critical: 20,
            emergency: 35,
        }
    }
}

impl Penalties {
    /// Penalty for a single reading
    pub fn for_status(&self, status: Status) -> u32 {
        match status {
            Status::Normal => 0,
            Status::Warning => self.warning,
            Status::Critical => self.critical,
            Status::Emergency => self.emergency,
        }
    }
}

/// Minimum score for each label; anything lower is `Critical`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelThresholds {
    pub excellent: u8,
    pub good: u8,
    pub fair: u8,
    pub poor: u8,
}

impl Default for LabelThresholds {
    fn default() -> Self {
        Self {
            excellent: 90,
            good: 75,
            fair: 50,
            poor: 25,
        }
    }
}

/// Scoring configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub penalties: Penalties,
    pub thresholds: LabelThresholds,
}

impl ScoringConfig {
    /// Reject configurations that would break score monotonicity or label order
    pub fn validate(&self) -> Result<(), ScoringError> {
        let p = &self.penalties;
        if p.warning >= p.critical || p.critical >= p.emergency {
            return Err(ScoringError::PenaltyOrder {
                warning: p.warning,
                critical: p.critical,
                emergency: p.emergency,
            });
        }

        let t = &self.thresholds;
        let ordered = [t.excellent, t.good, t.fair, t.poor];
        if t.excellent > 100 || ordered.windows(2).any(|w| w[0] <= w[1]) {
            return Err(ScoringError::ThresholdOrder(ordered));
        }
        Ok(())
    }
}

/// Per-status tally of classified parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub normal: usize,
    pub warning: usize,
    pub critical: usize,
    pub emergency: usize,
}

impl StatusCounts {
    /// Count one classified reading
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Normal => self.normal += 1,
            Status::Warning => self.warning += 1,
            Status::Critical => self.critical += 1,
            Status::Emergency => self.emergency += 1,
        }
    }

    /// Critical count as reported, emergency included
    pub fn critical_reported(&self) -> usize {
        self.critical + self.emergency
    }

    /// Number of classified readings
    pub fn total(&self) -> usize {
        self.normal + self.warning + self.critical + self.emergency
    }
}

impl FromIterator<Status> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = Status>>(iter: I) -> Self {
        let mut counts = Self::default();
        for status in iter {
            counts.record(status);
        }
        counts
    }
}

/// Computes health score and label
#[derive(Debug, Clone, Default)]
pub struct HealthScorer {
    config: ScoringConfig,
}

impl HealthScorer {
    /// Create a scorer, validating the configuration
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        info!(
            "Health scorer penalties: warning {}, critical {}, emergency {}",
            config.penalties.warning, config.penalties.critical, config.penalties.emergency
        );
        Ok(Self { config })
    }

    /// `100 - sum of penalties`, floored at 0
    pub fn score(&self, counts: &StatusCounts) -> u8 {
        let p = &self.config.penalties;
        let deducted = [
            (counts.warning, p.warning),
            (counts.critical, p.critical),
            (counts.emergency, p.emergency),
        ]
        .iter()
        .fold(0u64, |acc, &(n, penalty)| {
            acc.saturating_add((n as u64).saturating_mul(u64::from(penalty)))
        });

        let score = 100u64.saturating_sub(deducted) as u8;
        debug!("Health score {} ({} points deducted)", score, deducted);
        score
    }

    /// Label for a score
    pub fn label(&self, score: u8) -> HealthLabel {
        let t = &self.config.thresholds;
        if score >= t.excellent {
            HealthLabel::Excellent
        } else if score >= t.good {
            HealthLabel::Good
        } else if score >= t.fair {
            HealthLabel::Fair
        } else if score >= t.poor {
            HealthLabel::Poor
        } else {
            HealthLabel::Critical
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_penalties() {
        let scorer = HealthScorer::default();
        let counts: StatusCounts = [Status::Critical].into_iter().collect();
        assert_eq!(scorer.score(&counts), 80);

        let counts: StatusCounts = [Status::Critical, Status::Warning, Status::Normal]
            .into_iter()
            .collect();
        assert_eq!(scorer.score(&counts), 72);
    }

    #[test]
    fn test_score_floor() {
        let scorer = HealthScorer::default();
        let counts = StatusCounts {
            emergency: 10,
            ..Default::default()
        };
        assert_eq!(scorer.score(&counts), 0);
    }

    #[test]
    fn test_empty_counts_score_full() {
        let scorer = HealthScorer::default();
        assert_eq!(scorer.score(&StatusCounts::default()), 100);
        assert_eq!(scorer.label(100), HealthLabel::Excellent);
    }

    #[test]
    fn test_labels() {
        let scorer = HealthScorer::default();
        assert_eq!(scorer.label(90), HealthLabel::Excellent);
        assert_eq!(scorer.label(89), HealthLabel::Good);
        assert_eq!(scorer.label(75), HealthLabel::Good);
        assert_eq!(scorer.label(50), HealthLabel::Fair);
        assert_eq!(scorer.label(25), HealthLabel::Poor);
        assert_eq!(scorer.label(24), HealthLabel::Critical);
    }

    #[test]
    fn test_emergency_reported_as_critical() {
        let counts: StatusCounts = [Status::Emergency, Status::Critical, Status::Warning]
            .into_iter()
            .collect();
        assert_eq!(counts.critical_reported(), 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_invalid_penalty_order() {
        let config = ScoringConfig {
            penalties: Penalties {
                warning: 30,
                critical: 20,
                emergency: 35,
            },
            ..Default::default()
        };
        assert!(matches!(
            HealthScorer::new(config),
            Err(ScoringError::PenaltyOrder { .. })
        ));
    }

    #[test]
    fn test_equal_penalties_rejected() {
        let config = ScoringConfig {
            penalties: Penalties {
                warning: 20,
                critical: 20,
                emergency: 35,
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ScoringError::PenaltyOrder {
                warning: 20,
                critical: 20,
                emergency: 35,
            })
        );
    }

    #[test]
    fn test_invalid_thresholds() {
        let config = ScoringConfig {
            thresholds: LabelThresholds {
                excellent: 90,
                good: 90,
                fair: 50,
                poor: 25,
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ScoringError::ThresholdOrder([90, 90, 50, 25]))
        );
    }

    proptest::proptest! {
        #[test]
        fn prop_worse_status_never_raises_score(
            normal in 0usize..10,
            warning in 0usize..10,
            critical in 0usize..10,
            emergency in 0usize..5,
        ) {
            let scorer = HealthScorer::default();
            let base = StatusCounts { normal, warning, critical, emergency };
            let score = scorer.score(&base);

            if normal > 0 {
                let worse = StatusCounts { normal: normal - 1, warning: warning + 1, ..base };
                proptest::prop_assert!(scorer.score(&worse) <= score);
            }
            if warning > 0 {
                let worse = StatusCounts { warning: warning - 1, critical: critical + 1, ..base };
                proptest::prop_assert!(scorer.score(&worse) <= score);
            }
            if critical > 0 {
                let worse = StatusCounts { critical: critical - 1, emergency: emergency + 1, ..base };
                proptest::prop_assert!(scorer.score(&worse) <= score);
            }
        }
    }
}
