//! Correlation and Predictive Rule Tables

use crate::condition::{all_hold, Condition};
use data_validator::ReadingSnapshot;
use diagnostic_report::{Correlation, PredictedFailure};
use parameter_catalog::{ParameterCatalog, Status};
use serde::{Deserialize, Serialize};

/// Finding raised when every condition holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationRule {
    /// Keys reported on the resulting correlation
    pub parameters: Vec<String>,
    pub conditions: Vec<Condition>,
    pub finding: String,
    pub implication: String,
    pub action_required: String,
}

impl CorrelationRule {
    /// Correlation for this snapshot, if the rule fires
    pub fn apply(&self, snapshot: &ReadingSnapshot, catalog: &ParameterCatalog) -> Option<Correlation> {
        all_hold(&self.conditions, snapshot, catalog).then(|| Correlation {
            parameters: self.parameters.clone(),
            finding: self.finding.clone(),
            implication: self.implication.clone(),
            action_required: self.action_required.clone(),
        })
    }
}

/// Component failure forecast raised when every condition holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictiveRule {
    pub component: String,
    pub conditions: Vec<Condition>,
    pub timeframe: String,
    pub probability: u8,
    pub preventive_action: String,
    pub cost_if_ignored: f64,
}

impl PredictiveRule {
    /// Prediction for this snapshot, if the rule fires
    pub fn apply(
        &self,
        snapshot: &ReadingSnapshot,
        catalog: &ParameterCatalog,
    ) -> Option<PredictedFailure> {
        all_hold(&self.conditions, snapshot, catalog).then(|| PredictedFailure {
            component: self.component.clone(),
            probability: self.probability,
            timeframe: self.timeframe.clone(),
            cost_if_ignored: self.cost_if_ignored,
            preventive_action: self.preventive_action.clone(),
        })
    }
}

/// Ordered rule tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    #[serde(default)]
    pub correlations: Vec<CorrelationRule>,
    #[serde(default)]
    pub predictions: Vec<PredictiveRule>,
}

impl RuleSet {
    /// Parse rule tables from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Every correlation that fires, in table order
    pub fn correlations(&self, snapshot: &ReadingSnapshot, catalog: &ParameterCatalog) -> Vec<Correlation> {
        self.correlations
            .iter()
            .filter_map(|rule| rule.apply(snapshot, catalog))
            .collect()
    }

    /// Every prediction that fires, in table order
    pub fn predictions(
        &self,
        snapshot: &ReadingSnapshot,
        catalog: &ParameterCatalog,
    ) -> Vec<PredictedFailure> {
        self.predictions
            .iter()
            .filter_map(|rule| rule.apply(snapshot, catalog))
            .collect()
    }

    /// Built-in tables for a 50 Hz, 1500 RPM diesel generator set
    pub fn builtin() -> Self {
        Self {
            correlations: builtin_correlations(),
            predictions: builtin_predictions(),
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

fn below(key: &str, value: f64) -> Condition {
    Condition::Below {
        key: key.to_string(),
        value,
    }
}

fn above(key: &str, value: f64) -> Condition {
    Condition::Above {
        key: key.to_string(),
        value,
    }
}

fn between(key: &str, min: f64, max: f64) -> Condition {
    Condition::Between {
        key: key.to_string(),
        min,
        max,
    }
}

fn at_least(key: &str, status: Status) -> Condition {
    Condition::StatusAtLeast {
        key: key.to_string(),
        status,
    }
}

fn correlation(
    parameters: &[&str],
    conditions: Vec<Condition>,
    finding: &str,
    implication: &str,
    action_required: &str,
) -> CorrelationRule {
    CorrelationRule {
        parameters: keys(parameters),
        conditions,
        finding: finding.to_string(),
        implication: implication.to_string(),
        action_required: action_required.to_string(),
    }
}

fn builtin_correlations() -> Vec<CorrelationRule> {
    vec![
        correlation(
            &["coolantTemp", "oilPressure"],
            vec![
                at_least("coolantTemp", Status::Critical),
                at_least("oilPressure", Status::Warning),
            ],
            "Cooling failure cascading into lubrication",
            "Overheated coolant is thinning the oil, so oil pressure is falling with it. Bearings are at risk while the engine keeps running.",
            "Shut down, let the engine cool, then repair the cooling fault before checking oil level and pressure.",
        ),
        correlation(
            &["oilPressure", "oilTemperature"],
            vec![below("oilPressure", 25.0), above("oilTemperature", 100.0)],
            "Low oil pressure combined with high oil temperature",
            "Hot oil loses viscosity and cannot hold pressure. Points to a cooling problem or severe wear generating excess heat.",
            "Stop the engine. Check oil level and condition and inspect the cooling system. Possible impending bearing failure.",
        ),
        correlation(
            &["coolantTemp", "loadPercent"],
            vec![above("coolantTemp", 100.0), above("loadPercent", 85.0)],
            "High coolant temperature under heavy load",
            "Cooling capacity is marginal for the load, or the set is undersized. Sustained running risks overheating damage.",
            "Reduce load below 80%. Check radiator and fan, and review load management or a larger set.",
        ),
        correlation(
            &["voltageL1N", "voltageL2N", "voltageL3N"],
            vec![Condition::Spread {
                keys: keys(&["voltageL1N", "voltageL2N", "voltageL3N"]),
                exceeds: 10.0,
            }],
            "Significant voltage imbalance between phases",
            "Unbalanced load, AVR fault or winding problem. Imbalance overheats motors and damages equipment.",
            "Check load balance across phases, AVR sensing connections and winding resistance.",
        ),
        correlation(
            &["currentL1", "currentL2", "currentL3"],
            vec![Condition::RelativeSpread {
                keys: keys(&["currentL1", "currentL2", "currentL3"]),
                min_mean: 10.0,
                exceeds: 0.2,
            }],
            "Current imbalance between phases",
            "Load is not spread evenly. Single-phase loads or faulty three-phase equipment are likely.",
            "Audit connected loads and redistribute them. Check three-phase equipment for single-phase faults.",
        ),
        correlation(
            &["frequency", "rpm"],
            vec![
                Condition::AwayFromNominal {
                    key: "frequency".to_string(),
                    nominal: 50.0,
                    tolerance: 1.0,
                },
                Condition::NearNominal {
                    key: "rpm".to_string(),
                    nominal: 1500.0,
                    tolerance: 50.0,
                },
            ],
            "Frequency off nominal while engine speed is correct",
            "Frequency is locked to speed, so this points to a faulty speed sensor or frequency measurement, or a wrong pole count.",
            "Check speed sensor and meter calibration. Confirm 4-pole configuration for 50 Hz at 1500 RPM.",
        ),
        correlation(
            &["powerFactor", "loadPercent"],
            vec![below("powerFactor", 0.75), above("loadPercent", 70.0)],
            "Poor power factor at high load",
            "Inductive load is consuming capacity, so the set looks fully loaded while delivering less real power.",
            "Install power factor correction and review motor starting methods.",
        ),
        correlation(
            &["batteryVoltage", "rpm"],
            vec![below("batteryVoltage", 24.0), above("rpm", 1400.0)],
            "Low battery voltage while the engine is running",
            "The charging alternator is not keeping up, so the batteries will drain and the next start may fail.",
            "Check alternator output, belt tension, wiring and voltage regulator.",
        ),
        correlation(
            &["exhaustTemp", "loadPercent"],
            vec![above("exhaustTemp", 600.0), below("loadPercent", 50.0)],
            "High exhaust temperature at low load",
            "Combustion is poor: restricted air intake, faulty injectors or a turbocharger problem.",
            "Check the air filter and turbocharger for boost leaks, then test the injectors.",
        ),
        correlation(
            &["coolantTemp", "oilTemperature"],
            vec![Condition::OffsetAbove {
                key: "oilTemperature".to_string(),
                reference: "coolantTemp".to_string(),
                margin: 30.0,
            }],
            "Oil temperature far above coolant temperature",
            "The oil cooler is blocked or bypassed, so oil breaks down faster.",
            "Inspect and clean the oil cooler and check its bypass valve.",
        ),
        correlation(
            &["fuelLevel", "fuelPressure"],
            vec![above("fuelLevel", 30.0), below("fuelPressure", 2.0)],
            "Low fuel pressure despite adequate fuel level",
            "Supply restriction: blocked filter, weak lift pump or an air leak.",
            "Replace fuel filters, check the lift pump, inspect lines for air leaks and bleed the system.",
        ),
    ]
}

fn prediction(
    component: &str,
    conditions: Vec<Condition>,
    timeframe: &str,
    probability: u8,
    preventive_action: &str,
    cost_if_ignored: f64,
) -> PredictiveRule {
    PredictiveRule {
        component: component.to_string(),
        conditions,
        timeframe: timeframe.to_string(),
        probability,
        preventive_action: preventive_action.to_string(),
        cost_if_ignored,
    }
}

fn builtin_predictions() -> Vec<PredictiveRule> {
    vec![
        prediction(
            "Engine Bearings",
            vec![between("oilPressure", 20.0, 30.0), above("engineHours", 10000.0)],
            "500-1000 hours",
            70,
            "Schedule bearing inspection or engine overhaul",
            800_000.0,
        ),
        prediction(
            "Batteries",
            vec![between("batteryVoltage", 22.0, 24.0)],
            "1-3 months",
            80,
            "Load test and plan battery replacement",
            50_000.0,
        ),
        prediction(
            "Cooling System",
            vec![between("coolantTemp", 95.0, 100.0)],
            "1-2 months",
            60,
            "Service cooling system: clean radiator, check thermostat and water pump",
            150_000.0,
        ),
        prediction(
            "Turbocharger",
            vec![below("turboBoostPressure", 1.0)],
            "3-6 months",
            65,
            "Inspect turbocharger for wear and check the air intake",
            250_000.0,
        ),
        prediction(
            "Governor System",
            vec![Condition::DeviationBetween {
                key: "frequency".to_string(),
                nominal: 50.0,
                min: 0.5,
                max: 1.0,
            }],
            "1-3 months",
            55,
            "Calibrate governor actuator and check speed sensor",
            80_000.0,
        ),
        prediction(
            "Engine Bearings (thermal wear)",
            vec![
                at_least("coolantTemp", Status::Warning),
                at_least("oilTemperature", Status::Warning),
            ],
            "2-4 months",
            60,
            "Service cooling system and oil cooler, and sample oil for wear metals",
            600_000.0,
        ),
    ]
}
