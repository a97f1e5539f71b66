//! Local Rule Evaluator
//!
//! Deterministic, offline generator diagnosis. Classifies every registered
//! reading, expands issues through the fault knowledge base, applies
//! correlation and predictive rule tables, and assembles an
//! [`AnalysisResult`](diagnostic_report::AnalysisResult). Never fails once
//! constructed.

mod condition;
mod evaluator;
mod expand;
mod rules;
mod summary;

pub use condition::Condition;
pub use evaluator::{EvaluatorConfig, EvaluatorError, LocalEvaluator};
pub use expand::{CostModel, GAP_CONFIDENCE};
pub use rules::{CorrelationRule, PredictiveRule, RuleSet};
