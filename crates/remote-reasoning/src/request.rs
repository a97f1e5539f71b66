//! Reasoning request payload

use data_validator::ReadingSnapshot;
use parameter_catalog::{ParameterCatalog, ParameterSpec};
use serde::{Deserialize, Deserializer, Serialize};

/// Free-form operator context forwarded to the remote service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticContext {
    /// Controller fault codes, e.g. `SPN 100 FMI 1`
    #[serde(deserialize_with = "one_or_many")]
    pub fault_codes: Vec<String>,
    /// Symptoms reported by the operator, sent as one text or a list
    #[serde(deserialize_with = "one_or_many")]
    pub symptoms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator_brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_brand: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(text)) if !text.trim().is_empty() => vec![text],
        Some(OneOrMany::Many(items)) => items,
        _ => Vec::new(),
    })
}

impl DiagnosticContext {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything the remote service needs for one diagnosis
#[derive(Debug, Clone, Copy)]
pub struct ReasoningRequest<'a> {
    pub snapshot: &'a ReadingSnapshot,
    pub catalog: &'a ParameterCatalog,
    pub context: Option<&'a DiagnosticContext>,
}

#[derive(Serialize)]
struct Body<'a> {
    readings: &'a ReadingSnapshot,
    parameters: Vec<&'a ParameterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a DiagnosticContext>,
    model: &'a str,
}

impl<'a> ReasoningRequest<'a> {
    pub fn new(snapshot: &'a ReadingSnapshot, catalog: &'a ParameterCatalog) -> Self {
        Self {
            snapshot,
            catalog,
            context: None,
        }
    }

    pub fn with_context(mut self, context: Option<&'a DiagnosticContext>) -> Self {
        self.context = context.filter(|c| !c.is_empty());
        self
    }

    /// Number of snapshot readings a valid answer must classify
    pub fn expected_count(&self) -> usize {
        self.snapshot
            .iter()
            .filter(|(key, _)| self.catalog.contains(key))
            .count()
    }

    /// Wire body: `{ readings, parameters, context?, model }`
    pub fn to_json(&self, model: &str) -> serde_json::Value {
        let body = Body {
            readings: self.snapshot,
            parameters: self.catalog.all().collect(),
            context: self.context,
            model,
        };
        serde_json::to_value(body).unwrap_or(serde_json::Value::Null)
    }
}
