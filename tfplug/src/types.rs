//! Values handed to a provider by the plugin host, and the diagnostics it
//! hands back.

use crate::error::{Result, TfplugError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// JSON stand-in for a value the host does not know yet.
const UNKNOWN_MARKER: &str = "__unknown__";

/// A configuration value of any Terraform type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Dynamic {
    Null,
    Bool(bool),
    /// Terraform numbers are arbitrary precision; f64 covers provider settings
    Number(f64),
    String(String),
    List(Vec<Dynamic>),
    /// Element order carries no meaning
    Set(Vec<Dynamic>),
    Map(HashMap<String, Dynamic>),
    /// Not known until apply
    Unknown,
}

impl Dynamic {
    pub fn as_string(&self) -> Option<&String> {
        match self {
            Dynamic::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Dynamic::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Dynamic::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Dynamic>> {
        match self {
            Dynamic::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&Vec<Dynamic>> {
        match self {
            Dynamic::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Dynamic::Unknown)
    }

    /// Lower-case type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Dynamic::Null => "null",
            Dynamic::Bool(_) => "bool",
            Dynamic::Number(_) => "number",
            Dynamic::String(_) => "string",
            Dynamic::List(_) => "list",
            Dynamic::Set(_) => "set",
            Dynamic::Map(_) => "map",
            Dynamic::Unknown => "unknown",
        }
    }
}

impl From<Value> for Dynamic {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Dynamic::Null,
            Value::Bool(b) => Dynamic::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Dynamic::Null, Dynamic::Number),
            Value::String(s) if s == UNKNOWN_MARKER => Dynamic::Unknown,
            Value::String(s) => Dynamic::String(s),
            Value::Array(items) => Dynamic::List(items.into_iter().map(Dynamic::from).collect()),
            Value::Object(entries) => Dynamic::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Dynamic::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Dynamic> for Value {
    fn from(value: Dynamic) -> Self {
        match value {
            Dynamic::Null => Value::Null,
            Dynamic::Bool(b) => Value::Bool(b),
            Dynamic::Number(n) => serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number),
            Dynamic::String(s) => Value::String(s),
            Dynamic::List(items) | Dynamic::Set(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            Dynamic::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
            Dynamic::Unknown => Value::String(UNKNOWN_MARKER.to_string()),
        }
    }
}

/// Attribute values of a provider or resource block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub values: HashMap<String, Dynamic>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: Dynamic) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Dynamic> {
        self.values.get(name)
    }

    /// Non-empty string attribute
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(Dynamic::as_string)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Dynamic::as_bool)
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Dynamic::as_number)
    }

    /// A JSON object becomes the attribute map; `null` is an empty block.
    pub fn decode_json(data: &[u8]) -> Result<Self> {
        match serde_json::from_slice::<Dynamic>(data).map_err(TfplugError::Decode)? {
            Dynamic::Map(values) => Ok(Self { values }),
            Dynamic::Null => Ok(Self::new()),
            other => Err(TfplugError::TypeMismatch {
                expected: "map",
                actual: other.type_name(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// One problem reported to the user, optionally tied to an attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub summary: String,
    pub detail: Option<String>,
    pub attribute: Option<String>,
}

impl Diagnostic {
    fn new(
        severity: DiagnosticSeverity,
        summary: impl Into<String>,
        detail: Option<impl Into<String>>,
    ) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: detail.map(Into::into),
            attribute: None,
        }
    }

    pub fn error(summary: impl Into<String>, detail: Option<impl Into<String>>) -> Self {
        Self::new(DiagnosticSeverity::Error, summary, detail)
    }

    pub fn warning(summary: impl Into<String>, detail: Option<impl Into<String>>) -> Self {
        Self::new(DiagnosticSeverity::Warning, summary, detail)
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

/// Warnings and errors collected over one host request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: Option<impl Into<String>>) {
        self.push(Diagnostic::error(summary, detail));
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: Option<impl Into<String>>) {
        self.push(Diagnostic::warning(summary, detail));
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            DiagnosticSeverity::Error => self.errors.push(diagnostic),
            DiagnosticSeverity::Warning => self.warnings.push(diagnostic),
        }
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
