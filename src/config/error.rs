//! Error taxonomy for configuration loading and validation

use serde_yaml::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The field holds a value of the wrong kind.
    #[error("{field}: expected {expected}, found {found}")]
    TypeMismatch { field: String, expected: &'static str, found: &'static str },

    /// The field has the right kind but violates a domain rule.
    #[error("{field}: invalid value {value:?}: {reason}")]
    InvalidValue { field: String, value: String, reason: String },

    /// The base document is missing required structure or could not be read.
    #[error("malformed config: {0}")]
    MalformedConfig(String),
}

impl ConfigError {
    pub fn type_mismatch(field: &str, expected: &'static str, found: &Value) -> Self {
        ConfigError::TypeMismatch { field: field.to_string(), expected, found: kind_of(found) }
    }

    pub fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, ConfigError::TypeMismatch { .. })
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(self, ConfigError::InvalidValue { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ConfigError::MalformedConfig(_))
    }
}

/// Human-readable name of a YAML value's kind, used in mismatch messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
