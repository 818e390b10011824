//! Namespace list partitioning
//!
//! Splits user input into catalog-backed namespaces (sorted, deduplicated) and
//! the tokens that matched nothing (kept as typed). A token must use the
//! catalog's casing to match.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_yaml::Value;

use super::catalog::{canonical_service, strip_namespace_prefix, NAMESPACE_CATALOG, NAMESPACE_PREFIX};
use crate::config::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamespaceValidation {
    /// Canonical `AWS/<Service>` identifiers, sorted ascending, no duplicates.
    pub accepted: Vec<String>,
    /// Unmatched tokens in their original form, in input order.
    pub rejected: Vec<String>,
}

impl NamespaceValidation {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.rejected.is_empty()
    }
}

/// Partition tokens against `catalog`. Tokens are trimmed; empty ones are dropped.
pub fn partition_namespaces<'a, I>(tokens: I, catalog: &[&str]) -> NamespaceValidation
where
    I: IntoIterator<Item = &'a str>,
{
    let mut accepted = BTreeSet::new();
    let mut rejected: Vec<String> = Vec::new();

    for token in tokens.into_iter().map(str::trim).filter(|t| !t.is_empty()) {
        match canonical_service(catalog, strip_namespace_prefix(token)) {
            Some(service) => {
                accepted.insert(format!("{NAMESPACE_PREFIX}{service}"));
            }
            None => {
                if !rejected.iter().any(|r| r == token) {
                    rejected.push(token.to_string());
                }
            }
        }
    }

    NamespaceValidation { accepted: accepted.into_iter().collect(), rejected }
}

/// Validate a comma-separated string (or list of strings) against the built-in catalog.
pub fn validate_aws_namespaces(field: &str, value: &Value) -> Result<NamespaceValidation, ConfigError> {
    validate_aws_namespaces_with(field, value, NAMESPACE_CATALOG)
}

pub fn validate_aws_namespaces_with(
    field: &str,
    value: &Value,
    catalog: &[&str],
) -> Result<NamespaceValidation, ConfigError> {
    let tokens: Vec<String> = match value {
        Value::String(raw) => raw.split(',').map(str::to_string).collect(),
        Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(ConfigError::type_mismatch(field, "list of strings", other)),
            })
            .collect::<Result<_, _>>()?,
        other => return Err(ConfigError::type_mismatch(field, "comma-separated string", other)),
    };

    let display = tokens.join(",");
    let result = partition_namespaces(tokens.iter().map(String::as_str), catalog);
    if result.accepted.is_empty() {
        let reason = if result.rejected.is_empty() {
            "no namespaces given"
        } else {
            "none of the namespaces are supported"
        };
        return Err(ConfigError::invalid(field, display, reason));
    }
    Ok(result)
}
