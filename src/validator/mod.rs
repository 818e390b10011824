//! Single-value validation rules
//!
//! Every check takes the dotted field name (used only for error messages) and
//! the raw YAML value, and returns the normalized value or a [`ConfigError`].

pub mod catalog;
pub mod namespaces;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;

use crate::config::ConfigError;

pub use catalog::NAMESPACE_CATALOG;
pub use namespaces::{
    partition_namespaces, validate_aws_namespaces, validate_aws_namespaces_with, NamespaceValidation,
};

/// Smallest interval granularity accepted by the exporter, in seconds.
pub const INTERVAL_STEP_SECONDS: u64 = 60;
pub const MAX_INTERVAL_SECONDS: u64 = 360_000;

/// Listener region codes. The empty code means the default (US) listener.
pub const REGION_CODES: &[&str] = &["", "us", "au", "ca", "eu", "nl", "uk", "wa"];

/// Levels the collector's `service.telemetry.logs.level` accepts.
pub const COLLECTOR_LOG_LEVELS: &[&str] = &["debug", "info", "warn", "error", "dpanic", "panic", "fatal"];

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{32}$").expect("valid regex"));

static LISTENER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(localhost|[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+)(:[0-9]+)?$")
        .expect("valid regex")
});

pub fn validate_string<'a>(field: &str, value: &'a Value) -> Result<&'a str, ConfigError> {
    value.as_str().ok_or_else(|| ConfigError::type_mismatch(field, "string", value))
}

/// AWS region of the CloudWatch API, e.g. `us-east-1`.
pub fn validate_aws_region<'a>(field: &str, value: &'a Value) -> Result<&'a str, ConfigError> {
    let region = validate_string(field, value)?;
    if region.trim().is_empty() {
        return Err(ConfigError::invalid(field, region, "region must not be empty"));
    }
    Ok(region)
}

/// Listener region code, one of [`REGION_CODES`].
pub fn validate_region_code<'a>(field: &str, value: &'a Value) -> Result<&'a str, ConfigError> {
    let code = validate_string(field, value)?;
    if !REGION_CODES.contains(&code) {
        return Err(ConfigError::invalid(
            field,
            code,
            format!("expected one of {}", REGION_CODES[1..].join(", ")),
        ));
    }
    Ok(code)
}

/// Shipping token: exactly 32 ASCII letters or digits.
pub fn validate_token<'a>(field: &str, value: &'a Value) -> Result<&'a str, ConfigError> {
    let token = validate_string(field, value)?;
    if !TOKEN_PATTERN.is_match(token) {
        // Never echo the token itself back into logs.
        return Err(ConfigError::invalid(
            field,
            format!("<{} chars>", token.chars().count()),
            "token must be 32 letters or digits",
        ));
    }
    Ok(token)
}

/// Logical (p8s) name attached as an external label. Any string is accepted.
pub fn validate_name<'a>(field: &str, value: &'a Value) -> Result<&'a str, ConfigError> {
    validate_string(field, value)
}

fn integer(field: &str, value: &Value) -> Result<i64, ConfigError> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(v) => Ok(v),
            None if n.is_u64() => Err(ConfigError::invalid(field, n, "integer out of range")),
            None => Err(ConfigError::type_mismatch(field, "integer", value)),
        },
        _ => Err(ConfigError::type_mismatch(field, "integer", value)),
    }
}

/// Interval in seconds: a multiple of 60 between 60 and 360000 inclusive.
pub fn validate_interval(field: &str, value: &Value) -> Result<u64, ConfigError> {
    let seconds = integer(field, value)?;
    let in_range = (INTERVAL_STEP_SECONDS as i64..=MAX_INTERVAL_SECONDS as i64).contains(&seconds);
    if !in_range || seconds % INTERVAL_STEP_SECONDS as i64 != 0 {
        return Err(ConfigError::invalid(
            field,
            seconds,
            format!(
                "must be a multiple of {INTERVAL_STEP_SECONDS} between {INTERVAL_STEP_SECONDS} and {MAX_INTERVAL_SECONDS}"
            ),
        ));
    }
    Ok(seconds as u64)
}

pub fn validate_positive_int(field: &str, value: &Value) -> Result<u64, ConfigError> {
    let v = integer(field, value)?;
    if v < 1 {
        return Err(ConfigError::invalid(field, v, "must be a positive integer"));
    }
    Ok(v as u64)
}

/// `scheme://host[:port]` with an http(s) scheme.
pub fn validate_custom_listener<'a>(field: &str, value: &'a Value) -> Result<&'a str, ConfigError> {
    let url = validate_string(field, value)?;
    if !LISTENER_PATTERN.is_match(url) {
        return Err(ConfigError::invalid(
            field,
            url,
            "expected http(s)://host[:port] with a dotted host or localhost",
        ));
    }
    Ok(url)
}

/// A YAML boolean, or the strings `true`/`false` in any case.
pub fn validate_flag(field: &str, value: &Value) -> Result<bool, ConfigError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
        Value::String(s) => Err(ConfigError::invalid(field, s, "expected true or false")),
        other => Err(ConfigError::type_mismatch(field, "boolean", other)),
    }
}

/// Collector telemetry log level, returned lower-cased.
pub fn validate_log_level(field: &str, value: &Value) -> Result<String, ConfigError> {
    let level = validate_string(field, value)?.trim().to_ascii_lowercase();
    if !COLLECTOR_LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::invalid(
            field,
            level,
            format!("expected one of {}", COLLECTOR_LOG_LEVELS.join(", ")),
        ));
    }
    Ok(level)
}
