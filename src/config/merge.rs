//! Environment overrides and validation of the merged configuration
//!
//! Precedence is Env > File > Defaults. Every override variable maps to
//! exactly one field, listed in [`ENV_OVERRIDES`].

use serde_yaml::{Mapping, Value};
use std::path::Path;

use crate::config::loader::{load_config, RawConfig, Section};
use crate::config::settings::{build_listener_url, CloudwatchSettings, OtelSettings, ValidatedConfig};
use crate::config::ConfigError;
use crate::validator::{self, NamespaceValidation};

/// How an environment string becomes a config value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Text,
    Integer,
}

#[derive(Debug, Clone, Copy)]
pub struct EnvOverride {
    pub variable: &'static str,
    pub section: Section,
    pub key: &'static str,
    pub coercion: Coercion,
}

const fn env(variable: &'static str, section: Section, key: &'static str, coercion: Coercion) -> EnvOverride {
    EnvOverride { variable, section, key, coercion }
}

pub const ENV_OVERRIDES: &[EnvOverride] = &[
    // Open telemetry collector
    env("SCRAPE_INTERVAL", Section::Otel, "scrape_interval", Coercion::Integer),
    env("LOGZIO_REGION", Section::Otel, "logzio_region", Coercion::Text),
    env("TOKEN", Section::Otel, "token", Coercion::Text),
    env("P8S_LOGZIO_NAME", Section::Otel, "p8s_logzio_name", Coercion::Text),
    env("CUSTOM_LISTENER", Section::Otel, "custom_listener", Coercion::Text),
    env("REMOTE_TIMEOUT", Section::Otel, "remote_timeout", Coercion::Integer),
    env("SCRAPE_TIMEOUT", Section::Otel, "scrape_timeout", Coercion::Integer),
    env("LOG_LEVEL", Section::Otel, "log_level", Coercion::Text),
    env("LOGZIO_LOG_LEVEL", Section::Otel, "logzio_log_level", Coercion::Text),
    env("AWS_ACCESS_KEY_ID", Section::Otel, "AWS_ACCESS_KEY_ID", Coercion::Text),
    env("AWS_SECRET_ACCESS_KEY", Section::Otel, "AWS_SECRET_ACCESS_KEY", Coercion::Text),
    // Cloudwatch exporter
    env("DELAY_SECONDS", Section::Cloudwatch, "delay_seconds", Coercion::Integer),
    env("RANGE_SECONDS", Section::Cloudwatch, "range_seconds", Coercion::Integer),
    env("PERIOD_SECONDS", Section::Cloudwatch, "period_seconds", Coercion::Integer),
    env("SET_TIMESTAMP", Section::Cloudwatch, "set_timestamp", Coercion::Text),
    env("AWS_REGION", Section::Cloudwatch, "region", Coercion::Text),
    env("AWS_NAMESPACES", Section::Cloudwatch, "aws_namespaces", Coercion::Text),
    env("CUSTOM_CONFIG", Section::Cloudwatch, "custom_config", Coercion::Text),
    env("AWS_ROLE_ARN", Section::Cloudwatch, "role_arn", Coercion::Text),
];

impl EnvOverride {
    fn coerce(&self, raw: String) -> Result<Value, ConfigError> {
        match self.coercion {
            Coercion::Text => Ok(Value::String(raw)),
            Coercion::Integer => raw.trim().parse::<i64>().map(Value::from).map_err(|_| {
                ConfigError::TypeMismatch {
                    field: self.variable.to_string(),
                    expected: "integer",
                    found: "string",
                }
            }),
        }
    }
}

/// Process environment lookup used outside of tests.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Merged file + environment configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigMerger {
    raw: RawConfig,
    applied: Vec<&'static str>,
}

impl ConfigMerger {
    pub fn new(raw: RawConfig) -> Self {
        Self { raw, applied: Vec::new() }
    }

    /// Load `path` and apply overrides from the process environment.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::from_path_with_env(path, env_lookup)
    }

    pub fn from_path_with_env<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut merger = Self::new(load_config(path)?);
        merger.apply_env_overrides(lookup)?;
        Ok(merger)
    }

    /// Overwrite fields from the environment. Returns the variables that were set.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<Vec<&'static str>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = Vec::new();
        for entry in ENV_OVERRIDES {
            let Some(raw) = lookup(entry.variable) else {
                continue;
            };
            let value = entry.coerce(raw)?;
            self.raw.set(entry.section, entry.key, value);
            applied.push(entry.variable);
        }
        self.applied.extend(applied.iter().copied());
        Ok(applied)
    }

    /// Variables that overwrote a file value so far.
    pub fn applied_overrides(&self) -> &[&'static str] {
        &self.applied
    }

    pub fn raw(&self) -> &RawConfig {
        &self.raw
    }

    pub fn raw_mut(&mut self) -> &mut RawConfig {
        &mut self.raw
    }

    pub fn otel(&self) -> &Mapping {
        &self.raw.otel
    }

    pub fn cloudwatch(&self) -> &Mapping {
        &self.raw.cloudwatch
    }

    pub fn get(&self, section: Section, key: &str) -> Option<&Value> {
        self.raw.get(section, key)
    }

    /// Listener endpoint derived from the merged (unvalidated) values.
    pub fn listener_url(&self) -> String {
        build_listener_url(
            self.raw.str_or_empty(Section::Otel, "logzio_region"),
            self.raw.str_or_empty(Section::Otel, "custom_listener"),
        )
    }

    /// Level requested for this tool's own logs, if the config sets one.
    pub fn log_level_hint(&self) -> Option<&str> {
        self.raw.get(Section::Otel, "logzio_log_level").and_then(Value::as_str)
    }

    /// Validate every setting and freeze the result into typed settings.
    ///
    /// The first violation aborts the call. Unsupported namespaces do not fail
    /// validation unless nothing is accepted; they are returned in
    /// [`NamespaceValidation::rejected`] for the caller to report. When
    /// `cloudwatch.custom_config` is true the namespace check is skipped and
    /// both lists are empty.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let otel = SectionReader::new(Section::Otel, &self.raw.otel);
        let cw = SectionReader::new(Section::Cloudwatch, &self.raw.cloudwatch);

        let region = cw.read("region", None, |f, v| owned(validator::validate_aws_region(f, v)))?;
        let token = otel.read("token", None, |f, v| owned(validator::validate_token(f, v)))?;
        let p8s_logzio_name = otel.read("p8s_logzio_name", Some("cloudwatch-metrics".into()), |f, v| {
            owned(validator::validate_name(f, v))
        })?;
        let logzio_region = otel.read("logzio_region", Some("us".into()), |f, v| {
            owned(validator::validate_region_code(f, v))
        })?;
        let custom_listener = otel.read("custom_listener", Some("".into()), |f, v| {
            match validator::validate_string(f, v)? {
                "" => Ok(String::new()),
                _ => owned(validator::validate_custom_listener(f, v)),
            }
        })?;
        let scrape_interval =
            otel.read("scrape_interval", Some(300.into()), validator::validate_interval)?;
        let delay_seconds = cw.read("delay_seconds", Some(600.into()), validator::validate_interval)?;
        let range_seconds = cw.read("range_seconds", Some(600.into()), validator::validate_interval)?;
        let period_seconds = cw.read("period_seconds", Some(300.into()), validator::validate_interval)?;
        let scrape_timeout =
            otel.read("scrape_timeout", Some(300.into()), validator::validate_interval)?;
        let remote_timeout =
            otel.read("remote_timeout", Some(120.into()), validator::validate_positive_int)?;
        let log_level = otel.read("log_level", Some("info".into()), validator::validate_log_level)?;
        let logzio_log_level = otel.read("logzio_log_level", Some("info".into()), |f, v| {
            owned(validator::validate_string(f, v))
        })?;
        let aws_access_key_id = otel.read("AWS_ACCESS_KEY_ID", Some("".into()), |f, v| {
            owned(validator::validate_string(f, v))
        })?;
        let aws_secret_access_key = otel.read("AWS_SECRET_ACCESS_KEY", Some("".into()), |f, v| {
            owned(validator::validate_string(f, v))
        })?;

        let role_arn = cw.read("role_arn", Some("".into()), |f, v| owned(validator::validate_string(f, v)))?;
        let set_timestamp = cw.read("set_timestamp", Some(false.into()), validator::validate_flag)?;
        let custom_config = cw.read("custom_config", Some(false.into()), validator::validate_flag)?;
        let namespaces = if custom_config {
            NamespaceValidation::default()
        } else {
            cw.read("aws_namespaces", None, validator::validate_aws_namespaces)?
        };

        Ok(ValidatedConfig {
            otel: OtelSettings {
                token,
                logzio_region,
                custom_listener,
                p8s_logzio_name,
                scrape_interval,
                scrape_timeout,
                remote_timeout,
                log_level,
                logzio_log_level,
                aws_access_key_id,
                aws_secret_access_key,
            },
            cloudwatch: CloudwatchSettings {
                custom_config,
                region,
                role_arn,
                namespaces,
                set_timestamp,
                delay_seconds,
                range_seconds,
                period_seconds,
            },
        })
    }
}

fn owned(result: Result<&str, ConfigError>) -> Result<String, ConfigError> {
    result.map(str::to_string)
}

/// Field access for one section, with defaults and dotted field names.
struct SectionReader<'a> {
    section: Section,
    values: &'a Mapping,
}

impl<'a> SectionReader<'a> {
    fn new(section: Section, values: &'a Mapping) -> Self {
        Self { section, values }
    }

    /// Run `check` on the value of `key`, or on `default` when the key is absent.
    /// An absent key without a default is a malformed config.
    fn read<T, F>(&self, key: &str, default: Option<Value>, check: F) -> Result<T, ConfigError>
    where
        F: FnOnce(&str, &Value) -> Result<T, ConfigError>,
    {
        let field = format!("{}.{}", self.section.name(), key);
        match (self.values.get(key), default) {
            (Some(value), _) => check(field.as_str(), value),
            (None, Some(value)) => check(field.as_str(), &value),
            (None, None) => {
                Err(ConfigError::MalformedConfig(format!("missing required setting '{field}'")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_document;
    use std::collections::HashMap;

    const TEST_CONFIG: &str = include_str!("../../testdata/test-config.yml");

    fn test_merger() -> ConfigMerger {
        ConfigMerger::new(RawConfig::from_value(parse_document(TEST_CONFIG).expect("yaml")).expect("raw"))
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn every_variable_maps_to_one_distinct_field() {
        let mut seen = std::collections::HashSet::new();
        for entry in ENV_OVERRIDES {
            assert!(seen.insert((entry.section, entry.key)), "{} shares a field", entry.variable);
        }
        let vars: std::collections::HashSet<_> = ENV_OVERRIDES.iter().map(|e| e.variable).collect();
        assert_eq!(vars.len(), ENV_OVERRIDES.len());
    }

    #[test]
    fn test_load_config_env_overwrite() {
        let mut merger = test_merger();
        let applied = merger
            .apply_env_overrides(lookup(&[
                ("LOGZIO_REGION", "eu"),
                ("SCRAPE_INTERVAL", "600"),
                ("P8S_LOGZIO_NAME", "test"),
                ("TOKEN", "test"),
                ("CUSTOM_LISTENER", "test"),
                ("REMOTE_TIMEOUT", "600"),
                ("LOG_LEVEL", "info"),
                ("LOGZIO_LOG_LEVEL", "debug"),
                ("AWS_ACCESS_KEY_ID", "test"),
                ("AWS_SECRET_ACCESS_KEY", "test"),
                ("DELAY_SECONDS", "60"),
                ("RANGE_SECONDS", "60"),
                ("PERIOD_SECONDS", "60"),
                ("SET_TIMESTAMP", "true"),
                ("AWS_REGION", "us-east-2"),
                ("AWS_NAMESPACES", "AWS/RDS,AWS/ELB"),
                ("CUSTOM_CONFIG", "true"),
                ("AWS_ROLE_ARN", "test"),
            ]))
            .expect("overrides");
        assert_eq!(applied.len(), 18);

        let raw = merger.raw();
        assert_eq!(raw.str_or_empty(Section::Otel, "logzio_region"), "eu");
        assert_eq!(raw.get(Section::Otel, "scrape_interval"), Some(&Value::from(600)));
        assert_eq!(raw.str_or_empty(Section::Otel, "token"), "test");
        assert_eq!(raw.str_or_empty(Section::Otel, "custom_listener"), "test");
        assert_eq!(raw.get(Section::Otel, "remote_timeout"), Some(&Value::from(600)));
        assert_eq!(raw.str_or_empty(Section::Otel, "log_level"), "info");
        assert_eq!(raw.str_or_empty(Section::Otel, "logzio_log_level"), "debug");
        assert_eq!(raw.str_or_empty(Section::Otel, "AWS_ACCESS_KEY_ID"), "test");
        assert_eq!(raw.str_or_empty(Section::Otel, "AWS_SECRET_ACCESS_KEY"), "test");
        // Not overridden: file value survives.
        assert_eq!(raw.get(Section::Otel, "scrape_timeout"), Some(&Value::from(300)));

        assert_eq!(raw.str_or_empty(Section::Cloudwatch, "custom_config"), "true");
        assert_eq!(raw.str_or_empty(Section::Cloudwatch, "region"), "us-east-2");
        assert_eq!(raw.str_or_empty(Section::Cloudwatch, "role_arn"), "test");
        assert_eq!(raw.str_or_empty(Section::Cloudwatch, "aws_namespaces"), "AWS/RDS,AWS/ELB");
        assert_eq!(raw.get(Section::Cloudwatch, "delay_seconds"), Some(&Value::from(60)));
        assert_eq!(raw.get(Section::Cloudwatch, "range_seconds"), Some(&Value::from(60)));
        assert_eq!(raw.get(Section::Cloudwatch, "period_seconds"), Some(&Value::from(60)));
        assert_eq!(raw.str_or_empty(Section::Cloudwatch, "set_timestamp"), "true");
    }

    #[test]
    fn absent_variables_leave_file_values() {
        let mut merger = test_merger();
        let before = merger.clone();
        let applied = merger.apply_env_overrides(|_| None).expect("overrides");
        assert!(applied.is_empty());
        assert_eq!(merger, before);
    }

    #[test]
    fn env_adds_fields_missing_from_file() {
        let mut raw = RawConfig::default();
        raw.set(Section::Otel, "scrape_interval", 300);
        let mut merger = ConfigMerger::new(raw);
        merger.apply_env_overrides(lookup(&[("TOKEN", "abc")])).expect("overrides");
        assert_eq!(merger.raw().str_or_empty(Section::Otel, "token"), "abc");
    }

    #[test]
    fn bad_integer_override_is_type_mismatch() {
        let mut merger = test_merger();
        let err = merger
            .apply_env_overrides(lookup(&[("SCRAPE_INTERVAL", "five minutes")]))
            .expect_err("not an integer");
        assert!(err.is_type_mismatch());
        assert!(err.to_string().contains("SCRAPE_INTERVAL"));
    }

    #[test]
    fn test_get_listener_url() {
        let mut merger = test_merger();
        assert_eq!(merger.listener_url(), "https://listener.logz.io:8053");
        for code in ["au", "ca", "eu", "nl", "uk", "wa"] {
            merger.raw_mut().set(Section::Otel, "logzio_region", code);
            assert_eq!(merger.listener_url(), format!("https://listener-{code}.logz.io:8053"));
        }
        merger.raw_mut().set(Section::Otel, "custom_listener", "test");
        assert_eq!(merger.listener_url(), "test");
    }

    #[test]
    fn validate_test_config() {
        let validated = test_merger().validate().expect("valid");
        assert_eq!(validated.otel.token, "fakeXamgZErKKkMhmzdVZDhuZcpGKXeo");
        assert_eq!(validated.otel.scrape_interval, 300);
        assert_eq!(validated.otel.remote_timeout, 120);
        assert_eq!(validated.otel.log_level, "debug");
        assert_eq!(validated.cloudwatch.region, "us-east-1");
        assert!(!validated.cloudwatch.custom_config);
        assert!(!validated.cloudwatch.set_timestamp);
        assert_eq!(validated.namespaces().accepted, strings(&["AWS/EC2", "AWS/Lambda"]));
        assert!(validated.namespaces().rejected.is_empty());
        assert_eq!(validated.listener_url(), "https://listener.logz.io:8053");
        assert_eq!(validated.otel.aws_credentials().map(|(id, _)| id), Some("fakeXamgZErKKkMhmzdVZDhuZcpGKXeo"));
    }

    #[test]
    fn env_value_wins_after_validation() {
        let mut merger = test_merger();
        merger
            .apply_env_overrides(lookup(&[("SCRAPE_INTERVAL", "600"), ("AWS_NAMESPACES", "RDS, nosuch")]))
            .expect("overrides");
        let validated = merger.validate().expect("valid");
        assert_eq!(validated.otel.scrape_interval, 600);
        assert_eq!(validated.namespaces().accepted, strings(&["AWS/RDS"]));
        assert_eq!(validated.namespaces().rejected, strings(&["nosuch"]));
    }

    #[test]
    fn custom_config_skips_namespace_check() {
        let mut merger = test_merger();
        merger.raw_mut().set(Section::Cloudwatch, "custom_config", "true");
        merger.raw_mut().set(Section::Cloudwatch, "aws_namespaces", "");
        let validated = merger.validate().expect("valid");
        assert!(validated.cloudwatch.custom_config);
        assert!(validated.namespaces().is_empty());

        merger.raw_mut().section_mut(Section::Cloudwatch).remove("aws_namespaces");
        assert!(merger.validate().is_ok());
    }

    #[test]
    fn namespaces_required_without_custom_config() {
        let mut merger = test_merger();
        merger.raw_mut().section_mut(Section::Cloudwatch).remove("aws_namespaces");
        assert!(merger.validate().expect_err("missing").is_malformed());

        merger.raw_mut().set(Section::Cloudwatch, "aws_namespaces", "AWS/fdfdf");
        assert!(merger.validate().expect_err("nothing accepted").is_invalid_value());
    }

    #[test]
    fn single_value_failures_stop_validation() {
        let cases: Vec<(Section, &str, Value, bool)> = vec![
            (Section::Otel, "token", Value::from("short"), false),
            (Section::Otel, "token", Value::Null, true),
            (Section::Otel, "logzio_region", Value::from("usa"), false),
            (Section::Otel, "scrape_interval", Value::from(61), false),
            (Section::Otel, "scrape_interval", Value::from("300"), true),
            (Section::Otel, "custom_listener", Value::from("custom.listener:3000"), false),
            (Section::Otel, "log_level", Value::from("loud"), false),
            (Section::Cloudwatch, "period_seconds", Value::Bool(true), true),
            (Section::Cloudwatch, "region", Value::from(""), false),
            (Section::Cloudwatch, "custom_config", Value::from("maybe"), false),
        ];
        for (section, key, value, type_error) in cases {
            let mut merger = test_merger();
            merger.raw_mut().set(section, key, value);
            let err = merger.validate().expect_err(key);
            assert_eq!(err.is_type_mismatch(), type_error, "{key}: {err}");
            assert!(err.to_string().contains(key), "{err}");
        }
    }

    #[test]
    fn defaults_fill_optional_settings() {
        let doc = parse_document(
            "otel:\n  token: rDRJEidvpIbecUwshyCnGkuUjbymiHev\ncloudwatch:\n  region: us-east-1\n  aws_namespaces: AWS/EC2\n",
        )
        .expect("yaml");
        let validated = ConfigMerger::new(RawConfig::from_value(doc).expect("raw")).validate().expect("valid");
        assert_eq!(validated.otel.logzio_region, "us");
        assert_eq!(validated.otel.p8s_logzio_name, "cloudwatch-metrics");
        assert_eq!(validated.otel.scrape_interval, 300);
        assert_eq!(validated.otel.remote_timeout, 120);
        assert_eq!(validated.otel.log_level, "info");
        assert!(validated.otel.aws_credentials().is_none());
        assert_eq!(validated.cloudwatch.delay_seconds, 600);
        assert_eq!(validated.cloudwatch.period_seconds, 300);
        assert_eq!(validated.cloudwatch.role_arn, "");
    }

    #[test]
    fn missing_required_settings_are_malformed() {
        let doc = parse_document("otel: {}\ncloudwatch:\n  region: us-east-1\n").expect("yaml");
        let err = ConfigMerger::new(RawConfig::from_value(doc).expect("raw")).validate().expect_err("token");
        assert!(err.is_malformed());
        assert!(err.to_string().contains("otel.token"));
    }

    #[test]
    fn from_path_applies_injected_environment() {
        let tmp = tempfile::TempDir::new().expect("tmp");
        let path = tmp.path().join("config.yml");
        std::fs::write(&path, include_str!("../../testdata/test-config.yml")).expect("write");

        let env = lookup(&[("LOGZIO_REGION", "eu"), ("DELAY_SECONDS", "120")]);
        let merger = ConfigMerger::from_path_with_env(&path, env).expect("merged");
        assert_eq!(merger.applied_overrides(), ["LOGZIO_REGION", "DELAY_SECONDS"]);
        assert_eq!(merger.listener_url(), "https://listener-eu.logz.io:8053");
        assert_eq!(merger.validate().expect("valid").cloudwatch.delay_seconds, 120);

        let err = ConfigMerger::from_path_with_env(&path, lookup(&[("RANGE_SECONDS", "ten")]))
            .expect_err("bad integer");
        assert!(err.is_type_mismatch());
        assert!(err.to_string().contains("RANGE_SECONDS"));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let tmp = tempfile::TempDir::new().expect("tmp");
        let err = ConfigMerger::from_path_with_env(&tmp.path().join("absent.yml"), lookup(&[]))
            .expect_err("missing");
        assert!(err.is_malformed());
    }
}
