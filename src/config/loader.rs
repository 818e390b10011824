//! Config file loading

use crate::config::ConfigError;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Top-level sections of the config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Otel,
    Cloudwatch,
}

impl Section {
    pub fn name(self) -> &'static str {
        match self {
            Section::Otel => "otel",
            Section::Cloudwatch => "cloudwatch",
        }
    }
}

/// Settings exactly as read from the file, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConfig {
    pub otel: Mapping,
    pub cloudwatch: Mapping,
}

impl RawConfig {
    /// Build from a parsed document. Both sections must be present and be mappings.
    pub fn from_value(doc: Value) -> Result<Self, ConfigError> {
        let Value::Mapping(mut root) = doc else {
            return Err(ConfigError::MalformedConfig(
                "top level of the config document must be a mapping".to_string(),
            ));
        };
        let otel = take_section(&mut root, Section::Otel)?;
        let cloudwatch = take_section(&mut root, Section::Cloudwatch)?;
        Ok(RawConfig { otel, cloudwatch })
    }

    pub fn section(&self, section: Section) -> &Mapping {
        match section {
            Section::Otel => &self.otel,
            Section::Cloudwatch => &self.cloudwatch,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut Mapping {
        match section {
            Section::Otel => &mut self.otel,
            Section::Cloudwatch => &mut self.cloudwatch,
        }
    }

    pub fn get(&self, section: Section, key: &str) -> Option<&Value> {
        self.section(section).get(key)
    }

    pub fn set(&mut self, section: Section, key: &str, value: impl Into<Value>) {
        self.section_mut(section).insert(Value::from(key), value.into());
    }

    /// String value of a field, or `""` when absent or not a string.
    pub fn str_or_empty(&self, section: Section, key: &str) -> &str {
        self.get(section, key).and_then(Value::as_str).unwrap_or("")
    }
}

fn take_section(root: &mut Mapping, section: Section) -> Result<Mapping, ConfigError> {
    match root.remove(section.name()) {
        Some(Value::Mapping(values)) => Ok(values),
        Some(other) => Err(ConfigError::MalformedConfig(format!(
            "section '{}' must be a mapping, found {}",
            section.name(),
            crate::config::error::kind_of(&other)
        ))),
        None => Err(ConfigError::MalformedConfig(format!(
            "missing required section '{}'",
            section.name()
        ))),
    }
}

/// Load the config file at `path`. `.yml`/`.yaml` and `.toml` are supported.
pub fn load_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::MalformedConfig(format!("failed reading config file {}: {e}", path.display()))
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let doc = match ext.as_str() {
        "yaml" | "yml" => parse_document(&content),
        "toml" => parse_toml_document(&content),
        other => {
            return Err(ConfigError::MalformedConfig(format!(
                "unsupported config extension '.{other}' for file {}",
                path.display()
            )))
        }
    }
    .map_err(|e| match e {
        ConfigError::MalformedConfig(msg) => {
            ConfigError::MalformedConfig(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;

    RawConfig::from_value(doc)
}

/// Parse YAML text into a generic document.
pub fn parse_document(content: &str) -> Result<Value, ConfigError> {
    serde_yaml::from_str(content)
        .map_err(|e| ConfigError::MalformedConfig(format!("invalid YAML syntax: {e}")))
}

fn parse_toml_document(content: &str) -> Result<Value, ConfigError> {
    let raw: toml::Value = toml::from_str(content)
        .map_err(|e| ConfigError::MalformedConfig(format!("invalid TOML syntax: {e}")))?;
    serde_yaml::to_value(raw)
        .map_err(|e| ConfigError::MalformedConfig(format!("unrepresentable TOML value: {e}")))
}
