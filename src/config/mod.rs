//! Configuration loading, environment overrides, and validation
//!
//! A [`RawConfig`] is loaded from a YAML (or TOML) file, environment
//! variables are laid over it (environment wins), and
//! [`ConfigMerger::validate`] turns it into typed [`ValidatedConfig`] settings.

pub mod error;
pub mod loader;
pub mod merge;
pub mod settings;

pub use error::ConfigError;
pub use loader::{load_config, parse_document, RawConfig, Section};
pub use merge::{env_lookup, Coercion, ConfigMerger, EnvOverride, ENV_OVERRIDES};
pub use settings::{build_listener_url, CloudwatchSettings, OtelSettings, ValidatedConfig};
