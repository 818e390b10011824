//! Shared CLI utilities.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::ConfigMerger;

pub const DEFAULT_CONFIG_PATH: &str = "./config_files/config.yml";
pub const DEFAULT_OTEL_CONFIG_PATH: &str = "./config_files/otel-config.yml";
pub const DEFAULT_CLOUDWATCH_CONFIG_PATH: &str = "./config_files/cloudwatch.yml";
pub const DEFAULT_NAMESPACES_DIR: &str = "./cw_namespaces";
pub const DEFAULT_COLLECTOR_PATH: &str = "./otelcontribcol_linux_amd64";

/// Load the config file, apply environment overrides, then start logging at
/// the level the merged config asks for.
pub fn load_merged(config_path: &Path, verbose: bool) -> Result<ConfigMerger> {
    let merger = ConfigMerger::from_path(config_path).context("Failed loading configuration")?;

    super::init_tracing(verbose, merger.log_level_hint());
    tracing::debug!("Loaded configuration from {}", config_path.display());
    let applied = merger.applied_overrides();
    if !applied.is_empty() {
        tracing::debug!("Applied environment overrides: {}", applied.join(", "));
    }
    Ok(merger)
}
