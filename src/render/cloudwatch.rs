//! CloudWatch exporter configuration
//!
//! Global settings go at the top level of the exporter document. Each accepted
//! namespace contributes the metric entries found in `<dir>/<Service>.yml`.

use anyhow::{bail, Context, Result};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

use crate::config::{CloudwatchSettings, ValidatedConfig};
use crate::utils::{read_yaml, set_path, write_yaml};
use crate::validator::catalog::strip_namespace_prefix;

pub fn apply_cloudwatch_settings(doc: &mut Value, settings: &CloudwatchSettings) -> Result<()> {
    set_path(doc, &["period_seconds"], Value::from(settings.period_seconds))?;
    set_path(doc, &["range_seconds"], Value::from(settings.range_seconds))?;
    set_path(doc, &["delay_seconds"], Value::from(settings.delay_seconds))?;
    set_path(doc, &["region"], Value::from(settings.region.as_str()))?;
    set_path(doc, &["set_timestamp"], Value::Bool(settings.set_timestamp))?;
    if !settings.role_arn.is_empty() {
        set_path(doc, &["role_arn"], Value::from(settings.role_arn.as_str()))?;
    }
    Ok(())
}

/// Metric definition file for `AWS/<Service>` (or a bare service name).
pub fn namespace_file(dir: &Path, namespace: &str) -> PathBuf {
    dir.join(format!("{}.yml", strip_namespace_prefix(namespace)))
}

/// Namespaces in `namespaces` that have no metric definition file under `dir`.
pub fn missing_namespace_files(dir: &Path, namespaces: &[String]) -> Vec<String> {
    namespaces.iter().filter(|ns| !namespace_file(dir, ns).is_file()).cloned().collect()
}

/// Append each namespace's metric entries to `metrics`, skipping entries already present.
pub fn merge_namespace_metrics(doc: &mut Value, namespaces: &[String], dir: &Path) -> Result<()> {
    if doc.get("metrics").map_or(true, Value::is_null) {
        set_path(doc, &["metrics"], Value::Sequence(Vec::new()))?;
    }
    let Some(metrics) = doc.get_mut("metrics").and_then(Value::as_sequence_mut) else {
        bail!("'metrics' in the cloudwatch exporter configuration must be a list");
    };

    for namespace in namespaces {
        let path = namespace_file(dir, namespace);
        let entries = read_yaml(&path)
            .with_context(|| format!("No metric definitions for namespace {namespace}"))?;
        let Value::Sequence(entries) = entries else {
            bail!("Metric definitions in {} must be a list", path.display());
        };
        for entry in entries {
            if !metrics.contains(&entry) {
                metrics.push(entry);
            }
        }
        tracing::info!("{namespace} was added to cloudwatch exporter configuration");
    }
    Ok(())
}

/// Rewrite the exporter template at `path` in place and return the result.
pub fn render_cloudwatch_config(path: &Path, namespaces_dir: &Path, config: &ValidatedConfig) -> Result<Value> {
    tracing::info!("Adding cloudwatch exporter configuration");
    let mut doc = read_yaml(path)?;
    apply_cloudwatch_settings(&mut doc, &config.cloudwatch)?;
    merge_namespace_metrics(&mut doc, &config.namespaces().accepted, namespaces_dir)?;
    write_yaml(path, &doc)?;
    tracing::info!("Cloudwatch exporter configuration ready");
    Ok(doc)
}
