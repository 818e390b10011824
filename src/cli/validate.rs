//! Validate command implementation

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::utils::{load_merged, DEFAULT_CONFIG_PATH, DEFAULT_NAMESPACES_DIR};
use crate::config::ValidatedConfig;
use crate::render::missing_namespace_files;
use crate::validator::NamespaceValidation;

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the user config file (.yml, .yaml or .toml)
    #[arg(short = 'c', long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Directory checked for a metric file per accepted namespace
    #[arg(long, value_name = "DIR", default_value = DEFAULT_NAMESPACES_DIR)]
    pub namespaces_dir: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// `validate --json` output. Secrets are left out by the settings' serializers.
#[derive(Serialize)]
struct ValidationReport<'a> {
    #[serde(flatten)]
    namespaces: &'a NamespaceValidation,
    listener_url: String,
    missing_metric_files: Vec<String>,
    settings: &'a ValidatedConfig,
}

pub fn run(args: ValidateArgs, verbose: bool) -> Result<()> {
    let merger = load_merged(&args.config, verbose)?;
    let config = merger.validate().context("Invalid configuration")?;
    let namespaces = config.namespaces();

    if !namespaces.rejected.is_empty() {
        tracing::warn!("{} namespaces are unsupported", namespaces.rejected.join(", "));
    }
    // Rendering fails on these, validation only reports them.
    let missing_metric_files = missing_namespace_files(&args.namespaces_dir, &namespaces.accepted);
    if !missing_metric_files.is_empty() {
        tracing::warn!(
            "No metric definitions in {} for {}",
            args.namespaces_dir.display(),
            missing_metric_files.join(", ")
        );
    }

    if args.json {
        let report = ValidationReport {
            namespaces,
            listener_url: config.listener_url(),
            missing_metric_files,
            settings: &config,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Configuration is valid");
    println!("Listener: {}", config.listener_url());
    if config.cloudwatch.custom_config {
        println!("Namespaces: custom exporter configuration");
    } else {
        println!("Accepted namespaces: {}", namespaces.accepted.join(", "));
        if !namespaces.rejected.is_empty() {
            println!("Rejected namespaces: {}", namespaces.rejected.join(", "));
        }
        if !missing_metric_files.is_empty() {
            println!("Missing metric files: {}", missing_metric_files.join(", "));
        }
    }
    Ok(())
}
