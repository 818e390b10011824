//! Render and run command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::{
    load_merged, DEFAULT_CLOUDWATCH_CONFIG_PATH, DEFAULT_COLLECTOR_PATH, DEFAULT_CONFIG_PATH,
    DEFAULT_NAMESPACES_DIR, DEFAULT_OTEL_CONFIG_PATH,
};
use crate::config::ValidatedConfig;
use crate::launch::launch_collector;
use crate::render::{render_cloudwatch_config, render_otel_config};
use crate::utils::read_yaml;

#[derive(Args)]
pub struct RenderArgs {
    /// Path to the user config file (.yml, .yaml or .toml)
    #[arg(short = 'c', long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Collector config template, rewritten in place
    #[arg(long, value_name = "FILE", default_value = DEFAULT_OTEL_CONFIG_PATH)]
    pub otel_config: PathBuf,

    /// CloudWatch exporter config template, rewritten in place
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CLOUDWATCH_CONFIG_PATH)]
    pub cloudwatch_config: PathBuf,

    /// Directory holding one `<Service>.yml` metric file per namespace
    #[arg(long, value_name = "DIR", default_value = DEFAULT_NAMESPACES_DIR)]
    pub namespaces_dir: PathBuf,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub render: RenderArgs,

    /// Collector binary to launch
    #[arg(long, value_name = "FILE", default_value = DEFAULT_COLLECTOR_PATH)]
    pub collector: PathBuf,
}

pub fn render(args: RenderArgs, verbose: bool) -> Result<()> {
    render_all(&args, verbose)?;
    Ok(())
}

/// Render both files, then run the collector. Returns its exit code.
pub fn run(args: RunArgs, verbose: bool) -> Result<i32> {
    render_all(&args.render, verbose)?;
    let status = launch_collector(&args.collector, &args.render.otel_config)?;
    if !status.success() {
        tracing::warn!("Collector exited with {}", status);
    }
    Ok(status.code().unwrap_or(1))
}

fn render_all(args: &RenderArgs, verbose: bool) -> Result<ValidatedConfig> {
    let merger = load_merged(&args.config, verbose)?;
    let config = merger.validate().context("Invalid configuration")?;

    let rejected = &config.namespaces().rejected;
    if !rejected.is_empty() {
        tracing::warn!("{} namespaces are unsupported", rejected.join(", "));
    }

    let cloudwatch = if config.cloudwatch.custom_config {
        tracing::info!("Adding custom cloudwatch exporter configuration");
        read_yaml(&args.cloudwatch_config)?
    } else {
        render_cloudwatch_config(&args.cloudwatch_config, &args.namespaces_dir, &config)?
    };
    tracing::debug!("Cloudwatch exporter configuration:\n{}", serde_yaml::to_string(&cloudwatch)?);

    let otel = render_otel_config(&args.otel_config, &config)?;
    tracing::debug!("Opentelemetry collector configuration:\n{}", serde_yaml::to_string(&otel)?);

    Ok(config)
}
