//! Projection of validated settings into the collector and exporter templates

pub mod cloudwatch;
pub mod otel;

pub use cloudwatch::{
    apply_cloudwatch_settings, merge_namespace_metrics, missing_namespace_files, namespace_file,
    render_cloudwatch_config,
};
pub use otel::{apply_otel_settings, render_otel_config};
