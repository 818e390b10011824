//! OpenTelemetry collector configuration

use anyhow::Result;
use serde_yaml::{Mapping, Value};
use std::path::Path;

use crate::config::{OtelSettings, ValidatedConfig};
use crate::utils::{read_yaml, set_path, write_yaml};

const RECEIVER: &str = "prometheus_exec";
const EXPORTER: &str = "prometheusremotewrite";

pub fn apply_otel_settings(doc: &mut Value, settings: &OtelSettings, listener_url: &str) -> Result<()> {
    // Update receiver
    set_path(doc, &["receivers", RECEIVER, "scrape_interval"], seconds(settings.scrape_interval))?;
    set_path(doc, &["receivers", RECEIVER, "scrape_timeout"], seconds(settings.scrape_timeout))?;
    set_path(doc, &["receivers", RECEIVER, "env"], receiver_env(settings))?;

    // Update exporter
    set_path(doc, &["exporters", EXPORTER, "endpoint"], Value::from(listener_url))?;
    set_path(doc, &["exporters", EXPORTER, "timeout"], seconds(settings.remote_timeout))?;
    set_path(
        doc,
        &["exporters", EXPORTER, "headers", "Authorization"],
        Value::from(format!("Bearer {}", settings.token)),
    )?;
    set_path(
        doc,
        &["exporters", EXPORTER, "external_labels", "p8s_logzio_name"],
        Value::from(settings.p8s_logzio_name.as_str()),
    )?;

    // Update service
    set_path(doc, &["service", "telemetry", "logs", "level"], Value::from(settings.log_level.as_str()))?;
    Ok(())
}

/// Rewrite the collector template at `path` in place and return the result.
pub fn render_otel_config(path: &Path, config: &ValidatedConfig) -> Result<Value> {
    tracing::info!("Adding opentelemetry collector configuration");
    let mut doc = read_yaml(path)?;
    apply_otel_settings(&mut doc, &config.otel, &config.listener_url())?;
    write_yaml(path, &doc)?;
    tracing::info!("Opentelemetry collector configuration ready");
    Ok(doc)
}

fn seconds(value: u64) -> Value {
    Value::from(format!("{value}s"))
}

fn receiver_env(settings: &OtelSettings) -> Value {
    let Some((key_id, secret)) = settings.aws_credentials() else {
        return Value::Sequence(Vec::new());
    };
    let entry = |name: &str, value: &str| {
        let mut map = Mapping::new();
        map.insert(Value::from("name"), Value::from(name));
        map.insert(Value::from("value"), Value::from(value));
        Value::Mapping(map)
    };
    Value::Sequence(vec![entry("AWS_ACCESS_KEY_ID", key_id), entry("AWS_SECRET_ACCESS_KEY", secret)])
}
