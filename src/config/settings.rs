//! Typed settings produced by validation

use serde::Serialize;

use crate::validator::NamespaceValidation;

pub const LISTENER_HOST: &str = "logz.io";
pub const LISTENER_PORT: u16 = 8053;

/// Compute the listener endpoint. A non-empty `custom_listener` wins over the region.
pub fn build_listener_url(region_code: &str, custom_listener: &str) -> String {
    if !custom_listener.is_empty() {
        return custom_listener.to_string();
    }
    let suffix = match region_code {
        "" | "us" => String::new(),
        code => format!("-{code}"),
    };
    format!("https://listener{suffix}.{LISTENER_HOST}:{LISTENER_PORT}")
}

/// Collector-side settings (`otel` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtelSettings {
    #[serde(skip_serializing)]
    pub token: String,
    pub logzio_region: String,
    pub custom_listener: String,
    pub p8s_logzio_name: String,
    pub scrape_interval: u64,
    pub scrape_timeout: u64,
    pub remote_timeout: u64,
    pub log_level: String,
    pub logzio_log_level: String,
    pub aws_access_key_id: String,
    #[serde(skip_serializing)]
    pub aws_secret_access_key: String,
}

impl OtelSettings {
    pub fn listener_url(&self) -> String {
        build_listener_url(&self.logzio_region, &self.custom_listener)
    }

    /// Static credentials are forwarded only when both halves are set.
    pub fn aws_credentials(&self) -> Option<(&str, &str)> {
        if self.aws_access_key_id.is_empty() || self.aws_secret_access_key.is_empty() {
            return None;
        }
        Some((&self.aws_access_key_id, &self.aws_secret_access_key))
    }
}

/// Exporter-side settings (`cloudwatch` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudwatchSettings {
    pub custom_config: bool,
    pub region: String,
    pub role_arn: String,
    /// Empty when `custom_config` is set.
    pub namespaces: NamespaceValidation,
    pub set_timestamp: bool,
    pub delay_seconds: u64,
    pub range_seconds: u64,
    pub period_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedConfig {
    pub otel: OtelSettings,
    pub cloudwatch: CloudwatchSettings,
}

impl ValidatedConfig {
    pub fn namespaces(&self) -> &NamespaceValidation {
        &self.cloudwatch.namespaces
    }

    pub fn listener_url(&self) -> String {
        self.otel.listener_url()
    }
}
