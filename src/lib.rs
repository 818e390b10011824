//! otel-cloudwatch: configure and launch an OpenTelemetry collector for CloudWatch metrics
//!
//! User settings come from a YAML config file and environment variables. They
//! are validated, then written into the collector and CloudWatch exporter
//! templates before the collector binary is started.

pub mod cli;
pub mod config;
pub mod launch;
pub mod render;
pub mod utils;
pub mod validator;
