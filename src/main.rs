//! otel-cloudwatch: configure and launch an OpenTelemetry collector for CloudWatch metrics

use anyhow::Result;

fn main() -> Result<()> {
    otel_cloudwatch::cli::run()
}
