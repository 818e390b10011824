//! Collector process launch

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Run `<binary> --config <otel_config>` and wait for it to exit.
pub fn launch_collector(binary: &Path, otel_config: &Path) -> Result<ExitStatus> {
    ensure_executable(binary)?;
    tracing::info!("Starting collector {} --config {}", binary.display(), otel_config.display());
    Command::new(binary)
        .arg("--config")
        .arg(otel_config)
        .status()
        .with_context(|| format!("Failed starting collector: {}", binary.display()))
}

#[cfg(unix)]
fn ensure_executable(binary: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(binary)
        .with_context(|| format!("Collector binary not found: {}", binary.display()))?;
    let mut permissions = metadata.permissions();
    let mode = permissions.mode();
    if mode & 0o111 != 0o111 {
        permissions.set_mode(mode | 0o111);
        std::fs::set_permissions(binary, permissions)
            .with_context(|| format!("Failed making collector executable: {}", binary.display()))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_executable(binary: &Path) -> Result<()> {
    if !binary.exists() {
        anyhow::bail!("Collector binary not found: {}", binary.display());
    }
    Ok(())
}
