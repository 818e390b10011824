//! Command-line interface for otel-cloudwatch
//!
//! Provides `run`, `render` and `validate` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod run;
mod utils;
mod validate;

/// Configure and launch an OpenTelemetry collector that ships CloudWatch metrics
#[derive(Parser)]
#[command(name = "otel-cloudwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render both configurations and launch the collector
    Run(run::RunArgs),

    /// Render both configurations without launching anything
    Render(run::RenderArgs),

    /// Validate the merged configuration and report namespaces
    Validate(validate::ValidateArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let code = run::run(args, cli.verbose)?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Render(args) => run::render(args, cli.verbose),
        Commands::Validate(args) => validate::run(args, cli.verbose),
    }
}

/// Install the stderr subscriber.
///
/// RUST_LOG in the environment always takes precedence; otherwise --verbose
/// selects DEBUG and the configured `logzio_log_level` is used as a fallback.
pub(crate) fn init_tracing(verbose: bool, configured: Option<&str>) {
    let level = if verbose { Level::DEBUG } else { resolve_log_level(configured) };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Map a configured level name to a tracing level. Unknown names fall back to INFO.
pub(crate) fn resolve_log_level(configured: Option<&str>) -> Level {
    match configured.map(|l| l.trim().to_ascii_uppercase()).as_deref() {
        Some("DEBUG") => Level::DEBUG,
        Some("WARNING") | Some("WARN") => Level::WARN,
        Some("ERROR") | Some("CRITICAL") => Level::ERROR,
        _ => Level::INFO,
    }
}
