//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `cert_audit` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Report output in the selected format
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use std::process;
use structopt::StructOpt;

use cert_audit::initialization::{init_crypto_provider, init_logger_with};
use cert_audit::{render_json, render_text, run_check, Config, Opt, ReportFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::from(Opt::from_args());

    // Initialize logger based on config
    init_logger_with(config.log_level.into(), config.log_format)
        .context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let format = config.format;
    let result = run_check(config).await.and_then(|report| match format {
        ReportFormat::Text => Ok(render_text(&report)),
        ReportFormat::Json => render_json(&report).context("Failed to serialize report"),
    });

    match result {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            eprintln!("cert_audit error: {:#}", e);
            process::exit(1);
        }
    }
}
