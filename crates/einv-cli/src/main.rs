//! # einv CLI entry point
//!
//! Parses command-line arguments, loads configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use einv_cli::config::{EinvConfig, CONFIG_ENV_VAR};
use einv_cli::decode::{run_decode, DecodeArgs};
use einv_cli::encode::{run_encode, EncodeArgs};
use einv_cli::invoice::{run_invoice, InvoiceArgs};

/// Simplified tax invoice toolkit.
///
/// Builds and inspects the tag-length-value QR payload that simplified tax
/// invoices must carry, and computes invoice totals from line items.
#[derive(Parser, Debug)]
#[command(name = "einv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the YAML configuration file.
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the base64 QR payload for an invoice.
    Encode(EncodeArgs),

    /// Decode a base64 QR payload into its fields.
    Decode(DecodeArgs),

    /// Compute totals for an invoice file and print its QR payload.
    Invoice(InvoiceArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("einv CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = EinvConfig::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Encode(args) => run_encode(&args, &config),
        Commands::Decode(args) => run_decode(&args),
        Commands::Invoice(args) => run_invoice(&args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
