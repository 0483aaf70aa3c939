//! # einv-cli - Invoice QR Command-Line Interface
//!
//! Provides the `einv` binary on top of `einv-core` and `einv-tlv`.
//!
//! ## Subcommands
//!
//! - `einv encode` - Build the base64 QR payload from invoice facts.
//! - `einv decode` - Decode a payload back into its five fields.
//! - `einv invoice` - Compute totals for an invoice file and print its payload.
//!
//! ```bash
//! einv encode --seller "Test Co" --vat-number 123456789012345 \
//!     --timestamp 2024-01-15T10:30:00Z --tax 15 --total 115
//! einv decode AQdUZXN0IENv...
//! einv --config business.yaml invoice invoice-0042.json --json
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to the domain crates; no encoding logic here.

pub mod config;
pub mod decode;
pub mod encode;
pub mod invoice;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Read a JSON or YAML document, chosen by file extension (`.yaml`/`.yml`
/// are YAML, anything else JSON).
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON: {}", path.display()))
    }
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
