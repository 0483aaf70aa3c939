//! # Decode Subcommand
//!
//! Reads a base64 QR payload the way a verification app would. By default
//! the payload must be a well-formed invoice payload (five records, tags
//! 1 through 5 in order); `--raw` lists whatever records are present.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use einv_tlv::{decode_payload, DecodedInvoiceQr, QrTag, TlvRecord};

/// Arguments for `einv decode`.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Base64 payload as scanned from the QR code.
    #[arg(value_name = "PAYLOAD")]
    pub payload: String,

    /// List raw records without checking the invoice layout.
    #[arg(long)]
    pub raw: bool,

    /// Print as JSON.
    #[arg(long)]
    pub json: bool,
}

/// One raw record in `--raw` output.
#[derive(Debug, Serialize)]
struct RawRecord {
    tag: u8,
    length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hex: Option<String>,
}

impl From<&TlvRecord> for RawRecord {
    fn from(record: &TlvRecord) -> Self {
        let text = record.value_str().ok().map(str::to_string);
        let hex = text
            .is_none()
            .then(|| record.value.iter().map(|b| format!("{b:02x}")).collect::<String>());
        Self {
            tag: record.tag,
            length: record.value.len(),
            text,
            hex,
        }
    }
}

/// Execute `einv decode`.
pub fn run_decode(args: &DecodeArgs) -> Result<u8> {
    let records = decode_payload(&args.payload).context("payload is not a valid TLV stream")?;
    tracing::debug!(records = records.len(), "decoded TLV stream");

    if args.raw {
        let raw: Vec<RawRecord> = records.iter().map(RawRecord::from).collect();
        if args.json {
            crate::print_json(&raw)?;
        } else {
            for r in &raw {
                let shown = r.text.as_deref().or(r.hex.as_deref()).unwrap_or_default();
                println!("{:>3} {:>3}  {shown}", r.tag, r.length);
            }
        }
        return Ok(0);
    }

    let decoded = DecodedInvoiceQr::from_records(&records)
        .context("payload does not follow the invoice QR layout")?;
    if args.json {
        crate::print_json(&decoded)?;
    } else {
        print!("{}", render_fields(&decoded));
    }
    Ok(0)
}

/// One `tag name: value` line per field.
pub fn render_fields(decoded: &DecodedInvoiceQr) -> String {
    QrTag::all()
        .iter()
        .map(|tag| format!("{} {:<14} {}\n", tag.as_u8(), format!("{tag}:"), decoded.get(*tag)))
        .collect()
}
