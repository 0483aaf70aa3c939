//! # Encode Subcommand
//!
//! Builds the QR payload for one invoice from command-line flags, an
//! optional summary file, and the configured business profile. Precedence
//! per field: flag, then summary file, then profile, then the builder's
//! own default.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use einv_core::Amount;
use einv_tlv::{build_qr_payload, DecodedInvoiceQr, EncodedPayload, InvoiceSummary};

use crate::config::EinvConfig;

/// Arguments for `einv encode`.
#[derive(Args, Debug, Default)]
pub struct EncodeArgs {
    /// Seller business name.
    #[arg(long)]
    pub seller: Option<String>,

    /// Seller VAT registration number.
    #[arg(long)]
    pub vat_number: Option<String>,

    /// Invoice issue date-time (RFC 3339, naive date-time, or date).
    #[arg(long)]
    pub timestamp: Option<String>,

    /// Total VAT amount.
    #[arg(long)]
    pub tax: Option<Amount>,

    /// Invoice total including VAT.
    #[arg(long)]
    pub total: Option<Amount>,

    /// JSON or YAML file holding an invoice summary.
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Print the payload and its decoded fields as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON output of `encode` and `invoice`.
#[derive(Debug, Serialize)]
pub struct PayloadReport<'a> {
    /// Base64 payload.
    pub payload: &'a EncodedPayload,
    /// Byte length of the raw TLV stream.
    pub tlv_bytes: usize,
    /// The five fields as a verifier would read them.
    pub fields: DecodedInvoiceQr,
}

impl<'a> PayloadReport<'a> {
    /// Describe an encoded payload.
    pub fn new(payload: &'a EncodedPayload) -> Result<Self> {
        let fields = DecodedInvoiceQr::from_base64(&payload.to_base64())?;
        Ok(Self {
            payload,
            tlv_bytes: payload.as_bytes().len(),
            fields,
        })
    }
}

/// Execute `einv encode`.
pub fn run_encode(args: &EncodeArgs, config: &EinvConfig) -> Result<u8> {
    let summary = build_summary(args, config)?;
    if let Err(e) = summary.validate() {
        tracing::warn!(error = %e, "invoice summary is inconsistent; encoding anyway");
    }

    let payload = build_qr_payload(&summary);
    if args.json {
        crate::print_json(&PayloadReport::new(&payload)?)?;
    } else {
        println!("{payload}");
    }
    Ok(0)
}

/// Merge flags, summary file and business profile into one summary.
pub fn build_summary(args: &EncodeArgs, config: &EinvConfig) -> Result<InvoiceSummary> {
    let base: InvoiceSummary = match &args.summary {
        Some(path) => crate::load_document(path)?,
        None => InvoiceSummary::default(),
    };
    let profile = &config.business;

    Ok(InvoiceSummary {
        seller_name: args
            .seller
            .clone()
            .or(base.seller_name)
            .or_else(|| profile.seller_name.clone()),
        seller_vat_number: args
            .vat_number
            .clone()
            .or(base.seller_vat_number)
            .or_else(|| profile.vat_number.clone()),
        invoice_timestamp: args.timestamp.clone().or(base.invoice_timestamp),
        tax_amount: args.tax.or(base.tax_amount),
        total_amount: args.total.or(base.total_amount),
    })
}
