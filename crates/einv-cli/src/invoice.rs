//! # Invoice Subcommand
//!
//! Loads an invoice (JSON or YAML), computes its totals, and prints them
//! with the QR payload the printed invoice must carry. Seller facts missing
//! from the file are taken from the configured business profile.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use einv_core::{Invoice, InvoiceTotals};
use einv_tlv::{build_qr_payload, InvoiceSummary};

use crate::config::EinvConfig;
use crate::encode::PayloadReport;

/// Arguments for `einv invoice`.
#[derive(Args, Debug)]
pub struct InvoiceArgs {
    /// Invoice file (`.json`, `.yaml` or `.yml`).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct InvoiceReport<'a> {
    totals: InvoiceTotals,
    #[serde(flatten)]
    qr: PayloadReport<'a>,
}

/// Execute `einv invoice`.
pub fn run_invoice(args: &InvoiceArgs, config: &EinvConfig) -> Result<u8> {
    let mut invoice: Invoice = crate::load_document(&args.file)?;
    apply_profile(&mut invoice, config);

    let totals = invoice
        .totals()
        .with_context(|| format!("failed to compute totals for {}", args.file.display()))?;
    let summary = InvoiceSummary::from_invoice(&invoice, &totals);
    let payload = build_qr_payload(&summary);

    if args.json {
        crate::print_json(&InvoiceReport {
            totals,
            qr: PayloadReport::new(&payload)?,
        })?;
    } else {
        println!("Subtotal:    {}", totals.subtotal);
        println!("VAT ({}): {}", invoice.vat_rate, totals.vat);
        println!("Total:       {}", totals.total);
        println!("Paid:        {}", totals.amount_paid);
        println!("Balance:     {}", totals.balance);
        println!("QR payload:  {payload}");
    }
    Ok(0)
}

/// Fill seller fields the invoice leaves empty from the business profile.
pub fn apply_profile(invoice: &mut Invoice, config: &EinvConfig) {
    let profile = &config.business;
    if invoice.seller_name.is_none() {
        invoice.seller_name = profile.seller_name.clone();
    }
    if invoice.seller_vat_number.is_none() {
        invoice.seller_vat_number = profile.vat_number.clone();
    }
}
