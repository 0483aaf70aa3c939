//! # Invoice QR Payload Builder
//!
//! Assembles the five mandated TLV records of a simplified tax invoice,
//! concatenates them in tag order 1→5 with no separators, length prefix or
//! checksum, and renders the buffer as standard padded base64 for the QR
//! renderer.
//!
//! ## Degradation, not failure
//!
//! The builder never returns an error. Missing or malformed invoice data is
//! replaced with fixed defaults so that a scannable code can always be
//! printed:
//!
//! | Field | Default |
//! |-------|---------|
//! | Seller name | `"Unknown Seller"` |
//! | VAT number | fifteen zeros |
//! | Timestamp | the current instant at encode time |
//! | VAT total, invoice total | `0.00` |
//!
//! Values longer than 255 UTF-8 bytes are truncated on a character boundary.
//! Each degraded path emits a `tracing` warning.
//!
//! ## Concurrency
//!
//! Pure and reentrant: no shared state, no I/O. The only ambient input is the
//! wall clock, and only when the timestamp has to be defaulted;
//! [`build_qr_payload_at`] takes the clock explicitly.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use einv_core::{Amount, EinvError, Invoice, InvoiceTimestamp, InvoiceTotals, VatNumber};

use crate::record::{truncate_utf8, MAX_VALUE_LEN};
use crate::tag::QrTag;

/// Seller name used when the invoice carries none.
pub const UNKNOWN_SELLER: &str = "Unknown Seller";

/// VAT number used when the invoice carries none.
pub const PLACEHOLDER_VAT_NUMBER: &str = "000000000000000";

/// The invoice facts a QR payload is built from.
///
/// Built fresh from the invoice being displayed and discarded after
/// encoding. Every field is optional; see the module docs for defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    /// Seller's business name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    /// Seller's VAT registration number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_vat_number: Option<String>,
    /// Issue instant as stored; parsed leniently at encode time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_timestamp: Option<String>,
    /// Total VAT charged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Amount>,
    /// Invoice total including VAT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Amount>,
}

impl InvoiceSummary {
    /// An empty summary; every field will be defaulted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the seller name.
    pub fn with_seller_name(mut self, name: impl Into<String>) -> Self {
        self.seller_name = Some(name.into());
        self
    }

    /// Set the seller VAT number.
    pub fn with_vat_number(mut self, vat_number: impl Into<String>) -> Self {
        self.seller_vat_number = Some(vat_number.into());
        self
    }

    /// Set the issue instant from a typed timestamp.
    pub fn with_timestamp(mut self, ts: InvoiceTimestamp) -> Self {
        self.invoice_timestamp = Some(ts.to_iso8601_millis());
        self
    }

    /// Set the issue instant from a stored string.
    pub fn with_raw_timestamp(mut self, raw: impl Into<String>) -> Self {
        self.invoice_timestamp = Some(raw.into());
        self
    }

    /// Set the VAT total.
    pub fn with_tax_amount(mut self, amount: Amount) -> Self {
        self.tax_amount = Some(amount);
        self
    }

    /// Set the invoice total.
    pub fn with_total_amount(mut self, amount: Amount) -> Self {
        self.total_amount = Some(amount);
        self
    }

    /// Summarize an invoice and its computed totals.
    pub fn from_invoice(invoice: &Invoice, totals: &InvoiceTotals) -> Self {
        Self {
            seller_name: invoice.seller_name.clone(),
            seller_vat_number: invoice.seller_vat_number.clone(),
            invoice_timestamp: invoice.issued_at.clone(),
            tax_amount: Some(totals.vat),
            total_amount: Some(totals.total),
        }
    }

    /// Strict check of the summary against the invoice invariants.
    ///
    /// Encoding does not require this to pass; it is for callers that want
    /// to refuse bad data before printing.
    pub fn validate(&self) -> Result<(), EinvError> {
        if let Some(name) = &self.seller_name {
            if name.trim().is_empty() {
                return Err(EinvError::Validation("seller name is empty".to_string()));
            }
        }
        if let Some(vat) = &self.seller_vat_number {
            VatNumber::new(vat)?;
        }
        if let Some(ts) = &self.invoice_timestamp {
            InvoiceTimestamp::parse(ts)?;
        }

        let tax = self.tax_amount.unwrap_or(Amount::ZERO);
        let total = self.total_amount.unwrap_or(Amount::ZERO);
        if tax.is_negative() || total.is_negative() {
            return Err(EinvError::Validation(format!(
                "amounts must be non-negative (tax {tax}, total {total})"
            )));
        }
        if total < tax {
            return Err(EinvError::Validation(format!(
                "total {total} is less than tax {tax}"
            )));
        }
        for tag in QrTag::all() {
            let len = self.field_len(*tag);
            if len > MAX_VALUE_LEN {
                return Err(EinvError::Validation(format!(
                    "{tag} is {len} bytes; at most {MAX_VALUE_LEN} fit in a QR record"
                )));
            }
        }
        Ok(())
    }

    fn field_len(&self, tag: QrTag) -> usize {
        match tag {
            QrTag::SellerName => self.seller_name.as_deref().map_or(0, str::len),
            QrTag::VatNumber => self.seller_vat_number.as_deref().map_or(0, str::len),
            _ => 0,
        }
    }
}

/// The concatenated TLV records of one invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    bytes: Vec<u8>,
}

impl EncodedPayload {
    /// The raw TLV stream.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume into the raw TLV stream.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Standard padded base64, no line wrapping.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

impl std::fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl Serialize for EncodedPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

/// Build the payload, defaulting a missing timestamp to the current instant.
pub fn build_qr_payload(summary: &InvoiceSummary) -> EncodedPayload {
    build_qr_payload_at(summary, Utc::now())
}

/// Build the payload, defaulting a missing timestamp to `now`.
///
/// Identical `summary` and `now` always yield byte-identical output.
pub fn build_qr_payload_at(summary: &InvoiceSummary, now: DateTime<Utc>) -> EncodedPayload {
    let fields = resolve_fields(summary, now);
    let capacity: usize = fields.iter().map(|(_, v)| 2 + v.len().min(MAX_VALUE_LEN)).sum();
    let mut bytes = Vec::with_capacity(capacity);
    for (tag, value) in &fields {
        push_record(&mut bytes, *tag, value);
    }
    EncodedPayload { bytes }
}

/// Build the payload and return its base64 text form.
pub fn encode_invoice_qr(summary: &InvoiceSummary) -> String {
    build_qr_payload(summary).to_base64()
}

/// Resolve the five field values in wire order, applying defaults.
fn resolve_fields(summary: &InvoiceSummary, now: DateTime<Utc>) -> [(QrTag, String); 5] {
    let seller_name = non_blank(summary.seller_name.as_deref())
        .unwrap_or(UNKNOWN_SELLER)
        .to_string();

    let vat_number = non_blank(summary.seller_vat_number.as_deref())
        .unwrap_or(PLACEHOLDER_VAT_NUMBER)
        .to_string();

    let timestamp = resolve_timestamp(summary.invoice_timestamp.as_deref(), now);

    let tax = summary.tax_amount.unwrap_or(Amount::ZERO);
    let total = summary.total_amount.unwrap_or(Amount::ZERO);
    if total < tax {
        tracing::warn!(%tax, %total, "invoice total is less than its VAT; encoding as given");
    }

    [
        (QrTag::SellerName, seller_name),
        (QrTag::VatNumber, vat_number),
        (QrTag::Timestamp, timestamp),
        (QrTag::VatTotal, tax.to_fixed_2()),
        (QrTag::InvoiceTotal, total.to_fixed_2()),
    ]
}

fn resolve_timestamp(raw: Option<&str>, now: DateTime<Utc>) -> String {
    let parsed = match non_blank(raw) {
        Some(s) => match InvoiceTimestamp::parse(s) {
            Ok(ts) => Some(ts),
            Err(e) => {
                tracing::warn!(error = %e, "unparseable invoice date; using current instant");
                None
            }
        },
        None => {
            tracing::warn!("invoice has no date; using current instant");
            None
        }
    };
    parsed
        .unwrap_or_else(|| InvoiceTimestamp::from_utc(now))
        .to_iso8601_millis()
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

/// Append a record, truncating values the length byte cannot describe.
fn push_record(out: &mut Vec<u8>, tag: QrTag, value: &str) {
    let fitted = truncate_utf8(value, MAX_VALUE_LEN);
    if fitted.len() < value.len() {
        tracing::warn!(
            %tag,
            original_len = value.len(),
            truncated_len = fitted.len(),
            "QR field exceeds 255 bytes; truncating"
        );
    }
    out.push(tag.as_u8());
    // truncate_utf8 bounds the length to MAX_VALUE_LEN.
    out.push(fitted.len() as u8);
    out.extend_from_slice(fitted.as_bytes());
}
