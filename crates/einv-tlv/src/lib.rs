//! # einv-tlv - Invoice QR Payload Codec
//!
//! Builds the machine-readable payload that a simplified tax invoice must
//! carry in its QR code, and decodes it again for verification.
//!
//! ## Wire format
//!
//! Five tag-length-value records, concatenated in tag order with nothing in
//! between:
//!
//! ```text
//! [01][len][seller name][02][len][VAT number][03][len][timestamp][04][len][VAT total][05][len][invoice total]
//! ```
//!
//! Each length is one byte holding the UTF-8 byte count of the value. The
//! buffer is then rendered as standard padded base64, which is the string
//! handed to the QR renderer.
//!
//! ## Example
//!
//! ```
//! use einv_core::Amount;
//! use einv_tlv::{encode_invoice_qr, DecodedInvoiceQr, InvoiceSummary};
//!
//! let summary = InvoiceSummary::new()
//!     .with_seller_name("Test Co")
//!     .with_vat_number("123456789012345")
//!     .with_raw_timestamp("2024-01-15T10:30:00Z")
//!     .with_tax_amount(Amount::parse("15.00").unwrap())
//!     .with_total_amount(Amount::parse("115.00").unwrap());
//!
//! let text = encode_invoice_qr(&summary);
//! let decoded = DecodedInvoiceQr::from_base64(&text).unwrap();
//! assert_eq!(decoded.timestamp, "2024-01-15T10:30:00.000Z");
//! assert_eq!(decoded.invoice_total, "115.00");
//! ```

pub mod decode;
pub mod error;
pub mod payload;
pub mod record;
pub mod tag;

pub use decode::{decode_payload, parse_tlv_stream, DecodedInvoiceQr};
pub use error::TlvError;
pub use payload::{
    build_qr_payload, build_qr_payload_at, encode_invoice_qr, EncodedPayload, InvoiceSummary,
    PLACEHOLDER_VAT_NUMBER, UNKNOWN_SELLER,
};
pub use record::{encode_record, encode_record_into, truncate_utf8, TlvRecord, MAX_VALUE_LEN};
pub use tag::{QrTag, QR_TAG_COUNT};
