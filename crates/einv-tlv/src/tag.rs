//! # QR Tag Taxonomy
//!
//! The five record tags of a simplified tax invoice QR payload. The tag
//! values and their order are fixed by the tax authority and are read by
//! third-party verification apps, so the discriminants are part of the
//! wire format.
//!
//! | Tag | Field |
//! |-----|-------|
//! | 1 | Seller name |
//! | 2 | Seller VAT registration number |
//! | 3 | Invoice date-time |
//! | 4 | Total VAT amount |
//! | 5 | Total invoice amount including VAT |

use serde::{Deserialize, Serialize};

use crate::error::TlvError;

/// A record tag in the invoice QR payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum QrTag {
    /// Seller's business name.
    SellerName = 1,
    /// Seller's VAT registration number.
    VatNumber = 2,
    /// Invoice issue instant.
    Timestamp = 3,
    /// Total VAT charged.
    VatTotal = 4,
    /// Invoice total including VAT.
    InvoiceTotal = 5,
}

/// Number of records in an invoice QR payload.
pub const QR_TAG_COUNT: usize = 5;

impl QrTag {
    /// The tag byte written to the wire.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// All tags in mandated wire order.
    pub fn all() -> &'static [QrTag; QR_TAG_COUNT] {
        &[
            Self::SellerName,
            Self::VatNumber,
            Self::Timestamp,
            Self::VatTotal,
            Self::InvoiceTotal,
        ]
    }

    /// Snake-case field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SellerName => "seller_name",
            Self::VatNumber => "vat_number",
            Self::Timestamp => "timestamp",
            Self::VatTotal => "vat_total",
            Self::InvoiceTotal => "invoice_total",
        }
    }
}

impl TryFrom<u8> for QrTag {
    type Error = TlvError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::SellerName),
            2 => Ok(Self::VatNumber),
            3 => Ok(Self::Timestamp),
            4 => Ok(Self::VatTotal),
            5 => Ok(Self::InvoiceTotal),
            other => Err(TlvError::UnknownTag(other)),
        }
    }
}

impl std::fmt::Display for QrTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
