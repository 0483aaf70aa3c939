//! # Invoice Totals
//!
//! Line items, the invoice record they belong to, and the totals computed
//! from them: subtotal, VAT, grand total, and the balance still owed after
//! payments.
//!
//! ## Determinism
//!
//! All arithmetic is checked integer arithmetic on minor units. VAT is
//! computed once on the subtotal (not per line) and rounded half-up, so
//! identical inputs always produce identical totals.

use serde::{Deserialize, Serialize};

use crate::amount::{Amount, TaxRate};
use crate::error::EinvError;

/// One billed line on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Free-text description of the goods or service.
    pub description: String,
    /// Number of units billed.
    pub quantity: u32,
    /// Price per unit, excluding VAT.
    pub unit_price: Amount,
}

impl LineItem {
    /// Create a line item.
    pub fn new(description: impl Into<String>, quantity: u32, unit_price: Amount) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// `quantity × unit_price`.
    pub fn line_total(&self) -> Result<Amount, EinvError> {
        self.unit_price
            .checked_mul_quantity(self.quantity)
            .ok_or(EinvError::Arithmetic("line total"))
    }
}

/// An invoice as the data-entry side holds it in memory.
///
/// Seller fields and the issue date are kept as entered; the QR payload
/// builder applies its own defaults when they are missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Seller's registered business name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    /// Seller's VAT registration number as entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_vat_number: Option<String>,
    /// Issue date-time as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    /// VAT rate applied to the subtotal.
    #[serde(default)]
    pub vat_rate: TaxRate,
    /// Billed lines.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    /// Amount already received from the buyer.
    #[serde(default)]
    pub amount_paid: Amount,
}

/// Totals derived from an [`Invoice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line totals, excluding VAT.
    pub subtotal: Amount,
    /// VAT on the subtotal.
    pub vat: Amount,
    /// `subtotal + vat`.
    pub total: Amount,
    /// Amount already paid.
    pub amount_paid: Amount,
    /// `total - amount_paid`; negative when overpaid.
    pub balance: Amount,
}

impl Invoice {
    /// Compute subtotal, VAT, total and balance.
    ///
    /// # Errors
    ///
    /// Returns [`EinvError::Arithmetic`] if any intermediate value overflows.
    pub fn totals(&self) -> Result<InvoiceTotals, EinvError> {
        let mut subtotal = Amount::ZERO;
        for item in &self.line_items {
            subtotal = subtotal
                .checked_add(item.line_total()?)
                .ok_or(EinvError::Arithmetic("subtotal"))?;
        }

        let vat = subtotal
            .apply_rate(self.vat_rate)
            .ok_or(EinvError::Arithmetic("VAT"))?;
        let total = subtotal
            .checked_add(vat)
            .ok_or(EinvError::Arithmetic("total"))?;
        let balance = total
            .checked_sub(self.amount_paid)
            .ok_or(EinvError::Arithmetic("balance"))?;

        tracing::debug!(
            lines = self.line_items.len(),
            %subtotal,
            %vat,
            %total,
            %balance,
            "computed invoice totals"
        );

        Ok(InvoiceTotals {
            subtotal,
            vat,
            total,
            amount_paid: self.amount_paid,
            balance,
        })
    }
}
