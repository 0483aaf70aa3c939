//! # Error Types
//!
//! Structured error hierarchy for the invoice toolkit. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Parse errors carry the offending input verbatim.
//! - Arithmetic errors name the operation that overflowed.
//! - Nothing on the QR encoding path returns these for defaultable input;
//!   they surface only from explicit parsing and totals computation.

use thiserror::Error;

/// Top-level error type for the invoice toolkit.
#[derive(Error, Debug)]
pub enum EinvError {
    /// A monetary amount could not be parsed or represented.
    #[error("amount error: {0}")]
    Amount(#[from] AmountError),

    /// A timestamp could not be parsed.
    #[error("invalid invoice timestamp {input:?}: {reason}")]
    Timestamp {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An identifier (e.g. VAT registration number) failed validation.
    #[error("invalid identifier: {0}")]
    Identifier(String),

    /// A value violates an invoice invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Checked arithmetic overflowed while computing totals.
    #[error("arithmetic overflow while computing {0}")]
    Arithmetic(&'static str),
}

/// Error while parsing or formatting a fixed-point amount.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The input was empty or whitespace.
    #[error("amount is empty")]
    Empty,

    /// The input contained characters other than an optional sign,
    /// digits and a single decimal point.
    #[error("malformed amount {0:?}: expected digits with an optional '.' and sign")]
    Malformed(String),

    /// The value does not fit in 64-bit minor units.
    #[error("amount {0:?} is out of range")]
    Overflow(String),

    /// A tax rate was negative or unparseable.
    #[error("invalid tax rate {0:?}")]
    InvalidRate(String),
}
