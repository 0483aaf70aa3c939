//! # einv-core - Foundational Invoice Types
//!
//! Value types shared by every crate in the workspace. It depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Fixed-point money.** `Amount` stores minor units in an `i64`.
//!    No floating point anywhere on the amount path.
//!
//! 2. **UTC-only timestamps.** `InvoiceTimestamp` normalizes every
//!    accepted input to UTC with millisecond precision and renders with a
//!    `Z` designator.
//!
//! 3. **Newtypes for identifiers.** `VatNumber` cannot be mixed up with
//!    free-text fields.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public data types implement `Serialize`/`Deserialize`.

pub mod amount;
pub mod error;
pub mod identity;
pub mod invoice;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use amount::{Amount, TaxRate};
pub use error::{AmountError, EinvError};
pub use identity::{VatNumber, VAT_NUMBER_CONVENTIONAL_LEN};
pub use invoice::{Invoice, InvoiceTotals, LineItem};
pub use temporal::InvoiceTimestamp;
