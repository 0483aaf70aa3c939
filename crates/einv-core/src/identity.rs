//! # Seller Identifiers
//!
//! Newtype wrapper for the seller's VAT registration number so it cannot
//! be confused with other free-text invoice fields.

use serde::{Deserialize, Serialize};

use crate::error::EinvError;

/// Conventional length of a VAT registration number.
pub const VAT_NUMBER_CONVENTIONAL_LEN: usize = 15;

/// Seller VAT registration number.
///
/// A non-empty digit string. The 15-digit convention is reported by
/// [`VatNumber::is_conventional_length`] but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VatNumber(String);

impl VatNumber {
    /// Validate and wrap a VAT registration number. Surrounding whitespace
    /// is trimmed.
    pub fn new(s: impl AsRef<str>) -> Result<Self, EinvError> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EinvError::Identifier(
                "VAT number must not be empty".to_string(),
            ));
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EinvError::Identifier(format!(
                "VAT number must contain only digits, got {trimmed:?}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The all-zero placeholder of conventional length.
    pub fn placeholder() -> Self {
        Self("0".repeat(VAT_NUMBER_CONVENTIONAL_LEN))
    }

    /// Whether the number has the conventional 15 digits.
    pub fn is_conventional_length(&self) -> bool {
        self.0.len() == VAT_NUMBER_CONVENTIONAL_LEN
    }

    /// Access the digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VatNumber {
    type Error = EinvError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<VatNumber> for String {
    fn from(v: VatNumber) -> Self {
        v.0
    }
}

impl std::fmt::Display for VatNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_digits() {
        let v = VatNumber::new("123456789012345").unwrap();
        assert!(v.is_conventional_length());
        assert_eq!(v.as_str(), "123456789012345");
    }

    #[test]
    fn short_numbers_allowed_but_flagged() {
        let v = VatNumber::new(" 1234567 ").unwrap();
        assert_eq!(v.as_str(), "1234567");
        assert!(!v.is_conventional_length());
    }

    #[test]
    fn rejects_empty_and_non_digits() {
        assert!(VatNumber::new("").is_err());
        assert!(VatNumber::new("   ").is_err());
        assert!(VatNumber::new("30-0000-1").is_err());
        assert!(VatNumber::new("SA123").is_err());
    }

    #[test]
    fn placeholder_is_fifteen_zeros() {
        assert_eq!(VatNumber::placeholder().as_str(), "000000000000000");
    }

    #[test]
    fn serde_validates() {
        let v: VatNumber = serde_json::from_str("\"300000000000003\"").unwrap();
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"300000000000003\"");
        assert!(serde_json::from_str::<VatNumber>("\"abc\"").is_err());
    }
}
