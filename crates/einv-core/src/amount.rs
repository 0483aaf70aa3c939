//! # Fixed-Point Amounts
//!
//! Defines `Amount`, a monetary value stored as signed 64-bit minor units
//! (two fraction digits), and `TaxRate`, a percentage stored in basis points.
//!
//! ## Invariant
//!
//! Amounts never pass through floating point arithmetic. Parsing rounds a
//! longer fraction half-up (away from zero) on the third fraction digit,
//! so `"1000000.456"` becomes `1000000.46`. Rendering always produces
//! exactly two fraction digits with no grouping separators and no currency
//! symbol, which is the form tax-authority QR payloads require.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmountError;

/// Number of minor units in one major unit.
const MINOR_PER_MAJOR: i64 = 100;

/// A monetary amount with exactly two fraction digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// The zero amount, rendered as `0.00`.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from minor units (`12345` is `123.45`).
    pub const fn from_minor_units(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the value in minor units.
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is below zero.
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse a decimal string such as `"15"`, `"0.1"` or `"1000000.456"`.
    ///
    /// Accepts an optional leading sign, an integer part and an optional
    /// fraction. Fractions longer than two digits are rounded half-up on
    /// the third digit. Grouping separators, currency symbols and
    /// exponents are rejected.
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let (negative, unsigned) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };

        let malformed = || AmountError::Malformed(s.to_string());
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let overflow = || AmountError::Overflow(s.to_string());

        let mut major: i64 = 0;
        for b in int_part.bytes() {
            major = major
                .checked_mul(10)
                .and_then(|v| v.checked_add(i64::from(b - b'0')))
                .ok_or_else(overflow)?;
        }

        let frac = frac_part.as_bytes();
        let digit = |i: usize| frac.get(i).map_or(0, |b| i64::from(b - b'0'));
        let mut minor = digit(0) * 10 + digit(1);
        if digit(2) >= 5 {
            minor += 1;
        }

        let magnitude = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(overflow)?;

        Ok(Self(if negative { -magnitude } else { magnitude }))
    }

    /// Checked addition; `None` on overflow.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Checked subtraction; `None` on overflow.
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Checked multiplication by an integer quantity; `None` on overflow.
    pub fn checked_mul_quantity(self, quantity: u32) -> Option<Amount> {
        self.0.checked_mul(i64::from(quantity)).map(Amount)
    }

    /// Apply a percentage rate, rounding half-up to the nearest minor unit.
    ///
    /// Returns `None` if the result does not fit in minor units.
    pub fn apply_rate(self, rate: TaxRate) -> Option<Amount> {
        let product = i128::from(self.0).abs() * i128::from(rate.basis_points());
        let rounded = (product + 5_000) / 10_000;
        let signed = if self.0 < 0 { -rounded } else { rounded };
        i64::try_from(signed).ok().map(Amount)
    }

    /// Render with exactly two fraction digits (`"1234.50"`).
    pub fn to_fixed_2(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = MINOR_PER_MAJOR as u64;
        format!("{sign}{}.{:02}", abs / per, abs % per)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fixed_2())
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::parse(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        v.checked_mul(MINOR_PER_MAJOR)
            .map(Amount)
            .ok_or_else(|| E::custom(AmountError::Overflow(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(MINOR_PER_MAJOR))
            .map(Amount)
            .ok_or_else(|| E::custom(AmountError::Overflow(v.to_string())))
    }

    // `f64`'s Display is the shortest string that round-trips, so parsing
    // it decimally keeps `0.1` as ten minor units.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        if !v.is_finite() {
            return Err(E::custom(AmountError::Malformed(v.to_string())));
        }
        Amount::parse(&v.to_string()).map_err(E::custom)
    }
}

/// A tax rate expressed in basis points (`1500` is 15%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Create a rate from basis points.
    pub const fn from_basis_points(bps: u32) -> Self {
        Self(bps)
    }

    /// Returns the rate in basis points.
    pub const fn basis_points(&self) -> u32 {
        self.0
    }

    /// Parse a percentage string: `"15"`, `"15.0"`, `"4.5"`, `"0.25"`.
    ///
    /// At most two fraction digits are accepted; negative rates are rejected.
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim().trim_end_matches('%');
        let invalid = || AmountError::InvalidRate(s.to_string());

        let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if int_part.is_empty()
            || frac_part.len() > 2
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: u32 = int_part.parse().map_err(|_| invalid())?;
        let frac: u32 = match frac_part.len() {
            0 => 0,
            1 => frac_part.parse::<u32>().map_err(|_| invalid())? * 10,
            _ => frac_part.parse().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("{}.{:02}", self.0 / 100, self.0 % 100))
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RateVisitor;

        impl<'de> Visitor<'de> for RateVisitor {
            type Value = TaxRate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a percentage as a string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TaxRate, E> {
                TaxRate::parse(v).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TaxRate, E> {
                TaxRate::parse(&v.to_string()).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TaxRate, E> {
                TaxRate::parse(&v.to_string()).map_err(E::custom)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<TaxRate, E> {
                TaxRate::parse(&v.to_string()).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(RateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(s: &str) -> String {
        Amount::parse(s).unwrap().to_fixed_2()
    }

    #[test]
    fn formats_with_exactly_two_fraction_digits() {
        assert_eq!(fixed("0"), "0.00");
        assert_eq!(fixed("0.1"), "0.10");
        assert_eq!(fixed("1234.5"), "1234.50");
        assert_eq!(fixed("1000000.456"), "1000000.46");
    }

    #[test]
    fn rounds_half_up_on_third_digit() {
        assert_eq!(fixed("0.005"), "0.01");
        assert_eq!(fixed("0.004"), "0.00");
        assert_eq!(fixed("0.0049999"), "0.00");
        assert_eq!(fixed("2.675"), "2.68");
        assert_eq!(fixed("9.995"), "10.00");
        assert_eq!(fixed("-1.005"), "-1.01");
    }

    #[test]
    fn accepts_sign_and_bare_fraction() {
        assert_eq!(fixed("+15"), "15.00");
        assert_eq!(fixed(".5"), "0.50");
        assert_eq!(fixed("5."), "5.00");
        assert_eq!(fixed("  42.42  "), "42.42");
        assert_eq!(fixed("-0"), "0.00");
    }

    #[test]
    fn rejects_grouping_symbols_and_exponents() {
        assert!(matches!(Amount::parse("1,000.00"), Err(AmountError::Malformed(_))));
        assert!(matches!(Amount::parse("$10"), Err(AmountError::Malformed(_))));
        assert!(matches!(Amount::parse("1e3"), Err(AmountError::Malformed(_))));
        assert!(matches!(Amount::parse("1.2.3"), Err(AmountError::Malformed(_))));
        assert!(matches!(Amount::parse("."), Err(AmountError::Malformed(_))));
        assert!(matches!(Amount::parse("-"), Err(AmountError::Malformed(_))));
        assert_eq!(Amount::parse(""), Err(AmountError::Empty));
        assert_eq!(Amount::parse("   "), Err(AmountError::Empty));
    }

    #[test]
    fn rejects_overflow() {
        assert!(matches!(
            Amount::parse("99999999999999999999"),
            Err(AmountError::Overflow(_))
        ));
        assert!(matches!(
            Amount::parse("92233720368547758.08"),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn negative_formatting() {
        assert_eq!(Amount::from_minor_units(-5).to_fixed_2(), "-0.05");
        assert_eq!(Amount::from_minor_units(i64::MIN).to_fixed_2(), "-92233720368547758.08");
    }

    #[test]
    fn apply_rate_rounds_half_up() {
        let rate = TaxRate::parse("15").unwrap();
        assert_eq!(Amount::parse("100").unwrap().apply_rate(rate), Some(Amount::parse("15").unwrap()));
        // 0.03 * 15% = 0.0045 -> 0.00
        assert_eq!(Amount::parse("0.03").unwrap().apply_rate(rate), Some(Amount::ZERO));
        // 0.10 * 15% = 0.015 -> 0.02
        assert_eq!(
            Amount::parse("0.10").unwrap().apply_rate(rate),
            Some(Amount::from_minor_units(2))
        );
    }

    #[test]
    fn tax_rate_parsing() {
        assert_eq!(TaxRate::parse("15").unwrap().basis_points(), 1500);
        assert_eq!(TaxRate::parse("15.0").unwrap().basis_points(), 1500);
        assert_eq!(TaxRate::parse("4.5").unwrap().basis_points(), 450);
        assert_eq!(TaxRate::parse("0.25").unwrap().basis_points(), 25);
        assert_eq!(TaxRate::parse("5%").unwrap().basis_points(), 500);
        assert!(TaxRate::parse("-5").is_err());
        assert!(TaxRate::parse("4.555").is_err());
        assert!(TaxRate::parse("").is_err());
        assert_eq!(TaxRate::from_basis_points(450).to_string(), "4.50%");
    }

    #[test]
    fn serde_accepts_strings_and_numbers() {
        let a: Amount = serde_json::from_str("\"115.00\"").unwrap();
        assert_eq!(a.to_fixed_2(), "115.00");
        let b: Amount = serde_json::from_str("0.1").unwrap();
        assert_eq!(b.minor_units(), 10);
        let c: Amount = serde_json::from_str("1000000.456").unwrap();
        assert_eq!(c.to_fixed_2(), "1000000.46");
        let d: Amount = serde_json::from_str("42").unwrap();
        assert_eq!(d.to_fixed_2(), "42.00");
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
    }

    #[test]
    fn serde_serializes_as_fixed_string() {
        let json = serde_json::to_string(&Amount::parse("1234.5").unwrap()).unwrap();
        assert_eq!(json, "\"1234.50\"");
        let rate = serde_json::to_string(&TaxRate::from_basis_points(1500)).unwrap();
        assert_eq!(rate, "\"15.00\"");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Rendering then parsing is the identity for any representable amount.
        #[test]
        fn render_parse_identity(minor in -1_000_000_000_000i64..1_000_000_000_000i64) {
            let a = Amount::from_minor_units(minor);
            prop_assert_eq!(Amount::parse(&a.to_fixed_2()).unwrap(), a);
        }

        /// Rendered amounts always carry exactly two fraction digits.
        #[test]
        fn always_two_fraction_digits(int in 0u32..10_000_000, frac in "[0-9]{0,6}") {
            let input = if frac.is_empty() { int.to_string() } else { format!("{int}.{frac}") };
            let rendered = Amount::parse(&input).unwrap().to_fixed_2();
            let (_, f) = rendered.split_once('.').unwrap();
            prop_assert_eq!(f.len(), 2);
            prop_assert!(!rendered.contains(','));
        }
    }
}
