//! # Temporal Types - Invoice Timestamps
//!
//! Defines `InvoiceTimestamp`, a UTC instant truncated to millisecond
//! precision. Its canonical rendering is the extended ISO 8601 form with
//! milliseconds and a `Z` designator (`2024-01-15T10:30:00.000Z`), which is
//! what QR verification apps expect in the invoice date-time record.
//!
//! ## Parsing
//!
//! Stored invoice dates arrive in several shapes, so [`InvoiceTimestamp::parse`]
//! is lenient and always normalizes to UTC:
//!
//! - RFC 3339 with any offset: `2024-01-15T13:30:00+03:00`
//! - Naive date-time, taken as UTC: `2024-01-15T10:30:00` or `2024-01-15 10:30:00.250`
//! - Date only, taken as UTC midnight: `2024-01-15`

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EinvError;

/// Naive date-time layouts accepted by [`InvoiceTimestamp::parse`].
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A UTC invoice timestamp with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvoiceTimestamp(DateTime<Utc>);

impl InvoiceTimestamp {
    /// The current UTC instant, truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Wrap a `DateTime<Utc>`, truncating sub-millisecond precision.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_millis(dt))
    }

    /// Parse a stored invoice date, converting any offset to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`EinvError::Timestamp`] if the input matches none of the
    /// accepted layouts.
    pub fn parse(s: &str) -> Result<Self, EinvError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EinvError::Timestamp {
                input: s.to_string(),
                reason: "empty input".to_string(),
            });
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::from_utc(dt.with_timezone(&Utc)));
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Ok(Self::from_utc(naive.and_utc()));
            }
        }

        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Self::from_utc(naive.and_utc()))
                .ok_or_else(|| EinvError::Timestamp {
                    input: s.to_string(),
                    reason: "date has no midnight".to_string(),
                }),
            Err(e) => Err(EinvError::Timestamp {
                input: s.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as `YYYY-MM-DDTHH:MM:SS.sssZ`.
    pub fn to_iso8601_millis(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl From<DateTime<Utc>> for InvoiceTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_utc(dt)
    }
}

impl std::fmt::Display for InvoiceTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601_millis())
    }
}

impl Serialize for InvoiceTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601_millis())
    }
}

impl<'de> Deserialize<'de> for InvoiceTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Truncate a `DateTime<Utc>` to millisecond precision.
fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let millis = dt.nanosecond() / 1_000_000;
    dt.with_nanosecond(millis * 1_000_000).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn renders_millis_with_z() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(
            InvoiceTimestamp::from_utc(dt).to_iso8601_millis(),
            "2024-01-15T10:30:00.000Z"
        );
    }

    #[test]
    fn truncates_below_millis() {
        let dt = Utc
            .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        let ts = InvoiceTimestamp::from_utc(dt);
        assert_eq!(ts.as_datetime().nanosecond(), 123_000_000);
        assert_eq!(ts.to_string(), "2024-01-15T10:30:00.123Z");
    }

    #[test]
    fn parse_z_suffix() {
        let ts = InvoiceTimestamp::parse("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(ts.to_iso8601_millis(), "2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn parse_converts_offset_to_utc() {
        let ts = InvoiceTimestamp::parse("2024-01-15T13:30:00+03:00").unwrap();
        assert_eq!(ts.to_iso8601_millis(), "2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn parse_naive_as_utc() {
        let ts = InvoiceTimestamp::parse("2024-01-15T10:30:00").unwrap();
        assert_eq!(ts.to_iso8601_millis(), "2024-01-15T10:30:00.000Z");
        let ts = InvoiceTimestamp::parse("2024-01-15 10:30:00.250").unwrap();
        assert_eq!(ts.to_iso8601_millis(), "2024-01-15T10:30:00.250Z");
    }

    #[test]
    fn parse_date_only_is_midnight() {
        let ts = InvoiceTimestamp::parse("2024-01-15").unwrap();
        assert_eq!(ts.to_iso8601_millis(), "2024-01-15T00:00:00.000Z");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(InvoiceTimestamp::parse("not-a-date").is_err());
        assert!(InvoiceTimestamp::parse("").is_err());
        assert!(InvoiceTimestamp::parse("2024-13-45").is_err());
        assert!(InvoiceTimestamp::parse("15/01/2024").is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let ts = InvoiceTimestamp::parse("2024-01-15T10:30:00.5Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-01-15T10:30:00.500Z\"");
        let parsed: InvoiceTimestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
