//! # Payload Decoder
//!
//! The inverse of the payload builder, as a verification app would read it:
//! base64 text → TLV records → the five typed invoice fields.
//!
//! The generic stream parser accepts any tags. [`DecodedInvoiceQr`] is strict:
//! exactly five records, tags 1 through 5 in order, all valid UTF-8, and the
//! records spanning the whole buffer with no leftover bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::TlvError;
use crate::record::TlvRecord;
use crate::tag::{QrTag, QR_TAG_COUNT};

/// Split a TLV byte stream into records.
///
/// # Errors
///
/// [`TlvError::TruncatedHeader`] if fewer than two bytes remain where a
/// record should start, [`TlvError::TruncatedValue`] if a declared length
/// runs past the end.
pub fn parse_tlv_stream(bytes: &[u8]) -> Result<Vec<TlvRecord>, TlvError> {
    let mut records = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let header = bytes
            .get(offset..offset + 2)
            .ok_or(TlvError::TruncatedHeader { offset })?;
        let (tag, declared) = (header[0], usize::from(header[1]));
        let start = offset + 2;
        let value = bytes
            .get(start..start + declared)
            .ok_or(TlvError::TruncatedValue {
                tag,
                offset,
                declared,
                available: bytes.len() - start,
            })?;
        records.push(TlvRecord {
            tag,
            value: value.to_vec(),
        });
        offset = start + declared;
    }
    Ok(records)
}

/// Decode standard base64 text into TLV records.
pub fn decode_payload(text: &str) -> Result<Vec<TlvRecord>, TlvError> {
    let bytes = STANDARD.decode(text.trim())?;
    parse_tlv_stream(&bytes)
}

/// The five fields of an invoice QR payload, as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedInvoiceQr {
    /// Tag 1.
    pub seller_name: String,
    /// Tag 2.
    pub vat_number: String,
    /// Tag 3.
    pub timestamp: String,
    /// Tag 4.
    pub vat_total: String,
    /// Tag 5.
    pub invoice_total: String,
}

impl DecodedInvoiceQr {
    /// Interpret records as an invoice payload, enforcing count and order.
    pub fn from_records(records: &[TlvRecord]) -> Result<Self, TlvError> {
        if records.len() != QR_TAG_COUNT {
            return Err(TlvError::RecordCount {
                expected: QR_TAG_COUNT,
                found: records.len(),
            });
        }

        let mut values: Vec<String> = Vec::with_capacity(QR_TAG_COUNT);
        for (index, (record, expected)) in records.iter().zip(QrTag::all()).enumerate() {
            if record.tag != expected.as_u8() {
                return Err(TlvError::UnexpectedTag {
                    index,
                    expected: expected.as_u8(),
                    found: record.tag,
                });
            }
            values.push(record.value_str()?.to_string());
        }

        let mut it = values.into_iter();
        let mut next = || it.next().unwrap_or_default();
        Ok(Self {
            seller_name: next(),
            vat_number: next(),
            timestamp: next(),
            vat_total: next(),
            invoice_total: next(),
        })
    }

    /// Decode base64 text straight to the five fields.
    pub fn from_base64(text: &str) -> Result<Self, TlvError> {
        Self::from_records(&decode_payload(text)?)
    }

    /// Field value for a tag.
    pub fn get(&self, tag: QrTag) -> &str {
        match tag {
            QrTag::SellerName => &self.seller_name,
            QrTag::VatNumber => &self.vat_number,
            QrTag::Timestamp => &self.timestamp,
            QrTag::VatTotal => &self.vat_total,
            QrTag::InvoiceTotal => &self.invoice_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::encode_record;

    fn stream(parts: &[(u8, &str)]) -> Vec<u8> {
        parts
            .iter()
            .flat_map(|(t, v)| encode_record(*t, v).unwrap())
            .collect()
    }

    #[test]
    fn parses_records_in_order() {
        let bytes = stream(&[(1, "Test Co"), (9, ""), (2, "123")]);
        let records = parse_tlv_stream(&bytes).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].tag, 1);
        assert_eq!(records[0].value_str().unwrap(), "Test Co");
        assert_eq!(records[1].tag, 9);
        assert!(records[1].value.is_empty());
        assert_eq!(records[2].value_str().unwrap(), "123");
    }

    #[test]
    fn empty_stream_has_no_records() {
        assert!(parse_tlv_stream(&[]).unwrap().is_empty());
    }

    #[test]
    fn detects_truncated_header() {
        let mut bytes = stream(&[(1, "ab")]);
        bytes.push(2);
        assert_eq!(
            parse_tlv_stream(&bytes),
            Err(TlvError::TruncatedHeader { offset: 4 })
        );
    }

    #[test]
    fn detects_truncated_value() {
        let bytes = vec![1, 5, b'a', b'b'];
        assert_eq!(
            parse_tlv_stream(&bytes),
            Err(TlvError::TruncatedValue {
                tag: 1,
                offset: 0,
                declared: 5,
                available: 2
            })
        );
    }

    #[test]
    fn rejects_bad_base64() {
        assert!(matches!(decode_payload("not base64!"), Err(TlvError::Base64(_))));
    }

    #[test]
    fn strict_view_requires_five_records() {
        let records = parse_tlv_stream(&stream(&[(1, "a"), (2, "b")])).unwrap();
        assert_eq!(
            DecodedInvoiceQr::from_records(&records),
            Err(TlvError::RecordCount { expected: 5, found: 2 })
        );
    }

    #[test]
    fn strict_view_requires_tag_order() {
        let records =
            parse_tlv_stream(&stream(&[(1, "a"), (3, "b"), (2, "c"), (4, "d"), (5, "e")])).unwrap();
        assert_eq!(
            DecodedInvoiceQr::from_records(&records),
            Err(TlvError::UnexpectedTag { index: 1, expected: 2, found: 3 })
        );
    }

    #[test]
    fn strict_view_rejects_invalid_utf8() {
        let mut bytes = stream(&[(1, "a"), (2, "b"), (3, "c"), (4, "d")]);
        bytes.extend_from_slice(&[5, 1, 0xFF]);
        let records = parse_tlv_stream(&bytes).unwrap();
        assert_eq!(
            DecodedInvoiceQr::from_records(&records),
            Err(TlvError::InvalidUtf8(5))
        );
    }

    #[test]
    fn strict_view_reads_fields() {
        let bytes = stream(&[
            (1, "Test Co"),
            (2, "123456789012345"),
            (3, "2024-01-15T10:30:00.000Z"),
            (4, "15.00"),
            (5, "115.00"),
        ]);
        let decoded = DecodedInvoiceQr::from_base64(&STANDARD.encode(&bytes)).unwrap();
        assert_eq!(decoded.seller_name, "Test Co");
        assert_eq!(decoded.get(QrTag::VatNumber), "123456789012345");
        assert_eq!(decoded.get(QrTag::Timestamp), "2024-01-15T10:30:00.000Z");
        assert_eq!(decoded.vat_total, "15.00");
        assert_eq!(decoded.invoice_total, "115.00");
    }
}
