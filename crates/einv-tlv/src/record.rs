//! # TLV Record Encoder
//!
//! Encodes one `(tag, value)` pair as `[tag][length][value bytes]`, where
//! `length` is the UTF-8 byte count of the value (not its character count)
//! and occupies a single byte. No padding, no terminator.
//!
//! ## Oversized values
//!
//! The single length byte caps a value at 255 bytes. The strict encoders in
//! this module reject longer values with [`TlvError::ValueTooLong`]. The
//! payload builder truncates instead, using [`truncate_utf8`], so that it can
//! always produce a payload.

use serde::{Deserialize, Serialize};

use crate::error::TlvError;

/// Largest value length the single length byte can describe.
pub const MAX_VALUE_LEN: usize = u8::MAX as usize;

/// A decoded or prepared TLV record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlvRecord {
    /// Semantic tag byte.
    pub tag: u8,
    /// Raw value bytes.
    pub value: Vec<u8>,
}

impl TlvRecord {
    /// Bytes this record occupies on the wire: `2 + value.len()`.
    pub fn encoded_len(&self) -> usize {
        2 + self.value.len()
    }

    /// The value as UTF-8 text.
    pub fn value_str(&self) -> Result<&str, TlvError> {
        std::str::from_utf8(&self.value).map_err(|_| TlvError::InvalidUtf8(self.tag))
    }
}

/// Encode a single record into a fresh buffer of exactly `2 + len` bytes.
///
/// # Errors
///
/// Returns [`TlvError::ValueTooLong`] if `value` exceeds 255 UTF-8 bytes.
pub fn encode_record(tag: u8, value: &str) -> Result<Vec<u8>, TlvError> {
    let mut out = Vec::with_capacity(2 + value.len());
    encode_record_into(&mut out, tag, value)?;
    Ok(out)
}

/// Append a single record to `out`. On error `out` is left untouched.
pub fn encode_record_into(out: &mut Vec<u8>, tag: u8, value: &str) -> Result<(), TlvError> {
    let bytes = value.as_bytes();
    let len = u8::try_from(bytes.len()).map_err(|_| TlvError::ValueTooLong {
        tag,
        len: bytes.len(),
    })?;
    out.reserve(2 + bytes.len());
    out.push(tag);
    out.push(len);
    out.extend_from_slice(bytes);
    Ok(())
}

/// The longest prefix of `s` that is at most `max` bytes and ends on a
/// character boundary.
pub fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_tag_length_value() {
        assert_eq!(
            encode_record(1, "Test Co").unwrap(),
            vec![1, 7, b'T', b'e', b's', b't', b' ', b'C', b'o']
        );
    }

    #[test]
    fn empty_value_is_two_bytes() {
        assert_eq!(encode_record(9, "").unwrap(), vec![9, 0]);
    }

    #[test]
    fn length_counts_utf8_bytes_not_chars() {
        // "شركة" is 4 characters, 8 bytes.
        let rec = encode_record(1, "شركة").unwrap();
        assert_eq!(rec[1], 8);
        assert_eq!(rec.len(), 10);
        assert_eq!(&rec[2..], "شركة".as_bytes());
    }

    #[test]
    fn accepts_full_255_bytes() {
        let value = "a".repeat(255);
        let rec = encode_record(2, &value).unwrap();
        assert_eq!(rec[1], 255);
        assert_eq!(rec.len(), 257);
    }

    #[test]
    fn rejects_256_bytes() {
        let value = "a".repeat(256);
        assert_eq!(
            encode_record(2, &value),
            Err(TlvError::ValueTooLong { tag: 2, len: 256 })
        );
    }

    #[test]
    fn failed_append_leaves_buffer_untouched() {
        let mut out = vec![0xAA];
        assert!(encode_record_into(&mut out, 1, &"x".repeat(300)).is_err());
        assert_eq!(out, vec![0xAA]);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_utf8("abc", 255), "abc");
        assert_eq!(truncate_utf8("abcdef", 3), "abc");
        // each Arabic letter is 2 bytes; 5 bytes cannot split one
        assert_eq!(truncate_utf8("شركة", 5), "شر");
        // 4-byte emoji
        assert_eq!(truncate_utf8("a😀", 4), "a");
    }

    #[test]
    fn record_helpers() {
        let rec = TlvRecord { tag: 4, value: b"15.00".to_vec() };
        assert_eq!(rec.encoded_len(), 7);
        assert_eq!(rec.value_str().unwrap(), "15.00");
        let bad = TlvRecord { tag: 1, value: vec![0xFF, 0xFE] };
        assert_eq!(bad.value_str(), Err(TlvError::InvalidUtf8(1)));
    }
}
