//! # TLV Errors
//!
//! Failures of the strict record encoder and of the decoder. The payload
//! builder never returns these; it degrades to defaults instead.

use thiserror::Error;

/// Error from TLV encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TlvError {
    /// A value's UTF-8 encoding does not fit the single length byte.
    #[error("value for tag {tag} is {len} bytes; the length field holds at most 255")]
    ValueTooLong {
        /// Tag of the rejected record.
        tag: u8,
        /// UTF-8 byte length of the rejected value.
        len: usize,
    },

    /// The stream ended inside a record header.
    #[error("truncated record header at offset {offset}")]
    TruncatedHeader {
        /// Byte offset where the header started.
        offset: usize,
    },

    /// The stream ended before a record's declared value length.
    #[error("record with tag {tag} at offset {offset} declares {declared} bytes but only {available} remain")]
    TruncatedValue {
        /// Tag of the truncated record.
        tag: u8,
        /// Byte offset of the record header.
        offset: usize,
        /// Length declared by the record.
        declared: usize,
        /// Bytes left in the stream after the header.
        available: usize,
    },

    /// A tag outside the invoice QR taxonomy.
    #[error("unknown QR tag {0}")]
    UnknownTag(u8),

    /// A record appeared out of the mandated order.
    #[error("expected tag {expected} at record {index}, found {found}")]
    UnexpectedTag {
        /// Zero-based record index.
        index: usize,
        /// Tag required at this position.
        expected: u8,
        /// Tag actually present.
        found: u8,
    },

    /// The payload does not contain exactly the mandated records.
    #[error("expected {expected} records, found {found}")]
    RecordCount {
        /// Required number of records.
        expected: usize,
        /// Number of records decoded.
        found: usize,
    },

    /// A record value is not valid UTF-8.
    #[error("value for tag {0} is not valid UTF-8")]
    InvalidUtf8(u8),

    /// The text form is not valid standard base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}
