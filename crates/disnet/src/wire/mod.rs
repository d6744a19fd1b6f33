// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire-level primitives for DIS binary layout.
//!
//! DIS is a big-endian format: multi-byte integers are network order, strings
//! are ASCII with either a fixed zero-padded encoding or a length prefix.
//! [`cursor`] provides the bounds-checked readers/writers everything else in
//! the codec is built on.

pub mod cursor;

pub use cursor::{Cursor, CursorMut};

use std::fmt;

/// Wire codec error.
///
/// Decode failures are always fatal to the current decode call: a read past
/// the end of the buffer reports [`WireError::EndOfData`] and is never
/// silently padded with zeros. Encode failures reject bad values instead of
/// truncating them onto the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Read attempted past the available bytes.
    EndOfData { offset: usize, needed: usize },
    /// Write attempted past the end of the output buffer.
    BufferFull { offset: usize, needed: usize },
    /// Value does not fit the wire width of its field.
    OutOfRange { value: u64, max: u64 },
    /// Variable blob length violates a byte-boundary rule.
    AlignmentViolation { len: usize, boundary: usize },
    /// Strict enumeration saw a value outside its table.
    UnknownEnumerant { field: &'static str, value: u32 },
    /// PDU header could not be parsed.
    MalformedHeader { reason: String },
    /// Structurally valid bytes carrying an inconsistent value.
    InvalidData { reason: String },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::EndOfData { offset, needed } => {
                write!(f, "end of data at offset {} ({} bytes needed)", offset, needed)
            }
            WireError::BufferFull { offset, needed } => {
                write!(f, "output buffer full at offset {} ({} bytes needed)", offset, needed)
            }
            WireError::OutOfRange { value, max } => {
                write!(f, "value {} out of range (max {})", value, max)
            }
            WireError::AlignmentViolation { len, boundary } => {
                write!(f, "length {} violates {}-byte alignment", len, boundary)
            }
            WireError::UnknownEnumerant { field, value } => {
                write!(f, "unknown {} enumerant {}", field, value)
            }
            WireError::MalformedHeader { reason } => write!(f, "malformed header: {}", reason),
            WireError::InvalidData { reason } => write!(f, "invalid data: {}", reason),
        }
    }
}

impl std::error::Error for WireError {}

pub type WireResult<T> = core::result::Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_error_display_variants() {
        let err = WireError::EndOfData { offset: 10, needed: 4 };
        assert_eq!(err.to_string(), "end of data at offset 10 (4 bytes needed)");

        let err = WireError::OutOfRange { value: 300, max: 255 };
        assert_eq!(err.to_string(), "value 300 out of range (max 255)");

        let err = WireError::AlignmentViolation { len: 5, boundary: 8 };
        assert_eq!(err.to_string(), "length 5 violates 8-byte alignment");

        let err = WireError::UnknownEnumerant { field: "DamageState", value: 9 };
        assert_eq!(err.to_string(), "unknown DamageState enumerant 9");

        let err = WireError::MalformedHeader { reason: "buffer shorter than 12 bytes".into() };
        assert_eq!(err.to_string(), "malformed header: buffer shorter than 12 bytes");
    }
}
