// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/write cursors for DIS buffer manipulation.
//!
//! All integers are big-endian (network order). Both cursors are zero-copy
//! views over a caller-owned slice and carry their byte offset in every
//! error they report.

use super::{WireError, WireResult};
use crate::config::ASCII_CHARSET;

/// Generate write methods for primitive types (eliminates code duplication)
///
/// Each generated method:
/// 1. Checks buffer bounds (returns `WireError::BufferFull` if overflow)
/// 2. Converts value to big-endian bytes via `to_be_bytes()`
/// 3. Copies bytes to buffer
/// 4. Advances offset
macro_rules! impl_write_be {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self, value: $type) -> WireResult<()> {
            if self.offset + $size > self.buffer.len() {
                return Err(WireError::BufferFull {
                    offset: self.offset,
                    needed: $size,
                });
            }
            let bytes = value.to_be_bytes();
            self.buffer[self.offset..self.offset + $size].copy_from_slice(&bytes);
            self.offset += $size;
            Ok(())
        }
    };
}

/// Generate read methods for primitive types (eliminates code duplication)
///
/// Each generated method:
/// 1. Checks buffer bounds (returns `WireError::EndOfData` if overflow)
/// 2. Reads N bytes from buffer
/// 3. Converts bytes to value via `from_be_bytes()`
/// 4. Advances offset
macro_rules! impl_read_be {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> WireResult<$type> {
            if self.offset + $size > self.buffer.len() {
                return Err(WireError::EndOfData {
                    offset: self.offset,
                    needed: $size,
                });
            }
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(&self.buffer[self.offset..self.offset + $size]);
            self.offset += $size;
            Ok(<$type>::from_be_bytes(bytes))
        }
    };
}

/// Mutable cursor for writing (bounds-checked, zero-copy)
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    impl_write_be!(write_u8, u8, 1);
    impl_write_be!(write_u16, u16, 2);
    impl_write_be!(write_u32, u32, 4);
    impl_write_be!(write_u64, u64, 8);
    impl_write_be!(write_i8, i8, 1);
    impl_write_be!(write_i16, i16, 2);
    impl_write_be!(write_i32, i32, 4);

    pub fn write_f32(&mut self, value: f32) -> WireResult<()> {
        self.write_u32(value.to_bits())
    }

    pub fn write_f64(&mut self, value: f64) -> WireResult<()> {
        self.write_u64(value.to_bits())
    }

    /// Write a collection count as one byte.
    ///
    /// Counts come in as `usize` from live collections; a count that does
    /// not fit the wire width is rejected rather than truncated.
    pub fn write_len_u8(&mut self, len: usize) -> WireResult<()> {
        if len > u8::MAX as usize {
            return Err(WireError::OutOfRange {
                value: len as u64,
                max: u64::from(u8::MAX),
            });
        }
        self.write_u8(len as u8)
    }

    /// Write a collection count or byte length as two bytes.
    pub fn write_len_u16(&mut self, len: usize) -> WireResult<()> {
        if len > u16::MAX as usize {
            return Err(WireError::OutOfRange {
                value: len as u64,
                max: u64::from(u16::MAX),
            });
        }
        self.write_u16(len as u16)
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> WireResult<()> {
        if self.offset + data.len() > self.buffer.len() {
            return Err(WireError::BufferFull {
                offset: self.offset,
                needed: data.len(),
            });
        }
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }

    /// Write `width` literal zero bytes of padding (width 1 to 4 on the wire).
    pub fn write_padding(&mut self, width: usize) -> WireResult<()> {
        if self.offset + width > self.buffer.len() {
            return Err(WireError::BufferFull {
                offset: self.offset,
                needed: width,
            });
        }
        for slot in &mut self.buffer[self.offset..self.offset + width] {
            *slot = 0;
        }
        self.offset += width;
        Ok(())
    }

    /// Write a fixed-width ASCII string: one charset tag byte followed by
    /// exactly `width` data bytes, zero-padded or truncated to fit.
    pub fn write_fixed_ascii(&mut self, text: &str, width: usize) -> WireResult<()> {
        self.write_u8(ASCII_CHARSET)?;
        let bytes = text.as_bytes();
        let used = bytes.len().min(width);
        self.write_bytes(&bytes[..used])?;
        self.write_padding(width - used)
    }

    /// Write a variable ASCII string with a 1-byte length prefix.
    ///
    /// Oversize input is clamped to 255 bytes; this encoding is explicitly
    /// lossy-but-safe rather than an error.
    pub fn write_var_ascii_u8(&mut self, text: &str) -> WireResult<()> {
        let bytes = text.as_bytes();
        let used = bytes.len().min(u8::MAX as usize);
        self.write_u8(used as u8)?;
        self.write_bytes(&bytes[..used])
    }

    /// Write a variable ASCII string with a 2-byte length prefix (clamped to 65535).
    pub fn write_var_ascii_u16(&mut self, text: &str) -> WireResult<()> {
        let bytes = text.as_bytes();
        let used = bytes.len().min(u16::MAX as usize);
        self.write_u16(used as u16)?;
        self.write_bytes(&bytes[..used])
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }
}

/// Immutable cursor for reading (bounds-checked, zero-copy)
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    impl_read_be!(read_u8, u8, 1);
    impl_read_be!(read_u16, u16, 2);
    impl_read_be!(read_u32, u32, 4);
    impl_read_be!(read_u64, u64, 8);
    impl_read_be!(read_i8, i8, 1);
    impl_read_be!(read_i16, i16, 2);
    impl_read_be!(read_i32, i32, 4);

    pub fn read_f32(&mut self) -> WireResult<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> WireResult<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_bytes(&mut self, len: usize) -> WireResult<&'a [u8]> {
        if self.offset + len > self.buffer.len() {
            return Err(WireError::EndOfData {
                offset: self.offset,
                needed: len,
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Advance the cursor past `width` padding bytes without inspecting them.
    pub fn skip(&mut self, width: usize) -> WireResult<()> {
        if self.offset + width > self.buffer.len() {
            return Err(WireError::EndOfData {
                offset: self.offset,
                needed: width,
            });
        }
        self.offset += width;
        Ok(())
    }

    /// Read a fixed-width ASCII string: charset tag + `width` data bytes.
    ///
    /// Consumes exactly `width + 1` bytes. Trailing NULs are stripped from
    /// the returned text.
    pub fn read_fixed_ascii(&mut self, width: usize) -> WireResult<String> {
        let _charset = self.read_u8()?;
        let raw = self.read_bytes(width)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    /// Read a variable ASCII string with a 1-byte length prefix.
    pub fn read_var_ascii_u8(&mut self) -> WireResult<String> {
        let len = self.read_u8()? as usize;
        let raw = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    /// Read a variable ASCII string with a 2-byte length prefix.
    pub fn read_var_ascii_u16(&mut self) -> WireResult<String> {
        let len = self.read_u16()? as usize;
        let raw = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_past_end_reports_offset() {
        let buffer = [0u8; 3];
        let mut cursor = Cursor::new(&buffer);
        cursor.read_u16().expect("read u16 should succeed");

        let err = cursor.read_u32().unwrap_err();
        assert_eq!(err, WireError::EndOfData { offset: 2, needed: 4 });
    }

    #[test]
    fn test_read_never_returns_garbage_on_short_buffer() {
        let buffer = [0xFFu8; 2];
        let mut cursor = Cursor::new(&buffer);
        assert!(cursor.read_u64().is_err());
        // Offset unchanged after a failed read.
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn test_write_overflow_reports_offset() {
        let mut buffer = [0u8; 2];
        let mut cursor = CursorMut::new(&mut buffer);
        cursor.write_u16(0xABCD).expect("write u16 should succeed");

        let err = cursor.write_u8(0xFF).unwrap_err();
        assert_eq!(err, WireError::BufferFull { offset: 2, needed: 1 });
    }

    #[test]
    fn test_roundtrip_big_endian_integers() {
        let mut buffer = [0u8; 32];
        let mut writer = CursorMut::new(&mut buffer);
        writer.write_u8(0xAB).expect("write u8");
        writer.write_u16(0xCDEF).expect("write u16");
        writer.write_u32(0x1234_5678).expect("write u32");
        writer.write_u64(0x1122_3344_5566_7788).expect("write u64");
        writer.write_i32(-42).expect("write i32");

        // Network byte order on the wire.
        assert_eq!(buffer[0], 0xAB);
        assert_eq!(&buffer[1..3], &[0xCD, 0xEF]);
        assert_eq!(&buffer[3..7], &[0x12, 0x34, 0x56, 0x78]);

        let mut reader = Cursor::new(&buffer);
        assert_eq!(reader.read_u8().expect("read u8"), 0xAB);
        assert_eq!(reader.read_u16().expect("read u16"), 0xCDEF);
        assert_eq!(reader.read_u32().expect("read u32"), 0x1234_5678);
        assert_eq!(reader.read_u64().expect("read u64"), 0x1122_3344_5566_7788);
        assert_eq!(reader.read_i32().expect("read i32"), -42);
    }

    #[test]
    fn test_roundtrip_floats() {
        let mut buffer = [0u8; 12];
        let mut writer = CursorMut::new(&mut buffer);
        writer.write_f32(6.25).expect("write f32");
        writer.write_f64(-1234.5).expect("write f64");

        let mut reader = Cursor::new(&buffer);
        assert_eq!(reader.read_f32().expect("read f32"), 6.25);
        assert_eq!(reader.read_f64().expect("read f64"), -1234.5);
    }

    #[test]
    fn test_count_writer_rejects_out_of_range() {
        let mut buffer = [0u8; 8];
        let mut cursor = CursorMut::new(&mut buffer);

        let err = cursor.write_len_u8(256).unwrap_err();
        assert_eq!(err, WireError::OutOfRange { value: 256, max: 255 });
        // Nothing was written.
        assert_eq!(cursor.offset(), 0);

        let err = cursor.write_len_u16(70_000).unwrap_err();
        assert_eq!(err, WireError::OutOfRange { value: 70_000, max: 65_535 });

        cursor.write_len_u8(255).expect("255 fits one byte");
        cursor.write_len_u16(65_535).expect("65535 fits two bytes");
    }

    #[test]
    fn test_fixed_ascii_pads_and_truncates() {
        let mut buffer = [0xEEu8; 12];
        let mut writer = CursorMut::new(&mut buffer);
        writer.write_fixed_ascii("EAGLE", 11).expect("write marking");
        assert_eq!(writer.offset(), 12);
        assert_eq!(buffer[0], ASCII_CHARSET);
        assert_eq!(&buffer[1..6], b"EAGLE");
        assert_eq!(&buffer[6..12], &[0u8; 6]);

        let mut reader = Cursor::new(&buffer);
        assert_eq!(reader.read_fixed_ascii(11).expect("read marking"), "EAGLE");
        assert_eq!(reader.offset(), 12);

        // Oversize input truncates to the field width.
        let mut buffer = [0u8; 5];
        let mut writer = CursorMut::new(&mut buffer);
        writer.write_fixed_ascii("OVERLONG", 4).expect("write truncated");
        let mut reader = Cursor::new(&buffer);
        assert_eq!(reader.read_fixed_ascii(4).expect("read truncated"), "OVER");
    }

    #[test]
    fn test_var_ascii_clamps_oversize_input() {
        let long = "x".repeat(300);
        let mut buffer = vec![0u8; 600];
        let mut writer = CursorMut::new(&mut buffer);
        writer.write_var_ascii_u8(&long).expect("clamped write");
        assert_eq!(writer.offset(), 256);

        let mut reader = Cursor::new(&buffer);
        let text = reader.read_var_ascii_u8().expect("read clamped");
        assert_eq!(text.len(), 255);
    }

    #[test]
    fn test_var_ascii_u16_roundtrip() {
        let mut buffer = vec![0u8; 64];
        let mut writer = CursorMut::new(&mut buffer);
        writer.write_var_ascii_u16("callsign-7").expect("write");

        let mut reader = Cursor::new(&buffer);
        assert_eq!(reader.read_var_ascii_u16().expect("read"), "callsign-7");
        assert_eq!(reader.offset(), 2 + 10);
    }

    #[test]
    fn test_padding_and_skip_widths() {
        let mut buffer = [0xAAu8; 10];
        let mut writer = CursorMut::new(&mut buffer);
        writer.write_padding(3).expect("pad 3");
        writer.write_u8(0x42).expect("write marker");
        assert_eq!(&buffer[..4], &[0, 0, 0, 0x42]);

        let mut reader = Cursor::new(&buffer);
        reader.skip(3).expect("skip 3");
        assert_eq!(reader.read_u8().expect("read marker"), 0x42);

        let err = reader.skip(16).unwrap_err();
        assert_eq!(err, WireError::EndOfData { offset: 4, needed: 16 });
    }
}
