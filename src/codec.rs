//! Fixed-width binary encoding of primitive values.
//!
//! [`ByteReader`] decodes integers, floats and strings at explicit
//! offsets of a borrowed buffer; [`ByteWriter`] appends them to an owned
//! one. Reads past the end fail with [`CodecError::OutOfBounds`] and log a
//! diagnostic instead of panicking.

use thiserror::Error;

/// Byte order of multi-byte values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

/// Character encoding of string fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// 7-bit ASCII, one byte per char.
    Ascii,
    /// UTF-8.
    Utf8,
    /// UTF-16 code units in the codec's byte order.
    Utf16,
    /// UTF-32 code points in the codec's byte order.
    Utf32,
}

/// Errors from [`ByteReader`] and [`ByteWriter`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// The field does not fit in the buffer at this offset.
    #[error("{width}-byte field at offset {offset} exceeds buffer of {len} bytes")]
    OutOfBounds {
        /// Field offset.
        offset: usize,
        /// Field width in bytes.
        width: usize,
        /// Buffer length.
        len: usize,
    },
    /// The bytes are not valid in the requested encoding.
    #[error("invalid {0:?} text")]
    InvalidText(TextEncoding),
    /// A character outside 7-bit ASCII was written as ASCII.
    #[error("character {0:?} is not ascii")]
    NonAscii(char),
}

macro_rules! read_fixed {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Read a `", stringify!($ty), "` at `offset`.")]
        pub fn $name(&self, offset: usize) -> Result<$ty, CodecError> {
            let bytes: [u8; size_of::<$ty>()] = self.array(offset)?;
            Ok(match self.endian {
                Endian::Little => <$ty>::from_le_bytes(bytes),
                Endian::Big => <$ty>::from_be_bytes(bytes),
            })
        }
    };
}

macro_rules! write_fixed {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Append a `", stringify!($ty), "`.")]
        pub fn $name(&mut self, value: $ty) -> &mut Self {
            match self.endian {
                Endian::Little => self.buf.extend_from_slice(&value.to_le_bytes()),
                Endian::Big => self.buf.extend_from_slice(&value.to_be_bytes()),
            }
            self
        }
    };
}

/// Reads fixed-width fields from a borrowed buffer.
#[derive(Clone, Copy, Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    endian: Endian,
}

impl<'a> ByteReader<'a> {
    /// Read `buf` with the given byte order.
    pub fn new(buf: &'a [u8], endian: Endian) -> Self {
        Self { buf, endian }
    }

    /// The underlying buffer.
    pub fn buf(&self) -> &'a [u8] {
        self.buf
    }

    /// The byte order in use.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Borrow `len` raw bytes at `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], CodecError> {
        let end = offset.checked_add(len);
        match end {
            Some(end) if end <= self.buf.len() => Ok(&self.buf[offset..end]),
            _ => {
                log::warn!(
                    "{len}-byte read at offset {offset} runs past {} byte buffer",
                    self.buf.len()
                );
                Err(CodecError::OutOfBounds {
                    offset,
                    width: len,
                    len: self.buf.len(),
                })
            }
        }
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(offset, N)?);
        Ok(out)
    }

    read_fixed!(read_u8, u8);
    read_fixed!(read_u16, u16);
    read_fixed!(read_u32, u32);
    read_fixed!(read_u64, u64);
    read_fixed!(read_i8, i8);
    read_fixed!(read_i16, i16);
    read_fixed!(read_i32, i32);
    read_fixed!(read_i64, i64);
    read_fixed!(read_f32, f32);
    read_fixed!(read_f64, f64);

    /// Decode a `byte_len`-byte string at `offset`.
    ///
    /// UTF-16 and UTF-32 use this reader's byte order; `byte_len` must be
    /// a multiple of the code unit size.
    pub fn read_str(
        &self,
        offset: usize,
        byte_len: usize,
        encoding: TextEncoding,
    ) -> Result<String, CodecError> {
        let bytes = self.bytes(offset, byte_len)?;
        let invalid = || CodecError::InvalidText(encoding);
        match encoding {
            TextEncoding::Ascii => {
                if !bytes.is_ascii() {
                    return Err(invalid());
                }
                Ok(bytes.iter().map(|&b| b as char).collect())
            }
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|_| invalid()),
            TextEncoding::Utf16 => {
                if !bytes.len().is_multiple_of(2) {
                    return Err(invalid());
                }
                let units = bytes.chunks_exact(2).map(|c| match self.endian {
                    Endian::Little => u16::from_le_bytes([c[0], c[1]]),
                    Endian::Big => u16::from_be_bytes([c[0], c[1]]),
                });
                char::decode_utf16(units)
                    .collect::<Result<String, _>>()
                    .map_err(|_| invalid())
            }
            TextEncoding::Utf32 => {
                if !bytes.len().is_multiple_of(4) {
                    return Err(invalid());
                }
                bytes
                    .chunks_exact(4)
                    .map(|c| {
                        let c = [c[0], c[1], c[2], c[3]];
                        let v = match self.endian {
                            Endian::Little => u32::from_le_bytes(c),
                            Endian::Big => u32::from_be_bytes(c),
                        };
                        char::from_u32(v).ok_or_else(invalid)
                    })
                    .collect()
            }
        }
    }
}

/// Appends fixed-width fields to an owned buffer.
#[derive(Clone, Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
    endian: Endian,
}

impl ByteWriter {
    /// Start an empty buffer with the given byte order.
    pub fn new(endian: Endian) -> Self {
        Self {
            buf: Vec::new(),
            endian,
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume and return the written bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Append raw bytes unchanged.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    write_fixed!(write_u8, u8);
    write_fixed!(write_u16, u16);
    write_fixed!(write_u32, u32);
    write_fixed!(write_u64, u64);
    write_fixed!(write_i8, i8);
    write_fixed!(write_i16, i16);
    write_fixed!(write_i32, i32);
    write_fixed!(write_i64, i64);
    write_fixed!(write_f32, f32);
    write_fixed!(write_f64, f64);

    /// Append `text` and return the number of bytes written.
    ///
    /// Nothing is written if ASCII encoding meets a non-ASCII char.
    pub fn write_str(&mut self, text: &str, encoding: TextEncoding) -> Result<usize, CodecError> {
        let start = self.buf.len();
        match encoding {
            TextEncoding::Ascii => {
                if let Some(c) = text.chars().find(|c| !c.is_ascii()) {
                    return Err(CodecError::NonAscii(c));
                }
                self.buf.extend_from_slice(text.as_bytes());
            }
            TextEncoding::Utf8 => self.buf.extend_from_slice(text.as_bytes()),
            TextEncoding::Utf16 => {
                for unit in text.encode_utf16() {
                    self.write_u16(unit);
                }
            }
            TextEncoding::Utf32 => {
                for c in text.chars() {
                    self.write_u32(c as u32);
                }
            }
        }
        Ok(self.buf.len() - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_little_and_big_endian() {
        let data = [0x01u8, 0x02, 0x03, 0x04];
        let le = ByteReader::new(&data, Endian::Little);
        let be = ByteReader::new(&data, Endian::Big);
        assert_eq!(le.read_u16(0).unwrap(), 0x0201);
        assert_eq!(be.read_u16(0).unwrap(), 0x0102);
        assert_eq!(le.read_u32(0).unwrap(), 0x0403_0201);
        assert_eq!(be.read_u32(0).unwrap(), 0x0102_0304);
        assert_eq!(be.read_u8(3).unwrap(), 4);
    }

    #[test]
    fn signed_and_float_values() {
        let mut w = ByteWriter::new(Endian::Big);
        w.write_i8(-2).write_i16(-300).write_i64(i64::MIN).write_f32(1.5).write_f64(-0.25);
        let bytes = w.into_vec();
        let r = ByteReader::new(&bytes, Endian::Big);
        assert_eq!(r.read_i8(0).unwrap(), -2);
        assert_eq!(r.read_i16(1).unwrap(), -300);
        assert_eq!(r.read_i64(3).unwrap(), i64::MIN);
        assert_eq!(r.read_f32(11).unwrap(), 1.5);
        assert_eq!(r.read_f64(15).unwrap(), -0.25);
    }

    #[test]
    fn short_buffer_fails() {
        let data = [0u8; 3];
        let r = ByteReader::new(&data, Endian::Little);
        assert_eq!(
            r.read_u32(0).unwrap_err(),
            CodecError::OutOfBounds {
                offset: 0,
                width: 4,
                len: 3
            }
        );
        assert!(r.read_u16(2).is_err());
        assert!(r.read_u8(3).is_err());
        assert!(r.read_u64(usize::MAX).is_err());
        assert_eq!(r.read_u16(1).unwrap(), 0);
    }

    #[test]
    fn ascii_strings() {
        let mut w = ByteWriter::new(Endian::Little);
        assert_eq!(w.write_str("mip", TextEncoding::Ascii).unwrap(), 3);
        assert_eq!(
            w.write_str("naïve", TextEncoding::Ascii).unwrap_err(),
            CodecError::NonAscii('ï')
        );
        assert_eq!(w.len(), 3);

        let r = ByteReader::new(w.as_bytes(), Endian::Little);
        assert_eq!(r.read_str(0, 3, TextEncoding::Ascii).unwrap(), "mip");

        let high = [b'a', 0xE9];
        let r = ByteReader::new(&high, Endian::Little);
        assert_eq!(
            r.read_str(0, 2, TextEncoding::Ascii).unwrap_err(),
            CodecError::InvalidText(TextEncoding::Ascii)
        );
    }

    #[test]
    fn utf8_strings() {
        let mut w = ByteWriter::default();
        let n = w.write_str("héllo", TextEncoding::Utf8).unwrap();
        assert_eq!(n, 6);
        let r = ByteReader::new(w.as_bytes(), Endian::Little);
        assert_eq!(r.read_str(0, n, TextEncoding::Utf8).unwrap(), "héllo");
        // Cutting through the two-byte 'é' is invalid.
        assert!(r.read_str(0, 2, TextEncoding::Utf8).is_err());
    }

    #[test]
    fn utf16_honors_byte_order() {
        for endian in [Endian::Little, Endian::Big] {
            let mut w = ByteWriter::new(endian);
            let n = w.write_str("a𝄞", TextEncoding::Utf16).unwrap();
            // 'a' is one unit, the clef is a surrogate pair.
            assert_eq!(n, 6);
            let r = ByteReader::new(w.as_bytes(), endian);
            assert_eq!(r.read_str(0, n, TextEncoding::Utf16).unwrap(), "a𝄞");
        }
        let mut w = ByteWriter::new(Endian::Big);
        w.write_str("A", TextEncoding::Utf16).unwrap();
        assert_eq!(w.as_bytes(), &[0x00, 0x41]);
    }

    #[test]
    fn utf16_rejects_lone_surrogate_and_odd_length() {
        let lone = 0xD800u16.to_le_bytes();
        let r = ByteReader::new(&lone, Endian::Little);
        assert!(r.read_str(0, 2, TextEncoding::Utf16).is_err());
        let odd = [0x41u8, 0x00, 0x42];
        let r = ByteReader::new(&odd, Endian::Little);
        assert!(r.read_str(0, 3, TextEncoding::Utf16).is_err());
    }

    #[test]
    fn utf32_strings() {
        let mut w = ByteWriter::new(Endian::Little);
        let n = w.write_str("ok✓", TextEncoding::Utf32).unwrap();
        assert_eq!(n, 12);
        let r = ByteReader::new(w.as_bytes(), Endian::Little);
        assert_eq!(r.read_str(0, n, TextEncoding::Utf32).unwrap(), "ok✓");

        let bad = 0x0011_0000u32.to_le_bytes();
        let r = ByteReader::new(&bad, Endian::Little);
        assert_eq!(
            r.read_str(0, 4, TextEncoding::Utf32).unwrap_err(),
            CodecError::InvalidText(TextEncoding::Utf32)
        );
    }
}
