//! Binary container for generated mip chains.
//!
//! Layout, all multi-byte fields in the byte order named by the marker:
//!
//! ```text
//! magic      4 bytes  "MIPC"
//! endian     u8       0 = little, 1 = big
//! version    u16      1
//! count      u32      number of levels
//! per level:
//!   format   u8       PixelFormat tag
//!   stored   u8       bytes per stored pixel: the format's own, or 4
//!                     for levels padded to RGBA
//!   width    u32
//!   height   u32
//!   length   u32      byte count of the pixel data
//!   data     [u8; length]
//! ```

use thiserror::Error;

use crate::codec::{ByteReader, ByteWriter, CodecError, Endian};
use crate::{PixelFormat, RawImageData, ValidationError};

const MAGIC: &[u8; 4] = b"MIPC";
const VERSION: u16 = 1;
/// Magic, endian marker, version, count.
const HEADER_LEN: usize = 4 + 1 + 2 + 4;
/// Format, stored bytes per pixel, width, height, length.
const LEVEL_HEADER_LEN: usize = 1 + 1 + 4 + 4 + 4;

/// Errors from [`write_chain`] and [`read_chain`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PersistError {
    /// The buffer does not start with the container magic.
    #[error("not a mip chain container")]
    BadMagic,
    /// The endian marker is neither 0 nor 1.
    #[error("unknown byte order marker {0}")]
    BadEndian(u8),
    /// The container was written by a newer version.
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u16),
    /// A level's format tag is unknown.
    #[error("unknown pixel format tag {0}")]
    UnknownFormat(u8),
    /// A field ran past the end of the buffer.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A count or length does not fit in its `u32` field.
    #[error("mip chain too large for the container")]
    TooLarge,
    /// A level's stored layout or byte length does not match its header.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Serialize `levels` in the given byte order.
///
/// # Errors
///
/// [`PersistError::TooLarge`] if the level count or a level's byte length
/// does not fit in a `u32` field.
pub fn write_chain(levels: &[RawImageData], endian: Endian) -> Result<Vec<u8>, PersistError> {
    let count = u32::try_from(levels.len()).map_err(|_| PersistError::TooLarge)?;
    let mut w = ByteWriter::new(endian);
    w.write_bytes(MAGIC)
        .write_u8(match endian {
            Endian::Little => 0,
            Endian::Big => 1,
        })
        .write_u16(VERSION)
        .write_u32(count);

    for level in levels {
        let len = u32::try_from(level.data().len()).map_err(|_| PersistError::TooLarge)?;
        // Stored width is 0, 1, 2, 3 or 4.
        let stored = level.stored_bytes_per_pixel() as u8;
        w.write_u8(level.format().as_u8())
            .write_u8(stored)
            .write_u32(level.width())
            .write_u32(level.height())
            .write_u32(len)
            .write_bytes(level.data());
    }
    log::debug!("wrote {} mip levels in {} bytes", levels.len(), w.len());
    Ok(w.into_vec())
}

/// Parse a container written by [`write_chain`].
///
/// Every level is re-validated against its declared format, stored
/// layout and size.
pub fn read_chain(bytes: &[u8]) -> Result<Vec<RawImageData>, PersistError> {
    if bytes.len() < MAGIC.len() || &bytes[..MAGIC.len()] != MAGIC {
        return Err(PersistError::BadMagic);
    }
    let endian = match ByteReader::new(bytes, Endian::Little).read_u8(4)? {
        0 => Endian::Little,
        1 => Endian::Big,
        other => return Err(PersistError::BadEndian(other)),
    };
    let r = ByteReader::new(bytes, endian);
    let version = r.read_u16(5)?;
    if version != VERSION {
        return Err(PersistError::UnsupportedVersion(version));
    }
    let count = r.read_u32(7)?;

    let mut levels = Vec::new();
    let mut offset = HEADER_LEN;
    for _ in 0..count {
        let tag = r.read_u8(offset)?;
        let format = PixelFormat::from_u8(tag).ok_or(PersistError::UnknownFormat(tag))?;
        let stored = r.read_u8(offset + 1)? as usize;
        let width = r.read_u32(offset + 2)?;
        let height = r.read_u32(offset + 6)?;
        let len = r.read_u32(offset + 10)? as usize;
        offset += LEVEL_HEADER_LEN;

        let data = r.bytes(offset, len)?.to_vec();
        offset += len;
        levels.push(RawImageData::from_stored(format, width, height, stored, data)?);
    }

    if offset != bytes.len() {
        log::warn!(
            "ignoring {} trailing bytes after mip chain",
            bytes.len() - offset
        );
    }
    Ok(levels)
}
