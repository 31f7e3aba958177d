//! Owned decoded image buffers.
//!
//! [`RawImageData`] is the canonical in-memory image handed across the
//! decode boundary. [`MipLevel`] is what the generator produces for each
//! level before the builder re-tags it.

use core::fmt;

use imgref::ImgRef;
use rgb::{FromSlice, Rgba};

use crate::{PixelFormat, ValidationError};

/// Bytes per pixel of every mip-stage buffer.
pub(crate) const RGBA_BPP: usize = 4;

/// Tightly packed pixel bytes tagged with their format.
///
/// Invariant: `data.len() == width * height * bytes_per_pixel`, where the
/// bytes per pixel is that of `format` for [`new`](Self::new) and 4 for
/// [`rgba`](Self::rgba).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RawImageData {
    format: PixelFormat,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RawImageData {
    /// Wrap decoded bytes whose layout matches `format`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DataLength`] if the byte count does not
    /// match, or [`ValidationError::DimensionOverflow`] if it cannot be
    /// computed.
    pub fn new(
        format: PixelFormat,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        check_len(width, height, format.bytes_per_pixel(), data.len())?;
        Ok(Self {
            format,
            width,
            height,
            data,
        })
    }

    /// Wrap 4-byte-per-pixel RGBA bytes.
    pub fn rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ValidationError> {
        Self::new(PixelFormat::Rgba, width, height, data)
    }

    /// Fill a `width × height` RGBA image with one color.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Result<Self, ValidationError> {
        let pixels = expected_len(width, height, RGBA_BPP)? / RGBA_BPP;
        let data = color.repeat(pixels);
        Self::rgba(width, height, data)
    }

    /// Wrap bytes stored either in `format`'s own layout or padded to
    /// 4 bytes per pixel, as [`to_rgba8`](Self::to_rgba8) and mip builds
    /// leave them.
    ///
    /// # Errors
    ///
    /// [`ValidationError::StoredLayout`] if `bytes_per_pixel` is neither,
    /// [`ValidationError::DataLength`] if the byte count does not match it.
    pub fn from_stored(
        format: PixelFormat,
        width: u32,
        height: u32,
        bytes_per_pixel: usize,
        data: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        if bytes_per_pixel == format.bytes_per_pixel() {
            return Self::new(format, width, height, data);
        }
        if bytes_per_pixel != RGBA_BPP || format == PixelFormat::None {
            return Err(ValidationError::StoredLayout {
                format,
                bytes_per_pixel,
            });
        }
        check_len(width, height, RGBA_BPP, data.len())?;
        Ok(Self::tagged(format, width, height, data))
    }

    /// Internal constructor for buffers whose length is already known to
    /// be `width * height * 4`.
    pub(crate) fn tagged(format: PixelFormat, width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * RGBA_BPP);
        Self {
            format,
            width,
            height,
            data,
        }
    }

    /// Pixel format tag.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrow the packed pixel bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access for in-place transforms such as
    /// [`ChannelMatrix::apply`](crate::ChannelMatrix::apply). The length
    /// cannot change through this borrow.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume and return the packed bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Bytes per pixel actually held in [`data`](Self::data): the format's
    /// own width, or 4 once padded to RGBA.
    pub fn stored_bytes_per_pixel(&self) -> usize {
        let own = self.format.bytes_per_pixel();
        if check_len(self.width, self.height, own, self.data.len()).is_ok() {
            own
        } else {
            RGBA_BPP
        }
    }

    /// Whether both dimensions are exact powers of two.
    pub fn is_power_of_two(&self) -> bool {
        self.width.is_power_of_two() && self.height.is_power_of_two()
    }

    /// View as 2D RGBA pixels, if the buffer holds exactly 4 bytes per pixel.
    pub fn as_rgba(&self) -> Result<ImgRef<'_, Rgba<u8>>, ValidationError> {
        check_len(self.width, self.height, RGBA_BPP, self.data.len())?;
        Ok(ImgRef::new(
            self.data.as_rgba(),
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Pad to 4 bytes per pixel.
    ///
    /// Gray becomes `(g, g, g, 255)`, gray+alpha becomes `(g, g, g, a)`,
    /// RGB gets an opaque alpha. The result keeps this image's format tag
    /// so [`strip_rgba8`](Self::strip_rgba8) can undo the padding later.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnpaddableFormat`] for [`PixelFormat::None`].
    pub fn to_rgba8(&self) -> Result<Self, ValidationError> {
        let data = match self.format {
            PixelFormat::None => return Err(ValidationError::UnpaddableFormat(self.format)),
            PixelFormat::Rgba => self.data.clone(),
            PixelFormat::GrayScale => self
                .data
                .iter()
                .flat_map(|&g| [g, g, g, 255])
                .collect(),
            PixelFormat::GrayScaleAlpha => self
                .data
                .chunks_exact(2)
                .flat_map(|c| [c[0], c[0], c[0], c[1]])
                .collect(),
            PixelFormat::Rgb => self
                .data
                .chunks_exact(3)
                .flat_map(|c| [c[0], c[1], c[2], 255])
                .collect(),
        };
        Ok(Self::tagged(self.format, self.width, self.height, data))
    }

    /// Reduce a 4-byte-per-pixel buffer back to the layout of its format tag.
    ///
    /// Gray keeps the red byte, gray+alpha keeps red and alpha, RGB drops
    /// alpha. The inverse of [`to_rgba8`](Self::to_rgba8) for images whose
    /// gray channels were never made to diverge.
    pub fn strip_rgba8(&self) -> Result<Self, ValidationError> {
        check_len(self.width, self.height, RGBA_BPP, self.data.len())?;
        let px = self.data.chunks_exact(RGBA_BPP);
        let data: Vec<u8> = match self.format {
            PixelFormat::None => return Err(ValidationError::UnpaddableFormat(self.format)),
            PixelFormat::Rgba => self.data.clone(),
            PixelFormat::GrayScale => px.map(|c| c[0]).collect(),
            PixelFormat::GrayScaleAlpha => px.flat_map(|c| [c[0], c[3]]).collect(),
            PixelFormat::Rgb => px.flat_map(|c| [c[0], c[1], c[2]]).collect(),
        };
        Self::new(self.format, self.width, self.height, data)
    }
}

impl fmt::Debug for RawImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RawImageData({}x{}, {}, {} bytes)",
            self.width,
            self.height,
            self.format,
            self.data.len()
        )
    }
}

/// One generated level of a mip chain.
///
/// Index 0 is the first level below the source (half resolution); the
/// source itself is not part of the chain. Data is always RGBA.
#[derive(Clone, PartialEq, Eq)]
pub struct MipLevel {
    /// Position in the chain, 0 = largest generated level.
    pub index: u32,
    /// Level width in pixels.
    pub width: u32,
    /// Level height in pixels.
    pub height: u32,
    /// Packed RGBA bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl MipLevel {
    /// View as 2D RGBA pixels.
    pub fn pixels(&self) -> ImgRef<'_, Rgba<u8>> {
        ImgRef::new(
            self.data.as_rgba(),
            self.width as usize,
            self.height as usize,
        )
    }

    /// Re-tag as a [`RawImageData`] carrying `format`.
    pub fn into_raw(self, format: PixelFormat) -> RawImageData {
        RawImageData::tagged(format, self.width, self.height, self.data)
    }
}

impl fmt::Debug for MipLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MipLevel#{}({}x{})", self.index, self.width, self.height)
    }
}

fn expected_len(width: u32, height: u32, bpp: usize) -> Result<usize, ValidationError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(bpp))
        .ok_or(ValidationError::DimensionOverflow)
}

pub(crate) fn check_len(
    width: u32,
    height: u32,
    bpp: usize,
    actual: usize,
) -> Result<(), ValidationError> {
    let expected = expected_len(width, height, bpp)?;
    if actual != expected {
        return Err(ValidationError::DataLength { expected, actual });
    }
    Ok(())
}
