//! Pixel format tags.

/// Channel layout of a decoded image.
///
/// The tag only matters at the decode and encode boundary. Mip generation
/// always runs on 4-byte RGBA pixels; see [`RawImageData::to_rgba8`](crate::RawImageData::to_rgba8)
/// for padding narrower layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PixelFormat {
    /// Unknown or not yet classified.
    #[default]
    None = 0,
    /// Single luminance channel.
    GrayScale = 1,
    /// Luminance + alpha.
    GrayScaleAlpha = 2,
    /// Red, green, blue.
    Rgb = 3,
    /// Red, green, blue, alpha.
    Rgba = 4,
}

impl PixelFormat {
    /// Number of channels in this layout.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            Self::None => 0,
            Self::GrayScale => 1,
            Self::GrayScaleAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Bytes per pixel (one byte per channel).
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        self.channels()
    }

    /// Whether this layout includes an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::GrayScaleAlpha | Self::Rgba)
    }

    /// Whether this layout carries only luminance.
    #[inline]
    pub const fn is_gray(self) -> bool {
        matches!(self, Self::GrayScale | Self::GrayScaleAlpha)
    }

    /// Stable one-byte tag used by the chain container.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Inverse of [`as_u8`](Self::as_u8). Returns `None` for unknown tags.
    pub const fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::None),
            1 => Some(Self::GrayScale),
            2 => Some(Self::GrayScaleAlpha),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }
}

impl core::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::GrayScale => "gray",
            Self::GrayScaleAlpha => "gray+alpha",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
        };
        f.write_str(name)
    }
}
