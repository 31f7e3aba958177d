//! The decode boundary.
//!
//! Image decoders live outside this crate. They hand over pixels through
//! [`DecodedImage`], which answers what layout and channel order the
//! pixels are in instead of exposing platform pixel-format constants.

use crate::{ChannelMatrix, PixelFormat, RawImageData, ValidationError};

/// A decoded, uncompressed image offered by an external decoder.
///
/// Implemented by decoder output types. Pixels are tightly packed rows
/// of `pixel_format().bytes_per_pixel()` bytes each.
///
/// ```
/// use mipchain::{ChannelMatrix, DecodedImage, PixelFormat};
///
/// struct Bgra<'a> {
///     width: u32,
///     height: u32,
///     bytes: &'a [u8],
/// }
///
/// impl DecodedImage for Bgra<'_> {
///     fn width(&self) -> u32 { self.width }
///     fn height(&self) -> u32 { self.height }
///     fn pixel_format(&self) -> PixelFormat { PixelFormat::Rgba }
///     fn channel_order(&self) -> ChannelMatrix { ChannelMatrix::BGRA_TO_RGBA }
///     fn pixels(&self) -> &[u8] { self.bytes }
/// }
///
/// let img = Bgra { width: 1, height: 1, bytes: &[3, 2, 1, 4] };
/// let raw = mipchain::canonicalize(&img).unwrap();
/// assert_eq!(raw.data(), &[1, 2, 3, 4]);
/// ```
pub trait DecodedImage {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Channel layout of [`pixels`](Self::pixels).
    fn pixel_format(&self) -> PixelFormat;

    /// Permutation that brings 4-channel pixels into RGBA order.
    ///
    /// Only consulted for [`PixelFormat::Rgba`]. Defaults to identity.
    fn channel_order(&self) -> ChannelMatrix {
        ChannelMatrix::IDENTITY
    }

    /// Packed pixel bytes.
    fn pixels(&self) -> &[u8];
}

impl DecodedImage for RawImageData {
    fn width(&self) -> u32 {
        RawImageData::width(self)
    }

    fn height(&self) -> u32 {
        RawImageData::height(self)
    }

    fn pixel_format(&self) -> PixelFormat {
        self.format()
    }

    fn pixels(&self) -> &[u8] {
        self.data()
    }
}

/// Copy a decoded image into canonical RGBA form.
///
/// Applies the image's channel order and pads narrower layouts to 4 bytes
/// per pixel. The result keeps the decoder's format tag.
pub fn canonicalize<D: DecodedImage + ?Sized>(image: &D) -> Result<RawImageData, ValidationError> {
    let format = image.pixel_format();
    let raw = RawImageData::new(
        format,
        image.width(),
        image.height(),
        image.pixels().to_vec(),
    )?;
    let mut rgba = raw.to_rgba8()?;

    let order = image.channel_order();
    if format == PixelFormat::Rgba && !order.is_identity() && !rgba.data().is_empty() {
        order.apply(rgba.data_mut())?;
    }
    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Argb {
        bytes: Vec<u8>,
    }

    impl DecodedImage for Argb {
        fn width(&self) -> u32 {
            2
        }
        fn height(&self) -> u32 {
            1
        }
        fn pixel_format(&self) -> PixelFormat {
            PixelFormat::Rgba
        }
        fn channel_order(&self) -> ChannelMatrix {
            ChannelMatrix::ARGB_TO_RGBA
        }
        fn pixels(&self) -> &[u8] {
            &self.bytes
        }
    }

    #[test]
    fn channel_order_applied() {
        let img = Argb {
            bytes: vec![255, 1, 2, 3, 128, 4, 5, 6],
        };
        let raw = canonicalize(&img).unwrap();
        assert_eq!(raw.format(), PixelFormat::Rgba);
        assert_eq!(raw.data(), &[1, 2, 3, 255, 4, 5, 6, 128]);
    }

    #[test]
    fn gray_is_padded() {
        let gray = RawImageData::new(PixelFormat::GrayScale, 2, 1, vec![10, 20]).unwrap();
        let raw = canonicalize(&gray).unwrap();
        assert_eq!(raw.format(), PixelFormat::GrayScale);
        assert_eq!(raw.data(), &[10, 10, 10, 255, 20, 20, 20, 255]);
    }

    #[test]
    fn decoder_length_mismatch_rejected() {
        let img = Argb {
            bytes: vec![0; 7],
        };
        assert_eq!(
            canonicalize(&img).unwrap_err(),
            ValidationError::DataLength {
                expected: 8,
                actual: 7
            }
        );
    }
}
