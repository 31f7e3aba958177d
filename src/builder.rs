//! Mip chain orchestration.
//!
//! [`MipBuilder`] validates a source image, runs the generator and hands
//! back levels carrying the source's pixel format.

use crate::source::{DecodedImage, canonicalize};
use crate::{BuildError, MipConfig, MipGenerator, RawImageData};

/// Builds tagged mip chains from decoded images.
///
/// ```
/// use mipchain::{MipBuilder, PixelFormat, RawImageData};
///
/// let source = RawImageData::solid(4, 4, [10, 20, 30, 40]).unwrap();
/// let levels = MipBuilder::default().build(&source).unwrap();
/// assert_eq!(levels.len(), 2);
/// assert!(levels.iter().all(|l| l.format() == PixelFormat::Rgba));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MipBuilder {
    generator: MipGenerator,
}

impl MipBuilder {
    /// Create a builder with the given settings.
    pub fn new(config: MipConfig) -> Self {
        Self {
            generator: MipGenerator::new(config),
        }
    }

    /// Build all levels below `source`, largest first.
    ///
    /// `source` must already be 4 bytes per pixel (see
    /// [`RawImageData::to_rgba8`]); every returned level carries
    /// `source.format()`.
    ///
    /// # Errors
    ///
    /// [`BuildError::SourceTooSmall`] for empty and 1×1 sources,
    /// [`BuildError::GenerationFailed`] for anything the generator rejects.
    pub fn build(&self, source: &RawImageData) -> Result<Vec<RawImageData>, BuildError> {
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 || (width == 1 && height == 1) {
            return Err(BuildError::SourceTooSmall { width, height });
        }

        let levels = match self.generator.generate(source) {
            Ok(levels) => levels,
            Err(e) => {
                log::warn!("mip build for {source:?} failed: {e}");
                return Err(BuildError::GenerationFailed(e));
            }
        };

        let format = source.format();
        log::debug!(
            "built {} {format} mip levels from {width}x{height}",
            levels.len()
        );
        Ok(levels
            .into_iter()
            .map(|level| level.into_raw(format))
            .collect())
    }

    /// Canonicalize a decoder's output to RGBA, then [`build`](Self::build).
    pub fn build_decoded<D: DecodedImage + ?Sized>(
        &self,
        image: &D,
    ) -> Result<Vec<RawImageData>, BuildError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 || (width == 1 && height == 1) {
            return Err(BuildError::SourceTooSmall { width, height });
        }
        let source = canonicalize(image)?;
        self.build(&source)
    }
}
