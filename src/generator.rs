//! Mip chain generation.
//!
//! Each level is computed from the level before it. All pixels of one
//! level are independent, so rows are filled in parallel when the
//! `parallel` feature is on; a level is complete before the next begins.

use enough::{Stop, Unstoppable};
use imgref::ImgRef;
use rgb::{ComponentBytes, Rgba};

use crate::image::RGBA_BPP;
use crate::sample::{OverlapSampler, PowerOfTwoSampler, Sampler};
use crate::{MipConfig, MipError, MipLevel, RawImageData};

/// Footprint strategy, chosen once per chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Path {
    PowerOfTwo,
    Overlap,
}

/// Produces the full box-filtered mip chain of an RGBA image.
///
/// # Example
///
/// ```
/// use mipchain::{MipGenerator, RawImageData};
///
/// let source = RawImageData::solid(8, 8, [10, 20, 30, 40]).unwrap();
/// let levels = MipGenerator::default().generate(&source).unwrap();
/// let sizes: Vec<_> = levels.iter().map(|l| (l.width, l.height)).collect();
/// assert_eq!(sizes, [(4, 4), (2, 2), (1, 1)]);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MipGenerator {
    config: MipConfig,
}

impl MipGenerator {
    /// Create a generator with the given settings.
    pub fn new(config: MipConfig) -> Self {
        Self { config }
    }

    /// The generator's settings.
    pub fn config(&self) -> &MipConfig {
        &self.config
    }

    /// Generate every level below `source`, largest first.
    ///
    /// The source must hold `width * height * 4` bytes; its format tag is
    /// not consulted. Halving stops once either dimension reaches 1, so the
    /// last level has `min(width, height) == 1`. A source that already has
    /// a dimension of 1 (but is not 1×1) yields an empty chain.
    ///
    /// # Errors
    ///
    /// - [`MipError::SourceTooSmall`] for empty or 1×1 sources.
    /// - [`MipError::Validation`] if the byte count is wrong.
    /// - [`MipError::Limit`] if the configured limits reject the chain.
    /// - [`MipError::SampleOverflow`] / [`MipError::DegenerateFootprint`]
    ///   from sampling. Any failure discards all levels.
    pub fn generate(&self, source: &RawImageData) -> Result<Vec<MipLevel>, MipError> {
        self.generate_with_stop(source, &Unstoppable)
    }

    /// Like [`generate`](Self::generate), checking `stop` before each level.
    pub fn generate_with_stop(
        &self,
        source: &RawImageData,
        stop: &dyn Stop,
    ) -> Result<Vec<MipLevel>, MipError> {
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 || (width == 1 && height == 1) {
            return Err(MipError::SourceTooSmall { width, height });
        }
        let pixels = source.as_rgba()?;
        self.config.limits().check_chain(width, height)?;

        let path = if source.is_power_of_two() {
            Path::PowerOfTwo
        } else {
            Path::Overlap
        };
        log::debug!(
            "generating mips for {width}x{height} source via {path:?} path ({:?})",
            self.config.sample_method()
        );

        let mut levels: Vec<MipLevel> = Vec::new();
        let (mut w, mut h) = (width, height);
        while w > 1 && h > 1 {
            stop.check().map_err(MipError::Stopped)?;

            let (src_w, src_h) = (w, h);
            w /= 2;
            h /= 2;

            let src = match levels.last() {
                Some(prev) => prev.pixels(),
                None => pixels,
            };
            let data = match path {
                Path::PowerOfTwo => {
                    let sampler = PowerOfTwoSampler::new(src_w, src_h, w, h)?;
                    fill_level(&sampler, src, w, h)?
                }
                Path::Overlap => {
                    let sampler =
                        OverlapSampler::new(src_w, src_h, w, h, self.config.sample_method())?;
                    fill_level(&sampler, src, w, h)?
                }
            };

            let index = levels.len() as u32;
            log::trace!("mip level {index}: {w}x{h}");
            levels.push(MipLevel {
                index,
                width: w,
                height: h,
                data,
            });
        }

        log::debug!("generated {} mip levels", levels.len());
        Ok(levels)
    }
}

/// Sample every pixel of a `w × h` level into a fresh RGBA buffer.
fn fill_level<S: Sampler>(
    sampler: &S,
    src: ImgRef<'_, Rgba<u8>>,
    w: u32,
    h: u32,
) -> Result<Vec<u8>, MipError> {
    let row_px = w as usize;
    let mut out = vec![Rgba::new(0u8, 0, 0, 0); row_px * h as usize];

    let fill_row = |(y, row): (usize, &mut [Rgba<u8>])| -> Result<(), MipError> {
        for (x, px) in row.iter_mut().enumerate() {
            *px = sampler.sample(src, x as u32, y as u32)?;
        }
        Ok(())
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.par_chunks_mut(row_px).enumerate().try_for_each(fill_row)?;
    }
    #[cfg(not(feature = "parallel"))]
    {
        out.chunks_mut(row_px).enumerate().try_for_each(fill_row)?;
    }

    let bytes = out.as_bytes().to_vec();
    debug_assert_eq!(bytes.len(), row_px * h as usize * RGBA_BPP);
    Ok(bytes)
}
