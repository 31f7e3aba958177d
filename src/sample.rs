//! Footprint samplers for one mip level.
//!
//! A [`Sampler`] is built once per level from the previous level's size
//! and the new size, then asked for each destination pixel. Two footprints
//! exist: [`PowerOfTwoSampler`] for exact, non-overlapping rectangles and
//! [`OverlapSampler`] for fractional footprints on non-power-of-two chains.

use imgref::ImgRef;
use rgb::Rgba;

use crate::{MipError, SampleMethod};

/// Overlap below this fraction of a pixel is treated as no overlap.
///
/// Footprint edges are computed in `f64`, whose error stays far below this
/// cutoff for any `u32` coordinate, so rounding never creates a sample.
const MIN_COVERAGE: f64 = 1.0e-4;

/// Computes one destination pixel from a footprint in the source level.
///
/// Implementations are `Sync` so rows of a level can be filled in parallel.
pub trait Sampler: Sync {
    /// Average the footprint of destination pixel `(x, y)`.
    fn sample(&self, src: ImgRef<'_, Rgba<u8>>, x: u32, y: u32) -> Result<Rgba<u8>, MipError>;
}

/// Equal-weight `sample_w × sample_h` box footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerOfTwoSampler {
    sample_w: u32,
    sample_h: u32,
}

impl PowerOfTwoSampler {
    /// Footprint for shrinking `src_w × src_h` to `dst_w × dst_h`.
    pub fn new(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> Result<Self, MipError> {
        let sample_w = src_w.checked_div(dst_w).unwrap_or(0);
        let sample_h = src_h.checked_div(dst_h).unwrap_or(0);
        if sample_w == 0 || sample_h == 0 {
            return Err(MipError::DegenerateFootprint {
                pixel_w: sample_w as f64,
                pixel_h: sample_h as f64,
            });
        }
        Ok(Self { sample_w, sample_h })
    }

    /// Footprint width in source pixels.
    pub fn sample_w(&self) -> u32 {
        self.sample_w
    }

    /// Footprint height in source pixels.
    pub fn sample_h(&self) -> u32 {
        self.sample_h
    }
}

impl Sampler for PowerOfTwoSampler {
    fn sample(&self, src: ImgRef<'_, Rgba<u8>>, x: u32, y: u32) -> Result<Rgba<u8>, MipError> {
        let footprint = src.sub_image(
            (x * self.sample_w) as usize,
            (y * self.sample_h) as usize,
            self.sample_w as usize,
            self.sample_h as usize,
        );
        let mut sum = [0u32; 4];
        for row in footprint.rows() {
            for px in row {
                sum[0] += px.r as u32;
                sum[1] += px.g as u32;
                sum[2] += px.b as u32;
                sum[3] += px.a as u32;
            }
        }
        let count = self.sample_w * self.sample_h;
        to_pixel(sum.map(|c| c / count), x, y)
    }
}

/// One source column or row contributing to a footprint, with the
/// fraction of it that the footprint covers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedSample {
    /// Source column (for X samples) or row (for Y samples).
    pub index: u32,
    /// Covered fraction in `(0, 1]`.
    pub weight: f64,
}

/// Fractional footprint for non-power-of-two chains.
///
/// Column and row sample lists are computed once per level; the 2D weight
/// of a source pixel is the product of its column and row weights.
#[derive(Clone, Debug)]
pub struct OverlapSampler {
    method: SampleMethod,
    columns: Vec<Vec<WeightedSample>>,
    rows: Vec<Vec<WeightedSample>>,
}

impl OverlapSampler {
    /// Footprints for shrinking `src_w × src_h` to `dst_w × dst_h`.
    ///
    /// # Errors
    ///
    /// [`MipError::DegenerateFootprint`] if a destination pixel would cover
    /// less than one source pixel on either axis.
    pub fn new(
        src_w: u32,
        src_h: u32,
        dst_w: u32,
        dst_h: u32,
        method: SampleMethod,
    ) -> Result<Self, MipError> {
        let pixel_w = src_w as f64 / dst_w as f64;
        let pixel_h = src_h as f64 / dst_h as f64;
        if !(pixel_w >= 1.0 && pixel_h >= 1.0) {
            return Err(MipError::DegenerateFootprint { pixel_w, pixel_h });
        }
        Ok(Self {
            method,
            columns: (0..dst_w).map(|x| footprint(x, pixel_w, src_w)).collect(),
            rows: (0..dst_h).map(|y| footprint(y, pixel_h, src_h)).collect(),
        })
    }

    /// Source columns covered by destination column `x`.
    pub fn columns(&self, x: u32) -> &[WeightedSample] {
        &self.columns[x as usize]
    }

    /// Source rows covered by destination row `y`.
    pub fn rows(&self, y: u32) -> &[WeightedSample] {
        &self.rows[y as usize]
    }
}

impl Sampler for OverlapSampler {
    fn sample(&self, src: ImgRef<'_, Rgba<u8>>, x: u32, y: u32) -> Result<Rgba<u8>, MipError> {
        let (buf, stride) = (src.buf(), src.stride());
        let columns = self.columns(x);
        let rows = self.rows(y);

        let value = match self.method {
            SampleMethod::Average => {
                let mut sum = [0u32; 4];
                for sy in rows {
                    let row = &buf[sy.index as usize * stride..];
                    for sx in columns {
                        let px = row[sx.index as usize];
                        sum[0] += px.r as u32;
                        sum[1] += px.g as u32;
                        sum[2] += px.b as u32;
                        sum[3] += px.a as u32;
                    }
                }
                let count = (rows.len() * columns.len()) as u32;
                sum.map(|c| c.checked_div(count).unwrap_or(0))
            }
            SampleMethod::WeightedAverage => {
                let mut sum = [0f64; 4];
                let mut total = 0f64;
                for sy in rows {
                    let row = &buf[sy.index as usize * stride..];
                    for sx in columns {
                        let px = row[sx.index as usize];
                        let w = sx.weight * sy.weight;
                        sum[0] += px.r as f64 * w;
                        sum[1] += px.g as f64 * w;
                        sum[2] += px.b as f64 * w;
                        sum[3] += px.a as f64 * w;
                        total += w;
                    }
                }
                if total > 0.0 {
                    sum.map(|c| (c / total).round() as u32)
                } else {
                    [0; 4]
                }
            }
        };
        to_pixel(value, x, y)
    }
}

/// Source indices overlapping `[pixel * i, pixel * (i + 1))`, clamped to
/// `0..src_len`.
fn footprint(i: u32, pixel: f64, src_len: u32) -> Vec<WeightedSample> {
    let start = pixel * i as f64;
    let end = start + pixel;
    let first = start.floor() as u32;
    let last = (end.ceil() as u32).min(src_len);
    (first..last)
        .filter_map(|index| {
            let lo = start.max(index as f64);
            let hi = end.min(index as f64 + 1.0);
            let weight = hi - lo;
            (weight > MIN_COVERAGE).then_some(WeightedSample { index, weight })
        })
        .collect()
}

fn to_pixel(value: [u32; 4], x: u32, y: u32) -> Result<Rgba<u8>, MipError> {
    if let Some(&over) = value.iter().find(|&&c| c > u8::MAX as u32) {
        return Err(MipError::SampleOverflow { x, y, value: over });
    }
    Ok(Rgba::new(
        value[0] as u8,
        value[1] as u8,
        value[2] as u8,
        value[3] as u8,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgref::ImgVec;

    fn gradient(w: usize, h: usize) -> ImgVec<Rgba<u8>> {
        let pixels = (0..w * h)
            .map(|i| {
                let (x, y) = ((i % w) as u8, (i / w) as u8);
                Rgba::new(x * 10, y * 10, x + y, 255)
            })
            .collect();
        ImgVec::new(pixels, w, h)
    }

    #[test]
    fn power_of_two_footprint_size() {
        let s = PowerOfTwoSampler::new(8, 4, 4, 2).unwrap();
        assert_eq!((s.sample_w(), s.sample_h()), (2, 2));
        let s = PowerOfTwoSampler::new(8, 8, 1, 2).unwrap();
        assert_eq!((s.sample_w(), s.sample_h()), (8, 4));
    }

    #[test]
    fn power_of_two_rejects_upscale() {
        let err = PowerOfTwoSampler::new(2, 2, 4, 1).unwrap_err();
        assert!(matches!(err, MipError::DegenerateFootprint { .. }));
        let err = PowerOfTwoSampler::new(2, 2, 0, 1).unwrap_err();
        assert!(matches!(err, MipError::DegenerateFootprint { .. }));
    }

    #[test]
    fn power_of_two_averages_exact_block() {
        let img = gradient(4, 4);
        let s = PowerOfTwoSampler::new(4, 4, 2, 2).unwrap();
        // Block (1, 1) covers x = 2..4, y = 2..4.
        // r: (20 + 30 + 20 + 30) / 4 = 25, g: (20 + 20 + 30 + 30) / 4 = 25,
        // b: (4 + 5 + 5 + 6) / 4 = 5
        let px = s.sample(img.as_ref(), 1, 1).unwrap();
        assert_eq!(px, Rgba::new(25, 25, 5, 255));
    }

    #[test]
    fn power_of_two_truncates() {
        let img = ImgVec::new(
            vec![Rgba::new(0, 0, 0, 0), Rgba::new(1, 3, 255, 254)],
            2,
            1,
        );
        let s = PowerOfTwoSampler::new(2, 1, 1, 1).unwrap();
        assert_eq!(s.sample(img.as_ref(), 0, 0).unwrap(), Rgba::new(0, 1, 127, 127));
    }

    #[test]
    fn footprint_weights_for_fractional_pixels() {
        // 5 → 2: pixel width 2.5
        let left = footprint(0, 2.5, 5);
        assert_eq!(
            left,
            vec![
                WeightedSample { index: 0, weight: 1.0 },
                WeightedSample { index: 1, weight: 1.0 },
                WeightedSample { index: 2, weight: 0.5 },
            ]
        );
        let right = footprint(1, 2.5, 5);
        assert_eq!(
            right,
            vec![
                WeightedSample { index: 2, weight: 0.5 },
                WeightedSample { index: 3, weight: 1.0 },
                WeightedSample { index: 4, weight: 1.0 },
            ]
        );
    }

    #[test]
    fn footprint_covers_source_exactly_once() {
        for (src, dst) in [(7u32, 3u32), (9, 4), (13, 6), (100, 33)] {
            let pixel = src as f64 / dst as f64;
            let total: f64 = (0..dst)
                .flat_map(|i| footprint(i, pixel, src))
                .map(|s| s.weight)
                .sum();
            assert!((total - src as f64).abs() < 1.0e-3, "{src} -> {dst}: {total}");
        }
    }

    #[test]
    fn wide_footprints_have_no_rounding_slivers() {
        // Edges near a million source columns, where f32 steps are 1/16 px.
        let (src, dst) = (1_000_001u32, 500_000u32);
        let pixel = src as f64 / dst as f64;
        let mut total = 0f64;
        for i in 0..dst {
            let samples = footprint(i, pixel, src);
            assert!((2..=3).contains(&samples.len()), "footprint {i}: {samples:?}");
            total += samples.iter().map(|s| s.weight).sum::<f64>();
        }
        // Only sub-cutoff slivers near the ends of the row are dropped.
        assert!((total - src as f64).abs() < 0.05, "{total}");

        let last = footprint(dst - 1, pixel, src);
        assert_eq!(last.last().map(|s| s.index), Some(src - 1));
        assert!(last.last().is_some_and(|s| (s.weight - 1.0).abs() < 1.0e-6));
    }

    #[test]
    fn overlap_rejects_degenerate_footprint() {
        let err = OverlapSampler::new(3, 3, 4, 1, SampleMethod::Average).unwrap_err();
        assert!(matches!(
            err,
            MipError::DegenerateFootprint { pixel_w, .. } if pixel_w < 1.0
        ));
    }

    #[test]
    fn overlap_average_ignores_weights() {
        // 3 → 1 in x: columns 0, 1, 2 all fully covered.
        // 5 → 2 in x: column 2 is half covered by each destination pixel.
        let img = ImgVec::new(
            vec![
                Rgba::new(0, 0, 0, 0),
                Rgba::new(0, 0, 0, 0),
                Rgba::new(90, 90, 90, 90),
                Rgba::new(0, 0, 0, 0),
                Rgba::new(0, 0, 0, 0),
            ],
            5,
            1,
        );
        let avg = OverlapSampler::new(5, 1, 2, 1, SampleMethod::Average).unwrap();
        // plain mean over 3 samples: 90 / 3
        assert_eq!(avg.sample(img.as_ref(), 0, 0).unwrap(), Rgba::new(30, 30, 30, 30));

        let weighted = OverlapSampler::new(5, 1, 2, 1, SampleMethod::WeightedAverage).unwrap();
        // 90 * 0.5 / 2.5
        assert_eq!(
            weighted.sample(img.as_ref(), 0, 0).unwrap(),
            Rgba::new(18, 18, 18, 18)
        );
    }

    #[test]
    fn overlap_uniform_input_is_stable() {
        let img = ImgVec::new(vec![Rgba::new(10, 20, 30, 40); 7 * 5], 7, 5);
        for method in [SampleMethod::Average, SampleMethod::WeightedAverage] {
            let s = OverlapSampler::new(7, 5, 3, 2, method).unwrap();
            for y in 0..2 {
                for x in 0..3 {
                    assert_eq!(
                        s.sample(img.as_ref(), x, y).unwrap(),
                        Rgba::new(10, 20, 30, 40)
                    );
                }
            }
        }
    }

    #[test]
    fn overlap_three_to_one_is_full_mean() {
        let img = gradient(3, 3);
        let s = OverlapSampler::new(3, 3, 1, 1, SampleMethod::Average).unwrap();
        assert_eq!(s.columns(0).len(), 3);
        assert_eq!(s.rows(0).len(), 3);
        // r: mean of 0, 10, 20 = 10; g likewise; b: mean of x + y = 2
        assert_eq!(s.sample(img.as_ref(), 0, 0).unwrap(), Rgba::new(10, 10, 2, 255));
    }

    #[test]
    fn overflow_is_reported() {
        let err = to_pixel([0, 256, 0, 0], 3, 4).unwrap_err();
        assert!(matches!(
            err,
            MipError::SampleOverflow {
                x: 3,
                y: 4,
                value: 256
            }
        ));
    }
}
