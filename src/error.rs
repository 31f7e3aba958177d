//! Error types shared across the crate.
//!
//! Every fallible operation returns one of these as a value. A failed
//! generation or build never yields a partial mip chain.

use enough::StopReason;
use thiserror::Error;

use crate::PixelFormat;
use crate::limits::LimitExceeded;

/// Malformed input: undersized buffers, bad permutation matrices,
/// dimension mismatches.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The pixel buffer is empty.
    #[error("pixel buffer is empty")]
    EmptyBuffer,
    /// The buffer length is not a multiple of the 4-byte pixel group.
    #[error("buffer length {len} is not a multiple of 4")]
    NotPixelAligned {
        /// Actual buffer length.
        len: usize,
    },
    /// A channel matrix must have exactly four entries.
    #[error("channel matrix has {len} entries, expected 4")]
    MatrixLength {
        /// Actual entry count.
        len: usize,
    },
    /// A channel matrix must use each of `0..4` exactly once.
    #[error("channel matrix {matrix:?} is not a permutation of 0..4")]
    NotAPermutation {
        /// The rejected matrix.
        matrix: [u8; 4],
    },
    /// Buffer length does not match `width * height * bytes_per_pixel`.
    #[error("pixel data is {actual} bytes, expected {expected}")]
    DataLength {
        /// Required byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },
    /// `width * height * bytes_per_pixel` does not fit in `usize`.
    #[error("image dimensions overflow")]
    DimensionOverflow,
    /// The format has no defined expansion to RGBA.
    #[error("pixel format {0} cannot be converted to rgba")]
    UnpaddableFormat(PixelFormat),
    /// Stored pixels are neither in the format's own layout nor padded to RGBA.
    #[error("{bytes_per_pixel} bytes per pixel is not a stored layout of {format}")]
    StoredLayout {
        /// The format tag.
        format: PixelFormat,
        /// The declared stored width of one pixel.
        bytes_per_pixel: usize,
    },
}

/// Failures from [`MipGenerator`](crate::MipGenerator).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MipError {
    /// The source image is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The source is already at or below 1×1.
    #[error("source image {width}x{height} is too small to generate mips")]
    SourceTooSmall {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },
    /// A channel average did not fit in a byte.
    #[error("channel value {value} at ({x}, {y}) exceeds 255")]
    SampleOverflow {
        /// Destination column.
        x: u32,
        /// Destination row.
        y: u32,
        /// The out-of-range average.
        value: u32,
    },
    /// The sample footprint is narrower than one source pixel.
    #[error("degenerate sample footprint {pixel_w}x{pixel_h}")]
    DegenerateFootprint {
        /// Footprint width in source pixels.
        pixel_w: f64,
        /// Footprint height in source pixels.
        pixel_h: f64,
    },
    /// A configured resource limit was exceeded.
    #[error(transparent)]
    Limit(#[from] LimitExceeded),
    /// The caller's stop token requested cancellation.
    #[error("mip generation stopped: {0:?}")]
    Stopped(StopReason),
}

/// Failures from [`MipBuilder`](crate::MipBuilder).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// The source is empty or already 1×1.
    #[error("source image {width}x{height} is too small to build mips")]
    SourceTooSmall {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },
    /// The source could not be brought into RGBA form.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The generator failed; no levels were produced.
    #[error("mip generation failed")]
    GenerationFailed(#[from] MipError),
}

/// Coarse outcome of a build, for callers that report a status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuildStatus {
    /// Levels were produced.
    Success,
    /// The source is empty or already 1×1.
    SourceTooSmall,
    /// Anything else.
    Failed,
}

impl BuildError {
    /// Collapse this error into a [`BuildStatus`].
    pub fn status(&self) -> BuildStatus {
        match self {
            Self::SourceTooSmall { .. } => BuildStatus::SourceTooSmall,
            Self::Validation(_) | Self::GenerationFailed(_) => BuildStatus::Failed,
        }
    }
}

impl<T> From<&Result<T, BuildError>> for BuildStatus {
    fn from(result: &Result<T, BuildError>) -> Self {
        match result {
            Ok(_) => BuildStatus::Success,
            Err(e) => e.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = ValidationError::DataLength {
            expected: 64,
            actual: 60,
        };
        assert_eq!(err.to_string(), "pixel data is 60 bytes, expected 64");

        let err = ValidationError::NotAPermutation {
            matrix: [0, 0, 1, 2],
        };
        assert_eq!(
            err.to_string(),
            "channel matrix [0, 0, 1, 2] is not a permutation of 0..4"
        );
    }

    #[test]
    fn mip_error_is_transparent_over_validation() {
        let err = MipError::from(ValidationError::EmptyBuffer);
        assert_eq!(err.to_string(), "pixel buffer is empty");
    }

    #[test]
    fn build_error_status() {
        let err = BuildError::SourceTooSmall {
            width: 1,
            height: 1,
        };
        assert_eq!(err.status(), BuildStatus::SourceTooSmall);

        let err = BuildError::from(MipError::SampleOverflow {
            x: 0,
            y: 0,
            value: 300,
        });
        assert_eq!(err.status(), BuildStatus::Failed);

        let ok: Result<(), BuildError> = Ok(());
        assert_eq!(BuildStatus::from(&ok), BuildStatus::Success);
    }

    #[test]
    fn errors_are_std_errors() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&ValidationError::EmptyBuffer);
        assert_error(&MipError::SourceTooSmall {
            width: 1,
            height: 1,
        });
        assert_error(&BuildError::SourceTooSmall {
            width: 0,
            height: 0,
        });
    }

    #[test]
    fn generation_failed_keeps_source() {
        use std::error::Error as _;
        let err = BuildError::from(MipError::SourceTooSmall {
            width: 1,
            height: 1,
        });
        assert!(err.source().is_some());
    }
}
