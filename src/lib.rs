//! Box-filter mipmap chains for decoded textures.
//!
//! This crate is the numeric core of an offline texture pipeline:
//!
//! - [`RawImageData`] / [`PixelFormat`]: decoded pixels tagged with their layout
//! - [`swap_channels`] / [`ChannelMatrix`]: in-place channel reordering (BGRA → RGBA, …)
//! - [`MipGenerator`]: successive half-resolution levels by box filtering,
//!   with an exact power-of-two path and a fractional-overlap path
//! - [`MipBuilder`]: validation and orchestration, re-tagging levels with
//!   the source format
//! - [`DecodedImage`]: the boundary trait decoders implement
//! - [`codec`] / [`persist`]: fixed-width byte codec and a mip chain container
//!
//! Decoding and encoding image containers happens elsewhere; this crate
//! only sees already-decoded pixel buffers.
//!
//! ```
//! use mipchain::{MipBuilder, RawImageData};
//!
//! let source = RawImageData::solid(16, 16, [200, 100, 50, 255]).unwrap();
//! let levels = MipBuilder::default().build(&source).unwrap();
//! assert_eq!(levels.len(), 4);
//! assert_eq!((levels[3].width(), levels[3].height()), (1, 1));
//! ```

#![forbid(unsafe_code)]

mod builder;
pub mod codec;
mod config;
mod error;
mod format;
mod generator;
mod image;
mod limits;
pub mod persist;
pub mod sample;
mod source;
mod swizzle;

pub use builder::MipBuilder;
pub use config::{MipConfig, SampleMethod};
pub use error::{BuildError, BuildStatus, MipError, ValidationError};
pub use format::PixelFormat;
pub use generator::MipGenerator;
pub use image::{MipLevel, RawImageData};
pub use limits::{LimitExceeded, ResourceLimits};
pub use source::{DecodedImage, canonicalize};
pub use swizzle::{ChannelMatrix, swap_channels};

// Re-exports for callers passing stop tokens and reading pixels.
pub use enough::{Stop, StopReason, Unstoppable};
pub use imgref::{ImgRef, ImgVec};
pub use rgb::Rgba;
