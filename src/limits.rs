//! Resource limits for mip generation.
//!
//! [`ResourceLimits`] caps the size of a source image and of the chain
//! generated from it. [`LimitExceeded`] is returned when a check fails.
//! All checks run before any pixel is sampled.

/// Resource limits for a generate or build call.
///
/// All fields are optional; `None` means no limit for that resource.
///
/// # Example
///
/// ```
/// use mipchain::ResourceLimits;
///
/// let limits = ResourceLimits::none()
///     .with_max_pixels(64 * 1024 * 1024)
///     .with_max_memory(512 * 1024 * 1024);
/// assert!(limits.has_any());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct ResourceLimits {
    /// Maximum source pixels (width × height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes allocated for all generated levels together.
    pub max_memory_bytes: Option<u64>,
    /// Maximum source width in pixels.
    pub max_width: Option<u32>,
    /// Maximum source height in pixels.
    pub max_height: Option<u32>,
    /// Maximum number of generated levels.
    pub max_levels: Option<u32>,
}

impl ResourceLimits {
    /// No limits (all fields `None`).
    pub fn none() -> Self {
        Self::default()
    }

    /// Set maximum source pixels.
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Set maximum chain memory in bytes.
    pub fn with_max_memory(mut self, bytes: u64) -> Self {
        self.max_memory_bytes = Some(bytes);
        self
    }

    /// Set maximum source width in pixels.
    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Set maximum source height in pixels.
    pub fn with_max_height(mut self, height: u32) -> Self {
        self.max_height = Some(height);
        self
    }

    /// Set maximum number of generated levels.
    pub fn with_max_levels(mut self, levels: u32) -> Self {
        self.max_levels = Some(levels);
        self
    }

    /// Whether any limits are set.
    pub fn has_any(&self) -> bool {
        self.max_pixels.is_some()
            || self.max_memory_bytes.is_some()
            || self.max_width.is_some()
            || self.max_height.is_some()
            || self.max_levels.is_some()
    }

    // --- Validation methods ---

    /// Check source dimensions against `max_width`, `max_height`, and `max_pixels`.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_width
            && width > max
        {
            return Err(LimitExceeded::Width { actual: width, max });
        }
        if let Some(max) = self.max_height
            && height > max
        {
            return Err(LimitExceeded::Height {
                actual: height,
                max,
            });
        }
        if let Some(max) = self.max_pixels {
            let pixels = width as u64 * height as u64;
            if pixels > max {
                return Err(LimitExceeded::Pixels {
                    actual: pixels,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Check a chain memory estimate against `max_memory_bytes`.
    pub fn check_memory(&self, bytes: u64) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_memory_bytes
            && bytes > max
        {
            return Err(LimitExceeded::Memory { actual: bytes, max });
        }
        Ok(())
    }

    /// Check a level count against `max_levels`.
    pub fn check_levels(&self, count: u32) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_levels
            && count > max
        {
            return Err(LimitExceeded::Levels { actual: count, max });
        }
        Ok(())
    }

    /// Check everything that is known before sampling starts: source
    /// dimensions, the number of levels the chain will have, and the bytes
    /// those levels will occupy.
    pub fn check_chain(&self, width: u32, height: u32) -> Result<(), LimitExceeded> {
        self.check_dimensions(width, height)?;
        let plan = ChainPlan::new(width, height);
        self.check_levels(plan.levels)?;
        self.check_memory(plan.bytes)
    }
}

/// Level count and RGBA byte total of the chain a source would produce.
///
/// The byte total saturates at `u64::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ChainPlan {
    pub levels: u32,
    pub bytes: u64,
}

impl ChainPlan {
    /// Walk the halving loop without touching pixels.
    pub fn new(width: u32, height: u32) -> Self {
        let (mut w, mut h) = (width, height);
        let mut levels = 0u32;
        let mut bytes = 0u64;
        while w > 1 && h > 1 {
            w /= 2;
            h /= 2;
            levels += 1;
            let level = (w as u64 * h as u64).saturating_mul(4);
            bytes = bytes.saturating_add(level);
        }
        Self { levels, bytes }
    }
}

/// A resource limit was exceeded.
///
/// Each variant carries the actual value and the limit that was exceeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LimitExceeded {
    /// Source width exceeded `max_width`.
    Width {
        /// Actual width.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Source height exceeded `max_height`.
    Height {
        /// Actual height.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Source pixel count exceeded `max_pixels`.
    Pixels {
        /// Actual pixel count.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
    /// Chain memory exceeded `max_memory_bytes`.
    Memory {
        /// Estimated memory in bytes.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
    /// Level count exceeded `max_levels`.
    Levels {
        /// Levels the chain would have.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
}

impl core::fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Width { actual, max } => write!(f, "width {actual} exceeds limit {max}"),
            Self::Height { actual, max } => write!(f, "height {actual} exceeds limit {max}"),
            Self::Pixels { actual, max } => {
                write!(f, "pixel count {actual} exceeds limit {max}")
            }
            Self::Memory { actual, max } => {
                write!(f, "chain memory {actual} bytes exceeds limit {max}")
            }
            Self::Levels { actual, max } => {
                write!(f, "level count {actual} exceeds limit {max}")
            }
        }
    }
}

impl core::error::Error for LimitExceeded {}
