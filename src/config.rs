//! Generation settings.

use crate::ResourceLimits;

/// How destination pixels are averaged from their source footprint.
///
/// Power-of-two chains use equal-weight footprints, where both methods give
/// identical results. They differ only on the overlap path used for
/// non-power-of-two sources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SampleMethod {
    /// Box filter that divides the plain channel sum by the number of
    /// contributing source pixels. Partial-coverage weights are computed
    /// but not applied, which matches textures baked by earlier tooling.
    #[default]
    Average,
    /// Coverage-weighted box filter: `Σ(value · weight) / Σ weight`,
    /// rounded to nearest.
    WeightedAverage,
}

/// Settings for [`MipGenerator`](crate::MipGenerator) and
/// [`MipBuilder`](crate::MipBuilder).
///
/// ```
/// use mipchain::{MipConfig, ResourceLimits, SampleMethod};
///
/// let config = MipConfig::new()
///     .with_sample_method(SampleMethod::WeightedAverage)
///     .with_limits(ResourceLimits::none().with_max_width(8192));
/// assert_eq!(config.sample_method(), SampleMethod::WeightedAverage);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct MipConfig {
    sample_method: SampleMethod,
    limits: ResourceLimits,
}

impl MipConfig {
    /// Default settings: [`SampleMethod::Average`], no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the averaging method.
    pub fn with_sample_method(mut self, method: SampleMethod) -> Self {
        self.sample_method = method;
        self
    }

    /// Apply resource limits.
    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The averaging method.
    pub fn sample_method(&self) -> SampleMethod {
        self.sample_method
    }

    /// The resource limits.
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }
}
