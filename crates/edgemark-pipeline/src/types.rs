//! Shared types for the edgemark edge detection pipeline.

use serde::{Deserialize, Serialize};

use crate::suppress::SuppressorKind;

/// Re-export `GrayImage` so downstream crates can reference the
/// grayscale grid type without depending on `image` directly.
pub use image::GrayImage;

/// Image dimensions in pixels.
///
/// Every grid in a single pipeline run shares one `Dimensions`; no
/// stage resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Configuration for a Canny edge detection run.
///
/// Thresholds are ratios of the post-suppression maximum gradient
/// magnitude, in `[0, 1]`. [`validate`](Self::validate) rejects
/// degenerate values before they reach the numeric stages, which do no
/// checking of their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CannyConfig {
    /// Side length of the Gaussian blur kernel. Odd sizes give a
    /// symmetric window; even sizes are accepted and shift the window
    /// by one cell.
    pub filter_size: usize,

    /// Gaussian standard deviation. Higher values smooth more before
    /// gradient estimation.
    pub sigma: f64,

    /// Hysteresis low threshold: pixels with magnitude ratio below this
    /// are never edges.
    pub low_threshold: f64,

    /// Hysteresis high threshold: pixels with magnitude ratio at or
    /// above this are strong edges.
    pub high_threshold: f64,

    /// Which non-maximal suppression strategy to use.
    pub suppressor: SuppressorKind,
}

impl CannyConfig {
    /// Default blur kernel side length.
    pub const DEFAULT_FILTER_SIZE: usize = 5;
    /// Default Gaussian standard deviation.
    pub const DEFAULT_SIGMA: f64 = 1.4;
    /// Default low threshold ratio.
    pub const DEFAULT_LOW_THRESHOLD: f64 = 0.1;
    /// Default high threshold ratio.
    pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.3;

    /// Check the configuration for degenerate values.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] when `filter_size` is 0,
    /// `sigma` is not a positive finite number, either threshold falls
    /// outside `[0, 1]`, or `low_threshold > high_threshold`.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.filter_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "filter_size must be positive".to_string(),
            ));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "sigma must be a positive finite number, got {}",
                self.sigma,
            )));
        }
        for (name, value) in [
            ("low_threshold", self.low_threshold),
            ("high_threshold", self.high_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PipelineError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {value}",
                )));
            }
        }
        if self.low_threshold > self.high_threshold {
            return Err(PipelineError::InvalidConfig(format!(
                "low_threshold ({}) must not exceed high_threshold ({})",
                self.low_threshold, self.high_threshold,
            )));
        }
        Ok(())
    }
}

impl Default for CannyConfig {
    fn default() -> Self {
        Self {
            filter_size: Self::DEFAULT_FILTER_SIZE,
            sigma: Self::DEFAULT_SIGMA,
            low_threshold: Self::DEFAULT_LOW_THRESHOLD,
            high_threshold: Self::DEFAULT_HIGH_THRESHOLD,
            suppressor: SuppressorKind::default(),
        }
    }
}

/// Result of running the pipeline with every intermediate retained.
///
/// Each field captures the output of one stage, enabling diagnostic
/// rendering of the whole chain. Callers that only need the final
/// labels should prefer [`process`](crate::process), which discards the
/// intermediates.
#[derive(Debug, Clone)]
pub struct StagedResult {
    /// Stage 1: Gaussian-blurred grayscale grid.
    pub blurred: GrayImage,
    /// Stage 2: raw Sobel gradient field.
    pub gradients: crate::gradient::GradientField,
    /// Stage 3: non-maximally-suppressed gradient field.
    pub suppressed: crate::gradient::GradientField,
    /// Stage 4: per-pixel edge labels.
    pub edges: crate::hysteresis::EdgeMap,
    /// Source grid dimensions, shared by every stage.
    pub dimensions: Dimensions,
    /// Per-stage timing and metrics.
    pub diagnostics: crate::diagnostics::PipelineDiagnostics,
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// The input grid has zero width or height.
    #[error("input image is empty")]
    EmptyImage,
}
