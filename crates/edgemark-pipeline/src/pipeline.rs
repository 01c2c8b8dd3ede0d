//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! Unlike [`crate::process`] and [`crate::process_staged`] which run
//! every stage in one call, [`Pipeline`] lets the caller drive
//! execution one step at a time:
//!
//! ```rust
//! # use edgemark_pipeline::{Pipeline, CannyConfig, PipelineError};
//! # fn run(gray: image::GrayImage) -> Result<(), PipelineError> {
//! let config = CannyConfig::default();
//! let classified = Pipeline::new(gray, config)
//!     .blur()?
//!     .gradients()
//!     .suppress()
//!     .classify();
//!
//! let staged = classified.into_result();
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next pipeline
//! state, carrying all previously computed intermediates. The caller
//! can inspect the current stage's output via accessor methods at any
//! point.
//!
//! Every stage retains the full grids computed so far; for a 1000x1000
//! source this pins a few dozen megabytes until
//! [`Classified::into_result`] consumes the final stage. This is
//! intentional: [`StagedResult`] needs every intermediate for
//! diagnostic rendering. Callers that only want the final labels should
//! prefer [`crate::process`].

use std::time::Instant;

use crate::diagnostics::{PipelineDiagnostics, PipelineSummary, StageDiagnostics, StageMetrics};
use crate::filter;
use crate::gradient::{self, GradientField};
use crate::hysteresis::{self, EdgeLabel, EdgeMap};
use crate::kernel::Kernel;
use crate::types::{CannyConfig, Dimensions, GrayImage, PipelineError, StagedResult};

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
///
/// The source grid and config are stored but not yet touched. Call
/// [`blur`](Self::blur) to advance to the next stage.
#[must_use = "pipeline stages are consumed by advancing — call .blur() to continue"]
pub struct Pending {
    config: CannyConfig,
    gray: GrayImage,
}

impl Pending {
    /// The source grayscale grid.
    #[must_use]
    pub const fn gray(&self) -> &GrayImage {
        &self.gray
    }

    /// Validate the configuration, then blur and advance to the
    /// [`Blurred`] stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] for a degenerate
    /// configuration and [`PipelineError::EmptyImage`] for a
    /// zero-dimension grid.
    pub fn blur(self) -> Result<Blurred, PipelineError> {
        self.config.validate()?;
        if self.gray.width() == 0 || self.gray.height() == 0 {
            return Err(PipelineError::EmptyImage);
        }

        let dimensions = Dimensions {
            width: self.gray.width(),
            height: self.gray.height(),
        };

        let start = Instant::now();
        let kernel = Kernel::gaussian(self.config.filter_size, self.config.sigma);
        let blurred = filter::convolve(&self.gray, &kernel);
        let blur_diag = StageDiagnostics {
            duration: start.elapsed(),
            metrics: StageMetrics::Blur {
                filter_size: self.config.filter_size,
                sigma: self.config.sigma,
            },
        };

        Ok(Blurred {
            config: self.config,
            blurred,
            dimensions,
            blur_diag,
        })
    }
}

// ───────────────────────── Stage 1: Blurred ──────────────────────────

/// Pipeline state after Gaussian blur.
///
/// Call [`gradients`](Self::gradients) to advance to the next stage.
#[must_use = "pipeline stages are consumed by advancing — call .gradients() to continue"]
pub struct Blurred {
    config: CannyConfig,
    blurred: GrayImage,
    dimensions: Dimensions,
    blur_diag: StageDiagnostics,
}

impl Blurred {
    /// The blurred grayscale grid.
    #[must_use]
    pub const fn blurred(&self) -> &GrayImage {
        &self.blurred
    }

    /// Build the Sobel gradient field and advance to the
    /// [`GradientsBuilt`] stage.
    pub fn gradients(self) -> GradientsBuilt {
        let start = Instant::now();
        let gradients = gradient::build_gradient_field(&self.blurred);
        let gradient_diag = StageDiagnostics {
            duration: start.elapsed(),
            metrics: StageMetrics::Gradients {
                max_magnitude: gradients.max_magnitude(),
            },
        };

        GradientsBuilt {
            config: self.config,
            blurred: self.blurred,
            gradients,
            dimensions: self.dimensions,
            blur_diag: self.blur_diag,
            gradient_diag,
        }
    }
}

// ───────────────────────── Stage 2: GradientsBuilt ───────────────────

/// Pipeline state after gradient estimation.
///
/// Call [`suppress`](Self::suppress) to advance to the next stage.
#[must_use = "pipeline stages are consumed by advancing — call .suppress() to continue"]
pub struct GradientsBuilt {
    config: CannyConfig,
    blurred: GrayImage,
    gradients: GradientField,
    dimensions: Dimensions,
    blur_diag: StageDiagnostics,
    gradient_diag: StageDiagnostics,
}

impl GradientsBuilt {
    /// The raw gradient field.
    #[must_use]
    pub const fn gradients(&self) -> &GradientField {
        &self.gradients
    }

    /// Run non-maximal suppression and advance to the [`Suppressed`]
    /// stage.
    pub fn suppress(self) -> Suppressed {
        let start = Instant::now();
        let suppressed = self.config.suppressor.suppress(&self.gradients);
        let survivors = suppressed
            .pixels()
            .filter(|g| g.magnitude() > 0.0)
            .count() as u64;
        let suppression_diag = StageDiagnostics {
            duration: start.elapsed(),
            metrics: StageMetrics::Suppression {
                strategy: format!("{:?}", self.config.suppressor),
                survivors,
                total_pixel_count: u64::from(self.dimensions.width)
                    * u64::from(self.dimensions.height),
            },
        };

        Suppressed {
            config: self.config,
            blurred: self.blurred,
            gradients: self.gradients,
            suppressed,
            dimensions: self.dimensions,
            blur_diag: self.blur_diag,
            gradient_diag: self.gradient_diag,
            suppression_diag,
        }
    }
}

// ───────────────────────── Stage 3: Suppressed ───────────────────────

/// Pipeline state after non-maximal suppression.
///
/// Call [`classify`](Self::classify) to advance to the final stage.
#[must_use = "pipeline stages are consumed by advancing — call .classify() to continue"]
pub struct Suppressed {
    config: CannyConfig,
    blurred: GrayImage,
    gradients: GradientField,
    suppressed: GradientField,
    dimensions: Dimensions,
    blur_diag: StageDiagnostics,
    gradient_diag: StageDiagnostics,
    suppression_diag: StageDiagnostics,
}

impl Suppressed {
    /// The suppressed gradient field.
    #[must_use]
    pub const fn suppressed(&self) -> &GradientField {
        &self.suppressed
    }

    /// Run hysteresis classification and advance to the [`Classified`]
    /// stage.
    pub fn classify(self) -> Classified {
        let start = Instant::now();
        let edges = hysteresis::classify(
            &self.suppressed,
            self.config.low_threshold,
            self.config.high_threshold,
        );
        let hysteresis_diag = StageDiagnostics {
            duration: start.elapsed(),
            metrics: StageMetrics::Hysteresis {
                low_threshold: self.config.low_threshold,
                high_threshold: self.config.high_threshold,
                strong: edges.count(EdgeLabel::Strong) as u64,
                weak: edges.count(EdgeLabel::Weak) as u64,
                dropped: edges.count(EdgeLabel::Dropped) as u64,
            },
        };

        Classified {
            blurred: self.blurred,
            gradients: self.gradients,
            suppressed: self.suppressed,
            edges,
            dimensions: self.dimensions,
            blur_diag: self.blur_diag,
            gradient_diag: self.gradient_diag,
            suppression_diag: self.suppression_diag,
            hysteresis_diag,
        }
    }
}

// ───────────────────────── Stage 4: Classified ───────────────────────

/// Final pipeline state: every intermediate plus the edge label map.
#[must_use = "call .into_result() to obtain the staged result"]
pub struct Classified {
    blurred: GrayImage,
    gradients: GradientField,
    suppressed: GradientField,
    edges: EdgeMap,
    dimensions: Dimensions,
    blur_diag: StageDiagnostics,
    gradient_diag: StageDiagnostics,
    suppression_diag: StageDiagnostics,
    hysteresis_diag: StageDiagnostics,
}

impl Classified {
    /// The final edge label map.
    #[must_use]
    pub const fn edges(&self) -> &EdgeMap {
        &self.edges
    }

    /// Consume the pipeline, returning every retained intermediate and
    /// the collected diagnostics.
    pub fn into_result(self) -> StagedResult {
        let edge_pixel_count = (self.edges.count(EdgeLabel::Strong)
            + self.edges.count(EdgeLabel::Weak)) as u64;
        let total_duration = self.blur_diag.duration
            + self.gradient_diag.duration
            + self.suppression_diag.duration
            + self.hysteresis_diag.duration;

        let diagnostics = PipelineDiagnostics {
            blur: self.blur_diag,
            gradients: self.gradient_diag,
            suppression: self.suppression_diag,
            hysteresis: self.hysteresis_diag,
            total_duration,
            summary: PipelineSummary {
                image_width: self.dimensions.width,
                image_height: self.dimensions.height,
                pixel_count: u64::from(self.dimensions.width)
                    * u64::from(self.dimensions.height),
                edge_pixel_count,
            },
        };

        StagedResult {
            blurred: self.blurred,
            gradients: self.gradients,
            suppressed: self.suppressed,
            edges: self.edges,
            dimensions: self.dimensions,
            diagnostics,
        }
    }
}

// ───────────────────────── Entry point ───────────────────────────────

/// Entry point for incremental pipeline execution.
pub struct Pipeline;

impl Pipeline {
    /// Begin a pipeline run over `gray` with `config`.
    pub fn new(gray: GrayImage, config: CannyConfig) -> Pending {
        Pending { config, gray }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stripe_image() -> GrayImage {
        GrayImage::from_fn(9, 9, |x, _y| {
            if (3..=5).contains(&x) {
                image::Luma([255])
            } else {
                image::Luma([0])
            }
        })
    }

    #[test]
    fn stages_advance_and_preserve_dimensions() {
        let pending = Pipeline::new(stripe_image(), CannyConfig::default());
        let blurred = pending.blur().unwrap();
        assert_eq!(blurred.blurred().width(), 9);

        let gradients = blurred.gradients();
        assert_eq!(gradients.gradients().width(), 9);

        let suppressed = gradients.suppress();
        assert_eq!(suppressed.suppressed().height(), 9);

        let classified = suppressed.classify();
        assert_eq!(classified.edges().width(), 9);

        let staged = classified.into_result();
        assert_eq!(
            staged.dimensions,
            Dimensions {
                width: 9,
                height: 9
            },
        );
    }

    #[test]
    fn invalid_config_fails_at_blur() {
        let config = CannyConfig {
            sigma: -1.0,
            ..CannyConfig::default()
        };
        let result = Pipeline::new(stripe_image(), config).blur();
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn empty_image_fails_at_blur() {
        let result = Pipeline::new(GrayImage::new(0, 0), CannyConfig::default()).blur();
        assert!(matches!(result, Err(PipelineError::EmptyImage)));
    }

    #[test]
    fn diagnostics_cover_every_stage() {
        let staged = Pipeline::new(stripe_image(), CannyConfig::default())
            .blur()
            .unwrap()
            .gradients()
            .suppress()
            .classify()
            .into_result();

        let diag = &staged.diagnostics;
        assert_eq!(diag.summary.pixel_count, 81);
        assert!(
            diag.total_duration
                >= diag.blur.duration.max(diag.hysteresis.duration),
        );
        assert!(matches!(diag.blur.metrics, StageMetrics::Blur { .. }));
        assert!(matches!(
            diag.hysteresis.metrics,
            StageMetrics::Hysteresis { .. },
        ));
    }

    #[test]
    fn suppression_survivor_count_matches_field() {
        let staged = Pipeline::new(stripe_image(), CannyConfig::default())
            .blur()
            .unwrap()
            .gradients()
            .suppress()
            .classify()
            .into_result();

        let counted = staged
            .suppressed
            .pixels()
            .filter(|g| g.magnitude() > 0.0)
            .count() as u64;
        if let StageMetrics::Suppression { survivors, .. } = staged.diagnostics.suppression.metrics
        {
            assert_eq!(survivors, counted);
        } else {
            unreachable!("suppression stage records suppression metrics");
        }
    }
}
