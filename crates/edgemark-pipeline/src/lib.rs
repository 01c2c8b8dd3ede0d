//! Canny edge detection pipeline.
//!
//! Converts a grayscale grid into a per-pixel edge label map through
//! four stages:
//!
//! 1. **Blur** — Gaussian smoothing ([`kernel`], [`filter`]).
//! 2. **Gradients** — Sobel intensity gradient estimation
//!    ([`gradient`]).
//! 3. **Suppression** — non-maximal suppression thins gradient ridges
//!    to single-pixel-wide curves ([`suppress`]).
//! 4. **Hysteresis** — double-threshold classification with
//!    directional edge linking ([`hysteresis`]).
//!
//! The crate is sans-IO: it operates on in-memory grids and returns
//! in-memory results. Image decoding, file paths, and rendering to
//! disk belong to callers (see the `edgemark-cli` crate).
//!
//! # Entry points
//!
//! - [`process`] — run all four stages, return the final [`EdgeMap`].
//! - [`process_staged`] — run all four stages, retain every
//!   intermediate plus timing diagnostics in a [`StagedResult`].
//! - [`Pipeline`] — advance stage-by-stage under caller control.
//!
//! ```rust
//! use edgemark_pipeline::{CannyConfig, EdgeLabel, process};
//!
//! # fn run() -> Result<(), edgemark_pipeline::PipelineError> {
//! let gray = image::GrayImage::from_fn(16, 16, |x, _| {
//!     image::Luma([if x < 8 { 0 } else { 255 }])
//! });
//! let edges = process(&gray, &CannyConfig::default())?;
//! assert!(edges.count(EdgeLabel::Strong) > 0);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```

pub mod diagnostics;
pub mod filter;
pub mod gradient;
pub mod hysteresis;
pub mod kernel;
pub mod pipeline;
pub mod render;
pub mod suppress;
pub mod types;

pub use diagnostics::{PipelineDiagnostics, PipelineSummary, StageDiagnostics, StageMetrics};
pub use gradient::{Direction, Gradient, GradientField};
pub use hysteresis::{EdgeLabel, EdgeMap};
pub use kernel::Kernel;
pub use pipeline::Pipeline;
pub use suppress::SuppressorKind;
pub use types::{CannyConfig, Dimensions, GrayImage, PipelineError, StagedResult};

/// Run the full pipeline and return only the final edge label map.
///
/// Intermediates are computed and discarded; use [`process_staged`] to
/// keep them.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] for a degenerate
/// configuration and [`PipelineError::EmptyImage`] for a
/// zero-dimension grid.
pub fn process(gray: &GrayImage, config: &CannyConfig) -> Result<EdgeMap, PipelineError> {
    Ok(process_staged(gray, config)?.edges)
}

/// Run the full pipeline, retaining every intermediate result and
/// per-stage diagnostics.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] for a degenerate
/// configuration and [`PipelineError::EmptyImage`] for a
/// zero-dimension grid.
pub fn process_staged(
    gray: &GrayImage,
    config: &CannyConfig,
) -> Result<StagedResult, PipelineError> {
    Ok(Pipeline::new(gray.clone(), *config)
        .blur()?
        .gradients()
        .suppress()
        .classify()
        .into_result())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn small_config() -> CannyConfig {
        CannyConfig {
            filter_size: 3,
            sigma: 1.0,
            ..CannyConfig::default()
        }
    }

    /// Three bright columns on a dark 5x5 grid.
    fn stripe() -> GrayImage {
        GrayImage::from_fn(5, 5, |x, _y| {
            image::Luma([if (1..=3).contains(&x) { 255 } else { 0 }])
        })
    }

    #[test]
    fn flat_field_yields_no_interior_edges() {
        let gray = GrayImage::from_pixel(8, 8, image::Luma([200]));
        let edges = process(&gray, &small_config()).unwrap();
        // Zero padding at the borders creates artificial gradients, but
        // interior pixels see a constant neighborhood.
        for y in 2..6 {
            for x in 2..6 {
                assert_eq!(edges.get(x, y), EdgeLabel::None, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn stripe_edges_flank_the_stripe() {
        let edges = process(&stripe(), &small_config()).unwrap();

        // Both sides of the stripe carry a steep intensity step; the
        // middle row is far from the zero-padded borders.
        for x in [1, 3] {
            let label = edges.get(x, 2);
            assert!(
                matches!(label, EdgeLabel::Strong | EdgeLabel::Weak),
                "expected edge at ({x}, 2), got {label:?}",
            );
        }
        // The stripe center is locally constant: no gradient, no edge.
        assert_eq!(edges.get(2, 2), EdgeLabel::None);
    }

    #[test]
    fn staged_result_preserves_dimensions() {
        let staged = process_staged(&stripe(), &small_config()).unwrap();
        let expected = Dimensions {
            width: 5,
            height: 5,
        };
        assert_eq!(staged.dimensions, expected);
        assert_eq!(staged.blurred.width(), 5);
        assert_eq!(staged.gradients.width(), 5);
        assert_eq!(staged.suppressed.height(), 5);
        assert_eq!(staged.edges.height(), 5);
        assert_eq!(staged.diagnostics.summary.pixel_count, 25);
    }

    #[test]
    fn process_matches_staged_edges() {
        let config = small_config();
        let edges = process(&stripe(), &config).unwrap();
        let staged = process_staged(&stripe(), &config).unwrap();
        assert_eq!(edges, staged.edges);
    }

    #[test]
    fn staged_edge_pixel_count_matches_labels() {
        let staged = process_staged(&stripe(), &small_config()).unwrap();
        let counted =
            (staged.edges.count(EdgeLabel::Strong) + staged.edges.count(EdgeLabel::Weak)) as u64;
        assert_eq!(staged.diagnostics.summary.edge_pixel_count, counted);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = CannyConfig {
            low_threshold: 0.9,
            high_threshold: 0.2,
            ..CannyConfig::default()
        };
        let err = process(&stripe(), &config).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn empty_image_is_rejected() {
        let gray = GrayImage::new(0, 0);
        let err = process(&gray, &CannyConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyImage));
    }

    #[test]
    fn quantized_suppressor_also_finds_stripe_edges() {
        let config = CannyConfig {
            suppressor: SuppressorKind::Quantized,
            ..small_config()
        };
        let edges = process(&stripe(), &config).unwrap();
        for x in [1, 3] {
            let label = edges.get(x, 2);
            assert!(
                matches!(label, EdgeLabel::Strong | EdgeLabel::Weak),
                "expected edge at ({x}, 2), got {label:?}",
            );
        }
    }
}
