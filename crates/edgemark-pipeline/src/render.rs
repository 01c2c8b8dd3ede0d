//! Presentation mapping from pipeline grids to viewable grayscale
//! images.
//!
//! Pure value mappings only; encoding the resulting images to files is
//! the caller's concern.

use image::GrayImage;

use crate::gradient::GradientField;
use crate::hysteresis::{EdgeLabel, EdgeMap};

/// Render an edge label map as a grayscale image.
///
/// `None` is black, `Dropped` dark gray (50), `Weak` light gray (127),
/// `Strong` white.
#[must_use = "returns the rendered image"]
pub fn edge_map_image(edges: &EdgeMap) -> GrayImage {
    GrayImage::from_fn(edges.width(), edges.height(), |x, y| {
        let value = match edges.get(x, y) {
            EdgeLabel::None => 0,
            EdgeLabel::Dropped => 50,
            EdgeLabel::Weak => 127,
            EdgeLabel::Strong => 255,
        };
        image::Luma([value])
    })
}

/// Render a gradient field as a grayscale image.
///
/// Magnitudes are normalized against the field maximum and scaled to
/// `[0, 255]` with round-to-nearest. An all-zero field renders black.
#[must_use = "returns the rendered image"]
pub fn gradient_image(field: &GradientField) -> GrayImage {
    let max_magnitude = field.max_magnitude();

    GrayImage::from_fn(field.width(), field.height(), |x, y| {
        let value = if max_magnitude > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let scaled = (255.0 * field.magnitude(x, y) / max_magnitude).round() as u8;
            scaled
        } else {
            0
        };
        image::Luma([value])
    })
}
