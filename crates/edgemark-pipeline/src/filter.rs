//! Kernel application with zero-padded borders.
//!
//! [`apply_at`] evaluates one kernel at one pixel; [`convolve`] runs a
//! full-grid pass producing a new image of the same dimensions. Samples
//! outside the image contribute 0 (zero-padding, not clamping or
//! reflection), so border pixels are attenuated rather than copied.
//!
//! The accumulated weighted sum is truncated toward zero when converted
//! to an integer. This matches the downstream gradient math, which
//! compares magnitudes at sub-integer precision; rounding instead of
//! truncating would shift suppression decisions at adjacent-integer
//! boundaries.

use image::GrayImage;

use crate::kernel::Kernel;

/// Apply `kernel` to `image` at `(x, y)`, returning the truncated
/// weighted sum.
///
/// Kernel cell `(row, col)` reads the pixel at spatial offset
/// `(col - radius, row - radius)`; out-of-bounds reads contribute 0.
#[must_use]
pub fn apply_at(image: &GrayImage, kernel: &Kernel, x: u32, y: u32) -> i32 {
    let (width, height) = (i64::from(image.width()), i64::from(image.height()));
    #[allow(clippy::cast_possible_wrap)]
    let radius = kernel.radius() as i64;

    let mut result = 0.0;
    for row in 0..kernel.size() {
        for col in 0..kernel.size() {
            #[allow(clippy::cast_possible_wrap)]
            let xx = i64::from(x) + col as i64 - radius;
            #[allow(clippy::cast_possible_wrap)]
            let yy = i64::from(y) + row as i64 - radius;

            if xx >= 0 && xx < width && yy >= 0 && yy < height {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let pixel = image.get_pixel(xx as u32, yy as u32).0[0];
                result += f64::from(pixel) * kernel.weight(row, col);
            }
        }
    }

    // Truncate toward zero; `as` saturates at the i32 range.
    #[allow(clippy::cast_possible_truncation)]
    let truncated = result as i32;
    truncated
}

/// Convolve the whole image with `kernel`, producing a new image of the
/// same dimensions.
///
/// Intended for normalized kernels (weights summing to 1), for which
/// every output value already lies in `[0, 255]`; values outside that
/// range are clamped after truncation.
#[must_use = "returns the convolved image"]
pub fn convolve(image: &GrayImage, kernel: &Kernel) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = apply_at(image, kernel, x, y).clamp(0, 255) as u8;
        image::Luma([value])
    })
}
