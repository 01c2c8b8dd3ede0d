//! Square convolution kernels, including the normalized Gaussian used
//! for the blur stage.
//!
//! A [`Kernel`] is a `size x size` matrix of `f64` weights. The Gaussian
//! constructor renormalizes its entries to sum to exactly 1, so a
//! convolution with it preserves the total intensity of the image (up to
//! the zero-padded border).

use std::f64::consts::PI;

/// A square matrix of convolution weights.
///
/// Weights are stored row-major. Cell `(row, col)` corresponds to the
/// spatial offset `(col - radius, row - radius)` from the anchor pixel,
/// where `radius = size / 2` (floor). For even sizes this window is
/// asymmetric by one cell, matching the Gaussian builder's layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Build a kernel from a 3x3 matrix of weights.
    #[must_use]
    pub fn from_matrix3(rows: [[f64; 3]; 3]) -> Self {
        Self {
            size: 3,
            weights: rows.into_iter().flatten().collect(),
        }
    }

    /// Build a normalized `size x size` Gaussian kernel.
    ///
    /// Raw entries are `exp(-(x^2 + y^2) / (2 sigma^2)) / (2 pi sigma^2)`
    /// for `x, y = -radius + index`, then renormalized so the whole
    /// kernel sums to exactly 1. The renormalization also corrects for
    /// the mass lost to the truncated (and, for even sizes, asymmetric)
    /// window.
    ///
    /// `size == 0` or `sigma <= 0` produce degenerate kernels; callers
    /// are expected to validate parameters first (see
    /// [`CannyConfig::validate`](crate::types::CannyConfig::validate)).
    #[must_use]
    pub fn gaussian(size: usize, sigma: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let radius = (size / 2) as f64;
        let two_sigma_sq = 2.0 * sigma * sigma;

        let mut weights = Vec::with_capacity(size * size);
        let mut sum = 0.0;
        for i in 0..size {
            for j in 0..size {
                #[allow(clippy::cast_precision_loss)]
                let x = -radius + j as f64;
                #[allow(clippy::cast_precision_loss)]
                let y = -radius + i as f64;

                let weight = (-(x * x + y * y) / two_sigma_sq).exp() / (PI * two_sigma_sq);
                weights.push(weight);
                sum += weight;
            }
        }

        if sum > 0.0 {
            for weight in &mut weights {
                *weight /= sum;
            }
        }

        Self { size, weights }
    }

    /// Side length of the kernel.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Floor half-width of the kernel window.
    #[must_use]
    pub const fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at `(row, col)`, both in `0..size`.
    #[must_use]
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights[row * self.size + col]
    }

    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}
