//! Per-pixel intensity gradients and the gradient field built from the
//! Sobel operators.
//!
//! A [`Gradient`] is a 2D vector `(dx, dy)` with derived magnitude,
//! signed direction, and a four-way [`Direction`] class used by the
//! quantized suppressor and by hysteresis linking. A [`GradientField`]
//! is a `W x H` grid of gradients sharing the source image dimensions.

use std::f64::consts::PI;

use image::GrayImage;

use crate::filter;
use crate::kernel::Kernel;

/// Sobel operator for horizontal intensity change.
pub const SOBEL_X: [[f64; 3]; 3] = [[1.0, 0.0, -1.0], [2.0, 0.0, -2.0], [1.0, 0.0, -1.0]];

/// Sobel operator for vertical intensity change.
pub const SOBEL_Y: [[f64; 3]; 3] = [[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]];

/// Quantized gradient direction.
///
/// Angles differing by pi are equivalent (a north-pointing gradient is
/// the same class as a south-pointing one), which folds the eight
/// compass directions down to four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Gradient near vertical (angle near pi/2).
    NorthSouth,
    /// Gradient near horizontal (angle near 0 or pi).
    EastWest,
    /// Gradient along the northeast-southwest diagonal.
    NortheastSouthwest,
    /// Gradient along the northwest-southeast diagonal.
    NorthwestSoutheast,
}

impl Direction {
    /// Unit step `(dx, dy)` along this direction, in image coordinates
    /// (y grows downward). The opposite step is the negation.
    #[must_use]
    pub const fn step(self) -> (i64, i64) {
        match self {
            Self::NorthSouth => (0, 1),
            Self::EastWest => (1, 0),
            Self::NortheastSouthwest => (1, 1),
            Self::NorthwestSoutheast => (-1, 1),
        }
    }
}

/// The intensity gradient of a single pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    /// Horizontal component.
    pub dx: f64,
    /// Vertical component.
    pub dy: f64,
}

impl Gradient {
    /// The "no gradient" sentinel. Its direction is 0 by the atan2
    /// convention and its magnitude is the global minimum, so it never
    /// wins a suppression or linking comparison.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// Create a gradient from its components.
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Euclidean magnitude `sqrt(dx^2 + dy^2)`.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    /// Signed direction `atan2(dy, dx)` in `(-pi, pi]`.
    #[must_use]
    pub fn direction(self) -> f64 {
        self.dy.atan2(self.dx)
    }

    /// Quantized four-way direction class.
    ///
    /// The signed direction is folded into `[0, pi)` (adding pi to
    /// negative angles) and bucketed into eighths of pi with upper
    /// edges closed: `EastWest` covers angles near 0 and pi,
    /// `NorthSouth` angles near pi/2, the diagonals the remaining
    /// eighths.
    #[must_use]
    pub fn quantized_direction(self) -> Direction {
        let mut direction = self.direction();
        if direction < 0.0 {
            direction += PI;
        }

        let eighth = PI / 8.0;
        if direction > eighth && direction <= 3.0 * eighth {
            Direction::NorthwestSoutheast
        } else if direction > 3.0 * eighth && direction <= 5.0 * eighth {
            Direction::NorthSouth
        } else if direction > 5.0 * eighth && direction <= 7.0 * eighth {
            Direction::NortheastSouthwest
        } else {
            Direction::EastWest
        }
    }
}

/// A `W x H` grid of per-pixel gradients.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    width: u32,
    height: u32,
    data: Vec<Gradient>,
}

impl GradientField {
    /// Build a field of the given dimensions by evaluating `f` at every
    /// pixel.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Gradient) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Field width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Field height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Gradient at `(x, y)`. Coordinates must be in bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Gradient {
        debug_assert!(x < self.width && y < self.height);
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Gradient magnitude at `(x, y)`.
    #[must_use]
    pub fn magnitude(&self, x: u32, y: u32) -> f64 {
        self.get(x, y).magnitude()
    }

    /// Maximum gradient magnitude over the whole field. 0 for an empty
    /// or all-zero field.
    #[must_use]
    pub fn max_magnitude(&self) -> f64 {
        self.data
            .iter()
            .map(|g| g.magnitude())
            .fold(0.0, f64::max)
    }

    /// Iterate over all gradients in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &Gradient> {
        self.data.iter()
    }
}

/// Build the gradient field of a (blurred) grayscale image by applying
/// the Sobel operators at every pixel.
///
/// The Sobel kernels are applied unnormalized; downstream stages rely
/// only on relative magnitude comparisons, never absolute calibration.
#[must_use = "returns the gradient field"]
pub fn build_gradient_field(image: &GrayImage) -> GradientField {
    let sobel_x = Kernel::from_matrix3(SOBEL_X);
    let sobel_y = Kernel::from_matrix3(SOBEL_Y);

    GradientField::from_fn(image.width(), image.height(), |x, y| {
        let dx = filter::apply_at(image, &sobel_x, x, y);
        let dy = filter::apply_at(image, &sobel_y, x, y);
        Gradient::new(f64::from(dx), f64::from(dy))
    })
}
