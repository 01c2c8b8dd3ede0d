//! Double-threshold hysteresis with directional edge linking.
//!
//! Every pixel's magnitude is expressed as a ratio of the suppressed
//! field's maximum. Ratios at or above the high threshold are
//! [`EdgeLabel::Strong`]; from each strong pixel a breadth-first search
//! promotes borderline pixels (ratio in `[low, high)`) to
//! [`EdgeLabel::Weak`], but only along each frontier pixel's own
//! quantized gradient direction. Borderline pixels no search reaches are
//! [`EdgeLabel::Dropped`]; everything below the low threshold stays
//! [`EdgeLabel::None`].
//!
//! Restricting the flood fill to the two direction-consistent neighbors
//! keeps the promoted set to thin, directionally coherent chains instead
//! of growing blobs. Propagation follows the gradient direction itself,
//! not the perpendicular edge tangent.
//!
//! The search mutates a single output grid owned exclusively by this
//! pass. Overlapping searches from different strong seeds are idempotent
//! (both write `Weak`), so scan order does not affect the result.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::gradient::GradientField;

/// Classification of a pixel after hysteresis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeLabel {
    /// Below the low threshold: not an edge.
    None,
    /// Borderline magnitude with no link to a strong edge.
    Dropped,
    /// Borderline magnitude linked to a strong edge.
    Weak,
    /// At or above the high threshold.
    Strong,
}

/// A `W x H` grid of per-pixel edge labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeMap {
    width: u32,
    height: u32,
    labels: Vec<EdgeLabel>,
}

impl EdgeMap {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            labels: vec![EdgeLabel::None; width as usize * height as usize],
        }
    }

    /// Map width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Map height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Label at `(x, y)`. Coordinates must be in bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> EdgeLabel {
        debug_assert!(x < self.width && y < self.height);
        self.labels[y as usize * self.width as usize + x as usize]
    }

    fn set(&mut self, x: u32, y: u32, label: EdgeLabel) {
        self.labels[y as usize * self.width as usize + x as usize] = label;
    }

    /// Number of pixels carrying `label`.
    #[must_use]
    pub fn count(&self, label: EdgeLabel) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }
}

/// Classify every pixel of a suppressed gradient field.
///
/// Thresholds are ratios of the field's maximum magnitude, expected in
/// `[0, 1]` with `low <= high`; [`CannyConfig::validate`] enforces the
/// ordering before a pipeline run reaches this pass. An all-zero field
/// yields an all-[`EdgeLabel::None`] map (every ratio is treated as 0).
///
/// [`CannyConfig::validate`]: crate::types::CannyConfig::validate
#[must_use = "returns the edge label map"]
pub fn classify(field: &GradientField, low: f64, high: f64) -> EdgeMap {
    let mut edges = EdgeMap::new(field.width(), field.height());

    let max_magnitude = field.max_magnitude();
    if max_magnitude <= 0.0 {
        return edges;
    }

    for y in 0..field.height() {
        for x in 0..field.width() {
            let ratio = field.magnitude(x, y) / max_magnitude;
            if ratio >= high {
                edges.set(x, y, EdgeLabel::Strong);
                for (wx, wy) in collect_connected(field, max_magnitude, x, y, low, high) {
                    edges.set(wx, wy, EdgeLabel::Weak);
                }
            } else if ratio >= low && edges.get(x, y) != EdgeLabel::Weak {
                // Assume dropped for now; a later strong pixel's search
                // may still promote it to weak.
                edges.set(x, y, EdgeLabel::Dropped);
            }
        }
    }

    edges
}

/// Breadth-first search from a strong seed, returning every borderline
/// pixel transitively linked to it.
///
/// A neighbor `q` of the frontier pixel `p` joins the result iff it has
/// not been visited in this search, its ratio lies in `[low, high)`, and
/// `q` is one of the two pixels one step from `p` along `p`'s own
/// quantized gradient direction.
fn collect_connected(
    field: &GradientField,
    max_magnitude: f64,
    x: u32,
    y: u32,
    low: f64,
    high: f64,
) -> Vec<(u32, u32)> {
    let (width, height) = (field.width(), field.height());
    let mut visited = vec![false; width as usize * height as usize];
    let index = |px: u32, py: u32| py as usize * width as usize + px as usize;

    let mut result = Vec::new();
    let mut queue = VecDeque::new();
    visited[index(x, y)] = true;
    queue.push_back((x, y));

    while let Some((px, py)) = queue.pop_front() {
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let qx = i64::from(px) + dx;
                let qy = i64::from(py) + dy;
                if qx < 0 || qy < 0 || qx >= i64::from(width) || qy >= i64::from(height) {
                    continue;
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let (qx, qy) = (qx as u32, qy as u32);

                if visited[index(qx, qy)] {
                    continue;
                }
                let ratio = field.magnitude(qx, qy) / max_magnitude;
                if ratio >= low && ratio < high && is_connected(field, (px, py), (qx, qy)) {
                    visited[index(qx, qy)] = true;
                    result.push((qx, qy));
                    queue.push_back((qx, qy));
                }
            }
        }
    }

    result
}

/// Whether `q` lies one step from `p` along `p`'s quantized gradient
/// direction (in either sense).
fn is_connected(field: &GradientField, p: (u32, u32), q: (u32, u32)) -> bool {
    let (step_x, step_y) = field.get(p.0, p.1).quantized_direction().step();

    let forward = (i64::from(p.0) + step_x, i64::from(p.1) + step_y);
    let backward = (i64::from(p.0) - step_x, i64::from(p.1) - step_y);
    let q = (i64::from(q.0), i64::from(q.1));

    q == forward || q == backward
}
