//! Pipeline diagnostics: timing and counts for each stage.
//!
//! These diagnostics are permanent instrumentation intended for
//! parameter tuning. Every call to
//! [`process_staged`](crate::process_staged) collects diagnostics
//! alongside the stage outputs.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Stage 1: Gaussian blur.
    pub blur: StageDiagnostics,
    /// Stage 2: Sobel gradient field construction.
    pub gradients: StageDiagnostics,
    /// Stage 3: non-maximal suppression.
    pub suppression: StageDiagnostics,
    /// Stage 4: hysteresis classification.
    pub hysteresis: StageDiagnostics,
    /// Total wall-clock duration of the entire pipeline (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics (counts, parameters).
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Gaussian blur metrics.
    Blur {
        /// Kernel side length.
        filter_size: usize,
        /// Sigma value used for the blur kernel.
        sigma: f64,
    },
    /// Gradient field metrics.
    Gradients {
        /// Maximum gradient magnitude over the raw field.
        max_magnitude: f64,
    },
    /// Non-maximal suppression metrics.
    Suppression {
        /// Which suppression strategy ran.
        strategy: String,
        /// Pixels whose gradient survived suppression.
        survivors: u64,
        /// Total pixel count.
        total_pixel_count: u64,
    },
    /// Hysteresis classification metrics.
    Hysteresis {
        /// Low threshold ratio.
        low_threshold: f64,
        /// High threshold ratio.
        high_threshold: f64,
        /// Strong edge pixel count.
        strong: u64,
        /// Weak (linked) edge pixel count.
        weak: u64,
        /// Dropped (unlinked borderline) pixel count.
        dropped: u64,
    },
}

/// High-level summary counts for the entire pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Source image width in pixels.
    pub image_width: u32,
    /// Source image height in pixels.
    pub image_height: u32,
    /// Total pixel count.
    pub pixel_count: u64,
    /// Edge pixels (strong + weak) in the final map.
    pub edge_pixel_count: u64,
}

impl PipelineDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Edge Detection Diagnostics\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} pixels)",
            self.summary.image_width, self.summary.image_height, self.summary.pixel_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Blur", &self.blur),
            ("Gradients", &self.gradients),
            ("Suppression", &self.suppression),
            ("Hysteresis", &self.hysteresis),
        ];

        for (name, diag) in stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Edge pixels (strong + weak): {}",
            self.summary.edge_pixel_count,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Blur { filter_size, sigma } => {
            format!("{filter_size}x{filter_size} sigma={sigma:.2}")
        }
        StageMetrics::Gradients { max_magnitude } => format!("max|g|={max_magnitude:.1}"),
        StageMetrics::Suppression {
            strategy,
            survivors,
            total_pixel_count,
        } => {
            #[allow(clippy::cast_precision_loss)]
            let density = if *total_pixel_count > 0 {
                *survivors as f64 / *total_pixel_count as f64 * 100.0
            } else {
                0.0
            };
            format!("{strategy} survivors={survivors} ({density:.1}%)")
        }
        StageMetrics::Hysteresis {
            low_threshold,
            high_threshold,
            strong,
            weak,
            dropped,
        } => {
            format!(
                "low={low_threshold:.2} high={high_threshold:.2} strong={strong} weak={weak} dropped={dropped}",
            )
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_diagnostics() -> PipelineDiagnostics {
        PipelineDiagnostics {
            blur: StageDiagnostics {
                duration: Duration::from_millis(12),
                metrics: StageMetrics::Blur {
                    filter_size: 5,
                    sigma: 1.4,
                },
            },
            gradients: StageDiagnostics {
                duration: Duration::from_millis(8),
                metrics: StageMetrics::Gradients {
                    max_magnitude: 1020.0,
                },
            },
            suppression: StageDiagnostics {
                duration: Duration::from_millis(20),
                metrics: StageMetrics::Suppression {
                    strategy: "Subpixel".to_string(),
                    survivors: 400,
                    total_pixel_count: 10000,
                },
            },
            hysteresis: StageDiagnostics {
                duration: Duration::from_millis(5),
                metrics: StageMetrics::Hysteresis {
                    low_threshold: 0.1,
                    high_threshold: 0.3,
                    strong: 120,
                    weak: 80,
                    dropped: 40,
                },
            },
            total_duration: Duration::from_millis(45),
            summary: PipelineSummary {
                image_width: 100,
                image_height: 100,
                pixel_count: 10000,
                edge_pixel_count: 200,
            },
        }
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let d = Duration::from_millis(1234);
        assert!((duration_ms(d) - 1234.0).abs() < 0.01);
    }

    #[test]
    fn report_mentions_every_stage() {
        let report = sample_diagnostics().report();
        for name in ["Blur", "Gradients", "Suppression", "Hysteresis"] {
            assert!(report.contains(name), "missing stage {name}");
        }
        assert!(report.contains("100x100"));
    }

    #[test]
    fn diagnostics_serde_round_trip() {
        let diag = sample_diagnostics();
        let json = serde_json::to_string(&diag).unwrap();
        let back: PipelineDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary.edge_pixel_count, 200);
        assert_eq!(back.blur.duration, Duration::from_millis(12));
    }

    #[test]
    fn durations_serialize_as_seconds() {
        let diag = sample_diagnostics();
        let value = serde_json::to_value(&diag).unwrap();
        let secs = value["total_duration"].as_f64().unwrap();
        assert!((secs - 0.045).abs() < 1e-9);
    }
}
