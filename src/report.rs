//! Benchmark report and reliability warnings.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::StatsError;
use crate::statistics::{
    margin_of_error, mean, median_sorted, sample_variance, standard_error,
};

/// Summary of one measurement run.
///
/// Times are milliseconds per single invocation of the routine. The field
/// names of the serialized form are a stable wire format shared with any
/// tool that stores and reloads reports.
///
/// An empty report (`size == 0`) has every derived statistic set to exactly
/// 0, never NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Benchmark name.
    pub name: String,

    /// Optional group label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Per-invocation times in ascending order (fastest first).
    pub sample: Vec<f64>,

    /// Number of samples; always `sample.len()`.
    pub size: usize,

    /// Arithmetic mean.
    pub mean: f64,

    /// Median.
    pub median: f64,

    /// Bessel-corrected sample standard deviation.
    #[serde(rename = "sd")]
    pub standard_deviation: f64,

    /// Bessel-corrected sample variance.
    pub variance: f64,

    /// Standard error of the mean.
    #[serde(rename = "sem")]
    pub standard_error: f64,

    /// Half-width of the 95% confidence interval of the mean.
    #[serde(rename = "moe")]
    pub margin_of_error: f64,

    /// Margin of error divided by the mean.
    #[serde(rename = "rme")]
    pub relative_margin_of_error: f64,

    /// Operations per second (`1000 / mean`), 0 when the mean is 0.
    #[serde(rename = "ops")]
    pub ops_per_second: f64,

    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl Report {
    /// Build a report from per-invocation times in milliseconds.
    ///
    /// Samples are sorted ascending. With a single sample the dispersion
    /// fields are 0; with none, every derived field is 0.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if any sample is negative or non-finite.
    pub fn from_samples(name: impl Into<String>, mut sample: Vec<f64>) -> Result<Self, StatsError> {
        if let Some(bad) = sample.iter().find(|x| !x.is_finite() || **x < 0.0) {
            return Err(StatsError::invalid(
                "Report::from_samples",
                format!("samples must be finite and non-negative, got {}", bad),
            ));
        }
        sample.sort_by(|a, b| a.total_cmp(b));

        let name = name.into();
        let created_at = now_millis();
        let size = sample.len();
        if size == 0 {
            return Ok(Self::empty(name, created_at));
        }

        let mean = mean(&sample)?;
        let median = median_sorted(&sample);
        let variance = if size >= 2 { sample_variance(&sample)? } else { 0.0 };
        let standard_deviation = variance.sqrt();
        let standard_error = standard_error(standard_deviation, size)?;
        let margin_of_error = margin_of_error(standard_deviation, size)?;
        let (relative_margin_of_error, ops_per_second) = if mean > 0.0 {
            (margin_of_error / mean, 1_000.0 / mean)
        } else {
            (0.0, 0.0)
        };

        Ok(Self {
            name,
            group: None,
            sample,
            size,
            mean,
            median,
            standard_deviation,
            variance,
            standard_error,
            margin_of_error,
            relative_margin_of_error,
            ops_per_second,
            created_at,
        })
    }

    fn empty(name: String, created_at: u64) -> Self {
        Self {
            name,
            group: None,
            sample: Vec::new(),
            size: 0,
            mean: 0.0,
            median: 0.0,
            standard_deviation: 0.0,
            variance: 0.0,
            standard_error: 0.0,
            margin_of_error: 0.0,
            relative_margin_of_error: 0.0,
            ops_per_second: 0.0,
            created_at,
        }
    }

    /// Attach a group label.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Fastest recorded time, if any.
    pub fn fastest(&self) -> Option<f64> {
        self.sample.first().copied()
    }

    /// Slowest recorded time, if any.
    pub fn slowest(&self) -> Option<f64> {
        self.sample.last().copied()
    }

    /// Reliability warnings that follow from the report's own values.
    pub fn reliability_warnings(&self, rme_threshold: f64) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if self.size == 0 {
            warnings.push(Warning::EmptyReport);
            return warnings;
        }
        if self.mean == 0.0 {
            warnings.push(Warning::ZeroMean);
        }
        if self.standard_deviation == 0.0 {
            warnings.push(Warning::ZeroStandardDeviation);
        }
        if self.relative_margin_of_error > rme_threshold {
            warnings.push(Warning::HighRelativeMarginOfError {
                rme: self.relative_margin_of_error,
                threshold: rme_threshold,
            });
        }
        warnings
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// When a sample-count check happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterStage {
    /// Before IQR filtering; filtering was skipped.
    BeforeFiltering,
    /// After IQR filtering removed samples.
    AfterFiltering,
}

/// Observational signal about measurement reliability.
///
/// Warnings are logged and returned alongside the report; they never abort
/// a run or change the reported numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// Fewer samples than `min_samples`.
    TooFewSamples {
        /// Where the count was taken.
        stage: FilterStage,
        /// Samples present.
        count: usize,
        /// Configured minimum.
        min: usize,
    },
    /// No samples at all; every statistic is 0.
    EmptyReport,
    /// Mean time is 0, so the timer resolution was exhausted; ops reported as 0.
    ZeroMean,
    /// All samples identical.
    ZeroStandardDeviation,
    /// The calibrated batch still spans fewer than
    /// [`MIN_BATCH_TICKS`](crate::measurement::MIN_BATCH_TICKS) clock steps.
    BatchBelowResolution {
        /// Elapsed time of the calibrated batch.
        batch_ms: f64,
        /// Measured clock step.
        resolution_ms: f64,
    },
    /// Relative margin of error exceeds the configured threshold.
    HighRelativeMarginOfError {
        /// Observed relative margin of error.
        rme: f64,
        /// Configured threshold.
        threshold: f64,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TooFewSamples {
                stage: FilterStage::BeforeFiltering,
                count,
                min,
            } => write!(
                f,
                "only {} samples collected (minimum {}); outlier filtering skipped",
                count, min
            ),
            Warning::TooFewSamples {
                stage: FilterStage::AfterFiltering,
                count,
                min,
            } => write!(
                f,
                "only {} samples left after outlier filtering (minimum {})",
                count, min
            ),
            Warning::EmptyReport => f.write_str("no samples recorded; all statistics are 0"),
            Warning::ZeroMean => {
                f.write_str("mean time is 0 (timer resolution exhausted); ops reported as 0")
            }
            Warning::ZeroStandardDeviation => f.write_str("standard deviation is 0"),
            Warning::BatchBelowResolution {
                batch_ms,
                resolution_ms,
            } => write!(
                f,
                "calibrated batch took {:.6} ms, only {:.0} ticks of the {:.6} ms timer resolution",
                batch_ms,
                batch_ms / resolution_ms,
                resolution_ms
            ),
            Warning::HighRelativeMarginOfError { rme, threshold } => write!(
                f,
                "relative margin of error {:.1}% exceeds {:.1}%",
                rme * 100.0,
                threshold * 100.0
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_samples_statistics() {
        let report = Report::from_samples("sum", vec![4.0, 2.0, 8.0, 6.0]).unwrap();

        assert_eq!(report.sample, vec![2.0, 4.0, 6.0, 8.0]);
        assert_eq!(report.size, 4);
        assert_eq!(report.mean, 5.0);
        assert_eq!(report.median, 5.0);
        assert!((report.variance - 20.0 / 3.0).abs() < 1e-12);
        assert!((report.standard_deviation - (20.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((report.standard_error - report.standard_deviation / 2.0).abs() < 1e-12);
        assert!((report.margin_of_error - 1.96 * report.standard_error).abs() < 1e-12);
        assert!((report.relative_margin_of_error - report.margin_of_error / 5.0).abs() < 1e-12);
        assert_eq!(report.ops_per_second, 200.0);
        assert_eq!(report.fastest(), Some(2.0));
        assert_eq!(report.slowest(), Some(8.0));
    }

    #[test]
    fn test_empty_report_is_all_zero() {
        let report = Report::from_samples("empty", Vec::new()).unwrap();
        assert_eq!(report.size, 0);
        for value in [
            report.mean,
            report.median,
            report.standard_deviation,
            report.variance,
            report.standard_error,
            report.margin_of_error,
            report.relative_margin_of_error,
            report.ops_per_second,
        ] {
            assert_eq!(value, 0.0);
        }
        assert_eq!(report.reliability_warnings(0.1), vec![Warning::EmptyReport]);
    }

    #[test]
    fn test_single_sample_has_zero_dispersion() {
        let report = Report::from_samples("one", vec![2.0]).unwrap();
        assert_eq!(report.size, 1);
        assert_eq!(report.mean, 2.0);
        assert_eq!(report.variance, 0.0);
        assert_eq!(report.ops_per_second, 500.0);
        assert!(report
            .reliability_warnings(0.1)
            .contains(&Warning::ZeroStandardDeviation));
    }

    #[test]
    fn test_zero_mean_reports_zero_ops() {
        let report = Report::from_samples("instant", vec![0.0; 12]).unwrap();
        assert_eq!(report.ops_per_second, 0.0);
        assert_eq!(report.relative_margin_of_error, 0.0);
        let warnings = report.reliability_warnings(0.1);
        assert!(warnings.contains(&Warning::ZeroMean));
    }

    #[test]
    fn test_rejects_negative_samples() {
        assert!(Report::from_samples("bad", vec![1.0, -1.0]).is_err());
        assert!(Report::from_samples("bad", vec![f64::NAN]).is_err());
    }

    #[test]
    fn test_high_rme_warning() {
        let report = Report::from_samples("noisy", vec![1.0, 10.0, 1.0, 10.0]).unwrap();
        let warnings = report.reliability_warnings(0.10);
        assert!(matches!(
            warnings.last(),
            Some(Warning::HighRelativeMarginOfError { .. })
        ));
    }

    #[test]
    fn test_wire_field_names() {
        let report = Report::from_samples("wire", vec![1.0, 2.0, 3.0])
            .unwrap()
            .with_group("g");
        let json = serde_json::to_value(&report).unwrap();
        for field in [
            "name", "group", "sample", "size", "mean", "median", "sd", "variance", "sem", "moe",
            "rme", "ops", "createdAt",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
        let back: Report = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
