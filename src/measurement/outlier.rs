//! Interquartile-range outlier filtering.
//!
//! Samples outside `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]` are dropped, with Q1 and
//! Q3 taken from the interpolated percentile of the sorted samples.

use serde::{Deserialize, Serialize};

use crate::statistics::percentile;

/// Tukey fence multiplier.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Statistics about outlier filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierStats {
    /// Samples before filtering.
    pub total_samples: usize,
    /// Samples remaining after filtering.
    pub retained_samples: usize,
    /// Number of outliers removed.
    pub outliers_removed: usize,
    /// Whether filtering ran at all.
    pub applied: bool,
    /// Lower fence (`Q1 - 1.5·IQR`), if filtering ran.
    pub lower_fence: Option<f64>,
    /// Upper fence (`Q3 + 1.5·IQR`), if filtering ran.
    pub upper_fence: Option<f64>,
}

impl OutlierStats {
    /// Create stats for when no filtering was applied.
    pub fn no_filtering(total_samples: usize) -> Self {
        Self {
            total_samples,
            retained_samples: total_samples,
            outliers_removed: 0,
            applied: false,
            lower_fence: None,
            upper_fence: None,
        }
    }

    /// Fraction of samples removed (0.0 to 1.0).
    pub fn outlier_fraction(&self) -> f64 {
        if self.total_samples == 0 {
            0.0
        } else {
            self.outliers_removed as f64 / self.total_samples as f64
        }
    }
}

/// Drop samples outside the Tukey fences.
///
/// Filtering is skipped when fewer than `min_samples` samples are present,
/// as quartiles are not meaningful on so little data.
///
/// # Returns
///
/// The retained samples sorted ascending, and filtering stats.
pub fn filter_outliers(samples: &[f64], min_samples: usize) -> (Vec<f64>, OutlierStats) {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    if sorted.is_empty() || sorted.len() < min_samples {
        return (sorted, OutlierStats::no_filtering(samples.len()));
    }

    let (lower_fence, upper_fence) = match (percentile(&sorted, 25.0), percentile(&sorted, 75.0)) {
        (Ok(q1), Ok(q3)) => {
            let iqr = q3 - q1;
            (q1 - IQR_MULTIPLIER * iqr, q3 + IQR_MULTIPLIER * iqr)
        }
        _ => return (sorted, OutlierStats::no_filtering(samples.len())),
    };

    let retained: Vec<f64> = sorted
        .into_iter()
        .filter(|&x| x >= lower_fence && x <= upper_fence)
        .collect();

    let stats = OutlierStats {
        total_samples: samples.len(),
        retained_samples: retained.len(),
        outliers_removed: samples.len() - retained.len(),
        applied: true,
        lower_fence: Some(lower_fence),
        upper_fence: Some(upper_fence),
    };

    (retained, stats)
}
