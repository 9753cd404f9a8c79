//! Descriptive statistics over timing samples.
//!
//! All functions are pure. Ill-formed input is rejected with a
//! [`StatsError`] instead of producing NaN.

use crate::error::StatsError;

/// z-value for a two-sided 95% normal interval.
pub const Z_95: f64 = 1.96;

/// Arithmetic mean.
pub fn mean(xs: &[f64]) -> Result<f64, StatsError> {
    if xs.is_empty() {
        return Err(StatsError::EmptyInput { operation: "mean" });
    }
    Ok(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Median; averages the two middle values for even lengths.
///
/// Sorts a copy, the caller's buffer is left untouched.
pub fn median(xs: &[f64]) -> Result<f64, StatsError> {
    if xs.is_empty() {
        return Err(StatsError::EmptyInput { operation: "median" });
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Ok(median_sorted(&sorted))
}

/// Median of an already ascending, non-empty slice.
pub(crate) fn median_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Bessel-corrected sample variance (divides by `n - 1`).
///
/// # Errors
///
/// Requires at least two values; a single observation has no sample
/// variance and is reported as `InsufficientData` rather than 0.
pub fn sample_variance(xs: &[f64]) -> Result<f64, StatsError> {
    if xs.len() < 2 {
        return Err(StatsError::InsufficientData {
            operation: "sample_variance",
            required: 2,
            actual: xs.len(),
        });
    }
    let m = mean(xs)?;
    let ss: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
    Ok(ss / (xs.len() - 1) as f64)
}

/// Square root of [`sample_variance`]. Same precondition.
pub fn sample_standard_deviation(xs: &[f64]) -> Result<f64, StatsError> {
    sample_variance(xs).map(f64::sqrt)
}

/// Percentile by linear interpolation between order statistics.
///
/// Uses the fractional rank `p / 100 * (n - 1)`, so `p = 0` is the minimum,
/// `p = 100` the maximum and `p = 50` the median. `sorted` must already be
/// ascending.
pub fn percentile(sorted: &[f64], p: f64) -> Result<f64, StatsError> {
    if sorted.is_empty() {
        return Err(StatsError::EmptyInput { operation: "percentile" });
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(StatsError::invalid(
            "percentile",
            format!("p must be within [0, 100], got {}", p),
        ));
    }

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Ok(sorted[lower]);
    }
    let frac = rank - lower as f64;
    Ok(sorted[lower] + frac * (sorted[upper] - sorted[lower]))
}

/// Half-width of the 95% confidence interval of the mean.
///
/// Normal approximation with a fixed z of 1.96 rather than a Student-t
/// quantile; slightly narrow below ~30 samples.
pub fn margin_of_error(stddev: f64, n: usize) -> Result<f64, StatsError> {
    if n == 0 {
        return Err(StatsError::EmptyInput {
            operation: "margin_of_error",
        });
    }
    if !stddev.is_finite() || stddev < 0.0 {
        return Err(StatsError::invalid(
            "margin_of_error",
            format!("stddev must be finite and non-negative, got {}", stddev),
        ));
    }
    Ok(Z_95 * stddev / (n as f64).sqrt())
}

/// Margin of error relative to the mean.
pub fn relative_margin_of_error(mean: f64, stddev: f64, n: usize) -> Result<f64, StatsError> {
    if mean == 0.0 || !mean.is_finite() {
        return Err(StatsError::invalid(
            "relative_margin_of_error",
            format!("mean must be finite and non-zero, got {}", mean),
        ));
    }
    Ok(margin_of_error(stddev, n)? / mean)
}

/// Standard error of the mean.
pub fn standard_error(stddev: f64, n: usize) -> Result<f64, StatsError> {
    if n == 0 {
        return Err(StatsError::EmptyInput {
            operation: "standard_error",
        });
    }
    Ok(stddev / (n as f64).sqrt())
}
