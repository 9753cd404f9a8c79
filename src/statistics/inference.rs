//! Two-sample inference from summary statistics.
//!
//! Welch's unequal-variance t-test and Cohen's d, computed from
//! (mean, standard deviation, size) triples so they work on stored reports
//! without the raw samples.

use crate::error::StatsError;

fn check_sizes(operation: &'static str, n1: usize, n2: usize) -> Result<(), StatsError> {
    if n1 == 0 || n2 == 0 {
        return Err(StatsError::EmptyInput { operation });
    }
    Ok(())
}

fn check_finite(operation: &'static str, values: &[f64]) -> Result<(), StatsError> {
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(StatsError::invalid(operation, format!("non-finite input {}", bad)));
    }
    Ok(())
}

/// Standard error of the difference of two means, `sqrt(s1²/n1 + s2²/n2)`.
pub fn standard_error_of_difference(s1: f64, s2: f64, n1: usize, n2: usize) -> Result<f64, StatsError> {
    check_sizes("standard_error_of_difference", n1, n2)?;
    check_finite("standard_error_of_difference", &[s1, s2])?;
    Ok((s1 * s1 / n1 as f64 + s2 * s2 / n2 as f64).sqrt())
}

/// Welch's t-statistic, `(mean1 - mean2) / sqrt(s1²/n1 + s2²/n2)`.
///
/// # Errors
///
/// `DegenerateVariance` when both standard deviations are zero.
pub fn welch_t_statistic(
    mean1: f64,
    mean2: f64,
    s1: f64,
    s2: f64,
    n1: usize,
    n2: usize,
) -> Result<f64, StatsError> {
    check_finite("welch_t_statistic", &[mean1, mean2])?;
    let se = standard_error_of_difference(s1, s2, n1, n2)?;
    if se == 0.0 {
        return Err(StatsError::DegenerateVariance {
            operation: "welch_t_statistic",
        });
    }
    Ok((mean1 - mean2) / se)
}

/// Welch–Satterthwaite degrees of freedom.
///
/// ```text
/// df = (v1 + v2)^2 / (v1^2 / (n1 - 1) + v2^2 / (n2 - 1)),  vi = si^2 / ni
/// ```
///
/// # Errors
///
/// - `InsufficientData` if either sample has fewer than two observations.
/// - `DegenerateVariance` if both variances are exactly zero.
pub fn welch_degrees_of_freedom(s1: f64, s2: f64, n1: usize, n2: usize) -> Result<f64, StatsError> {
    if n1 < 2 || n2 < 2 {
        return Err(StatsError::InsufficientData {
            operation: "welch_degrees_of_freedom",
            required: 2,
            actual: n1.min(n2),
        });
    }
    check_finite("welch_degrees_of_freedom", &[s1, s2])?;

    let v1 = s1 * s1 / n1 as f64;
    let v2 = s2 * s2 / n2 as f64;
    let denominator = v1 * v1 / (n1 - 1) as f64 + v2 * v2 / (n2 - 1) as f64;
    if denominator == 0.0 {
        return Err(StatsError::DegenerateVariance {
            operation: "welch_degrees_of_freedom",
        });
    }
    Ok((v1 + v2).powi(2) / denominator)
}

/// Pooled standard deviation, `sqrt(((n1-1)s1² + (n2-1)s2²) / (n1+n2-2))`.
pub fn pooled_standard_deviation(s1: f64, s2: f64, n1: usize, n2: usize) -> Result<f64, StatsError> {
    if n1 + n2 <= 2 {
        return Err(StatsError::InsufficientData {
            operation: "pooled_standard_deviation",
            required: 3,
            actual: n1 + n2,
        });
    }
    check_finite("pooled_standard_deviation", &[s1, s2])?;
    let n1 = n1 as f64;
    let n2 = n2 as f64;
    Ok((((n1 - 1.0) * s1 * s1 + (n2 - 1.0) * s2 * s2) / (n1 + n2 - 2.0)).sqrt())
}

/// Cohen's d: mean difference in units of the pooled standard deviation.
///
/// # Errors
///
/// - `InsufficientData` when `n1 + n2 <= 2`.
/// - `DegenerateVariance` when the pooled deviation is zero.
pub fn cohens_d(
    mean1: f64,
    mean2: f64,
    s1: f64,
    s2: f64,
    n1: usize,
    n2: usize,
) -> Result<f64, StatsError> {
    check_finite("cohens_d", &[mean1, mean2])?;
    let pooled = pooled_standard_deviation(s1, s2, n1, n2)?;
    if pooled == 0.0 {
        return Err(StatsError::DegenerateVariance { operation: "cohens_d" });
    }
    Ok((mean1 - mean2) / pooled)
}
