//! Statistics kernel.
//!
//! Pure numeric functions shared by the measurer and the comparator:
//! - Descriptive statistics (mean, median, Bessel-corrected variance,
//!   interpolated percentiles, margin of error)
//! - Welch's t-test from summary statistics and Cohen's d
//! - Two-tailed Student's t p-values via the regularized incomplete beta

mod descriptive;
mod inference;
mod student_t;

pub use descriptive::{
    margin_of_error, mean, median, percentile, relative_margin_of_error, sample_standard_deviation,
    sample_variance, standard_error, Z_95,
};
pub use inference::{
    cohens_d, pooled_standard_deviation, standard_error_of_difference, welch_degrees_of_freedom,
    welch_t_statistic,
};
pub use student_t::student_two_tailed_p_value;

pub(crate) use descriptive::median_sorted;
