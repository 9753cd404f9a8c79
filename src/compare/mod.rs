//! Statistical comparison of benchmark reports.
//!
//! - [`compare`]: Welch's t-test, Cohen's d and a difference interval for
//!   two reports
//! - [`compare_across_history`]: every pairwise comparison of one benchmark
//!   across stored suite runs
//! - [`validate`]: structural checks applied to stored reports

mod comparison;
mod history;
pub mod validate;

pub use comparison::{compare, Comparison, EffectSize, ALPHA};
pub use history::{compare_across_history, HistoryOptions, ReportSet};
