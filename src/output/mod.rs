//! Rendering of reports and comparisons.
//!
//! Nothing in the measurement or comparison paths calls into this module.

pub mod json;
pub mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{format_comparison, format_measurement, format_report};
