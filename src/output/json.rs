//! JSON serialization for reports and comparisons.

use serde::Serialize;

/// Serialize a report, comparison or report set to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for the
/// crate's own types).
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Serialize to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for the
/// crate's own types).
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{compare, ReportSet};
    use crate::report::Report;

    fn make_report(name: &str, sample: Vec<f64>) -> Report {
        let mut report = Report::from_samples(name, sample).unwrap();
        report.created_at = 1_700_000_000_000;
        report
    }

    #[test]
    fn test_to_json_report() {
        let report = make_report("sum", vec![1.0, 2.0, 3.0]);
        let json = to_json(&report).unwrap();
        assert!(json.contains("\"name\":\"sum\""));
        assert!(json.contains("\"mean\":2.0"));
        assert!(json.contains("\"createdAt\":1700000000000"));
    }

    #[test]
    fn test_to_json_comparison() {
        let a = make_report("a", vec![1.0, 2.0, 3.0]);
        let b = make_report("b", vec![2.0, 3.0, 4.0]);
        let json = to_json(&compare(&a, &b).unwrap()).unwrap();
        assert!(json.contains("\"dmean\":1.0"));
        assert!(json.contains("\"aWins\":true"));
    }

    #[test]
    fn test_to_json_pretty() {
        let set = ReportSet {
            created_at: 1,
            reports: vec![make_report("x", vec![1.0])],
        };
        let json = to_json_pretty(&set).unwrap();
        assert!(json.contains('\n')); // Pretty print has newlines
        assert_eq!(ReportSet::from_json(&json).unwrap(), set);
    }
}
