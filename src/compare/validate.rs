//! Structural validation of stored reports.
//!
//! Two passes exist. [`check_value`] runs over raw JSON and reports every
//! missing or mistyped field before deserialization would stop at the first
//! one. [`check_report`] runs over typed reports and catches values serde
//! accepts but the comparator cannot use (negative deviations, a size that
//! disagrees with the sample). Both collect violations rather than failing
//! on the first.

use serde_json::Value;

use crate::error::{ValidationError, Violation};
use crate::report::Report;

use super::history::ReportSet;

/// Fields every stored report must carry.
pub const REQUIRED_REPORT_FIELDS: [&str; 12] = [
    "name", "sample", "size", "mean", "median", "sd", "variance", "sem", "moe", "rme", "ops",
    "createdAt",
];

/// Fields every stored report set must carry.
pub const REQUIRED_SET_FIELDS: [&str; 2] = ["createdAt", "reports"];

/// Collect violations of a raw report set.
pub fn check_value(index: usize, value: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();
    let Some(set) = value.as_object() else {
        violations.push(violation(index, None, "<root>", "expected an object"));
        return violations;
    };

    for field in REQUIRED_SET_FIELDS {
        if !set.contains_key(field) {
            violations.push(violation(index, None, field, "missing"));
        }
    }
    if let Some(created_at) = set.get("createdAt") {
        if !created_at.is_u64() {
            violations.push(violation(
                index,
                None,
                "createdAt",
                "must be a non-negative integer",
            ));
        }
    }

    match set.get("reports") {
        None => {}
        Some(Value::Array(reports)) => {
            for (position, report) in reports.iter().enumerate() {
                check_report_value(index, position, report, &mut violations);
            }
        }
        Some(_) => violations.push(violation(index, None, "reports", "expected an array")),
    }

    violations
}

fn check_report_value(index: usize, position: usize, value: &Value, out: &mut Vec<Violation>) {
    let Some(report) = value.as_object() else {
        out.push(violation(
            index,
            None,
            &format!("reports[{}]", position),
            "expected an object",
        ));
        return;
    };

    let label = match report.get("name").and_then(Value::as_str) {
        Some(name) => name.to_string(),
        None => format!("reports[{}]", position),
    };

    for field in REQUIRED_REPORT_FIELDS {
        let Some(v) = report.get(field) else {
            out.push(violation(index, Some(&label), field, "missing"));
            continue;
        };
        let problem = match field {
            "name" => (!v.is_string()).then_some("must be a string"),
            "sample" => match v.as_array() {
                None => Some("must be an array"),
                Some(xs) if xs.iter().any(|x| x.as_f64().map_or(true, |x| x < 0.0)) => {
                    Some("must contain only non-negative numbers")
                }
                Some(_) => None,
            },
            "size" | "createdAt" => (!v.is_u64()).then_some("must be a non-negative integer"),
            _ => match v.as_f64() {
                None => Some("must be a number"),
                Some(x) if x < 0.0 => Some("must be non-negative"),
                Some(_) => None,
            },
        };
        if let Some(problem) = problem {
            out.push(violation(index, Some(&label), field, problem));
        }
    }
}

/// Collect violations of a typed report at position `index` of a history.
pub fn check_report(index: usize, report: &Report) -> Vec<Violation> {
    let mut violations = Vec::new();
    let name = Some(report.name.as_str());

    if report.size != report.sample.len() {
        violations.push(violation(
            index,
            name,
            "size",
            &format!("is {} but sample holds {} values", report.size, report.sample.len()),
        ));
    }
    if report.sample.iter().any(|x| !x.is_finite() || *x < 0.0) {
        violations.push(violation(
            index,
            name,
            "sample",
            "must contain only finite non-negative numbers",
        ));
    }

    let fields = [
        ("mean", report.mean),
        ("median", report.median),
        ("sd", report.standard_deviation),
        ("variance", report.variance),
        ("sem", report.standard_error),
        ("moe", report.margin_of_error),
        ("rme", report.relative_margin_of_error),
        ("ops", report.ops_per_second),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            violations.push(violation(index, name, field, "must be finite"));
        } else if value < 0.0 {
            violations.push(violation(index, name, field, "must be non-negative"));
        }
    }

    violations
}

/// Validate every report of every set.
///
/// # Errors
///
/// `ValidationError` listing all violations, in input order.
pub fn validate_sets(sets: &[ReportSet]) -> Result<(), ValidationError> {
    let violations: Vec<Violation> = sets
        .iter()
        .enumerate()
        .flat_map(|(index, set)| set.reports.iter().flat_map(move |r| check_report(index, r)))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn violation(index: usize, report: Option<&str>, field: &str, problem: &str) -> Violation {
    Violation {
        index,
        report: report.map(str::to_string),
        field: field.to_string(),
        problem: problem.to_string(),
    }
}
