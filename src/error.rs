//! Error types for measurement, statistics and comparison.
//!
//! Every error carries a stable machine-readable code (see `code()`) next to
//! its human-readable `Display` message.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed error produced by a timed routine.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Precondition violations in the statistics kernel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// The input sequence was empty.
    #[error("empty input: {operation} requires at least one value")]
    EmptyInput {
        /// Kernel function that rejected the input.
        operation: &'static str,
    },

    /// Not enough observations for the requested statistic.
    #[error("insufficient data: {operation} requires at least {required} values, got {actual}")]
    InsufficientData {
        /// Kernel function that rejected the input.
        operation: &'static str,
        /// Minimum number of observations.
        required: usize,
        /// Observations supplied.
        actual: usize,
    },

    /// A variance term that must be non-zero was exactly zero.
    #[error("degenerate variance: {operation} is undefined when the variance is zero")]
    DegenerateVariance {
        /// Kernel function that rejected the input.
        operation: &'static str,
    },

    /// An argument was non-finite or outside its domain.
    #[error("invalid argument to {operation}: {reason}")]
    InvalidArgument {
        /// Kernel function that rejected the input.
        operation: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

impl StatsError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            StatsError::EmptyInput { .. } => "E_EMPTY_INPUT",
            StatsError::InsufficientData { .. } => "E_INSUFFICIENT_DATA",
            StatsError::DegenerateVariance { .. } => "E_DEGENERATE_VARIANCE",
            StatsError::InvalidArgument { .. } => "E_INVALID_ARGUMENT",
        }
    }

    pub(crate) fn invalid(operation: &'static str, reason: impl Into<String>) -> Self {
        StatsError::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }
}

/// Out-of-range benchmark configuration.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid configuration: {field} {reason}")]
pub struct ConfigError {
    /// Offending option, in its serialized (camelCase) spelling.
    pub field: &'static str,
    /// Why the value was rejected.
    pub reason: String,
}

impl ConfigError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        "E_CONFIG"
    }
}

/// Stage of a run in which a timed routine failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutinePhase {
    /// Untimed priming calls.
    Warmup,
    /// Adaptive inner-loop sizing.
    Calibration,
    /// Main sampling loop.
    Sampling,
}

impl fmt::Display for RoutinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoutinePhase::Warmup => "warmup",
            RoutinePhase::Calibration => "calibration",
            RoutinePhase::Sampling => "sampling",
        };
        f.write_str(name)
    }
}

/// Failures that abort a measurement run.
#[derive(Debug, Error)]
pub enum BenchmarkError {
    /// Configuration did not pass validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The timed routine returned an error. No report is produced.
    #[error("benchmark '{name}' failed during {phase}: {source}")]
    Routine {
        /// Benchmark name.
        name: String,
        /// Stage that was running.
        phase: RoutinePhase,
        /// The routine's own error, unchanged.
        #[source]
        source: BoxError,
    },

    /// Report assembly rejected the recorded samples.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// The blocking executor could not be created.
    #[error("failed to start benchmark runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl BenchmarkError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            BenchmarkError::Config(e) => e.code(),
            BenchmarkError::Routine { .. } => "E_BENCHMARK_FUNCTION",
            BenchmarkError::Stats(e) => e.code(),
            BenchmarkError::Runtime(_) => "E_RUNTIME",
        }
    }

    /// The routine's original error, if this run failed inside the routine.
    pub fn routine_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            BenchmarkError::Routine { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// A single structural problem found in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Position of the offending report set in the supplied sequence.
    pub index: usize,
    /// Report name, when known.
    pub report: Option<String>,
    /// Field that is missing or out of range.
    pub field: String,
    /// Description of the problem.
    pub problem: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.report {
            Some(name) => write!(f, "[{}] {}.{}: {}", self.index, name, self.field, self.problem),
            None => write!(f, "[{}] {}: {}", self.index, self.field, self.problem),
        }
    }
}

/// Structural validation failed; lists every violation found.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} validation error(s): {}", .violations.len(), join_violations(.violations))]
pub struct ValidationError {
    /// All problems, in input order.
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        "E_VALIDATION"
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failures of the comparison entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompareError {
    /// A kernel precondition did not hold for the two reports.
    #[error("cannot compare '{a}' with '{b}': {source}")]
    Stats {
        /// Name of the first report.
        a: String,
        /// Name of the second report.
        b: String,
        /// Underlying kernel error.
        #[source]
        source: StatsError,
    },

    /// One or more supplied reports were malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Fewer than two reports matched the requested name.
    #[error("need at least 2 reports named '{name}' to compare, found {found}")]
    NotEnoughReports {
        /// Requested benchmark name.
        name: String,
        /// Matches found.
        found: usize,
    },
}

impl CompareError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            CompareError::Stats { source, .. } => source.code(),
            CompareError::Validation(e) => e.code(),
            CompareError::NotEnoughReports { .. } => "E_NOT_ENOUGH_REPORTS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(StatsError::EmptyInput { operation: "mean" }.code(), "E_EMPTY_INPUT");
        assert_eq!(
            StatsError::invalid("student_two_tailed_p_value", "df <= 0").code(),
            "E_INVALID_ARGUMENT"
        );
        let err = CompareError::NotEnoughReports {
            name: "sort".into(),
            found: 1,
        };
        assert_eq!(err.code(), "E_NOT_ENOUGH_REPORTS");
        assert!(err.to_string().contains("found 1"));
    }

    #[test]
    fn test_validation_error_lists_all_violations() {
        let err = ValidationError {
            violations: vec![
                Violation {
                    index: 0,
                    report: Some("a".into()),
                    field: "sd".into(),
                    problem: "must be non-negative".into(),
                },
                Violation {
                    index: 2,
                    report: None,
                    field: "reports".into(),
                    problem: "missing".into(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 validation error(s)"));
        assert!(msg.contains("[0] a.sd: must be non-negative"));
        assert!(msg.contains("[2] reports: missing"));
    }

    #[test]
    fn test_routine_error_preserves_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = BenchmarkError::Routine {
            name: "x".into(),
            phase: RoutinePhase::Warmup,
            source: Box::new(inner),
        };
        assert_eq!(err.code(), "E_BENCHMARK_FUNCTION");
        assert_eq!(err.routine_error().map(|e| e.to_string()), Some("boom".to_string()));
        assert!(err.to_string().contains("during warmup"));
    }
}
