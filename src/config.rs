//! Configuration for a measurement run.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Resolved configuration for a `Benchmark`.
///
/// Every field is populated; build one from [`Options`] with
/// [`Options::resolve`] or start from `Config::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Wall-clock budget for the main sampling loop in milliseconds (default: 10,000).
    pub max_execution_time_ms: u64,

    /// Untimed priming calls before calibration (default: 10).
    pub warmup_iterations: usize,

    /// Initial repeat count per timed sample (default: 10).
    pub inner_iterations: usize,

    /// Ceiling for adaptive inner-loop growth (default: 10,000).
    pub max_inner_iterations: usize,

    /// Minimum wall time in milliseconds a calibration batch must take (default: 1.0).
    ///
    /// Batches faster than this are dominated by timer resolution, so the
    /// inner-loop size doubles until a batch takes at least this long.
    pub time_threshold_ms: f64,

    /// Minimum samples required for outlier filtering to run (default: 10).
    pub min_samples: usize,

    /// Maximum number of timed samples to collect (default: 100).
    pub max_iterations: usize,

    /// Relative margin of error above which a reliability warning is logged (default: 0.10).
    pub rme_warning_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_execution_time_ms: 10_000,
            warmup_iterations: 10,
            inner_iterations: 10,
            max_inner_iterations: 10_000,
            time_threshold_ms: 1.0,
            min_samples: 10,
            max_iterations: 100,
            rme_warning_threshold: 0.10,
        }
    }
}

impl Config {
    /// Short budget for smoke runs and tests.
    ///
    /// Settings:
    /// - 1,000 ms wall-clock budget (vs 10,000 default)
    /// - 3 warmup iterations (vs 10 default)
    /// - 1,000 max inner iterations (vs 10,000 default)
    /// - 30 samples (vs 100 default)
    pub fn quick() -> Self {
        Self {
            max_execution_time_ms: 1_000,
            warmup_iterations: 3,
            max_inner_iterations: 1_000,
            max_iterations: 30,
            ..Self::default()
        }
    }

    /// Larger sample for release comparisons.
    ///
    /// Settings:
    /// - 30,000 ms wall-clock budget
    /// - 50 warmup iterations
    /// - 5 ms calibration threshold
    /// - 30 minimum samples, 500 max samples
    pub fn thorough() -> Self {
        Self {
            max_execution_time_ms: 30_000,
            warmup_iterations: 50,
            time_threshold_ms: 5.0,
            min_samples: 30,
            max_iterations: 500,
            ..Self::default()
        }
    }

    /// Check ranges the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inner_iterations == 0 {
            return Err(ConfigError {
                field: "innerIterations",
                reason: "must be at least 1".into(),
            });
        }
        if self.max_inner_iterations < self.inner_iterations {
            return Err(ConfigError {
                field: "maxInnerIterations",
                reason: format!(
                    "({}) must not be below innerIterations ({})",
                    self.max_inner_iterations, self.inner_iterations
                ),
            });
        }
        if !self.time_threshold_ms.is_finite() || self.time_threshold_ms < 0.0 {
            return Err(ConfigError {
                field: "timeThresholdMs",
                reason: format!("must be finite and non-negative, got {}", self.time_threshold_ms),
            });
        }
        if !self.rme_warning_threshold.is_finite() || self.rme_warning_threshold < 0.0 {
            return Err(ConfigError {
                field: "rmeWarningThreshold",
                reason: format!(
                    "must be finite and non-negative, got {}",
                    self.rme_warning_threshold
                ),
            });
        }
        Ok(())
    }
}

/// Partial option bag as handed over by an orchestration layer.
///
/// Missing fields fall back to `Config::default()` when resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    /// See [`Config::max_execution_time_ms`].
    pub max_execution_time_ms: Option<u64>,
    /// See [`Config::warmup_iterations`].
    pub warmup_iterations: Option<usize>,
    /// See [`Config::inner_iterations`].
    pub inner_iterations: Option<usize>,
    /// See [`Config::max_inner_iterations`].
    pub max_inner_iterations: Option<usize>,
    /// See [`Config::time_threshold_ms`].
    pub time_threshold_ms: Option<f64>,
    /// See [`Config::min_samples`].
    pub min_samples: Option<usize>,
    /// See [`Config::max_iterations`].
    pub max_iterations: Option<usize>,
    /// See [`Config::rme_warning_threshold`].
    pub rme_warning_threshold: Option<f64>,
}

impl Options {
    /// Merge onto the defaults.
    pub fn resolve(&self) -> Config {
        self.resolve_onto(Config::default())
    }

    /// Merge onto an explicit base configuration.
    pub fn resolve_onto(&self, base: Config) -> Config {
        Config {
            max_execution_time_ms: self.max_execution_time_ms.unwrap_or(base.max_execution_time_ms),
            warmup_iterations: self.warmup_iterations.unwrap_or(base.warmup_iterations),
            inner_iterations: self.inner_iterations.unwrap_or(base.inner_iterations),
            max_inner_iterations: self.max_inner_iterations.unwrap_or(base.max_inner_iterations),
            time_threshold_ms: self.time_threshold_ms.unwrap_or(base.time_threshold_ms),
            min_samples: self.min_samples.unwrap_or(base.min_samples),
            max_iterations: self.max_iterations.unwrap_or(base.max_iterations),
            rme_warning_threshold: self.rme_warning_threshold.unwrap_or(base.rme_warning_threshold),
        }
    }
}

impl From<Options> for Config {
    fn from(options: Options) -> Self {
        options.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_execution_time_ms, 10_000);
        assert_eq!(config.warmup_iterations, 10);
        assert_eq!(config.inner_iterations, 10);
        assert_eq!(config.max_inner_iterations, 10_000);
        assert_eq!(config.time_threshold_ms, 1.0);
        assert_eq!(config.min_samples, 10);
        assert_eq!(config.max_iterations, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_options_resolve() {
        let options: Options =
            serde_json::from_str(r#"{"maxIterations": 5, "timeThresholdMs": 0.5}"#).unwrap();
        let config = options.resolve();
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.time_threshold_ms, 0.5);
        assert_eq!(config.warmup_iterations, 10);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let result: Result<Options, _> = serde_json::from_str(r#"{"maxIteration": 5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let config = Config {
            inner_iterations: 0,
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "innerIterations");

        let config = Config {
            inner_iterations: 100,
            max_inner_iterations: 10,
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "maxInnerIterations");

        let config = Config {
            time_threshold_ms: f64::NAN,
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap_err().code(), "E_CONFIG");
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(Config::quick().validate().is_ok());
        assert!(Config::thorough().validate().is_ok());
    }
}
