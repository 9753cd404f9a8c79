//! Main `Benchmark` entry point and builder.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::{Config, Options};
use crate::error::{BenchmarkError, BoxError, RoutinePhase};
use crate::logging::{Logger, TracingLogger};
use crate::measurement::{black_box, filter_outliers, OutlierStats, Routine, Timer};
use crate::report::{FilterStage, Report, Warning};

/// Stage of a measurement run.
///
/// A run moves through every stage in order:
/// `Idle → Warmup → Calibrating → Sampling → OutlierFiltering → Reported`.
/// A failed run returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Not running.
    Idle,
    /// Untimed priming calls.
    Warmup,
    /// Adaptive inner-loop sizing.
    Calibrating,
    /// Main sampling loop.
    Sampling,
    /// IQR outlier removal.
    OutlierFiltering,
    /// Report assembled.
    Reported,
}

/// Everything a run produced, beyond the report itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    /// The report.
    pub report: Report,
    /// Reliability warnings raised during the run.
    pub warnings: Vec<Warning>,
    /// Outlier filtering statistics.
    pub outliers: OutlierStats,
    /// Inner-loop size chosen by calibration.
    pub inner_iterations: usize,
    /// Samples recorded before filtering.
    pub raw_samples: usize,
    /// Whether sampling stopped on the wall-clock budget.
    pub stopped_early: bool,
    /// Wall time of the whole run in milliseconds.
    pub elapsed_ms: f64,
}

impl Measurement {
    /// True when no reliability warning was raised.
    pub fn is_reliable(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A named benchmark owning its routine.
///
/// Use the builder methods to configure, then [`run`](Self::run) (async)
/// or [`run_blocking`](Self::run_blocking).
///
/// # Example
///
/// ```ignore
/// use microbench::{measurement::infallible, Benchmark};
///
/// let mut bench = Benchmark::new("sum_1k", infallible(|n: &u64| (0..*n).sum::<u64>()))
///     .max_iterations(50)
///     .warmup(5);
///
/// let report = bench.run_blocking(&1_000)?;
/// println!("{:.4} ms ± {:.1}%", report.mean, report.relative_margin_of_error * 100.0);
/// ```
///
/// Runs take `&mut self`, so one instance can never be measured
/// concurrently with itself.
pub struct Benchmark<R> {
    name: String,
    group: Option<String>,
    config: Config,
    routine: R,
    logger: Arc<dyn Logger>,
    timer: Option<Timer>,
    phase: Phase,
}

impl<R> fmt::Debug for Benchmark<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Benchmark")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("config", &self.config)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<R> Benchmark<R> {
    /// Create with default configuration and the `tracing` logger.
    pub fn new(name: impl Into<String>, routine: R) -> Self {
        Self {
            name: name.into(),
            group: None,
            config: Config::default(),
            routine,
            logger: Arc::new(TracingLogger),
            timer: None,
            phase: Phase::Idle,
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Merge a partial option bag onto the current configuration.
    pub fn with_options(mut self, options: &Options) -> Self {
        self.config = options.resolve_onto(self.config);
        self
    }

    /// Send log output to `logger` instead of `tracing`.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Use a pre-calibrated timer.
    pub fn with_timer(mut self, timer: Timer) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Set the group label carried into the report.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the wall-clock budget in milliseconds.
    pub fn max_execution_time_ms(mut self, ms: u64) -> Self {
        self.config.max_execution_time_ms = ms;
        self
    }

    /// Set warmup iterations.
    pub fn warmup(mut self, n: usize) -> Self {
        self.config.warmup_iterations = n;
        self
    }

    /// Set the initial inner-loop size.
    pub fn inner_iterations(mut self, n: usize) -> Self {
        self.config.inner_iterations = n;
        self
    }

    /// Set the inner-loop ceiling.
    pub fn max_inner_iterations(mut self, n: usize) -> Self {
        self.config.max_inner_iterations = n;
        self
    }

    /// Set the calibration time threshold in milliseconds.
    pub fn time_threshold_ms(mut self, ms: f64) -> Self {
        self.config.time_threshold_ms = ms;
        self
    }

    /// Set the minimum sample count for outlier filtering.
    pub fn min_samples(mut self, n: usize) -> Self {
        self.config.min_samples = n;
        self
    }

    /// Set the maximum number of samples.
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.config.max_iterations = n;
        self
    }

    /// Benchmark name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current stage.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
    }

    fn routine_failed(&mut self, phase: RoutinePhase, source: BoxError) -> BenchmarkError {
        self.phase = Phase::Idle;
        self.logger.error(&format!(
            "benchmark '{}' aborted during {}: {}",
            self.name, phase, source
        ));
        BenchmarkError::Routine {
            name: self.name.clone(),
            phase,
            source,
        }
    }

    fn warn(&self, warning: &Warning) {
        self.logger.warn(&format!("benchmark '{}': {}", self.name, warning));
    }
}

impl<R> Benchmark<R> {
    /// Measure the routine and return its report.
    ///
    /// # Errors
    ///
    /// - `Config` if the configuration fails validation.
    /// - `Routine` if the routine fails at any stage; no report is produced.
    pub async fn run<A>(&mut self, input: &A) -> Result<Report, BenchmarkError>
    where
        A: ?Sized,
        R: Routine<A>,
    {
        self.run_detailed(input).await.map(|m| m.report)
    }

    /// Like [`run`](Self::run), also returning warnings and run statistics.
    pub async fn run_detailed<A>(&mut self, input: &A) -> Result<Measurement, BenchmarkError>
    where
        A: ?Sized,
        R: Routine<A>,
    {
        self.config.validate()?;
        let config = self.config.clone();
        let timer = match &self.timer {
            Some(timer) => timer.clone(),
            None => {
                let timer = Timer::new();
                self.timer = Some(timer.clone());
                timer
            }
        };
        let run_start = timer.start();

        // Warmup
        self.enter(Phase::Warmup);
        self.invoke_batch(input, config.warmup_iterations, RoutinePhase::Warmup)
            .await?;

        // Calibration
        self.enter(Phase::Calibrating);
        let (inner, batch_ms) = self.calibrate(input, &config, &timer).await?;
        self.logger.info(&format!(
            "benchmark '{}': calibrated inner loop to {} iterations",
            self.name, inner
        ));
        let mut warnings = Vec::new();
        if batch_ms < timer.min_batch_ms() {
            warnings.push(Warning::BatchBelowResolution {
                batch_ms,
                resolution_ms: timer.resolution_ms(),
            });
        }

        // Sampling
        self.enter(Phase::Sampling);
        let mut samples = Vec::with_capacity(config.max_iterations);
        let mut stopped_early = false;
        for _ in 0..config.max_iterations {
            let elapsed = self
                .timed_batch(input, inner, RoutinePhase::Sampling, &timer)
                .await?;
            samples.push(elapsed / inner as f64);

            if timer.elapsed_ms(run_start) > config.max_execution_time_ms as f64 {
                stopped_early = samples.len() < config.max_iterations;
                break;
            }
        }
        if stopped_early {
            self.logger.info(&format!(
                "benchmark '{}': time budget of {} ms reached after {} samples",
                self.name,
                config.max_execution_time_ms,
                samples.len()
            ));
        }

        // Outlier filtering
        self.enter(Phase::OutlierFiltering);
        if samples.len() < config.min_samples {
            warnings.push(Warning::TooFewSamples {
                stage: FilterStage::BeforeFiltering,
                count: samples.len(),
                min: config.min_samples,
            });
        }
        let (retained, outliers) = filter_outliers(&samples, config.min_samples);
        if outliers.applied && retained.len() < config.min_samples {
            warnings.push(Warning::TooFewSamples {
                stage: FilterStage::AfterFiltering,
                count: retained.len(),
                min: config.min_samples,
            });
        }

        // Report assembly
        let mut report = match Report::from_samples(self.name.clone(), retained) {
            Ok(report) => report,
            Err(e) => {
                self.phase = Phase::Idle;
                return Err(e.into());
            }
        };
        report.group = self.group.clone();
        warnings.extend(report.reliability_warnings(config.rme_warning_threshold));
        for warning in &warnings {
            self.warn(warning);
        }
        self.enter(Phase::Reported);

        Ok(Measurement {
            report,
            warnings,
            outliers,
            inner_iterations: inner,
            raw_samples: samples.len(),
            stopped_early,
            elapsed_ms: timer.elapsed_ms(run_start),
        })
    }

    /// Measure on a fresh current-thread runtime.
    ///
    /// The runtime has its time driver enabled, so asynchronous routines may
    /// use `tokio::time`. Must not be called from inside another Tokio
    /// runtime; use [`run`](Self::run) there.
    pub fn run_blocking<A>(&mut self, input: &A) -> Result<Report, BenchmarkError>
    where
        A: ?Sized,
        R: Routine<A>,
    {
        self.run_detailed_blocking(input).map(|m| m.report)
    }

    /// Blocking form of [`run_detailed`](Self::run_detailed).
    pub fn run_detailed_blocking<A>(&mut self, input: &A) -> Result<Measurement, BenchmarkError>
    where
        A: ?Sized,
        R: Routine<A>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(BenchmarkError::Runtime)?;
        runtime.block_on(self.run_detailed(input))
    }

    /// Double the inner-loop size until a batch outlasts both the time
    /// threshold and the timer's minimum batch, or the ceiling is reached.
    ///
    /// Returns the chosen size and the elapsed time of its batch.
    async fn calibrate<A>(
        &mut self,
        input: &A,
        config: &Config,
        timer: &Timer,
    ) -> Result<(usize, f64), BenchmarkError>
    where
        A: ?Sized,
        R: Routine<A>,
    {
        let floor_ms = config.time_threshold_ms.max(timer.min_batch_ms());
        let mut inner = config.inner_iterations;
        loop {
            let elapsed = self
                .timed_batch(input, inner, RoutinePhase::Calibration, timer)
                .await?;
            if elapsed >= floor_ms || inner >= config.max_inner_iterations {
                return Ok((inner, elapsed));
            }
            inner = inner.saturating_mul(2).min(config.max_inner_iterations);
        }
    }

    /// Run `count` invocations back to back and return elapsed milliseconds.
    async fn timed_batch<A>(
        &mut self,
        input: &A,
        count: usize,
        phase: RoutinePhase,
        timer: &Timer,
    ) -> Result<f64, BenchmarkError>
    where
        A: ?Sized,
        R: Routine<A>,
    {
        let start: Instant = timer.start();
        self.invoke_batch(input, count, phase).await?;
        Ok(timer.elapsed_ms(start))
    }

    async fn invoke_batch<A>(
        &mut self,
        input: &A,
        count: usize,
        phase: RoutinePhase,
    ) -> Result<(), BenchmarkError>
    where
        A: ?Sized,
        R: Routine<A>,
    {
        for _ in 0..count {
            match self.routine.invoke(input).await {
                Ok(output) => {
                    black_box(output);
                }
                Err(e) => return Err(self.routine_failed(phase, e.into())),
            }
        }
        Ok(())
    }
}
