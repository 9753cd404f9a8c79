//! # microbench
//!
//! Micro-benchmark harness with adaptive timing and statistical comparison.
//!
//! A [`Benchmark`] runs a routine through a fixed sequence of stages:
//! - Warmup: untimed priming calls
//! - Calibration: the inner loop doubles until one batch outlasts the clock
//!   resolution
//! - Sampling: timed batches until the sample count or time budget runs out
//! - Outlier filtering: Tukey fences at 1.5×IQR
//!
//! and produces a [`Report`] of per-invocation times in milliseconds. Two
//! reports are compared with Welch's t-test ([`compare`]), and one benchmark
//! can be compared across stored runs ([`compare_across_history`]).
//!
//! ## Quick Start
//!
//! ```ignore
//! use microbench::{compare, measure};
//!
//! let a = measure("vec_push", || (0..1_000).collect::<Vec<u32>>())?;
//! let b = measure("vec_with_capacity", || {
//!     let mut v = Vec::with_capacity(1_000);
//!     v.extend(0..1_000u32);
//!     v
//! })?;
//!
//! let cmp = compare(&a, &b)?;
//! if cmp.different {
//!     println!("{:.1}% difference (p = {:.4})", cmp.mean_difference_percent, cmp.p_value);
//! }
//! ```
//!
//! ## Asynchronous routines
//!
//! Routines returning futures are awaited before the next invocation
//! starts, so each sample covers completed work:
//!
//! ```ignore
//! use microbench::{measurement::from_async_fn, Benchmark};
//!
//! let mut bench = Benchmark::new("sleep", from_async_fn(|ms: &u64| {
//!     let ms = *ms;
//!     async move {
//!         tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
//!         Ok::<_, std::io::Error>(())
//!     }
//! }))
//! .max_iterations(20);
//! let report = bench.run(&1).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod bench;
mod config;
mod error;
mod logging;
mod report;

// Functional modules
pub mod compare;
pub mod measurement;
pub mod output;
pub mod statistics;

use std::future::Future;

// Re-exports for public API
pub use bench::{Benchmark, Measurement, Phase};
pub use compare::{compare, compare_across_history, Comparison, EffectSize, HistoryOptions, ReportSet};
pub use config::{Config, Options};
pub use error::{
    BenchmarkError, BoxError, CompareError, ConfigError, RoutinePhase, StatsError,
    ValidationError, Violation,
};
pub use logging::{Level, Logger, MemoryLogger, NullLogger, TracingLogger};
pub use measurement::Timer;
pub use report::{FilterStage, Report, Warning};

use measurement::{from_async_fn, infallible};

/// Measure a closure with the default configuration.
///
/// Blocks the calling thread; must not be called from inside a Tokio
/// runtime.
///
/// # Errors
///
/// See [`Benchmark::run`].
pub fn measure<F, T>(name: impl Into<String>, f: F) -> Result<Report, BenchmarkError>
where
    F: FnMut() -> T,
{
    measure_with(name, Config::default(), f)
}

/// Measure a closure with an explicit configuration.
///
/// `config` is either a resolved [`Config`] or a partial [`Options`] bag,
/// which is merged onto the defaults.
///
/// # Errors
///
/// See [`Benchmark::run`].
pub fn measure_with<F, T>(
    name: impl Into<String>,
    config: impl Into<Config>,
    mut f: F,
) -> Result<Report, BenchmarkError>
where
    F: FnMut() -> T,
{
    Benchmark::new(name, infallible(move |_: &()| f()))
        .with_config(config.into())
        .run_blocking(&())
}

/// Measure a closure returning a future, on the caller's runtime.
///
/// # Errors
///
/// See [`Benchmark::run`].
pub async fn measure_async<F, Fut, T, E>(
    name: impl Into<String>,
    config: impl Into<Config>,
    mut f: F,
) -> Result<Report, BenchmarkError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    let mut bench = Benchmark::new(name, from_async_fn(move |_: &()| f())).with_config(config.into());
    bench.run(&()).await
}
