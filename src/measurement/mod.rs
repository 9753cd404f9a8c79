//! Measurement infrastructure for benchmark runs.
//!
//! This module provides:
//! - The [`Routine`] abstraction over synchronous and asynchronous work
//! - Wall-clock batch timing with a measured clock resolution
//! - IQR-based outlier filtering
//!
//! # Timing model
//!
//! A single invocation of a fast routine can be shorter than the clock
//! resolution, so invocations are timed in batches of `inner` back-to-back
//! calls and each sample is `batch_elapsed / inner`. The batch size is
//! calibrated once per run by doubling until a batch takes at least
//! `time_threshold_ms` and spans [`MIN_BATCH_TICKS`] steps of the measured
//! clock resolution.

mod outlier;
mod routine;
mod timer;

pub use outlier::{filter_outliers, OutlierStats, IQR_MULTIPLIER};
pub use routine::{from_async_fn, from_fn, infallible, FromAsyncFn, FromFn, InfallibleFn, Routine};
pub use timer::{black_box, duration_ms, Timer, MIN_BATCH_TICKS};
