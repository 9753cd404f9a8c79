//! Wall-clock timing for benchmark batches.
//!
//! Batches are timed with the monotonic `std::time::Instant`; elapsed
//! times are reported in fractional milliseconds.

use std::hint::black_box as std_black_box;
use std::time::{Duration, Instant};

/// Wrapper around `std::hint::black_box` for preventing compiler optimizations.
///
/// Routine outputs pass through this so the compiler cannot discard the
/// work being measured.
#[inline]
pub fn black_box<T>(x: T) -> T {
    std_black_box(x)
}

/// Convert a duration to fractional milliseconds.
#[inline]
pub fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

const RESOLUTION_PROBES: usize = 100;

/// Clock ticks a timed batch must span before its elapsed time is trusted.
pub const MIN_BATCH_TICKS: f64 = 100.0;

/// Empirically measure clock resolution by finding the minimum non-zero step.
fn measure_resolution_ns() -> f64 {
    let mut min_diff = u128::MAX;

    for _ in 0..RESOLUTION_PROBES {
        let t1 = Instant::now();
        let mut t2 = Instant::now();
        while t2 == t1 {
            t2 = Instant::now();
        }
        let diff = t2.duration_since(t1).as_nanos();
        if diff > 0 && diff < min_diff {
            min_diff = diff;
        }
    }

    if min_diff == u128::MAX {
        1.0
    } else {
        min_diff as f64
    }
}

/// Monotonic timer with a measured resolution.
#[derive(Debug, Clone)]
pub struct Timer {
    /// Smallest observable clock step in nanoseconds.
    resolution_ns: f64,
}

impl Timer {
    /// Create a timer, measuring the clock resolution.
    pub fn new() -> Self {
        Self {
            resolution_ns: measure_resolution_ns(),
        }
    }

    /// Create a timer with a known resolution.
    ///
    /// Useful for testing or when the resolution was measured earlier.
    pub fn with_resolution_ns(resolution_ns: f64) -> Self {
        Self { resolution_ns }
    }

    /// Smallest observable clock step in nanoseconds.
    pub fn resolution_ns(&self) -> f64 {
        self.resolution_ns
    }

    /// Smallest observable clock step in milliseconds.
    pub fn resolution_ms(&self) -> f64 {
        self.resolution_ns / 1_000_000.0
    }

    /// Shortest batch, in milliseconds, that spans [`MIN_BATCH_TICKS`] clock steps.
    pub fn min_batch_ms(&self) -> f64 {
        MIN_BATCH_TICKS * self.resolution_ms()
    }

    /// Start a measurement.
    #[inline]
    pub fn start(&self) -> Instant {
        Instant::now()
    }

    /// Milliseconds elapsed since `start`.
    #[inline]
    pub fn elapsed_ms(&self, start: Instant) -> f64 {
        duration_ms(start.elapsed())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
