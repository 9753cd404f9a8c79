//! Logging capability handed to each benchmark.
//!
//! The engine never reaches for a global logger; a `Benchmark` owns an
//! `Arc<dyn Logger>` and reports through it. [`TracingLogger`] is the
//! default and forwards to `tracing` under the `microbench` target, so the
//! host controls verbosity with its subscriber filter.

use std::sync::{Arc, Mutex};

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Progress information.
    Info,
    /// Reliability warnings.
    Warn,
    /// Failures.
    Error,
}

/// Sink for engine messages.
pub trait Logger: Send + Sync {
    /// Progress information.
    fn info(&self, message: &str);
    /// Reliability warnings; never fatal.
    fn warn(&self, message: &str);
    /// Failures that abort a run.
    fn error(&self, message: &str);
}

/// Forwards to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "microbench", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "microbench", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "microbench", "{}", message);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Keeps entries in memory, at or above a minimum level.
#[derive(Debug)]
pub struct MemoryLogger {
    min_level: Level,
    entries: Mutex<Vec<(Level, String)>>,
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl MemoryLogger {
    /// Record entries at `min_level` and above.
    pub fn new(min_level: Level) -> Self {
        Self {
            min_level,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Convenience for sharing with a `Benchmark` while keeping a handle.
    pub fn shared(min_level: Level) -> Arc<Self> {
        Arc::new(Self::new(min_level))
    }

    /// Snapshot of recorded entries.
    pub fn entries(&self) -> Vec<(Level, String)> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages recorded at exactly `level`.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        if level < self.min_level {
            return;
        }
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push((level, message.to_string()));
    }
}

impl Logger for MemoryLogger {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}
