//! Global atomic counters for report generation.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event at the end of a run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lock-free counters, safe to bump from concurrently running aggregators.
pub struct Metrics {
    aggregators_run: AtomicU64,
    aggregators_failed: AtomicU64,
    artifacts_written: AtomicU64,
    bytes_written: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            aggregators_run: AtomicU64::new(0),
            aggregators_failed: AtomicU64::new(0),
            artifacts_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
        }
    }

    /// Count one finished aggregator invocation.
    pub fn inc_aggregators_run(&self, failed: bool) {
        self.aggregators_run.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.aggregators_failed.fetch_add(1, Ordering::Relaxed);
        }
        tracing::trace!(metric = "aggregators_run", "counter incremented");
    }

    /// Count one stored artifact of `bytes` length.
    pub fn record_artifact(&self, bytes: u64) {
        self.artifacts_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
        tracing::trace!(metric = "artifacts_written", bytes, "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            aggregators_run = self.aggregators_run(),
            aggregators_failed = self.aggregators_failed(),
            artifacts_written = self.artifacts_written(),
            bytes_written = self.bytes_written(),
        );
    }

    pub fn aggregators_run(&self) -> u64 {
        self.aggregators_run.load(Ordering::Relaxed)
    }

    pub fn aggregators_failed(&self) -> u64 {
        self.aggregators_failed.load(Ordering::Relaxed)
    }

    pub fn artifacts_written(&self) -> u64 {
        self.artifacts_written.load(Ordering::Relaxed)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.aggregators_run.store(0, Ordering::Relaxed);
        self.aggregators_failed.store(0, Ordering::Relaxed);
        self.artifacts_written.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
    }
}
