//! Structured observability hooks for the report generation lifecycle.
//!
//! - `ReportSpan` RAII guard tagging every event with the report name
//! - emission functions for generation start/finish, per-aggregator outcome,
//!   and artifact writes
//!
//! Filter with `REPORTKIT_LOG` (or `RUST_LOG`); see [`crate::telemetry`].

use tracing::{info, warn};

/// RAII guard that enters a report-scoped tracing span.
///
/// ```ignore
/// let _span = ReportSpan::enter("nightly");
/// // events emitted here carry report = "nightly"
/// ```
pub struct ReportSpan {
    _span: tracing::span::EnteredSpan,
}

impl ReportSpan {
    pub fn enter(report_name: &str) -> Self {
        let span = tracing::info_span!("reportkit.report", report = %report_name);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: generation started.
pub fn emit_generation_started(report_name: &str, aggregators: usize, launches: usize) {
    info!(
        event = "report.started",
        report = %report_name,
        aggregators = aggregators,
        launches = launches,
    );
}

/// Emit event: generation finished.
pub fn emit_generation_finished(report_name: &str, duration_ms: u64, failed: usize) {
    info!(
        event = "report.finished",
        report = %report_name,
        duration_ms = duration_ms,
        failed = failed,
        success = failed == 0,
    );
}

/// Emit event: one aggregator completed.
pub fn emit_aggregator_finished(name: &str, duration_ms: u64) {
    info!(event = "aggregator.finished", aggregator = %name, duration_ms = duration_ms);
}

/// Emit event: one aggregator failed (warning level).
pub fn emit_aggregator_failed(name: &str, error: &dyn std::fmt::Display) {
    warn!(event = "aggregator.failed", aggregator = %name, error = %error);
}

/// Emit event: an artifact was committed to storage.
pub fn emit_artifact_written(path: &str, bytes: u64) {
    tracing::debug!(event = "artifact.written", path = %path, bytes = bytes);
}

/// Emit event: an artifact replaced an earlier payload at the same path.
pub fn emit_artifact_overwritten(path: &str) {
    warn!(event = "artifact.overwritten", path = %path);
}
