//! Report generation: run every aggregator of a [`Configuration`] against a
//! batch of launches and collect per-aggregator outcomes.
//!
//! Outcomes are always reported in registration order, whichever mode ran
//! them.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, Instrument};

use crate::configuration::Configuration;
use crate::domain::{LaunchResults, ReportError};
use crate::extension::ExtensionRef;
use crate::metrics::METRICS;
use crate::obs;
use crate::storage::{ReportStorage, StorageResult};

/// How aggregators are scheduled.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One at a time, in registration order.
    #[default]
    Sequential,
    /// All at once on blocking tasks.
    Concurrent,
}

/// What happens after an aggregator fails.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and keep going.
    #[default]
    Isolate,
    /// Stop scheduling further aggregators.
    FailFast,
}

/// Result of one aggregator invocation.
#[derive(Debug)]
pub struct AggregatorOutcome {
    pub name: String,
    pub duration_ms: u64,
    /// Paths committed to storage by this aggregator, in write order.
    pub artifacts: Vec<String>,
    pub error: Option<ReportError>,
}

impl AggregatorOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub report_name: String,
    pub duration_ms: u64,
    /// Outcomes of aggregators that ran, in registration order.
    pub outcomes: Vec<AggregatorOutcome>,
    /// Aggregators never started because of [`FailurePolicy::FailFast`].
    pub skipped: Vec<String>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.skipped.is_empty() && self.outcomes.iter().all(AggregatorOutcome::is_success)
    }

    /// Failed outcomes, in registration order.
    pub fn failures(&self) -> impl Iterator<Item = &AggregatorOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn artifact_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.artifacts.len()).sum()
    }

    /// Turn a failed run into an error naming every failed aggregator.
    pub fn into_result(self) -> anyhow::Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let failed: Vec<String> = self
            .failures()
            .filter_map(|o| o.error.as_ref().map(|e| format!("{}: {e}", o.name)))
            .collect();
        let mut message = format!(
            "{} of {} aggregators failed",
            failed.len(),
            self.outcomes.len() + self.skipped.len()
        );
        if !failed.is_empty() {
            message.push_str(&format!(" ({})", failed.join("; ")));
        }
        if !self.skipped.is_empty() {
            message.push_str(&format!(", skipped: {}", self.skipped.join(", ")));
        }
        Err(anyhow::anyhow!(message))
    }
}

/// Storage wrapper that remembers which paths were committed through it.
struct RecordingStorage {
    inner: Arc<dyn ReportStorage>,
    written: Mutex<Vec<String>>,
}

impl RecordingStorage {
    fn new(inner: Arc<dyn ReportStorage>) -> Self {
        Self {
            inner,
            written: Mutex::new(Vec::new()),
        }
    }

    fn into_paths(self) -> Vec<String> {
        self.written
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReportStorage for RecordingStorage {
    fn add_data_binary(&self, path: &str, payload: Vec<u8>) -> StorageResult<()> {
        self.inner.add_data_binary(path, payload)?;
        self.written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(path.to_string());
        Ok(())
    }
}

/// Invoke one aggregator, converting a panic into [`ReportError::AggregatorPanicked`].
fn invoke(
    extension: &ExtensionRef,
    configuration: &Configuration,
    launches: &[LaunchResults],
    storage: &Arc<dyn ReportStorage>,
) -> AggregatorOutcome {
    let name = extension.name().to_string();
    let recording = RecordingStorage::new(Arc::clone(storage));
    let started = Instant::now();

    let result = match extension.as_aggregator() {
        Some(aggregator) => {
            let attempt =
                AssertUnwindSafe(|| aggregator.aggregate(configuration, launches, &recording));
            catch_unwind(attempt).unwrap_or_else(|_| {
                Err(ReportError::AggregatorPanicked { name: name.clone() })
            })
        }
        None => Ok(()),
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    METRICS.inc_aggregators_run(result.is_err());
    match &result {
        Ok(()) => obs::emit_aggregator_finished(&name, duration_ms),
        Err(e) => obs::emit_aggregator_failed(&name, e),
    }

    AggregatorOutcome {
        name,
        duration_ms,
        artifacts: recording.into_paths(),
        error: result.err(),
    }
}

/// Runs aggregators with a chosen [`ExecutionMode`] and [`FailurePolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportGenerator {
    mode: ExecutionMode,
    policy: FailurePolicy,
    max_parallel: Option<usize>,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Cap on aggregators in flight in concurrent mode. `None` or `0` means
    /// no cap.
    pub fn with_max_parallel(mut self, max_parallel: Option<usize>) -> Self {
        self.max_parallel = max_parallel.filter(|n| *n > 0);
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn max_parallel(&self) -> Option<usize> {
        self.max_parallel
    }

    /// Run every aggregator in `configuration` according to the mode.
    pub async fn run(
        &self,
        configuration: &Configuration,
        launches: Arc<Vec<LaunchResults>>,
        storage: Arc<dyn ReportStorage>,
    ) -> GenerationReport {
        match self.mode {
            ExecutionMode::Sequential => self.run_sequential(configuration, &launches, storage),
            ExecutionMode::Concurrent => {
                let span = tracing::info_span!(
                    "reportkit.report",
                    report = %configuration.display_name()
                );
                self.run_concurrent(configuration, launches, storage)
                    .instrument(span)
                    .await
            }
        }
    }

    /// Run aggregators one by one on the current thread.
    pub fn run_sequential(
        &self,
        configuration: &Configuration,
        launches: &[LaunchResults],
        storage: Arc<dyn ReportStorage>,
    ) -> GenerationReport {
        let _span = obs::ReportSpan::enter(configuration.display_name());
        let aggregators = configuration.aggregator_extensions();
        obs::emit_generation_started(
            configuration.display_name(),
            aggregators.len(),
            launches.len(),
        );
        let started = Instant::now();

        let mut outcomes = Vec::with_capacity(aggregators.len());
        let mut skipped = Vec::new();
        let mut stopped = false;
        for extension in &aggregators {
            if stopped {
                skipped.push(extension.name().to_string());
                continue;
            }
            let outcome = invoke(extension, configuration, launches, &storage);
            stopped = !outcome.is_success() && self.policy == FailurePolicy::FailFast;
            outcomes.push(outcome);
        }

        self.finish(configuration, started, outcomes, skipped)
    }

    /// Fan aggregators out on blocking tasks, at most `max_parallel` at a
    /// time. Under [`FailurePolicy::FailFast`] no new task is started after
    /// the first failure; tasks already started run to completion.
    async fn run_concurrent(
        &self,
        configuration: &Configuration,
        launches: Arc<Vec<LaunchResults>>,
        storage: Arc<dyn ReportStorage>,
    ) -> GenerationReport {
        let aggregators = configuration.aggregator_extensions();
        obs::emit_generation_started(
            configuration.display_name(),
            aggregators.len(),
            launches.len(),
        );
        let started = Instant::now();
        let limit = self.max_parallel.unwrap_or(aggregators.len()).max(1);

        let mut join_set = JoinSet::new();
        let mut slots: Vec<Option<AggregatorOutcome>> = aggregators.iter().map(|_| None).collect();
        let mut pending = aggregators.iter().cloned().enumerate();
        let mut stopped = false;

        loop {
            while !stopped && join_set.len() < limit {
                let Some((idx, extension)) = pending.next() else {
                    break;
                };
                let configuration = configuration.clone();
                let launches = Arc::clone(&launches);
                let storage = Arc::clone(&storage);
                let span = tracing::Span::current();
                join_set.spawn_blocking(move || {
                    let _entered = span.enter();
                    (idx, invoke(&extension, &configuration, &launches, &storage))
                });
            }

            let Some(joined) = join_set.join_next().await else {
                break;
            };
            match joined {
                Ok((idx, outcome)) => {
                    let failed = !outcome.is_success();
                    if failed && self.policy == FailurePolicy::FailFast && !stopped {
                        debug!(
                            aggregator = %outcome.name,
                            "fail-fast: no further aggregators will start"
                        );
                        stopped = true;
                    }
                    slots[idx] = Some(outcome);
                }
                Err(e) => debug!(error = %e, "aggregator task ended abnormally"),
            }
        }

        let mut outcomes = Vec::with_capacity(aggregators.len());
        let mut skipped = Vec::new();
        for (extension, slot) in aggregators.iter().zip(slots) {
            match slot {
                Some(outcome) => outcomes.push(outcome),
                None => skipped.push(extension.name().to_string()),
            }
        }

        self.finish(configuration, started, outcomes, skipped)
    }

    fn finish(
        &self,
        configuration: &Configuration,
        started: Instant,
        outcomes: Vec<AggregatorOutcome>,
        skipped: Vec<String>,
    ) -> GenerationReport {
        let report = GenerationReport {
            report_name: configuration.display_name().to_string(),
            duration_ms: started.elapsed().as_millis() as u64,
            outcomes,
            skipped,
        };
        obs::emit_generation_finished(
            &report.report_name,
            report.duration_ms,
            report.failures().count(),
        );
        report
    }
}
