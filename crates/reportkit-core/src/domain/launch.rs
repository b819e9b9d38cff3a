//! Launch results fed to every aggregator.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{ReportError, Result};

/// Outcome of a single test.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
    Broken,
    Skipped,
    #[default]
    Unknown,
}

impl Status {
    /// All statuses in display order.
    pub const ALL: [Status; 5] = [
        Status::Failed,
        Status::Broken,
        Status::Passed,
        Status::Skipped,
        Status::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::Broken => "broken",
            Status::Skipped => "skipped",
            Status::Unknown => "unknown",
        }
    }
}

/// A `name=value` label attached to a test result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single test result inside a launch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    #[serde(default)]
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub status: Status,
    /// Start time in epoch milliseconds.
    #[serde(default)]
    pub start: Option<i64>,
    /// Stop time in epoch milliseconds.
    #[serde(default)]
    pub stop: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl TestResult {
    pub fn new(name: impl Into<String>, status: Status) -> Self {
        Self {
            name: name.into(),
            status,
            ..Self::default()
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push(Label::new(name, value));
        self
    }

    pub fn with_time(mut self, start: i64, stop: i64) -> Self {
        self.start = Some(start);
        self.stop = Some(stop);
        self
    }

    /// First value of the label called `name`.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.value.as_str())
    }

    /// Duration in milliseconds, when both ends are known and the
    /// difference fits in an `i64`.
    pub fn duration_ms(&self) -> Option<i64> {
        match (self.start, self.stop) {
            (Some(start), Some(stop)) => stop.checked_sub(start),
            _ => None,
        }
    }
}

/// Per-status counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Statistic {
    pub failed: usize,
    pub broken: usize,
    pub skipped: usize,
    pub passed: usize,
    pub unknown: usize,
    pub total: usize,
}

impl Statistic {
    pub fn update(&mut self, status: Status) {
        match status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::Broken => self.broken += 1,
            Status::Skipped => self.skipped += 1,
            Status::Unknown => self.unknown += 1,
        }
        self.total += 1;
    }
}

impl<'a> FromIterator<&'a TestResult> for Statistic {
    fn from_iter<I: IntoIterator<Item = &'a TestResult>>(iter: I) -> Self {
        let mut stat = Statistic::default();
        for result in iter {
            stat.update(result.status);
        }
        stat
    }
}

/// One batch of test-run results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchResults {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub executor: Option<String>,
    #[serde(default)]
    pub results: Vec<TestResult>,
}

impl LaunchResults {
    pub fn new(results: Vec<TestResult>) -> Self {
        Self {
            name: None,
            executor: None,
            results,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Load a launch from a JSON document on disk.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ReportError::LaunchLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| ReportError::LaunchLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn statistic(&self) -> Statistic {
        self.results.iter().collect()
    }
}

/// Iterate every result across all launches, in launch order.
pub fn all_results(launches: &[LaunchResults]) -> impl Iterator<Item = &TestResult> {
    launches.iter().flat_map(|l| l.results.iter())
}
