//! `data/suites.csv`: one row per result with its suite hierarchy.

use chrono::DateTime;

use crate::catalog::BootstrapContext;
use crate::csv_export::{CsvExport, CsvExportAggregator, CsvRecord, RowSchema};
use crate::domain::{all_results, LaunchResults, Result, TestResult};
use crate::plugin::{PluginBundle, PluginRef};

pub const NAME: &str = "suites";
pub const FILE_NAME: &str = "suites.csv";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteRow {
    pub status: String,
    pub start: String,
    pub stop: String,
    pub duration: String,
    pub parent_suite: String,
    pub suite: String,
    pub sub_suite: String,
    pub test_class: String,
    pub test_method: String,
    pub name: String,
    pub description: String,
}

/// Format epoch milliseconds as UTC wall time.
fn format_millis(ms: Option<i64>) -> String {
    ms.and_then(DateTime::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_default()
}

impl From<&TestResult> for SuiteRow {
    fn from(r: &TestResult) -> Self {
        let label = |name: &str| r.label(name).unwrap_or_default().to_string();
        Self {
            status: r.status.as_str().to_string(),
            start: format_millis(r.start),
            stop: format_millis(r.stop),
            duration: r.duration_ms().map(|d| d.to_string()).unwrap_or_default(),
            parent_suite: label("parentSuite"),
            suite: label("suite"),
            sub_suite: label("subSuite"),
            test_class: label("testClass"),
            test_method: label("testMethod"),
            name: r.name.clone(),
            description: r.description.clone().unwrap_or_default(),
        }
    }
}

impl CsvRecord for SuiteRow {
    fn schema() -> RowSchema<Self> {
        RowSchema::new()
            .column(0, "Status", "status", |r: &SuiteRow| r.status.clone())
            .column(1, "Start Time", "start", |r: &SuiteRow| r.start.clone())
            .column(2, "Stop Time", "stop", |r: &SuiteRow| r.stop.clone())
            .column(3, "Duration in ms", "duration", |r: &SuiteRow| {
                r.duration.clone()
            })
            .column(4, "Parent Suite", "parent_suite", |r: &SuiteRow| {
                r.parent_suite.clone()
            })
            .column(5, "Suite", "suite", |r: &SuiteRow| r.suite.clone())
            .column(6, "Sub Suite", "sub_suite", |r: &SuiteRow| {
                r.sub_suite.clone()
            })
            .column(7, "Test Class", "test_class", |r: &SuiteRow| {
                r.test_class.clone()
            })
            .column(8, "Test Method", "test_method", |r: &SuiteRow| {
                r.test_method.clone()
            })
            .column(9, "Name", "name", |r: &SuiteRow| r.name.clone())
            .column(10, "Description", "description", |r: &SuiteRow| {
                r.description.clone()
            })
    }
}

pub struct SuitesCsvExport;

impl CsvExport for SuitesCsvExport {
    type Row = SuiteRow;

    fn name(&self) -> &str {
        NAME
    }

    fn file_name(&self) -> &str {
        FILE_NAME
    }

    fn rows(&self, launches: &[LaunchResults]) -> Result<Vec<SuiteRow>> {
        Ok(all_results(launches).map(SuiteRow::from).collect())
    }
}

pub fn plugin(_: &BootstrapContext) -> PluginRef {
    PluginBundle::new(NAME)
        .with_extension(CsvExportAggregator::new(SuitesCsvExport))
        .shared()
}
