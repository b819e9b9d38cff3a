//! Built-in plugins end to end: default bootstrap, one run, every widget.

use std::sync::Arc;

use reportkit_core::builtin::launches::LaunchInfo;
use reportkit_core::builtin::status_chart::StatusChartItem;
use reportkit_core::builtin::summary::SummaryWidget;
use reportkit_core::{
    BootstrapContext, Catalog, ConfigurationBuilder, InMemoryReportStorage, LaunchResults,
    ReportGenerator, Status, TestResult,
};

fn launches() -> Vec<LaunchResults> {
    vec![
        LaunchResults::new(vec![
            TestResult::new("opens, then closes", Status::Passed)
                .with_uid("u1")
                .with_time(0, 2_000)
                .with_label("parentSuite", "ui")
                .with_label("suite", "dialogs")
                .with_label("testClass", "DialogTest")
                .with_label("testMethod", "opensThenCloses"),
            TestResult::new("crashes", Status::Broken)
                .with_uid("u2")
                .with_label("severity", "blocker"),
        ])
        .with_name("desktop"),
        LaunchResults::new(vec![TestResult::new("syncs", Status::Failed).with_uid("u3")])
            .with_name("mobile"),
    ]
}

fn run() -> Arc<InMemoryReportStorage> {
    let ctx = BootstrapContext::new("4.5.6").with_report_uid("uid-1");
    let mut builder = ConfigurationBuilder::new();
    builder
        .use_catalog(&Catalog::builtin(), &ctx)
        .with_report_name("nightly");
    let config = builder.build();

    let storage = Arc::new(InMemoryReportStorage::new());
    let report = ReportGenerator::new().run_sequential(&config, &launches(), storage.clone());
    assert!(report.is_success(), "{report:?}");
    storage
}

#[test]
fn default_catalog_writes_every_artifact() {
    let storage = run();
    assert_eq!(
        storage.paths(),
        vec![
            "data/suites.csv",
            "widgets/launch.json",
            "widgets/status-chart.json",
            "widgets/summary.json",
        ]
    );
}

#[test]
fn summary_widget_carries_report_info() {
    let storage = run();
    let summary: SummaryWidget =
        serde_json::from_slice(&storage.get("widgets/summary.json").unwrap()).unwrap();
    assert_eq!(summary.report_name, "nightly");
    assert_eq!(summary.generator_version.as_deref(), Some("4.5.6"));
    assert_eq!(summary.report_uid.as_deref(), Some("uid-1"));
    assert_eq!(summary.launches, 2);
    assert_eq!(summary.statistic.total, 3);
    assert_eq!(summary.statistic.broken, 1);
    assert_eq!(summary.time.duration, Some(2_000));
}

#[test]
fn status_chart_lists_every_result() {
    let storage = run();
    let items: Vec<StatusChartItem> =
        serde_json::from_slice(&storage.get("widgets/status-chart.json").unwrap()).unwrap();
    let uids: Vec<_> = items.iter().map(|i| i.uid.as_str()).collect();
    assert_eq!(uids, vec!["u1", "u2", "u3"]);
    assert_eq!(items[1].severity, "blocker");
}

#[test]
fn launch_widget_has_one_entry_per_launch() {
    let storage = run();
    let infos: Vec<LaunchInfo> =
        serde_json::from_slice(&storage.get("widgets/launch.json").unwrap()).unwrap();
    assert_eq!(infos.len(), 2);
    assert_eq!(infos[0].name.as_deref(), Some("desktop"));
    assert_eq!(infos[0].statistic.total, 2);
    assert_eq!(infos[1].statistic.failed, 1);
}

#[test]
fn suites_csv_has_header_and_quoted_cells() {
    let storage = run();
    let csv = storage.get_string("data/suites.csv").unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "Status,Start Time,Stop Time,Duration in ms,Parent Suite,Suite,Sub Suite,Test Class,Test Method,Name,Description"
    );
    assert_eq!(
        lines[1],
        "passed,1970-01-01 00:00:00.000,1970-01-01 00:00:02.000,2000,ui,dialogs,,DialogTest,opensThenCloses,\"opens, then closes\","
    );
    assert!(lines[2].starts_with("broken,,,,"));
}

#[test]
fn extreme_timestamps_still_produce_every_artifact() {
    let launch: LaunchResults = serde_json::from_value(serde_json::json!({
        "name": "edge",
        "results": [{
            "uid": "x",
            "name": "far apart",
            "status": "passed",
            "start": -9_000_000_000_000_000_000i64,
            "stop": 9_000_000_000_000_000_000i64
        }]
    }))
    .unwrap();

    let mut builder = ConfigurationBuilder::new();
    builder.use_catalog(&Catalog::builtin(), &BootstrapContext::new("1.0"));
    let config = builder.build();
    let storage = Arc::new(InMemoryReportStorage::new());
    let report = ReportGenerator::new().run_sequential(&config, &[launch], storage.clone());

    assert!(report.is_success(), "{report:?}");
    assert_eq!(storage.len(), 4);

    let summary: SummaryWidget =
        serde_json::from_slice(&storage.get("widgets/summary.json").unwrap()).unwrap();
    assert_eq!(summary.time.duration, None);
    assert_eq!(summary.time.sum_duration, 0);

    let csv = storage.get_string("data/suites.csv").unwrap();
    assert_eq!(csv.lines().nth(1).unwrap(), "passed,,,,,,,,,far apart,");
}
