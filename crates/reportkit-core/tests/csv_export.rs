//! CSV export aggregator: column alignment, atomicity and the full
//! configure-then-aggregate flow.

use std::sync::Arc;

use reportkit_core::{
    csv_aggregator, data_path, Aggregator, BootstrapContext, Catalog, ConfigurationBuilder,
    CsvExport, CsvExportAggregator, CsvRecord, InMemoryReportStorage, LaunchResults,
    NamedExtension, PluginBundle, ReportError, ReportGenerator, Result, RowSchema, Status,
    TestResult,
};

struct Gap {
    first: String,
    third: String,
}

impl CsvRecord for Gap {
    fn schema() -> RowSchema<Self> {
        RowSchema::new()
            .column(2, "Third", "third", |r: &Gap| r.third.clone())
            .column(0, "First", "first", |r: &Gap| r.first.clone())
    }
}

struct Pair {
    x: String,
    y: u32,
}

impl CsvRecord for Pair {
    fn schema() -> RowSchema<Self> {
        RowSchema::new()
            .column(0, "x", "x", |r: &Pair| r.x.clone())
            .column(1, "y", "y", |r: &Pair| r.y.to_string())
    }
}

struct Failing;

impl CsvExport for Failing {
    type Row = Pair;

    fn name(&self) -> &str {
        "failing"
    }

    fn file_name(&self) -> &str {
        "failing.csv"
    }

    fn rows(&self, _launches: &[LaunchResults]) -> Result<Vec<Pair>> {
        Err(ReportError::RowSource {
            file: self.file_name().to_string(),
            reason: "source unavailable".to_string(),
        })
    }
}

fn storage() -> Arc<InMemoryReportStorage> {
    Arc::new(InMemoryReportStorage::new())
}

#[test]
fn header_gap_aligns_with_rows() {
    let export = csv_aggregator("gap", "gap.csv", |_: &[LaunchResults]| {
        Ok(vec![Gap {
            first: "a".to_string(),
            third: "c".to_string(),
        }])
    });
    let config = ConfigurationBuilder::new().build();
    let storage = storage();

    export.aggregate(&config, &[], storage.as_ref()).unwrap();

    let out = storage.get_string("data/gap.csv").unwrap();
    assert_eq!(out, "First,,Third\na,,c\n");
    let header_width = out.lines().next().unwrap().split(',').count();
    for line in out.lines() {
        assert_eq!(line.split(',').count(), header_width);
    }
}

#[test]
fn failing_row_source_writes_nothing() {
    let aggregator = CsvExportAggregator::new(Failing);
    let config = ConfigurationBuilder::new().build();
    let storage = storage();

    let err = aggregator
        .aggregate(&config, &[], storage.as_ref())
        .unwrap_err();
    assert!(matches!(err, ReportError::RowSource { .. }));
    assert!(!storage.contains(&aggregator.path()));
    assert!(storage.is_empty());
}

#[test]
fn failing_row_source_does_not_stop_other_aggregators() {
    let mut builder = ConfigurationBuilder::new();
    builder
        .add_extension(CsvExportAggregator::new(Failing))
        .add_extension(csv_aggregator("ok", "ok.csv", |_: &[LaunchResults]| {
            Ok(vec![Pair {
                x: "a".to_string(),
                y: 1,
            }])
        }));
    let config = builder.build();
    let storage = storage();
    let report = ReportGenerator::new().run_sequential(&config, &[], storage.clone());

    assert_eq!(report.failures().count(), 1);
    assert_eq!(storage.paths(), vec!["data/ok.csv"]);
}

#[test]
fn end_to_end_configure_then_aggregate() {
    let report_csv = csv_aggregator("report-csv", "report.csv", |_: &[LaunchResults]| {
        Ok(vec![
            Pair {
                x: "a".to_string(),
                y: 1,
            },
            Pair {
                x: "b".to_string(),
                y: 2,
            },
        ])
    });
    let plugin = PluginBundle::new("P1")
        .with_extension(NamedExtension::new("A"))
        .with_extension(report_csv)
        .with_extension(NamedExtension::new("C"))
        .shared();

    let mut builder = ConfigurationBuilder::new();
    builder
        .use_catalog(&Catalog::empty(), &BootstrapContext::new("1.0"))
        .add_extension(NamedExtension::new("D"))
        .add_plugins([plugin]);
    let config = builder.build();

    let names: Vec<_> = config.extensions().iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["D", "A", "report-csv", "C"]);

    let launches = vec![LaunchResults::new(vec![TestResult::new(
        "ignored",
        Status::Passed,
    )])];
    let storage = storage();
    for aggregator in config.aggregators() {
        aggregator
            .aggregate(&config, &launches, storage.as_ref())
            .unwrap();
    }

    assert_eq!(storage.paths(), vec![data_path("report.csv")]);
    assert_eq!(
        storage.get_string("data/report.csv").unwrap(),
        "x,y\na,1\nb,2\n"
    );
}

#[test]
fn zero_rows_write_header_only() {
    let export = csv_aggregator("empty", "empty.csv", |_: &[LaunchResults]| {
        Ok(Vec::<Pair>::new())
    });
    let config = ConfigurationBuilder::new().build();
    let storage = storage();
    export.aggregate(&config, &[], storage.as_ref()).unwrap();
    assert_eq!(storage.get_string("data/empty.csv").unwrap(), "x,y\n");
}
