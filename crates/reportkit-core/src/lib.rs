//! reportkit core library
//!
//! Plugin registry, frozen configuration, aggregators and report storage.
//! A run registers extensions and plugins with a [`ConfigurationBuilder`],
//! freezes them into a [`Configuration`], and lets a [`ReportGenerator`]
//! invoke every aggregator against a batch of [`LaunchResults`].

pub mod aggregator;
pub mod builtin;
pub mod catalog;
pub mod configuration;
pub mod csv_export;
pub mod domain;
pub mod extension;
pub mod metrics;
pub mod obs;
pub mod pipeline;
pub mod plugin;
pub mod settings;
pub mod storage;
pub mod telemetry;
pub mod version;

pub use aggregator::Aggregator;
pub use catalog::{BootstrapContext, Catalog, CatalogEntry};
pub use configuration::{Configuration, ConfigurationBuilder, UNNAMED_REPORT};
pub use csv_export::{
    csv_aggregator, to_csv_bytes, write_csv, Binding, CsvExport, CsvExportAggregator, CsvRecord,
    FnCsvExport, RowSchema,
};
pub use domain::{
    all_results, Label, LaunchResults, ReportError, Result, Statistic, Status, StorageError,
    TestResult,
};
pub use extension::{
    same_extension, Capability, Extension, ExtensionRef, NamedExtension, ReportInfo,
};
pub use pipeline::{
    AggregatorOutcome, ExecutionMode, FailurePolicy, GenerationReport, ReportGenerator,
};
pub use plugin::{Plugin, PluginBundle, PluginRef};
pub use settings::GenerateSettings;
pub use storage::{
    add_json, data_path, widget_path, FsReportStorage, InMemoryReportStorage, ManifestEntry,
    ReportStorage,
};
pub use version::{VersionResolver, UNDEFINED_VERSION};

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
