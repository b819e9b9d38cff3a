//! Built-in extensions and plugins registered by the default bootstrap.

pub mod launches;
pub mod report_info;
pub mod status_chart;
pub mod suites;
pub mod summary;

use crate::catalog::Catalog;

/// Default catalog, in registration order.
pub fn catalog() -> Catalog {
    Catalog::empty()
        .with_extension(report_info::NAME, report_info::extension)
        .with_plugin(summary::NAME, summary::plugin)
        .with_plugin(status_chart::NAME, status_chart::plugin)
        .with_plugin(suites::NAME, suites::plugin)
        .with_plugin(launches::NAME, launches::plugin)
}
