//! Domain models for reportkit.
//!
//! - `LaunchResults`: one batch of test results fed to aggregators
//! - `TestResult` / `Status` / `Label`: the per-test record
//! - `ReportError`: error taxonomy shared by every pipeline stage

pub mod error;
pub mod launch;

pub use error::{ReportError, Result, StorageError};
pub use launch::{all_results, Label, LaunchResults, Statistic, Status, TestResult};
