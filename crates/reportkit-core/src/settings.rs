//! Run settings with environment-variable defaults.

use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::pipeline::{ExecutionMode, FailurePolicy, ReportGenerator};
use crate::version::{VersionResolver, RESOURCES_ENV};

pub const REPORT_NAME_ENV: &str = "REPORTKIT_REPORT_NAME";
pub const OUTPUT_ENV: &str = "REPORTKIT_OUTPUT";
pub const CONCURRENT_ENV: &str = "REPORTKIT_CONCURRENT";
pub const FAIL_FAST_ENV: &str = "REPORTKIT_FAIL_FAST";
pub const MAX_PARALLEL_ENV: &str = "REPORTKIT_MAX_PARALLEL";

/// Default output directory.
pub const DEFAULT_OUTPUT: &str = "reportkit-report";

/// Settings for one `generate` run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateSettings {
    pub report_name: Option<String>,
    pub output: PathBuf,
    pub concurrent: bool,
    pub fail_fast: bool,
    /// Concurrent-mode cap on running aggregators; `None` runs all at once.
    #[serde(default)]
    pub max_parallel: Option<usize>,
    pub resources: Option<PathBuf>,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            report_name: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            concurrent: false,
            fail_fast: false,
            max_parallel: None,
            resources: None,
        }
    }
}

impl GenerateSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut settings = Self::default();
        if let Some(name) = lookup(REPORT_NAME_ENV).filter(|v| !v.trim().is_empty()) {
            settings.report_name = Some(name);
        }
        if let Some(output) = lookup(OUTPUT_ENV).filter(|v| !v.trim().is_empty()) {
            settings.output = PathBuf::from(output);
        }
        if let Some(raw) = lookup(CONCURRENT_ENV) {
            settings.concurrent =
                parse_bool(&raw).with_context(|| format!("invalid {CONCURRENT_ENV}"))?;
        }
        if let Some(raw) = lookup(FAIL_FAST_ENV) {
            settings.fail_fast =
                parse_bool(&raw).with_context(|| format!("invalid {FAIL_FAST_ENV}"))?;
        }
        if let Some(raw) = lookup(MAX_PARALLEL_ENV).filter(|v| !v.trim().is_empty()) {
            let limit: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {MAX_PARALLEL_ENV}"))?;
            settings.max_parallel = Some(limit).filter(|n| *n > 0);
        }
        if let Some(dir) = lookup(RESOURCES_ENV).filter(|v| !v.trim().is_empty()) {
            settings.resources = Some(PathBuf::from(dir));
        }
        Ok(settings)
    }

    pub fn generator(&self) -> ReportGenerator {
        let mode = if self.concurrent {
            ExecutionMode::Concurrent
        } else {
            ExecutionMode::Sequential
        };
        let policy = if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Isolate
        };
        ReportGenerator::new()
            .with_mode(mode)
            .with_policy(policy)
            .with_max_parallel(self.max_parallel)
    }

    pub fn version_resolver(&self) -> VersionResolver {
        match &self.resources {
            Some(dir) => VersionResolver::default().with_resource_dir(dir),
            None => VersionResolver::default(),
        }
    }
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let settings = GenerateSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, GenerateSettings::default());
        assert_eq!(settings.generator().mode(), ExecutionMode::Sequential);
        assert_eq!(settings.generator().policy(), FailurePolicy::Isolate);
    }

    #[test]
    fn reads_every_key() {
        let settings = GenerateSettings::from_lookup(lookup(&[
            (REPORT_NAME_ENV, "nightly"),
            (OUTPUT_ENV, "out"),
            (CONCURRENT_ENV, "true"),
            (FAIL_FAST_ENV, "1"),
            (MAX_PARALLEL_ENV, "3"),
            (RESOURCES_ENV, "/opt/res"),
        ]))
        .unwrap();
        assert_eq!(settings.report_name.as_deref(), Some("nightly"));
        assert_eq!(settings.output, PathBuf::from("out"));
        assert_eq!(settings.generator().mode(), ExecutionMode::Concurrent);
        assert_eq!(settings.generator().policy(), FailurePolicy::FailFast);
        assert_eq!(settings.generator().max_parallel(), Some(3));
        assert_eq!(settings.resources, Some(PathBuf::from("/opt/res")));
    }

    #[test]
    fn rejects_garbage_booleans() {
        let err = GenerateSettings::from_lookup(lookup(&[(CONCURRENT_ENV, "maybe")])).unwrap_err();
        assert!(format!("{err:#}").contains(CONCURRENT_ENV));
    }

    #[test]
    fn zero_or_garbage_max_parallel() {
        let settings = GenerateSettings::from_lookup(lookup(&[(MAX_PARALLEL_ENV, "0")])).unwrap();
        assert_eq!(settings.max_parallel, None);

        let err = GenerateSettings::from_lookup(lookup(&[(MAX_PARALLEL_ENV, "-2")])).unwrap_err();
        assert!(format!("{err:#}").contains(MAX_PARALLEL_ENV));
    }

    #[test]
    fn version_resolver_uses_resources_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report-version.txt"), "9.9.9\n").unwrap();
        let settings = GenerateSettings {
            resources: Some(dir.path().to_path_buf()),
            ..GenerateSettings::default()
        };
        assert_eq!(settings.version_resolver().resolve(), "9.9.9");
    }
}
