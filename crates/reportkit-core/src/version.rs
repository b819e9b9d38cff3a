//! Generator version lookup.
//!
//! Order: `report-version.txt` in the resource directory, then the package
//! metadata version, then [`UNDEFINED_VERSION`].

use std::path::{Path, PathBuf};

use tracing::debug;

/// File name of the packaged version resource.
pub const VERSION_RESOURCE: &str = "report-version.txt";

/// Unsubstituted build placeholder; treated as missing.
pub const VERSION_PLACEHOLDER: &str = "#project.version#";

/// Returned when no source yields a version.
pub const UNDEFINED_VERSION: &str = "Undefined";

/// Environment variable pointing at the resource directory.
pub const RESOURCES_ENV: &str = "REPORTKIT_RESOURCES";

/// Resolves the generator version through the fallback chain.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    resource_dir: Option<PathBuf>,
    package_version: Option<String>,
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self {
            resource_dir: None,
            package_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}

impl VersionResolver {
    /// Resolver reading the resource directory from `REPORTKIT_RESOURCES`.
    pub fn from_env() -> Self {
        Self {
            resource_dir: std::env::var_os(RESOURCES_ENV).map(PathBuf::from),
            ..Self::default()
        }
    }

    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = Some(dir.into());
        self
    }

    /// Override the package metadata version; `None` simulates its absence.
    pub fn with_package_version(mut self, version: Option<&str>) -> Self {
        self.package_version = version.map(str::to_string);
        self
    }

    pub fn resolve(&self) -> String {
        self.resource_version()
            .or_else(|| self.metadata_version())
            .unwrap_or_else(|| UNDEFINED_VERSION.to_string())
    }

    fn resource_version(&self) -> Option<String> {
        let path = self.resource_dir.as_deref()?.join(VERSION_RESOURCE);
        read_version_file(&path)
    }

    fn metadata_version(&self) -> Option<String> {
        self.package_version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

fn read_version_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(raw) => {
            let version = raw.trim();
            if version.is_empty() || version == VERSION_PLACEHOLDER {
                debug!(path = %path.display(), "version resource is empty or unsubstituted");
                None
            } else {
                Some(version.to_string())
            }
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "could not read version resource");
            None
        }
    }
}
