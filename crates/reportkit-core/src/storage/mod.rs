//! Write-once, path-addressed report storage.
//!
//! Aggregators commit whole artifacts with [`ReportStorage::add_data_binary`].
//! Writing a path twice keeps the last payload.

pub mod fs;
pub mod memory;

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{ReportError, StorageError};

pub use fs::FsReportStorage;
pub use memory::InMemoryReportStorage;

/// Directory prefix for tabular data artifacts.
pub const DATA_DIR: &str = "data";

/// Directory prefix for JSON widget artifacts.
pub const WIDGETS_DIR: &str = "widgets";

/// Storage path of the data file called `name`.
pub fn data_path(name: &str) -> String {
    format!("{DATA_DIR}/{name}")
}

/// Storage path of the widget called `name`.
pub fn widget_path(name: &str) -> String {
    format!("{WIDGETS_DIR}/{name}")
}

/// Result alias for storage backends.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Sink that aggregators write artifacts into.
pub trait ReportStorage: Send + Sync {
    /// Store `payload` under `path`, replacing any previous payload.
    fn add_data_binary(&self, path: &str, payload: Vec<u8>) -> StorageResult<()>;
}

/// Serialize `value` as pretty JSON and commit it under `path`.
pub fn add_json<T: Serialize + ?Sized>(
    storage: &dyn ReportStorage,
    path: &str,
    value: &T,
) -> crate::domain::Result<()> {
    let payload = serde_json::to_vec_pretty(value)
        .map_err(|e| ReportError::export(path, std::io::Error::from(e)))?;
    storage.add_data_binary(path, payload)?;
    Ok(())
}

/// Description of one stored artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    pub path: String,
    pub size: u64,
    pub sha256: String,
}

impl ManifestEntry {
    pub fn describe(path: &str, payload: &[u8]) -> Self {
        Self {
            path: path.to_string(),
            size: payload.len() as u64,
            sha256: sha256_hex(payload),
        }
    }
}

/// Hex-encoded SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Reject paths that are empty, absolute, or escape the report root.
pub(crate) fn validate_path(path: &str) -> StorageResult<()> {
    if path.is_empty() || path.ends_with('/') {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    let ok = Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidPath(path.to_string()))
    }
}
