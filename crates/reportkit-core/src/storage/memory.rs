use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{validate_path, ManifestEntry, ReportStorage, StorageResult};
use crate::metrics::METRICS;
use crate::obs;

/// In-memory report storage backed by a path-ordered map.
#[derive(Debug, Default)]
pub struct InMemoryReportStorage {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryReportStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // A panicking writer cannot leave a half-inserted entry behind.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Payload stored at `path`, if any.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().get(path).cloned()
    }

    /// Payload stored at `path` decoded as UTF-8.
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lock().contains_key(path)
    }

    /// All stored paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Manifest entries for every stored artifact, sorted by path.
    pub fn manifest(&self) -> Vec<ManifestEntry> {
        self.lock()
            .iter()
            .map(|(path, payload)| ManifestEntry::describe(path, payload))
            .collect()
    }

    /// Snapshot of every `(path, payload)` pair, sorted by path.
    pub fn entries(&self) -> Vec<(String, Vec<u8>)> {
        self.lock()
            .iter()
            .map(|(p, b)| (p.clone(), b.clone()))
            .collect()
    }
}

impl ReportStorage for InMemoryReportStorage {
    fn add_data_binary(&self, path: &str, payload: Vec<u8>) -> StorageResult<()> {
        validate_path(path)?;
        let size = payload.len() as u64;
        let previous = self.lock().insert(path.to_string(), payload);
        if previous.is_some() {
            obs::emit_artifact_overwritten(path);
        }
        METRICS.record_artifact(size);
        obs::emit_artifact_written(path, size);
        Ok(())
    }
}
