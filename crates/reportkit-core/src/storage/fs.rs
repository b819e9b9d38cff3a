use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{InMemoryReportStorage, ManifestEntry, ReportStorage, StorageResult};
use crate::domain::StorageError;

/// File name of the manifest written next to the artifacts on flush.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Report storage that buffers artifacts in memory and writes them under an
/// output directory on [`flush`](FsReportStorage::flush).
///
/// Layout: `<root>/<artifact path>` plus `<root>/manifest.json`.
pub struct FsReportStorage {
    root: PathBuf,
    buffer: InMemoryReportStorage,
}

impl FsReportStorage {
    /// Create storage rooted at `root`. Creates `root` if needed.
    pub fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            buffer: InMemoryReportStorage::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Artifacts buffered so far.
    pub fn buffered(&self) -> &InMemoryReportStorage {
        &self.buffer
    }

    /// Write every buffered artifact to disk and return the manifest.
    ///
    /// Each file is written to a temp file in its target directory and then
    /// renamed into place, so readers never observe a partial artifact.
    pub fn flush(&self) -> StorageResult<Vec<ManifestEntry>> {
        let mut manifest = Vec::new();
        for (path, payload) in self.buffer.entries() {
            let target = self.root.join(&path);
            write_atomic(&target, &payload)?;
            debug!(path = %path, target = %target.display(), "artifact flushed");
            manifest.push(ManifestEntry::describe(&path, &payload));
        }

        let raw = serde_json::to_vec_pretty(&manifest).map_err(std::io::Error::from)?;
        write_atomic(&self.root.join(MANIFEST_FILE), &raw)?;
        info!(
            root = %self.root.display(),
            artifacts = manifest.len(),
            "report storage flushed"
        );
        Ok(manifest)
    }
}

impl ReportStorage for FsReportStorage {
    /// Rejects [`MANIFEST_FILE`], which [`flush`](FsReportStorage::flush)
    /// writes itself.
    fn add_data_binary(&self, path: &str, payload: Vec<u8>) -> StorageResult<()> {
        if path == MANIFEST_FILE {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        self.buffer.add_data_binary(path, payload)
    }
}

fn write_atomic(target: &Path, data: &[u8]) -> StorageResult<()> {
    let dir = match target.parent() {
        Some(dir) => dir,
        None => return Err(StorageError::InvalidPath(target.display().to_string())),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
