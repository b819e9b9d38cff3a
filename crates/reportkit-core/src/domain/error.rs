//! Domain-level error taxonomy for reportkit.

/// Errors produced by report storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid artifact path: {0}")]
    InvalidPath(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// reportkit domain errors.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A tabular or JSON artifact could not be encoded. Nothing was written.
    #[error("failed to export {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("row source for {file} failed: {reason}")]
    RowSource { file: String, reason: String },

    #[error("failed to load launch results from {path}: {reason}")]
    LaunchLoad { path: String, reason: String },

    #[error("aggregator {name} panicked")]
    AggregatorPanicked { name: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// Wrap an encoding failure for the artifact at `path`.
    pub fn export(path: impl Into<String>, source: impl Into<std::io::Error>) -> Self {
        ReportError::Export {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Result type for reportkit domain operations.
pub type Result<T> = std::result::Result<T, ReportError>;
