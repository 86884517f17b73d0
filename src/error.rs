//! Error types for bammart

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for bammart operations
pub type Result<T> = std::result::Result<T, BamMartError>;

/// Every failure is fatal to a run; nothing is retried.
#[derive(Debug, Error)]
pub enum BamMartError {
    /// Root directory or alignment file could not be read
    #[error("cannot access {}: {reason}", .path.display())]
    FileAccess { path: PathBuf, reason: String },

    /// Root directory holds no .bam/.sam files
    #[error("no alignment files found under {}", .root.display())]
    NoAlignmentFiles { root: PathBuf },

    /// The annotation service declined a batch
    #[error("batch {batch} rejected by annotation service: {message}")]
    QueryRejected { batch: usize, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response from annotation service: {0}")]
    MalformedResponse(String),

    #[error("result columns {found:?} do not match expected {expected:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("configuration error: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BamMartError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        BamMartError::FileAccess {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors in the FileAccessError family.
    pub fn is_file_access(&self) -> bool {
        matches!(
            self,
            BamMartError::FileAccess { .. } | BamMartError::NoAlignmentFiles { .. }
        )
    }

    /// True when the remote service refused or garbled a query.
    pub fn is_query_rejected(&self) -> bool {
        matches!(
            self,
            BamMartError::QueryRejected { .. }
                | BamMartError::Http(_)
                | BamMartError::MalformedResponse(_)
        )
    }
}
