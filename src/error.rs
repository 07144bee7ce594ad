//! Application-wide error types.
//!
//! Library modules carry specific error types via `thiserror`; this module
//! aggregates them for per-query reporting in the CLI, which itself uses
//! `anyhow` for top-level propagation.

use crate::download::DownloadError;
use crate::resolver::ResolutionError;
use crate::tags::TagError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// One query's failure is one of these; a batch collects them without
/// aborting the remaining queries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata resolution error
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Audio download error
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Tag writing error
    #[error("Tagging error: {0}")]
    Tag(#[from] TagError),
}

impl Error {
    /// Whether this failure counts as "failed to resolve" for the batch
    /// exit code, as opposed to a downstream download/tagging problem.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, Error::Resolution(_))
    }
}
