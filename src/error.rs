//! Error taxonomy for catalyst and plan loading.
//!
//! Every failure surfaced by the loader and the plan store is one of these
//! variants. `kind()` gives callers a stable discriminant so they can branch on
//! the class of failure without matching message text.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalystError>;

#[derive(Debug, Error)]
pub enum CatalystError {
    #[error("directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("manifest missing: expected {}", .path.display())]
    ManifestMissing { path: PathBuf },

    #[error("invalid manifest {}:\n{message}", .path.display())]
    ManifestInvalid { path: PathBuf, message: String },

    #[error("unable to parse manifest {}: {reason}", .path.display())]
    ManifestUnreadable { path: PathBuf, reason: String },

    #[error("failed to load catalyst '{identifier}': {source}")]
    BatchLoadFailure {
        identifier: String,
        #[source]
        source: Box<CatalystError>,
    },

    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Discriminant for [`CatalystError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    DirectoryNotFound,
    ManifestMissing,
    ManifestInvalid,
    ManifestUnreadable,
    BatchLoadFailure,
    Io,
}

impl CatalystError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalystError::DirectoryNotFound { .. } => ErrorKind::DirectoryNotFound,
            CatalystError::ManifestMissing { .. } => ErrorKind::ManifestMissing,
            CatalystError::ManifestInvalid { .. } => ErrorKind::ManifestInvalid,
            CatalystError::ManifestUnreadable { .. } => ErrorKind::ManifestUnreadable,
            CatalystError::BatchLoadFailure { .. } => ErrorKind::BatchLoadFailure,
            CatalystError::Io { .. } => ErrorKind::Io,
        }
    }

    /// The innermost error, skipping any batch wrappers.
    pub fn root_cause(&self) -> &CatalystError {
        match self {
            CatalystError::BatchLoadFailure { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        CatalystError::Io {
            context,
            path: path.into(),
            source,
        }
    }
}
