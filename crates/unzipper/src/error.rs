//! Error types for archive extraction operations.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for reading and extracting archives.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The archive file could not be opened (missing, permission denied).
    #[error("Archive unavailable: {}: {source}", .path.display())]
    SourceUnavailable {
        /// Path that was passed to the reader
        path: PathBuf,
        /// Underlying open error
        #[source]
        source: std::io::Error,
    },

    /// The central directory could not be parsed, or an entry could not be opened.
    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    /// An entry would be written outside the destination root.
    #[error("Unsafe path {path:?}: {reason}")]
    UnsafePath {
        /// Archive-internal name of the offending entry
        path: String,
        /// Why the path was rejected
        #[source]
        reason: SecurityError,
    },

    /// A filesystem operation failed while materializing an entry.
    #[error("Extraction failed ({phase}) at {}: {source}", .path.display())]
    ExtractionFailed {
        /// Filesystem path the operation was acting on
        path: PathBuf,
        /// Which step of materialization failed
        phase: Phase,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub(crate) fn failed(path: impl Into<PathBuf>, phase: Phase, source: std::io::Error) -> Self {
        ExtractError::ExtractionFailed {
            path: path.into(),
            phase,
            source,
        }
    }
}

/// Security-related errors raised while resolving entry paths.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecurityError {
    /// Path traversal attempt detected (e.g., "../../../etc/passwd").
    #[error("Path traversal attempt: {0}")]
    PathTraversal(String),

    /// Absolute path not allowed in archive entries.
    #[error("Absolute path not allowed: {0}")]
    AbsolutePath(String),

    /// A file entry whose name normalizes to nothing.
    #[error("Empty path for file entry: {0}")]
    EmptyPath(String),

    /// The resolved path leaves the destination root (e.g., through a symlink).
    #[error("Path resolves outside destination: {0}")]
    OutsideRoot(String),
}

/// Step of entry materialization that an [`ExtractError::ExtractionFailed`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Creating a directory entry (or the destination root)
    CreateDirectory,
    /// Creating the parent chain of a file entry
    CreateParent,
    /// Opening the destination file for writing
    CreateFile,
    /// Copying entry content into the destination file
    Copy,
    /// Applying the entry's mode to a directory
    SetPermissions,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::CreateDirectory => "create-dir",
            Phase::CreateParent => "create-parent",
            Phase::CreateFile => "create-file",
            Phase::Copy => "copy",
            Phase::SetPermissions => "set-permissions",
        };
        f.write_str(name)
    }
}
