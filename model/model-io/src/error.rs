//! Error types for export I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for export I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while writing an export artifact.
///
/// All of these are fatal for the export in progress; there is no
/// retry anywhere in this crate.
#[derive(Debug, Error)]
pub enum IoError {
    /// The output directory could not be created.
    #[error("cannot create output directory {path}")]
    DirectoryCreate {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The temporary sibling file could not be opened for writing.
    #[error("cannot open file for writing: {path}")]
    TempFileOpen {
        /// Temporary file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A pre-existing target file could not be removed at commit time.
    #[error("could not remove the existing file {path}")]
    RemoveExisting {
        /// Target file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The temporary file could not be renamed onto the target.
    #[error("could not rename the temporary file {from} to {to}")]
    RenameTempFile {
        /// Temporary file path.
        from: PathBuf,
        /// Target file path.
        to: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
