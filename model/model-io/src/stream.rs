//! Crash-safe export stream.
//!
//! All export data is written to a temporary sibling file; the target
//! file only ever changes through an all-or-nothing replace at commit
//! time. A crash or error mid-export leaves the previous target
//! intact.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IoError, IoResult};

/// A writable sink that commits atomically.
///
/// Created with a target directory and filename, the stream opens a
/// temporary sibling (the filename with a leading underscore) and
/// buffers all writes into it. The target file is not touched until
/// [`ExportStream::close`] commits the result; dropping the stream
/// without closing abandons the temporary file and leaves any
/// pre-existing target exactly as it was.
///
/// # Example
///
/// ```no_run
/// use std::io::Write;
/// use model_io::ExportStream;
///
/// let mut stream = ExportStream::new("out/models", "crate01.lwo").unwrap();
/// stream.write_all(b"FORM").unwrap();
/// stream.close().unwrap();
/// ```
#[derive(Debug)]
pub struct ExportStream {
    writer: BufWriter<File>,
    temp_path: PathBuf,
    target_path: PathBuf,
}

impl ExportStream {
    /// Open a stream targeting `directory/filename`.
    ///
    /// The directory is created (recursively) if it does not exist,
    /// and the temporary sibling `directory/_filename` is opened for
    /// writing, truncating any abandoned leftover from an earlier
    /// failed export.
    ///
    /// # Errors
    ///
    /// - [`IoError::DirectoryCreate`] if the directory cannot be
    ///   created;
    /// - [`IoError::TempFileOpen`] if the temporary file cannot be
    ///   opened.
    pub fn new<P: AsRef<Path>>(directory: P, filename: &str) -> IoResult<Self> {
        let directory = directory.as_ref();

        if !directory.exists() {
            fs::create_dir_all(directory).map_err(|source| IoError::DirectoryCreate {
                path: directory.to_path_buf(),
                source,
            })?;
        }

        let temp_path = directory.join(format!("_{filename}"));
        let target_path = directory.join(filename);

        let file = File::create(&temp_path).map_err(|source| IoError::TempFileOpen {
            path: temp_path.clone(),
            source,
        })?;

        debug!(temp_path = %temp_path.display(), "opened export stream");

        Ok(Self {
            writer: BufWriter::new(file),
            temp_path,
            target_path,
        })
    }

    /// The temporary sibling receiving the writes.
    #[must_use]
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// The final path the commit will produce.
    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Commit: flush and close the temporary file, remove any
    /// pre-existing target, then rename the temporary file into
    /// place.
    ///
    /// Remove-then-rename is not a single atomic filesystem
    /// operation: if the rename fails (or the process dies between
    /// the two steps) a pre-existing target is already gone. The new
    /// content is never written under the target name in that case —
    /// the gap loses the old file, it cannot corrupt it.
    ///
    /// # Errors
    ///
    /// - [`IoError::RemoveExisting`] if a pre-existing target cannot
    ///   be removed;
    /// - [`IoError::RenameTempFile`] if the rename fails;
    /// - [`IoError::Io`] if flushing the buffered data fails.
    pub fn close(self) -> IoResult<()> {
        let Self {
            writer,
            temp_path,
            target_path,
        } = self;

        // Flush and drop the handle so the rename sees a closed file
        let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        drop(file);

        if target_path.exists() {
            fs::remove_file(&target_path).map_err(|source| IoError::RemoveExisting {
                path: target_path.clone(),
                source,
            })?;
        }

        fs::rename(&temp_path, &target_path).map_err(|source| IoError::RenameTempFile {
            from: temp_path.clone(),
            to: target_path.clone(),
            source,
        })?;

        debug!(target_path = %target_path.display(), "committed export");
        Ok(())
    }
}

impl Write for ExportStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
