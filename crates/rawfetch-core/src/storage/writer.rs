//! Scoped temp-file writer for one artifact.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writer for an artifact temp file. The body becomes visible under its final
/// name only through `finalize`; if the writer is dropped before that (write
/// error, early return) the temp file is removed.
pub struct ArtifactWriter {
    file: Option<File>,
    temp_path: PathBuf,
    finalized: bool,
}

impl ArtifactWriter {
    /// Create a new temp file at `temp_path`. Fails if the path already exists,
    /// so two writers never share a temp file.
    pub fn create(temp_path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create_new(true)
            .open(temp_path)?;
        Ok(ArtifactWriter {
            file: Some(file),
            temp_path: temp_path.to_path_buf(),
            finalized: false,
        })
    }

    /// Write the whole body as UTF-8.
    pub fn write_body(&mut self, body: &str) -> io::Result<()> {
        match self.file.as_mut() {
            Some(f) => f.write_all(body.as_bytes()),
            None => Err(io::Error::new(io::ErrorKind::Other, "artifact writer closed")),
        }
    }

    /// Close the file and atomically rename it over `final_path`, replacing any
    /// previous artifact. Fails if `final_path` is on a different filesystem.
    pub fn finalize(mut self, final_path: &Path) -> io::Result<()> {
        // Close before rename.
        drop(self.file.take());
        std::fs::rename(&self.temp_path, final_path)?;
        self.finalized = true;
        Ok(())
    }
}

impl Drop for ArtifactWriter {
    fn drop(&mut self) {
        if !self.finalized {
            drop(self.file.take());
            if let Err(e) = std::fs::remove_file(&self.temp_path) {
                tracing::debug!(path = %self.temp_path.display(), error = %e, "temp file cleanup failed");
            }
        }
    }
}
