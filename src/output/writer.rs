//! Artifact writing.
//!
//! Standard output is written directly. A file destination is written to a
//! sibling temporary file first and renamed into place only when generation
//! succeeded, so a failed run never leaves a truncated artifact behind.

use crate::utils::error::PackError;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output destination for the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) if path.as_os_str() != "-" => Destination::File(path),
            _ => Destination::Stdout,
        }
    }
}

/// Tracks the in-progress temporary file and removes it unless committed.
#[derive(Debug)]
struct PendingFile {
    temp_path: PathBuf,
    committed: bool,
}

impl PendingFile {
    fn commit(mut self, final_path: &Path) -> Result<(), PackError> {
        std::fs::rename(&self.temp_path, final_path)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if !self.committed && self.temp_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.temp_path) {
                tracing::warn!(
                    path = %self.temp_path.display(),
                    error = %e,
                    "Failed to remove temporary output"
                );
            }
        }
    }
}

/// Temporary sibling of `path`: `fs.c` becomes `.fs.c.packfs-tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| path.as_os_str()));
    name.push(".packfs-tmp");
    path.with_file_name(name)
}

/// Run `generate` against the destination's writer.
pub fn write_artifact<T, F>(destination: &Destination, generate: F) -> Result<T, PackError>
where
    F: FnOnce(&mut dyn Write) -> Result<T, PackError>,
{
    match destination {
        Destination::Stdout => {
            let stdout = std::io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let result = generate(&mut out)?;
            out.flush()?;
            Ok(result)
        }
        Destination::File(path) => {
            let pending = PendingFile {
                temp_path: temp_path_for(path),
                committed: false,
            };
            let file = File::create(&pending.temp_path)?;
            let mut out = BufWriter::new(file);
            let result = generate(&mut out)?;
            out.into_inner()
                .map_err(|e| PackError::Output(e.into_error()))?
                .sync_all()?;
            pending.commit(path)?;
            tracing::info!("Wrote {}", path.display());
            Ok(result)
        }
    }
}
