// Copyright (c) 2025-2026 the packfs contributors
// SPDX-License-Identifier: Apache-2.0

//! Byte sources feeding the table emitter.
//!
//! A source is anything that can be drained with [`Read`]: the file itself,
//! or the standard output of a filter command run over the file. The emitter
//! does not know which one it is reading.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

use filetime::FileTime;

use crate::utils::error::PackError;

pub trait ByteSource: Read {
    /// What to name in a diagnostic when this source fails.
    fn target(&self) -> &str;

    /// Release the underlying resource once the stream has been drained.
    fn finish(self: Box<Self>) -> Result<(), PackError>;
}

/// Direct binary read of the input file.
pub struct FileSource {
    path: String,
    reader: BufReader<File>,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self, PackError> {
        let target = path.display().to_string();
        let file = File::open(path).map_err(|e| PackError::acquisition(target.as_str(), e))?;
        Ok(Self {
            path: target,
            reader: BufReader::new(file),
        })
    }
}

impl Read for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl ByteSource for FileSource {
    fn target(&self) -> &str {
        &self.path
    }

    fn finish(self: Box<Self>) -> Result<(), PackError> {
        Ok(())
    }
}

/// Standard output of `<filter> <path>` run through the platform shell.
pub struct FilterSource {
    command_line: String,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
}

impl FilterSource {
    pub fn spawn(filter: &OsStr, path: &Path) -> Result<Self, PackError> {
        let command_line = format!("{} {}", filter.to_string_lossy(), path.display());
        tracing::debug!(command = %command_line, "Starting filter");

        let mut child = shell_command(filter, path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| PackError::acquisition(command_line.as_str(), e))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            PackError::acquisition(
                command_line.as_str(),
                io::Error::other("filter standard output was not captured"),
            )
        })?;

        Ok(Self {
            command_line,
            child: Some(child),
            stdout: Some(stdout),
        })
    }
}

#[cfg(unix)]
fn shell_command(filter: &OsStr, path: &Path) -> Command {
    // The path travels as $1 so the shell never re-parses it
    let mut script = filter.to_os_string();
    script.push(" \"$1\"");
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script).arg("sh").arg(path);
    cmd
}

#[cfg(windows)]
fn shell_command(filter: &OsStr, path: &Path) -> Command {
    let mut line = filter.to_os_string();
    line.push(" \"");
    line.push(path);
    line.push("\"");
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

/// Whether the shell reported that the filter command itself could not run.
#[cfg(unix)]
fn filter_not_started(status: &ExitStatus) -> bool {
    // 127: command not found, 126: found but not executable
    matches!(status.code(), Some(126 | 127))
}

#[cfg(windows)]
fn filter_not_started(status: &ExitStatus) -> bool {
    status.code() == Some(9009)
}

impl Read for FilterSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.stdout.as_mut() {
            Some(stdout) => stdout.read(buf),
            None => Ok(0),
        }
    }
}

impl ByteSource for FilterSource {
    fn target(&self) -> &str {
        &self.command_line
    }

    fn finish(mut self: Box<Self>) -> Result<(), PackError> {
        // Close our end first so a filter still writing sees EPIPE instead of blocking
        drop(self.stdout.take());

        if let Some(mut child) = self.child.take() {
            let status = child
                .wait()
                .map_err(|e| PackError::acquisition(self.command_line.as_str(), e))?;
            if filter_not_started(&status) {
                return Err(PackError::acquisition(
                    self.command_line.as_str(),
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("filter command could not be started ({})", status),
                    ),
                ));
            }
            if !status.success() {
                tracing::warn!(
                    command = %self.command_line,
                    %status,
                    "Filter exited unsuccessfully; embedding the output it produced"
                );
            }
        }
        Ok(())
    }
}

impl Drop for FilterSource {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            drop(self.stdout.take());
            if let Err(e) = child.kill() {
                tracing::debug!(command = %self.command_line, error = %e, "Failed to kill filter");
            }
            if let Err(e) = child.wait() {
                tracing::debug!(command = %self.command_line, error = %e, "Failed to reap filter");
            }
        }
    }
}

/// Open the byte source for one input: the file itself, or its filter.
pub fn open_source(
    path: &Path,
    filter: Option<&OsStr>,
) -> Result<Box<dyn ByteSource>, PackError> {
    match filter {
        None => Ok(Box::new(FileSource::open(path)?)),
        Some(filter) => Ok(Box::new(FilterSource::spawn(filter, path)?)),
    }
}

/// Last modification time of `path`, in seconds since the Unix epoch.
pub fn modification_time(path: &Path) -> Result<i64, PackError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| PackError::acquisition(path.display().to_string(), e))?;
    Ok(FileTime::from_last_modification_time(&metadata).unix_seconds())
}
