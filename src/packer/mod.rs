//! The packing pipeline.
//!
//! Output is one C translation unit, written strictly in order:
//!
//! 1. `#include` lines for `size_t`, `strcmp` and `time_t`
//! 2. one byte table per input (`v0`, `v1`, ...), each with a trailing zero
//! 3. the `packed_files[]` directory, terminated by a `NULL` row
//! 4. the `unlist` / `unpack` accessors
//!
//! Inputs are processed one at a time; each source is drained and released
//! before the next one is opened.

pub mod accessors;
pub mod directory;
pub mod scan;
pub mod source;
pub mod table;

use std::borrow::Cow;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use crate::utils::error::PackError;

pub use scan::{FILTER_FLAG, InputSpec, scan_inputs};
pub use table::DEFAULT_COLUMNS;

const HEADERS: &str = "#include <stddef.h>\n#include <string.h>\n#include <time.h>\n\n";

const READ_CHUNK: usize = 64 * 1024;

/// Knobs that change the rendered text but not its meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOptions {
    /// Prepended to the accessor names (`mg_` gives `mg_unpack`)
    pub symbol_prefix: String,
    /// Bytes per annotated row in the byte tables
    pub columns: usize,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            symbol_prefix: String::new(),
            columns: DEFAULT_COLUMNS,
        }
    }
}

/// One directory row as emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedEntry {
    /// Lookup key: the input path bytes with a leading `/`
    pub name: Vec<u8>,
    /// Identifier of the byte table
    pub ident: String,
    /// The input path as given
    pub path: PathBuf,
    /// Real content length, terminator excluded
    pub size: u64,
    /// Modification time of the input file, epoch seconds
    pub mtime: i64,
    /// Whether the bytes came through a filter command
    pub filtered: bool,
}

/// Lookup key for an input path: `/` followed by the path bytes unchanged.
pub fn entry_name(path: &Path) -> Vec<u8> {
    let bytes = path_bytes(path);
    let mut name = Vec::with_capacity(bytes.len() + 1);
    name.push(b'/');
    name.extend_from_slice(&bytes);
    name
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    Cow::Owned(path.to_string_lossy().into_owned().into_bytes())
}

/// Identifier of the byte table for the `index`-th input.
pub fn table_ident(index: usize) -> String {
    format!("v{}", index)
}

/// Generate the whole artifact for `inputs` into `out`.
///
/// The first input that cannot be acquired aborts the run; whatever was
/// already written to `out` is not usable.
pub fn pack<W: Write + ?Sized>(
    inputs: &[InputSpec],
    options: &PackOptions,
    out: &mut W,
    progress: &ProgressBar,
) -> Result<Vec<PackedEntry>, PackError> {
    out.write_all(HEADERS.as_bytes())?;

    let mut entries = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        progress.set_message(input.path.display().to_string());
        let entry = pack_one(index, input, options, out)?;
        tracing::debug!(
            name = %String::from_utf8_lossy(&entry.name),
            size = entry.size,
            mtime = entry.mtime,
            filtered = entry.filtered,
            "Packed entry"
        );
        entries.push(entry);
        progress.inc(1);
    }

    directory::write_directory(out, &entries)?;
    accessors::write_accessors(out, &options.symbol_prefix)?;
    out.flush()?;

    progress.finish_and_clear();
    Ok(entries)
}

fn pack_one<W: Write + ?Sized>(
    index: usize,
    input: &InputSpec,
    options: &PackOptions,
    out: &mut W,
) -> Result<PackedEntry, PackError> {
    // Always the source file's timestamp, even when a filter rewrites the bytes
    let mtime = source::modification_time(&input.path)?;
    let mut source = source::open_source(&input.path, input.filter.as_deref())?;

    let ident = table_ident(index);
    let mut table = table::TableWriter::begin(out, &ident, options.columns)?;
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(PackError::acquisition(source.target(), e)),
        };
        table.write_all(buf.get(..n).unwrap_or_default())?;
    }
    let size = table.finish()?;
    source.finish()?;

    Ok(PackedEntry {
        name: entry_name(&input.path),
        ident,
        path: input.path.clone(),
        size,
        mtime,
        filtered: input.filter.is_some(),
    })
}
