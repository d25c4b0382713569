//! Rendering of one byte table as a C array.
//!
//! ```text
//! static const unsigned char v0[] = {
//!  104, 101, 108, 108, 111, 0 // hello
//! };
//! ```
//!
//! Every `columns` bytes the row is closed with a comment showing the
//! printable part of that row. The table always ends with one extra zero byte
//! that is not counted in the reported size.

use std::io::{self, Write};

/// Default number of bytes rendered per row.
pub const DEFAULT_COLUMNS: usize = 12;

/// Placeholder for bytes that cannot appear in the row comment.
const PLACEHOLDER: char = '.';

/// Printable rendering of a row for the trailing `//` comment.
///
/// Backslash is replaced too: at the end of a line it would splice the next
/// row into the comment.
pub fn ascii_preview(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if (b' '..=b'~').contains(&b) && b != b'\\' {
                char::from(b)
            } else {
                PLACEHOLDER
            }
        })
        .collect()
}

/// Streams bytes into a `static const unsigned char` declaration.
///
/// Create with [`TableWriter::begin`], feed it through [`Write`], and close it
/// with [`TableWriter::finish`].
pub struct TableWriter<'a, W: Write + ?Sized> {
    out: &'a mut W,
    columns: usize,
    row: Vec<u8>,
    len: u64,
}

impl<'a, W: Write + ?Sized> TableWriter<'a, W> {
    pub fn begin(out: &'a mut W, ident: &str, columns: usize) -> io::Result<Self> {
        writeln!(out, "static const unsigned char {}[] = {{", ident)?;
        let columns = columns.max(1);
        Ok(Self {
            out,
            columns,
            row: Vec::with_capacity(columns),
            len: 0,
        })
    }

    /// Append the terminator, close the declaration and return the real size.
    pub fn finish(self) -> io::Result<u64> {
        writeln!(self.out, " 0 // {}", ascii_preview(&self.row))?;
        writeln!(self.out, "}};")?;
        Ok(self.len)
    }
}

impl<W: Write + ?Sized> Write for TableWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            // A row is only closed once another byte arrives, so a full last
            // row shares its line with the terminator.
            if self.row.len() == self.columns {
                writeln!(self.out, " // {}", ascii_preview(&self.row))?;
                self.row.clear();
            }
            self.row.push(byte);
            write!(self.out, " {:>3},", byte)?;
        }
        self.len += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Render a complete table to a string.
pub fn render_table(ident: &str, bytes: &[u8], columns: usize) -> String {
    let mut out = Vec::new();
    let rendered = TableWriter::begin(&mut out, ident, columns).and_then(|mut table| {
        table.write_all(bytes)?;
        table.finish()
    });
    match rendered {
        Ok(_) => String::from_utf8_lossy(&out).into_owned(),
        // Writing into a Vec cannot fail
        Err(_) => String::new(),
    }
}
