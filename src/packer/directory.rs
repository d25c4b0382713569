//! The `packed_files[]` directory table.

use std::io::{self, Write};

use super::PackedEntry;

const ENTRY_STRUCT: &str = "\
static const struct packed_file {
  const char *name;
  const unsigned char *data;
  size_t size;
  time_t mtime;
  int zipped;
} packed_files[] = {
";

const SENTINEL_ROW: &str = "  {NULL, NULL, 0, 0, 0}\n";

/// Quote `value` as a C string literal holding exactly its bytes.
pub fn c_string_literal(value: &[u8]) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for &byte in value {
        match byte {
            b'"' => literal.push_str("\\\""),
            b'\\' => literal.push_str("\\\\"),
            // Keeps `??/` and friends from turning into trigraphs
            b'?' => literal.push_str("\\?"),
            b' '..=b'~' => literal.push(char::from(byte)),
            // Always three digits so a following digit is not absorbed
            _ => literal.push_str(&format!("\\{:03o}", byte)),
        }
    }
    literal.push('"');
    literal
}

/// Emit the directory: struct declaration, one row per entry, sentinel.
pub fn write_directory<W: Write + ?Sized>(out: &mut W, entries: &[PackedEntry]) -> io::Result<()> {
    writeln!(out)?;
    out.write_all(ENTRY_STRUCT.as_bytes())?;
    for entry in entries {
        writeln!(
            out,
            "  {{{}, {}, sizeof({}), {}, {}}},",
            c_string_literal(&entry.name),
            entry.ident,
            entry.ident,
            entry.mtime,
            u8::from(entry.filtered),
        )?;
    }
    out.write_all(SENTINEL_ROW.as_bytes())?;
    writeln!(out, "}};")?;
    writeln!(out)
}
