//! Common test utilities: fixtures, a runner for the binary, and a reader
//! that parses a generated artifact back into tables and a directory.

#![allow(dead_code)]

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::LazyLock;

use regex::Regex;
use tempfile::TempDir;

static TABLE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^static const unsigned char (v\d+)\[\] = \{$").expect("table regex")
});

static DIRECTORY_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^  \{("(?:[^"\\]|\\.)*"), (v\d+), sizeof\((v\d+)\), (-?\d+), ([01])\},$"#)
        .expect("row regex")
});

const SENTINEL_ROW: &str = "  {NULL, NULL, 0, 0, 0}";

/// Creates a temporary directory for test fixtures.
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Writes `files` under `dir` and returns the directory root.
pub fn create_files(dir: &TempDir, files: &[(&str, &[u8])]) -> PathBuf {
    let root = dir.path().to_path_buf();
    for (path, content) in files {
        let file_path = root.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }
    root
}

/// Runs the packfs binary in `cwd` with `args`.
pub fn run_packfs<S: AsRef<OsStr>>(cwd: &Path, args: &[S]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_packfs"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute packfs")
}

/// Whether `program` can be started on this machine.
pub fn have_program(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// One parsed directory row; `name` is `None` for the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: Option<Vec<u8>>,
    pub ident: Option<String>,
    pub mtime: i64,
    pub filtered: bool,
}

/// A generated artifact read back from its text.
#[derive(Debug, Default)]
pub struct Artifact {
    pub tables: HashMap<String, Vec<u8>>,
    pub table_order: Vec<String>,
    pub rows: Vec<Row>,
    pub text: String,
}

/// Result of a successful lookup, mirroring the C `unpack` outputs.
#[derive(Debug)]
pub struct Unpacked<'a> {
    pub ident: &'a str,
    /// Physical table contents, terminator included
    pub physical: &'a [u8],
    pub size: usize,
    pub mtime: i64,
}

impl Unpacked<'_> {
    pub fn data(&self) -> &[u8] {
        &self.physical[..self.size]
    }
}

impl Artifact {
    pub fn parse(text: &str) -> Self {
        let mut artifact = Artifact {
            text: text.to_string(),
            ..Artifact::default()
        };

        let mut current: Option<(String, Vec<u8>)> = None;
        let mut in_directory = false;

        for line in text.lines() {
            if let Some((ident, bytes)) = current.as_mut() {
                if line == "};" {
                    let (ident, bytes) = (ident.clone(), std::mem::take(bytes));
                    artifact.table_order.push(ident.clone());
                    artifact.tables.insert(ident, bytes);
                    current = None;
                    continue;
                }
                let numbers = line.split("//").next().unwrap_or("");
                for value in numbers.split(',').map(str::trim).filter(|v| !v.is_empty()) {
                    bytes.push(value.parse().expect("table value is not a byte"));
                }
                continue;
            }

            if let Some(caps) = TABLE_START.captures(line) {
                current = Some((caps[1].to_string(), Vec::new()));
            } else if line == "} packed_files[] = {" {
                in_directory = true;
            } else if in_directory && line == SENTINEL_ROW {
                artifact.rows.push(Row {
                    name: None,
                    ident: None,
                    mtime: 0,
                    filtered: false,
                });
                in_directory = false;
            } else if in_directory {
                let caps = DIRECTORY_ROW
                    .captures(line)
                    .unwrap_or_else(|| panic!("unexpected directory row: {line:?}"));
                assert_eq!(&caps[2], &caps[3], "row must take sizeof its own table");
                artifact.rows.push(Row {
                    name: Some(unescape_c_literal(&caps[1])),
                    ident: Some(caps[2].to_string()),
                    mtime: caps[4].parse().expect("mtime"),
                    filtered: &caps[5] == "1",
                });
            }
        }

        artifact
    }

    /// Number of rows before the sentinel.
    pub fn entry_count(&self) -> usize {
        self.rows.iter().take_while(|r| r.name.is_some()).count()
    }

    /// `unlist(no)`: name of the row at `no`, `None` at the sentinel.
    pub fn unlist(&self, no: usize) -> Option<&[u8]> {
        self.rows[no].name.as_deref()
    }

    /// `unpack(name, ...)`: first row whose name equals `name`.
    pub fn unpack(&self, name: &str) -> Option<Unpacked<'_>> {
        self.unpack_bytes(name.as_bytes())
    }

    /// `unpack` for a name that is not valid UTF-8.
    pub fn unpack_bytes(&self, name: &[u8]) -> Option<Unpacked<'_>> {
        self.rows
            .iter()
            .take_while(|row| row.name.is_some())
            .find(|row| row.name.as_deref() == Some(name))
            .map(|row| {
                let ident = row.ident.as_deref().expect("real rows have a table");
                let physical = self.tables[ident].as_slice();
                Unpacked {
                    ident,
                    physical,
                    // sizeof(table) - 1
                    size: physical.len() - 1,
                    mtime: row.mtime,
                }
            })
    }
}

fn unescape_c_literal(literal: &str) -> Vec<u8> {
    let inner = &literal.as_bytes()[1..literal.len() - 1];
    let mut out = Vec::new();
    let mut i = 0;
    while i < inner.len() {
        if inner[i] != b'\\' {
            out.push(inner[i]);
            i += 1;
            continue;
        }
        let next = inner[i + 1];
        if next.is_ascii_digit() {
            let digits = std::str::from_utf8(&inner[i + 1..i + 4]).expect("octal digits");
            out.push(u8::from_str_radix(digits, 8).expect("octal escape"));
            i += 4;
        } else {
            out.push(next);
            i += 2;
        }
    }
    out
}
