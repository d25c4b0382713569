//! # packfs
//!
//! packfs turns a list of files into one C source file that embeds their
//! bytes as static tables, plus two lookup routines:
//!
//! ```c
//! const char *unlist(size_t no);
//! const char *unpack(const char *name, size_t *size, time_t *mtime);
//! ```
//!
//! A downstream program compiles the generated file in and reads its assets
//! from memory instead of the filesystem.
//!
//! ## Pipeline
//!
//! 1. **Scan** - split the input tokens into `(path, filter)` pairs
//!    ([`packer::scan`])
//! 2. **Tables** - read each input, directly or through its filter command,
//!    and emit it as a zero-terminated byte table ([`packer::table`])
//! 3. **Directory** - emit the name → table directory with a sentinel row
//!    ([`packer::directory`])
//! 4. **Accessors** - emit `unlist` / `unpack` ([`packer::accessors`])
//!
//! Configuration follows hierarchical precedence (see [`cli::config`]):
//! config files, then `PACKFS__*` environment variables, then CLI flags.

pub mod cli;
pub mod output;
pub mod packer;
pub mod utils;

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use output::{Destination, write_artifact};
use packer::{PackOptions, pack, scan_inputs};
use utils::progress::create_progress_bar;
use utils::summary::PackSummary;

/// Final resolved configuration after merging all sources (CLI, env, config files).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    /// Raw input tokens: paths interleaved with `-z CMD` directives
    pub inputs: Vec<OsString>,
    /// Output file; standard output when absent
    pub output: Option<PathBuf>,
    /// Prefix for the accessor names
    pub symbol_prefix: String,
    /// Bytes per table row
    pub columns: usize,
    /// Verbosity level (0-3)
    pub verbose: u8,
    /// Quiet mode (errors only)
    pub quiet: bool,
}

impl PackConfig {
    pub fn pack_options(&self) -> PackOptions {
        PackOptions {
            symbol_prefix: self.symbol_prefix.clone(),
            columns: self.columns,
        }
    }
}

/// Initialize logging on stderr. Standard output is reserved for the artifact.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second initialisation (tests, embedding) keeps the first subscriber
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .is_err()
    {
        tracing::debug!("Logging already initialised");
    }
}

/// Generate the artifact described by `config`.
pub fn run(config: &PackConfig) -> Result<PackSummary> {
    tracing::info!("packfs v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Configuration: inputs={}, output={:?}, prefix={:?}, columns={}",
        config.inputs.len(),
        config.output,
        config.symbol_prefix,
        config.columns
    );

    cli::config::validate(config).context("Invalid configuration")?;

    let inputs = scan_inputs(&config.inputs).context("Failed to scan input arguments")?;
    let options = config.pack_options();
    let destination = Destination::from_option(config.output.clone());
    let progress = create_progress_bar(inputs.len() as u64, !config.quiet);

    let entries = write_artifact(&destination, |out| {
        pack(&inputs, &options, out, &progress)
    })?;

    let summary = PackSummary::from_entries(&entries);
    tracing::info!("{}", summary);
    Ok(summary)
}
