//! Configuration management using the `config` crate for hierarchical discovery and merging.
//!
//! ## Configuration Sources (in precedence order, highest to lowest):
//! 1. **CLI flags** (and their `PACKFS_*` environment variables, via clap)
//! 2. **Environment variables** - `PACKFS__GENERAL__PREFIX`, `PACKFS__OUTPUT__PATH`, ...
//! 3. **Config files** - merged in this order, later overriding earlier:
//!    `<config dir>/packfs/config.toml`, `./packfs.toml`, explicit `--config`
//! 4. Built-in defaults
//!
//! ```toml
//! [general]
//! prefix = "mg_"
//! columns = 16
//!
//! [output]
//! path = "src/fs.c"
//! ```

use crate::PackConfig;
use crate::cli::args::Args;
use crate::packer::DEFAULT_COLUMNS;
use crate::utils::error::PackError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const DEFAULT_CONFIG_FILE: &str = "packfs.toml";

/// Accessor prefixes end up in C identifiers.
static PREFIX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid accessor prefix regex")
});

/// Root configuration structure loaded from config files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub prefix: Option<String>,
    pub columns: Option<usize>,
}

/// Output destination settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
}

fn discover_config_paths(explicit_path: &Path) -> Vec<(PathBuf, bool)> {
    let mut paths = Vec::new();

    if let Some(user_config) = get_user_config_path() {
        paths.push((user_config, false));
    }

    let current_dir_config = PathBuf::from(DEFAULT_CONFIG_FILE);
    if current_dir_config.exists() {
        paths.push((current_dir_config, false));
    }

    // An explicitly named file must exist
    if explicit_path != Path::new(DEFAULT_CONFIG_FILE) {
        paths.push((explicit_path.to_path_buf(), true));
    }

    paths
}

fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|config_dir| config_dir.join("packfs").join("config.toml"))
        .filter(|path| path.exists())
}

/// Load configuration from discovered config files and environment variables.
pub fn load(args: &Args) -> Result<Config, PackError> {
    let mut builder = config::Config::builder();

    for (config_path, required) in discover_config_paths(&args.config) {
        tracing::debug!(path = %config_path.display(), "Adding config file");
        builder = builder.add_source(config::File::from(config_path).required(required));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("PACKFS")
            .separator("__")
            .try_parsing(true),
    );

    let settings = builder
        .build()
        .map_err(|e| PackError::Config(format!("Failed to build configuration: {}", e)))?;

    settings
        .try_deserialize()
        .map_err(|e| PackError::Config(format!("Failed to deserialize configuration: {}", e)))
}

/// Merge CLI arguments over file configuration and defaults.
pub fn merge_config(args: Args, config: Config) -> PackConfig {
    PackConfig {
        inputs: args.inputs,
        output: args.output.or(config.output.path),
        symbol_prefix: args.prefix.or(config.general.prefix).unwrap_or_default(),
        columns: args
            .columns
            .or(config.general.columns)
            .unwrap_or(DEFAULT_COLUMNS),
        verbose: args.verbose,
        quiet: args.quiet,
    }
}

/// Reject settings that would produce uncompilable or degenerate output.
pub fn validate(config: &PackConfig) -> Result<(), PackError> {
    if !config.symbol_prefix.is_empty() && !PREFIX_PATTERN.is_match(&config.symbol_prefix) {
        return Err(PackError::invalid_prefix(&config.symbol_prefix));
    }
    if config.columns == 0 {
        return Err(PackError::invalid_columns(config.columns));
    }
    Ok(())
}
