//! Turns the raw input tokens into an ordered list of files to pack.
//!
//! The token list mixes file paths with filter directives (`-z CMD`). A
//! directive sets the filter for every file after it until the next directive
//! changes it; `-z ""` clears it.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::utils::error::PackError;

/// The token that introduces a filter directive.
pub const FILTER_FLAG: &str = "-z";

/// One file to pack, with the filter in effect at its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub path: PathBuf,
    pub filter: Option<OsString>,
}

#[derive(Debug, Default)]
struct ScanState {
    filter: Option<OsString>,
    awaiting_filter: bool,
    directive_unused: bool,
    entries: Vec<InputSpec>,
}

impl ScanState {
    fn step(mut self, token: &OsStr) -> Self {
        if self.awaiting_filter {
            // The value is taken verbatim, even if it looks like the flag itself
            self.filter = (!token.is_empty()).then(|| token.to_os_string());
            self.awaiting_filter = false;
            self.directive_unused = true;
        } else if token == FILTER_FLAG {
            self.awaiting_filter = true;
        } else {
            self.entries.push(InputSpec {
                path: PathBuf::from(token),
                filter: self.filter.clone(),
            });
            self.directive_unused = false;
        }
        self
    }

    /// Warning for a last directive that no file followed, if there is one.
    fn dangling_directive(&self) -> Option<String> {
        if !self.directive_unused {
            return None;
        }
        Some(match &self.filter {
            Some(filter) => format!(
                "Filter '{}' is not followed by any file and has no effect",
                filter.to_string_lossy()
            ),
            None => "Filter reset is not followed by any file and has no effect".to_string(),
        })
    }
}

fn fold_tokens<S: AsRef<OsStr>>(tokens: &[S]) -> ScanState {
    tokens
        .iter()
        .fold(ScanState::default(), |state, token| state.step(token.as_ref()))
}

/// Scan the input tokens into `(path, filter)` pairs, preserving order.
///
/// A filter flag in last position, with no command after it, is rejected with
/// [`PackError::MissingFilterValue`].
pub fn scan_inputs<S: AsRef<OsStr>>(tokens: &[S]) -> Result<Vec<InputSpec>, PackError> {
    let state = fold_tokens(tokens);

    if state.awaiting_filter {
        return Err(PackError::MissingFilterValue {
            position: tokens.len(),
        });
    }

    if let Some(warning) = state.dangling_directive() {
        tracing::warn!("{}", warning);
    }

    if state.entries.is_empty() {
        tracing::warn!("No input files given; the directory will only hold the sentinel row");
    }

    tracing::debug!(count = state.entries.len(), "Scanned input arguments");
    Ok(state.entries)
}
