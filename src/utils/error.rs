use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    /// An input could not be opened, read, or its filter could not be started.
    #[error("Cannot open [{target}]: {source}")]
    Acquisition {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed arguments: filter flag at position {position} has no command")]
    MissingFilterValue { position: usize },

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {message}\nSuggestion: {suggestion}")]
    ValidationError { message: String, suggestion: String },
}

impl PackError {
    pub fn acquisition(target: impl Into<String>, source: std::io::Error) -> Self {
        PackError::Acquisition {
            target: target.into(),
            source,
        }
    }

    pub fn invalid_prefix(prefix: &str) -> Self {
        PackError::ValidationError {
            message: format!("Invalid accessor prefix: '{}'", prefix),
            suggestion: "The prefix must be empty or a C identifier such as 'mg_'".to_string(),
        }
    }

    pub fn invalid_columns(columns: usize) -> Self {
        PackError::ValidationError {
            message: format!("Invalid column count: {}", columns),
            suggestion: "Use at least one byte per row (the default is 12)".to_string(),
        }
    }
}

/// Format an error for display on stderr.
///
/// In verbose mode the full `source()` chain is appended.
pub fn format_error(error: &PackError, verbose: bool) -> String {
    let mut out = format!("packfs: {}", error);
    if verbose {
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            out.push_str(&format!("\n  caused by: {}", cause));
            source = std::error::Error::source(cause);
        }
    }
    out
}
