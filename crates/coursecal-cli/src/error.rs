//! CLI error types.

use std::fmt;
use std::path::{Path, PathBuf};

use coursecal_core::TracingError;
use coursecal_pipeline::ParseError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug)]
pub enum CliError {
    /// Configuration error.
    Config(String),
    /// IO error.
    Io(std::io::Error),
    /// A page or events file could not be decoded.
    Parse { path: PathBuf, source: ParseError },
    /// JSON serialization failed.
    Json(serde_json::Error),
    /// Logging could not be set up.
    Tracing(TracingError),
}

impl CliError {
    /// Parse failure for the input at `path`.
    pub fn parse(path: &Path, source: ParseError) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
            Self::Json(err) => write!(f, "JSON error: {}", err),
            Self::Tracing(err) => write!(f, "logging error: {}", err),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Tracing(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<TracingError> for CliError {
    fn from(err: TracingError) -> Self {
        Self::Tracing(err)
    }
}
