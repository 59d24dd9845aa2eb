//! Structured error handling and exit codes.

use serde::Serialize;

/// Errors produced by the concordance library.
#[derive(Debug, thiserror::Error)]
pub enum ConcordanceError {
    /// A configuration value was rejected before any work was done.
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending setting
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// An index into a block was outside its bounds.
    #[error("{what} index {index} out of range (len {len})")]
    OutOfRange {
        /// Which dimension was indexed ("occurrence" or "part")
        what: &'static str,
        /// The requested index
        index: usize,
        /// The number of valid entries
        len: usize,
    },

    /// A line rule could not be compiled.
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        /// The rejected pattern
        pattern: String,
        /// The underlying regex error
        #[source]
        source: regex::Error,
    },

    /// An I/O error occurred while reading input.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path that failed to read (`-` for stdin)
        path: std::path::PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ConcordanceError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Result alias for library operations.
pub type Result<T, E = ConcordanceError> = std::result::Result<T, E>;

/// Exit codes for the concordance binary.
///
/// - 0: Success (blocks found)
/// - 1: General error (unexpected failure)
/// - 2: No blocks found (completed normally)
/// - 130: Interrupted by user (Ctrl+C); partial results were still printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Search completed and repeated blocks were found.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// Search completed but nothing repeats.
    NoBlocks = 2,
    /// Search was cancelled by the user.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "CC000",
            Self::GeneralError => "CC001",
            Self::NoBlocks => "CC002",
            Self::Interrupted => "CC130",
        }
    }
}

/// Structured error information for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "CC001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
    /// Whether the search was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
