//! CLI error types with associated exit codes.
//!
//! [`CliError`] is the top-level error type for the `evcmp` binary. Every
//! variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
//!
//! - Exit code **2**: input failure. The tool could not read or decode an
//!   input, or the arguments were unusable. Nothing has been compared.
//! - Exit code **1**: logical failure. The comparison could not produce a
//!   report, or produced one that `--fail-on-mismatch` rejects.

use std::fmt;
use std::path::PathBuf;

use evcmp_core::{CompareError, EventFileError};

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `evcmp` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound { path: PathBuf },

    /// The process lacks permission to read a file.
    PermissionDenied { path: PathBuf },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, otherwise the filesystem path.
        source: String,
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError { detail: String },

    /// A generic I/O error not covered by the more specific variants above.
    IoError { source: String, detail: String },

    /// The input bytes are not a readable event file.
    DecodeFailed {
        source: String,
        cause: EventFileError,
    },

    /// A `--only` pattern is not a valid regular expression.
    InvalidPattern { pattern: String, detail: String },

    /// The arguments parsed but cannot be honoured together.
    InvalidArguments { detail: String },

    // --- Exit code 1: logical failures ---
    /// The comparison aborted before producing a report.
    CompareFailed(CompareError),

    /// The report is not clean and `--fail-on-mismatch` was given.
    ///
    /// The report has already been printed; this variant exists so `main`
    /// can exit with code 1.
    MismatchesFound {
        mismatched: usize,
        structural: usize,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::DecodeFailed { .. }
            | Self::InvalidPattern { .. }
            | Self::InvalidArguments { .. } => 2,

            Self::CompareFailed(_) | Self::MismatchesFound { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error reading {source}: {detail}")
            }
            Self::DecodeFailed { source, cause } => {
                format!("error: cannot decode {source}: {cause}")
            }
            Self::InvalidPattern { pattern, detail } => {
                format!("error: invalid --only pattern {pattern:?}: {detail}")
            }
            Self::InvalidArguments { detail } => format!("error: {detail}"),
            Self::CompareFailed(cause) => format!("error: {cause}"),
            Self::MismatchesFound {
                mismatched,
                structural,
            } => format!(
                "error: comparison found {mismatched} mismatched records \
                 and {structural} structural errors"
            ),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DecodeFailed { cause, .. } => Some(cause),
            Self::CompareFailed(cause) => Some(cause),
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::InvalidPattern { .. }
            | Self::InvalidArguments { .. }
            | Self::MismatchesFound { .. } => None,
        }
    }
}

impl From<CompareError> for CliError {
    fn from(err: CompareError) -> Self {
        Self::CompareFailed(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
