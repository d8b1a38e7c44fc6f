//! Clap CLI definition: root struct and shared argument types.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
///
/// Parsing `"-"` yields [`PathOrStdin::Stdin`]; anything else yields
/// [`PathOrStdin::Path`].
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl PathOrStdin {
    /// Label used in messages: the path, or `-` for stdin.
    pub fn label(&self) -> String {
        match self {
            Self::Stdin => "-".to_owned(),
            Self::Path(path) => path.display().to_string(),
        }
    }
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for the comparison report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Mismatch log and per-collection summary as text (default).
    Human,
    /// The full report as one pretty-printed JSON object.
    Json,
}

/// Root CLI struct for the `evcmp` binary.
#[derive(Parser, Debug)]
#[command(
    name = "evcmp",
    version,
    about = "Compare two physics event files record by record",
    long_about = "Compares every configured collection of every event in NEW against\n\
                  REFERENCE, field by field, and reports each mismatch together with\n\
                  per-collection totals. Inputs may be JSON, CBOR or zstd-compressed."
)]
pub struct Cli {
    /// Event file produced by the version under test, or `-` for stdin.
    #[arg(value_name = "NEW")]
    pub new: PathOrStdin,

    /// Reference event file, or `-` for stdin (not both).
    #[arg(value_name = "REFERENCE")]
    pub reference: PathOrStdin,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human")]
    pub format: OutputFormat,

    /// Suppress all stderr output except errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase stderr verbosity: timing and per-file event counts
    /// (incompatible with `--quiet`).
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `EVCMP_MAX_FILE_SIZE` environment variable.
    /// The CLI flag takes precedence over the environment variable.
    /// Default: 268435456 (256 MB).
    #[arg(long, env = "EVCMP_MAX_FILE_SIZE", default_value = "268435456")]
    pub max_file_size: u64,

    /// Disable ANSI color codes on stderr.
    ///
    /// The `NO_COLOR` environment variable (<https://no-color.org>) is
    /// honoured separately: any value disables color.
    #[arg(long)]
    pub no_color: bool,

    /// Compare only collections whose name matches this regex (repeatable).
    #[arg(long, value_name = "REGEX")]
    pub only: Vec<String>,

    /// Print at most N mismatch lines in human mode; the summary always prints.
    #[arg(long, value_name = "N")]
    pub max_log: Option<usize>,

    /// Exit 1 when any mismatch or structural error is found.
    #[arg(long)]
    pub fail_on_mismatch: bool,

    /// Also print the SHA-256 digest of the report.
    #[arg(long)]
    pub digest: bool,
}
