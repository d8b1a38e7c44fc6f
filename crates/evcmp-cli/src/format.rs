//! Stderr diagnostics: tagged message lines and verbose timing.
//!
//! Every stderr line goes through a [`FormatterConfig`]:
//!
//! - **Colors** are used only when stderr is a TTY, `--no-color` is not set
//!   and the `NO_COLOR` environment variable is absent (per
//!   <https://no-color.org>).
//! - **Quiet** suppresses everything except errors.
//! - **Verbose** enables info lines and timing.
//!
//! The comparison report itself goes to stdout and is written by
//! [`crate::cmd::compare`].

use std::io::{IsTerminal as _, Write};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stderr.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

// ---------------------------------------------------------------------------
// ANSI escape sequences
// ---------------------------------------------------------------------------

const ANSI_RED: &str = "\x1b[31m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Stderr behaviour derived from CLI flags.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Suppress all non-error stderr output.
    pub quiet: bool,
    /// Emit info lines and timing to stderr.
    pub verbose: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    ///
    /// Color detection also checks `NO_COLOR` and the stderr TTY state.
    pub fn from_flags(no_color_flag: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            colors: colors_enabled(no_color_flag),
            quiet,
            verbose,
        }
    }
}

// ---------------------------------------------------------------------------
// Message lines
// ---------------------------------------------------------------------------

/// Severity of a stderr line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Info,
}

impl Level {
    fn tag(self) -> (&'static str, &'static str) {
        match self {
            Self::Error => ("[E]", ANSI_RED),
            Self::Warning => ("[W]", ANSI_YELLOW),
            Self::Info => ("[I]", ANSI_CYAN),
        }
    }

    /// Whether a line at this level survives `config`.
    fn shown(self, config: &FormatterConfig) -> bool {
        match self {
            Self::Error => true,
            Self::Warning => !config.quiet,
            Self::Info => config.verbose && !config.quiet,
        }
    }
}

/// Writes one tagged line, e.g. `[W] --only matched no collection`.
///
/// Warnings are dropped in quiet mode; info lines need verbose mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_message<W: Write>(
    writer: &mut W,
    level: Level,
    message: &str,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if !level.shown(config) {
        return Ok(());
    }
    let (tag, color) = level.tag();
    if config.colors {
        writeln!(writer, "{color}{tag}{ANSI_RESET} {message}")
    } else {
        writeln!(writer, "{tag} {message}")
    }
}

/// Writes timing information in verbose mode, e.g. `compared in 12ms`.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_timing<W: Write>(
    writer: &mut W,
    label: &str,
    duration: Duration,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if !config.verbose || config.quiet {
        return Ok(());
    }
    writeln!(writer, "{label} in {}ms", duration.as_millis())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
