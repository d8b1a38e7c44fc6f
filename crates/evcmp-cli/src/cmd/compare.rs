//! Implementation of `evcmp <NEW> <REFERENCE>`.
//!
//! Reads both event files, compares NEW against REFERENCE collection by
//! collection, and writes the report to stdout.
//!
//! Exit codes:
//! - 0 = comparison completed (mismatches alone do not fail the run)
//! - 1 = event counts differ, or `--fail-on-mismatch` and the report is
//!   not clean
//! - 2 = an input could not be read or decoded, or an argument is invalid
use std::io::Write;
use std::time::Instant;

use evcmp_core::{
    CompareConfig, EventFile, EventStore, MismatchReport, compare_stores, detect_encoding,
    parse_event_file,
};
use regex::Regex;

use crate::cli::{Cli, OutputFormat, PathOrStdin};
use crate::error::CliError;
use crate::format::{FormatterConfig, Level, write_message, write_timing};
use crate::io::read_input;

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Runs the comparison with stdout and stderr as sinks.
///
/// # Errors
///
/// See [`execute`].
pub fn run(cli: &Cli, fmt: &FormatterConfig) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    execute(cli, fmt, &mut stdout.lock(), &mut stderr.lock())
}

/// Runs the comparison, writing the report to `out` and diagnostics to `err`.
///
/// # Errors
///
/// - [`CliError::InvalidArguments`]: both inputs are stdin.
/// - [`CliError::InvalidPattern`]: an `--only` regex does not compile.
/// - I/O and [`CliError::DecodeFailed`]: an input cannot be loaded.
/// - [`CliError::CompareFailed`]: the event counts differ.
/// - [`CliError::MismatchesFound`]: `--fail-on-mismatch` and the report
///   is not clean.
pub fn execute<O: Write, E: Write>(
    cli: &Cli,
    fmt: &FormatterConfig,
    out: &mut O,
    err: &mut E,
) -> Result<(), CliError> {
    if matches!(
        (&cli.new, &cli.reference),
        (PathOrStdin::Stdin, PathOrStdin::Stdin)
    ) {
        return Err(CliError::InvalidArguments {
            detail: "NEW and REFERENCE cannot both be read from stdin".to_owned(),
        });
    }

    let config = select_collections(&cli.only)?;
    if config.collections.is_empty() {
        write_message(
            err,
            Level::Warning,
            "--only matched no configured collection; nothing will be compared",
            fmt,
        )
        .map_err(stderr_error)?;
    }

    let new = load(&cli.new, cli.max_file_size, fmt, err)?;
    let reference = load(&cli.reference, cli.max_file_size, fmt, err)?;

    let started = Instant::now();
    let report = compare_stores(&reference, &new, &config)?;
    write_timing(err, "compared", started.elapsed(), fmt).map_err(stderr_error)?;

    let digest = if cli.digest || cli.format == OutputFormat::Json {
        Some(report.digest().map_err(report_error)?)
    } else {
        None
    };

    match cli.format {
        OutputFormat::Human => write_human(
            out,
            &report,
            &config.collections,
            cli.max_log,
            digest.as_deref(),
        )
        .map_err(stdout_error)?,
        OutputFormat::Json => write_json(out, &report, &config.collections, digest.as_deref())?,
    }

    if !report.structural_errors.is_empty() {
        write_message(
            err,
            Level::Warning,
            &format!(
                "{} collection(s) could not be compared",
                report.structural_errors.len()
            ),
            fmt,
        )
        .map_err(stderr_error)?;
    }

    if cli.fail_on_mismatch && !report.is_clean() {
        return Err(CliError::MismatchesFound {
            mismatched: report.mismatched,
            structural: report.structural_errors.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Narrows the default collection list to names matching any of `patterns`.
///
/// An empty `patterns` keeps every collection.
fn select_collections(patterns: &[String]) -> Result<CompareConfig, CliError> {
    let mut config = CompareConfig::default();
    if patterns.is_empty() {
        return Ok(config);
    }
    let regexes = patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| CliError::InvalidPattern {
                pattern: pattern.clone(),
                detail: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    config.retain(|name| regexes.iter().any(|re| re.is_match(name)));
    Ok(config)
}

/// Reads and decodes one input into an [`EventStore`].
fn load<E: Write>(
    source: &PathOrStdin,
    max_size: u64,
    fmt: &FormatterConfig,
    err: &mut E,
) -> Result<EventStore, CliError> {
    let label = source.label();
    let started = Instant::now();

    let bytes = read_input(source, max_size)?;
    let decode_failed = |cause| CliError::DecodeFailed {
        source: label.clone(),
        cause,
    };
    let encoding = detect_encoding(&bytes).map_err(decode_failed)?;
    let file: EventFile = parse_event_file(&bytes).map_err(decode_failed)?;
    let events = file.events.len();

    write_timing(err, &format!("loaded {label}"), started.elapsed(), fmt)
        .map_err(stderr_error)?;
    write_message(
        err,
        Level::Info,
        &format!("{label}: {events} events, {encoding}"),
        fmt,
    )
    .map_err(stderr_error)?;

    Ok(EventStore::from_files([file]))
}

// ---------------------------------------------------------------------------
// Human output
// ---------------------------------------------------------------------------

/// Writes the report as text.
///
/// Layout: the compared collection list, one line per mismatch (capped by
/// `max_log`), one `! ` line per structural error, the totals line and the
/// per-collection counts in configured order.
fn write_human<W: Write>(
    w: &mut W,
    report: &MismatchReport,
    collections: &[String],
    max_log: Option<usize>,
    digest: Option<&str>,
) -> std::io::Result<()> {
    writeln!(w, "collections: {}", collections.join(", "))?;

    let limit = max_log.unwrap_or(usize::MAX);
    for mismatch in report.mismatches.iter().take(limit) {
        writeln!(w, "{mismatch}")?;
    }
    let hidden = report.mismatches.len().saturating_sub(limit);
    if hidden > 0 {
        writeln!(w, "... {hidden} more mismatches not shown")?;
    }

    for error in &report.structural_errors {
        writeln!(w, "! {error}")?;
    }

    writeln!(
        w,
        "{} / {} have mismatches, per category:",
        report.mismatched, report.examined
    )?;
    for name in collections {
        writeln!(w, "  {name}: {}", report.count(name))?;
    }

    if let Some(digest) = digest {
        writeln!(w, "digest: {digest}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

/// Writes the report as one pretty-printed JSON object with the compared
/// collection list and digest added.
fn write_json<W: Write>(
    w: &mut W,
    report: &MismatchReport,
    collections: &[String],
    digest: Option<&str>,
) -> Result<(), CliError> {
    let mut value = serde_json::to_value(report).map_err(report_error)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("collections".to_owned(), serde_json::json!(collections));
        map.insert("digest".to_owned(), serde_json::json!(digest));
    }
    let json = serde_json::to_string_pretty(&value).map_err(report_error)?;
    writeln!(w, "{json}").map_err(stdout_error)
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn stdout_error(e: std::io::Error) -> CliError {
    CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    }
}

fn stderr_error(e: std::io::Error) -> CliError {
    CliError::IoError {
        source: "stderr".to_owned(),
        detail: e.to_string(),
    }
}

fn report_error(e: serde_json::Error) -> CliError {
    CliError::IoError {
        source: "report".to_owned(),
        detail: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
