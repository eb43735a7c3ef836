//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for colorizing output, formatting run results
//! and generating JSON. By centralizing output logic here, we ensure a
//! consistent user experience across all commands.

use std::io::Write;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::{print_error, FailureReason, TspiError};
use crate::runtime::RunReport;

// ============================================================================
// JSON VIEWS
// ============================================================================

/// Serializable view of a [`RunReport`].
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub outputs: &'a [String],
    pub position: usize,
    pub failure: Option<JsonFailure<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonFailure<'a> {
    pub message: String,
    pub line: Option<usize>,
    pub reason: Option<&'a FailureReason>,
}

impl<'a> From<&'a RunReport> for JsonReport<'a> {
    fn from(report: &'a RunReport) -> Self {
        Self {
            outputs: &report.outputs,
            position: report.position,
            failure: report.failure.as_ref().map(|err| JsonFailure {
                message: err.to_string(),
                line: err.line_number(),
                reason: err.failure_reason(),
            }),
        }
    }
}

pub fn report_to_json(report: &RunReport) -> Result<String, TspiError> {
    serde_json::to_string_pretty(&JsonReport::from(report))
        .map_err(|e| TspiError::io(format!("cannot encode report: {}", e)))
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints each run's output, one per line, as `caught :: "<output>"`.
pub fn print_report(report: &RunReport, color: ColorChoice) {
    let mut stdout = StandardStream::stdout(color);
    for output in &report.outputs {
        print_caught(&mut stdout, output);
    }
    if let Some(failure) = &report.failure {
        print_failure(color, failure);
    }
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Blue)));
    let _ = writeln!(stdout, "finished at offset {}", report.position);
    let _ = stdout.reset();
}

pub fn print_single(output: &str, position: usize, color: ColorChoice) {
    let mut stdout = StandardStream::stdout(color);
    print_caught(&mut stdout, output);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Blue)));
    let _ = writeln!(stdout, "stopped at offset {}", position);
    let _ = stdout.reset();
}

/// The distinguished "program terminated" signal for an unrecovered
/// control failure, followed by its diagnostic.
pub fn print_failure(color: ColorChoice, failure: &TspiError) {
    let mut stderr = StandardStream::stderr(color);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = writeln!(stderr, "Program terminated");
    let _ = stderr.reset();
    print_error(failure.clone());
}

/// Summary line for `tspi check`.
pub fn print_check_summary(passed: usize, failed: usize, color: ColorChoice) {
    let mut stdout = StandardStream::stdout(color);
    if passed > 0 {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
        let _ = writeln!(stdout, "✓ {} file(s) parsed", passed);
    }
    if failed > 0 {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
        let _ = writeln!(stdout, "✗ {} file(s) with errors", failed);
    }
    if passed + failed == 0 {
        let _ = writeln!(stdout, "no .tspi files found");
    }
    let _ = stdout.reset();
}

pub fn print_check_ok(path: &str, color: ColorChoice) {
    let mut stdout = StandardStream::stdout(color);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
    let _ = write!(stdout, "✓");
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {}", path);
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_caught(stdout: &mut StandardStream, output: &str) {
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
    let _ = write!(stdout, "caught ::");
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {:?}", output);
}
