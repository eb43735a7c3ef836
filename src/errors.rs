//! tspi Error Handling
//!
//! Every failure the crate reports is a [`TspiError`]. There are two disjoint
//! families: syntax errors raised while chunking and parsing a program, and
//! control failures raised by the interpreter when no checkpoint is left to
//! recover from. File access in the CLI pipeline adds a third, I/O.
//!
//! Syntax errors render as `"<description> on line <n>"`, which is the form
//! front ends show to users verbatim. Attach the program text with
//! [`TspiError::with_source`] to get a labelled `miette` report.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use serde::Serialize;
use thiserror::Error;

use crate::syntax::{LineRef, Span};

pub type SourceArc = Arc<NamedSource<String>>;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Program text plus the name it is reported under.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a fallback when real source is unavailable
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("; {}", context),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> SourceArc {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("default context")
    }
}

// ============================================================================
// ERROR KINDS
// ============================================================================

/// Why the interpreter raised a control failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    /// `assert` saw a character outside its charset.
    AssertMismatch { found: char },
    /// `select` saw a character no case accepts.
    NoMatchingCase { found: char },
    /// `select` ran at end of input.
    EndOfInput,
    /// The outermost frame ran out of instructions before `finish`.
    ProgramExhausted,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::AssertMismatch { found } => {
                write!(f, "assertion rejected {:?}", found)
            }
            FailureReason::NoMatchingCase { found } => {
                write!(f, "no case matches {:?}", found)
            }
            FailureReason::EndOfInput => write!(f, "select reached end of input"),
            FailureReason::ProgramExhausted => {
                write!(f, "program ended without reaching finish")
            }
        }
    }
}

/// All error types as a clean enum. The `Display` form is the description
/// half of a diagnostic; [`TspiError`] appends the line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("Expected command")]
    ExpectedCommand,
    #[error("Unrecognised instruction \"{word}\"")]
    UnrecognisedInstruction { word: String },
    #[error("Expected charset after {after}")]
    MissingCharset { after: String },
    #[error("Expected case{}", describe_found(.found))]
    ExpectedCase { found: Option<String> },
    #[error("mismatched indent")]
    MismatchedIndent,
    #[error("unexpected indent")]
    UnexpectedIndent,
    #[error("Unrecovered control failure: {reason}")]
    ControlFailure { reason: FailureReason },
    #[error("{message}")]
    Io { message: String },
}

fn describe_found(found: &Option<String>) -> String {
    match found {
        Some(word) => format!(" instead of \"{}\"", word),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Control,
    Io,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Syntax => "syntax",
            ErrorCategory::Control => "control",
            ErrorCategory::Io => "io",
        }
    }
}

impl ErrorKind {
    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ExpectedCommand
            | Self::UnrecognisedInstruction { .. }
            | Self::MissingCharset { .. }
            | Self::ExpectedCase { .. }
            | Self::MismatchedIndent
            | Self::UnexpectedIndent => ErrorCategory::Syntax,

            Self::ControlFailure { .. } => ErrorCategory::Control,

            Self::Io { .. } => ErrorCategory::Io,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::ExpectedCommand => "expected_command",
            Self::UnrecognisedInstruction { .. } => "unrecognised_instruction",
            Self::MissingCharset { .. } => "missing_charset",
            Self::ExpectedCase { .. } => "expected_case",
            Self::MismatchedIndent => "mismatched_indent",
            Self::UnexpectedIndent => "unexpected_indent",
            Self::ControlFailure { .. } => "control_failure",
            Self::Io { .. } => "io",
        }
    }

    fn primary_label(&self) -> &'static str {
        match self {
            Self::ExpectedCommand => "line must start with a command word",
            Self::UnrecognisedInstruction { .. } => "unknown instruction",
            Self::MissingCharset { .. } => "charset literal missing here",
            Self::ExpectedCase { .. } => "not a case",
            Self::MismatchedIndent => "indentation matches no enclosing level",
            Self::UnexpectedIndent => "nothing to nest under",
            Self::ControlFailure { .. } => "failed here",
            Self::Io { .. } => "",
        }
    }

    fn default_help(&self) -> Option<&'static str> {
        match self {
            Self::UnrecognisedInstruction { .. } => Some(
                "instructions are consume, omit, finish, assert, push, pop and select",
            ),
            Self::MissingCharset { .. } => Some("write the charset in parentheses, e.g. (abc)"),
            Self::ExpectedCase { .. } => {
                Some("every line directly under select must be `case (chars)`")
            }
            Self::MismatchedIndent => {
                Some("dedent back to exactly the indentation of an enclosing line")
            }
            Self::ControlFailure { .. } => {
                Some("wrap the failing instructions in a push body to recover")
            }
            _ => None,
        }
    }
}

// ============================================================================
// TSPI ERROR
// ============================================================================

/// The single error type of the crate.
#[derive(Debug, Clone)]
pub struct TspiError {
    pub kind: ErrorKind,
    /// The program line the error is attributed to, when there is one.
    pub line: Option<LineRef>,
    source: Option<SourceArc>,
}

impl TspiError {
    pub fn syntax(kind: ErrorKind, line: LineRef) -> Self {
        Self {
            kind,
            line: Some(line),
            source: None,
        }
    }

    pub fn control(reason: FailureReason, line: Option<LineRef>) -> Self {
        Self {
            kind: ErrorKind::ControlFailure { reason },
            line,
            source: None,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Io {
                message: message.into(),
            },
            line: None,
            source: None,
        }
    }

    /// Attach the program text so the diagnostic can point into it.
    pub fn with_source(mut self, source: &SourceContext) -> Self {
        self.source = Some(source.to_named_source());
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// True for the run-time "no recovery left" signal, as opposed to a
    /// problem with the program text.
    pub fn is_control_failure(&self) -> bool {
        self.category() == ErrorCategory::Control
    }

    pub fn line_number(&self) -> Option<usize> {
        self.line.map(|line| line.number)
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match &self.kind {
            ErrorKind::ControlFailure { reason } => Some(reason),
            _ => None,
        }
    }
}

impl PartialEq for TspiError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.line_number() == other.line_number()
    }
}

impl std::error::Error for TspiError {}

impl fmt::Display for TspiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} on line {}", self.kind, line.number),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl Diagnostic for TspiError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "tspi::{}::{}",
            self.category().as_str(),
            self.kind.code_suffix()
        )))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind
            .default_help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let line = self.line?;
        self.source.as_ref()?;
        let label = LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            to_source_span(line.span),
        );
        Some(Box::new(std::iter::once(label)))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source
            .as_deref()
            .map(|source| source as &dyn miette::SourceCode)
    }
}

/// Converts a program Span to a miette SourceSpan.
pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a TspiError with full miette diagnostics
pub fn print_error(error: TspiError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(number: usize) -> LineRef {
        LineRef {
            number,
            span: Span { start: 0, end: 4 },
        }
    }

    #[test]
    fn syntax_errors_read_as_description_on_line() {
        let err = TspiError::syntax(ErrorKind::MismatchedIndent, line(4));
        assert_eq!(err.to_string(), "mismatched indent on line 4");

        let err = TspiError::syntax(
            ErrorKind::UnrecognisedInstruction {
                word: "jump".into(),
            },
            line(2),
        );
        assert_eq!(err.to_string(), "Unrecognised instruction \"jump\" on line 2");

        let err = TspiError::syntax(ErrorKind::ExpectedCase { found: None }, line(7));
        assert_eq!(err.to_string(), "Expected case on line 7");
    }

    #[test]
    fn control_failure_is_distinguished() {
        let err = TspiError::control(FailureReason::ProgramExhausted, None);
        assert!(err.is_control_failure());
        assert_eq!(err.category(), ErrorCategory::Control);
        assert_eq!(
            err.to_string(),
            "Unrecovered control failure: program ended without reaching finish"
        );
        assert!(!TspiError::syntax(ErrorKind::ExpectedCommand, line(1)).is_control_failure());
    }

    #[test]
    fn diagnostic_code_names_category_and_kind() {
        let err = TspiError::syntax(
            ErrorKind::MissingCharset {
                after: "assert".into(),
            },
            line(3),
        );
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("tspi::syntax::missing_charset"));
    }

    #[test]
    fn labels_need_attached_source() {
        let err = TspiError::syntax(ErrorKind::ExpectedCommand, line(1));
        assert!(err.labels().is_none());
        let err = err.with_source(&SourceContext::from_file("prog.tspi", "(ab)\n"));
        assert_eq!(err.labels().map(|l| l.count()), Some(1));
    }
}
