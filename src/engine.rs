//! Execution pipeline: named program source in, runs out.
//!
//! Front ends (the CLI and REPL here, or an interactive editor) go through
//! [`ExecutionPipeline`] so every error they surface carries the program text
//! for `miette` rendering.

use std::path::Path;

use tracing::debug;

use crate::ast::Program;
use crate::errors::{SourceContext, TspiError};
use crate::runtime::{self, InputCursor, RunReport, StrCursor};
use crate::syntax::parser;

/// A program source ready to parse and run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPipeline {
    source: SourceContext,
}

/// Result of a single run through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleRun {
    pub output: String,
    /// Cursor offset the run stopped at.
    pub position: usize,
}

impl ExecutionPipeline {
    pub fn new(source: SourceContext) -> Self {
        Self { source }
    }

    /// Build a pipeline from program text with a display name.
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(SourceContext::from_file(name, text))
    }

    /// Load a program file.
    pub fn from_path(path: &Path) -> Result<Self, TspiError> {
        let text = Self::read_file(path)?;
        Ok(Self::from_text(path.display().to_string(), text))
    }

    pub fn source(&self) -> &SourceContext {
        &self.source
    }

    // ============================================================================
    // SERVICE METHODS
    // ============================================================================

    /// Reads a file with standardized error handling
    pub fn read_file(path: &Path) -> Result<String, TspiError> {
        std::fs::read_to_string(path).map_err(|error| {
            TspiError::io(format!("cannot read '{}': {}", path.display(), error))
        })
    }

    pub fn parse(&self) -> Result<Program, TspiError> {
        let program = parser::parse(&self.source.content).map_err(|e| self.attach(e))?;
        debug!(
            source = %self.source.name,
            instructions = program.len(),
            "parsed program"
        );
        Ok(program)
    }

    /// Parse, then drive the program over the whole input.
    pub fn run(&self, input: &str) -> Result<RunReport, TspiError> {
        let program = self.parse()?;
        let mut report = runtime::run_report(&program, input);
        report.failure = report.failure.map(|e| self.attach(e));
        Ok(report)
    }

    /// Parse, then execute exactly one run from the start of `input`.
    pub fn run_once(&self, input: &str) -> Result<SingleRun, TspiError> {
        let program = self.parse()?;
        let mut cursor = StrCursor::new(input);
        let output = runtime::run_once(&program, &mut cursor).map_err(|e| self.attach(e))?;
        Ok(SingleRun {
            output,
            position: cursor.tell(),
        })
    }

    fn attach(&self, error: TspiError) -> TspiError {
        error.with_source(&self.source)
    }
}
