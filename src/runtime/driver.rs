//! Repeated runs over a whole input text.

use tracing::{debug, warn};

use crate::ast::Instruction;
use crate::errors::TspiError;
use crate::runtime::cursor::{InputCursor, StrCursor};
use crate::runtime::interpreter::run_once;

/// Iterator over successive runs of one program, each starting where the
/// previous one left the cursor.
///
/// Ends when the input is exhausted, after yielding the first unrecovered
/// failure, or after a successful run that consumed nothing (repeating it
/// would never make progress). Front ends can do their own event handling
/// between items.
#[derive(Debug)]
pub struct Runs<'p, 't> {
    program: &'p [Instruction],
    cursor: StrCursor<'t>,
    count: usize,
    done: bool,
}

impl<'p, 't> Runs<'p, 't> {
    pub fn new(program: &'p [Instruction], text: &'t str) -> Self {
        Self {
            program,
            cursor: StrCursor::new(text),
            count: 0,
            done: false,
        }
    }

    /// Offset the next run would start at.
    pub fn position(&self) -> usize {
        self.cursor.tell()
    }
}

impl Iterator for Runs<'_, '_> {
    type Item = Result<String, TspiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor.is_exhausted() {
            return None;
        }

        let start = self.cursor.tell();
        self.count += 1;
        debug!(run = self.count, start, "starting run");
        let result = run_once(self.program, &mut self.cursor);

        match &result {
            Err(err) => {
                debug!(run = self.count, error = %err, "driver stopping on failure");
                self.done = true;
            }
            Ok(_) if self.cursor.tell() <= start => {
                warn!(run = self.count, start, "run consumed no input; stopping");
                self.done = true;
            }
            Ok(_) => {}
        }
        Some(result)
    }
}

/// Outcome of driving a program over a whole input.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outputs: Vec<String>,
    /// The unrecovered failure that stopped the driver, if any.
    pub failure: Option<TspiError>,
    /// Where the cursor was left.
    pub position: usize,
}

/// Run `program` repeatedly over `text`, collecting every successful run's
/// output. A failure ends the collection without being reported.
pub fn run_all(program: &[Instruction], text: &str) -> Vec<String> {
    Runs::new(program, text).map_while(Result::ok).collect()
}

/// Like [`run_all`], but keeps the failure that stopped the driver.
pub fn run_report(program: &[Instruction], text: &str) -> RunReport {
    let mut runs = Runs::new(program, text);
    let mut outputs = Vec::new();
    let mut failure = None;

    for result in runs.by_ref() {
        match result {
            Ok(output) => outputs.push(output),
            Err(err) => failure = Some(err),
        }
    }

    RunReport {
        outputs,
        failure,
        position: runs.position(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse;

    #[test]
    fn splits_input_into_runs() {
        let program = parse("consume\nconsume\nfinish").unwrap();
        assert_eq!(run_all(&program, "abcde"), vec!["ab", "cd", "e"]);
    }

    #[test]
    fn stops_at_first_failure_keeping_earlier_outputs() {
        let program = parse("assert (a)\nconsume\nfinish").unwrap();
        assert_eq!(run_all(&program, "aab"), vec!["a", "a"]);

        let report = run_report(&program, "aab");
        assert_eq!(report.outputs, vec!["a", "a"]);
        assert!(report.failure.unwrap().is_control_failure());
        assert_eq!(report.position, 2);
    }

    #[test]
    fn empty_input_runs_nothing() {
        let program = parse("finish").unwrap();
        assert!(run_all(&program, "").is_empty());
    }

    #[test]
    fn run_without_progress_stops_the_driver() {
        let program = parse("finish").unwrap();
        let runs: Vec<_> = Runs::new(&program, "abc").collect();
        assert_eq!(runs, vec![Ok(String::new())]);
    }
}
