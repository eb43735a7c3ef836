//! The tspi execution engine.
//!
//! A run drives two stacks over one input cursor and one output buffer:
//!
//! - the execution stack holds [`Frame`]s; the top frame is the instruction
//!   sequence being executed. `select` pushes the matching case's body and a
//!   frame is popped when its instructions run out.
//! - the checkpoint stack holds recovery points registered by `push`. A
//!   control failure pops the newest one, unwinds the execution stack to the
//!   depth it was registered at, rolls both streams back to the positions it
//!   recorded and runs its body in place of the unwound frames.
//!
//! A failure with no checkpoint left ends the run with a control-failure
//! [`TspiError`].

use tracing::{debug, trace};

use crate::ast::{Instruction, Op};
use crate::errors::{FailureReason, TspiError};
use crate::runtime::cursor::InputCursor;
use crate::syntax::LineRef;

// ============================================================================
// FRAMES AND CHECKPOINTS
// ============================================================================

/// A resumable point in one instruction sequence plus the stream positions
/// valid there.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'p> {
    pub input: usize,
    pub output: usize,
    pub ip: usize,
    pub instructions: &'p [Instruction],
}

impl<'p> Frame<'p> {
    fn new(input: usize, output: usize, instructions: &'p [Instruction]) -> Self {
        Self {
            input,
            output,
            ip: 0,
            instructions,
        }
    }

    /// Fetch the next instruction, or `None` once the sequence is exhausted.
    fn fetch(&mut self) -> Option<&'p Instruction> {
        let instruction = self.instructions.get(self.ip)?;
        self.ip += 1;
        Some(instruction)
    }
}

/// A recovery frame plus the execution depth at which `push` registered it.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint<'p> {
    pub depth: usize,
    pub frame: Frame<'p>,
}

/// What the fetch-execute loop does after one step.
enum Flow {
    Continue,
    Finished,
}

/// Internal failure signal, recoverable while checkpoints remain.
#[derive(Debug)]
struct ControlFailure {
    reason: FailureReason,
    line: Option<LineRef>,
}

impl ControlFailure {
    fn at(reason: FailureReason, instruction: &Instruction) -> Self {
        Self {
            reason,
            line: Some(instruction.line),
        }
    }
}

// ============================================================================
// INTERPRETER
// ============================================================================

/// State of one run: the two stacks, the output buffer and the borrowed
/// input cursor.
pub struct Interpreter<'p, 'c, C: InputCursor + ?Sized> {
    cursor: &'c mut C,
    output: String,
    frames: Vec<Frame<'p>>,
    checkpoints: Vec<Checkpoint<'p>>,
    steps: usize,
}

impl<'p, 'c, C: InputCursor + ?Sized> Interpreter<'p, 'c, C> {
    /// Prepare a run of `program` starting wherever `cursor` currently sits.
    pub fn new(program: &'p [Instruction], cursor: &'c mut C) -> Self {
        let start = cursor.tell();
        Self {
            cursor,
            output: String::new(),
            frames: vec![Frame::new(start, 0, program)],
            checkpoints: Vec::new(),
            steps: 0,
        }
    }

    /// Execute until `finish` or an unrecovered control failure.
    pub fn run(mut self) -> Result<String, TspiError> {
        loop {
            match self.step() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Finished) => {
                    debug!(
                        steps = self.steps,
                        input = self.cursor.tell(),
                        output = %self.output,
                        "run finished"
                    );
                    return Ok(self.output);
                }
                Err(failure) => self.recover(failure)?,
            }
        }
    }

    // ------------------------------------------------------------------------
    // Fetch-execute
    // ------------------------------------------------------------------------

    fn step(&mut self) -> Result<Flow, ControlFailure> {
        let Some(top) = self.frames.last_mut() else {
            return Err(ControlFailure {
                reason: FailureReason::ProgramExhausted,
                line: None,
            });
        };
        let Some(instruction) = top.fetch() else {
            self.leave_frame()?;
            return Ok(Flow::Continue);
        };

        self.steps += 1;
        trace!(
            line = instruction.line.number,
            op = instruction.keyword(),
            input = self.cursor.tell(),
            depth = self.frames.len(),
            "step"
        );

        match &instruction.op {
            Op::Move { drop } => {
                let read = self.cursor.read();
                if let (false, Some(c)) = (*drop, read) {
                    self.output.push(c);
                }
                self.sync_top();
            }
            Op::Finish => return Ok(Flow::Finished),
            Op::Assert { charset } => {
                if let Some(c) = self.cursor.peek() {
                    if !charset.contains(c) {
                        return Err(ControlFailure::at(
                            FailureReason::AssertMismatch { found: c },
                            instruction,
                        ));
                    }
                }
            }
            Op::Select { cases } => {
                let Some(c) = self.cursor.peek() else {
                    return Err(ControlFailure::at(FailureReason::EndOfInput, instruction));
                };
                let Some(case) = cases.iter().find(|case| case.charset.contains(c)) else {
                    return Err(ControlFailure::at(
                        FailureReason::NoMatchingCase { found: c },
                        instruction,
                    ));
                };
                self.frames
                    .push(Frame::new(self.cursor.tell(), self.output.len(), &case.body));
            }
            Op::Push { body } => {
                let checkpoint = Checkpoint {
                    depth: self.frames.len(),
                    frame: Frame::new(self.cursor.tell(), self.output.len(), body),
                };
                debug!(
                    line = instruction.line.number,
                    depth = checkpoint.depth,
                    input = checkpoint.frame.input,
                    "checkpoint registered"
                );
                self.checkpoints.push(checkpoint);
            }
            Op::Pop => {
                match self.checkpoints.pop() {
                    Some(discarded) => debug!(
                        line = instruction.line.number,
                        depth = discarded.depth,
                        "checkpoint discarded"
                    ),
                    None => debug!(line = instruction.line.number, "pop with no checkpoint"),
                }
            }
        }

        Ok(Flow::Continue)
    }

    /// Pop an exhausted frame and hand its stream positions to the frame
    /// beneath it. Running off the outermost frame is a failure.
    fn leave_frame(&mut self) -> Result<(), ControlFailure> {
        let Some(finished) = self.frames.pop() else {
            return Ok(());
        };
        match self.frames.last_mut() {
            Some(parent) => {
                parent.input = finished.input;
                parent.output = finished.output;
                self.cursor.seek(finished.input);
                Ok(())
            }
            None => Err(ControlFailure {
                reason: FailureReason::ProgramExhausted,
                line: finished.instructions.last().map(|inst| inst.line),
            }),
        }
    }

    /// Record the current stream positions in the top frame.
    fn sync_top(&mut self) {
        let input = self.cursor.tell();
        let output = self.output.len();
        if let Some(top) = self.frames.last_mut() {
            top.input = input;
            top.output = output;
        }
    }

    // ------------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------------

    /// Roll back to the newest checkpoint, or give up when there is none.
    fn recover(&mut self, failure: ControlFailure) -> Result<(), TspiError> {
        let Some(checkpoint) = self.checkpoints.pop() else {
            debug!(reason = %failure.reason, "unrecovered control failure");
            return Err(TspiError::control(failure.reason, failure.line));
        };

        debug!(
            reason = %failure.reason,
            depth = checkpoint.depth,
            input = checkpoint.frame.input,
            output = checkpoint.frame.output,
            "rolling back to checkpoint"
        );
        self.frames.truncate(checkpoint.depth.saturating_sub(1));
        self.output.truncate(checkpoint.frame.output);
        self.cursor.seek(checkpoint.frame.input);
        self.frames.push(checkpoint.frame);
        Ok(())
    }
}

/// Execute one run of `program` against `cursor`, through one `finish` or
/// one unrecovered failure. The cursor is left where the run stopped.
pub fn run_once<C: InputCursor + ?Sized>(
    program: &[Instruction],
    cursor: &mut C,
) -> Result<String, TspiError> {
    Interpreter::new(program, cursor).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::cursor::StrCursor;
    use crate::syntax::parser::parse;

    fn run(src: &str, input: &str) -> (Result<String, TspiError>, usize) {
        let program = parse(src).unwrap();
        let mut cursor = StrCursor::new(input);
        let result = run_once(&program, &mut cursor);
        (result, cursor.tell())
    }

    #[test]
    fn consume_and_omit() {
        assert_eq!(run("consume\nomit\nconsume\nfinish", "abc"), (Ok("ac".into()), 3));
    }

    #[test]
    fn move_at_end_of_input_is_not_a_failure() {
        assert_eq!(run("consume\nconsume\nomit\nfinish", "a"), (Ok("a".into()), 1));
    }

    #[test]
    fn assert_passes_at_end_of_input() {
        assert_eq!(run("assert (a)\nfinish", ""), (Ok(String::new()), 0));
    }

    #[test]
    fn assert_does_not_consume() {
        assert_eq!(run("assert (a)\nfinish", "a"), (Ok(String::new()), 0));
        let (result, position) = run("omit\nassert (a)\nfinish", "xb");
        assert!(result.unwrap_err().is_control_failure());
        assert_eq!(position, 1);
    }

    #[test]
    fn select_runs_first_matching_case_then_continues() {
        let src = "select\n  case (ab)\n    omit\n  case (bc)\n    consume\nconsume\nfinish";
        assert_eq!(run(src, "bz"), (Ok("z".into()), 2));
    }

    #[test]
    fn select_failures() {
        let src = "select\n  case (a)\n    consume\nfinish";
        let (result, _) = run(src, "");
        assert_eq!(
            result.unwrap_err().failure_reason(),
            Some(&FailureReason::EndOfInput)
        );
        let (result, _) = run(src, "q");
        assert_eq!(
            result.unwrap_err().failure_reason(),
            Some(&FailureReason::NoMatchingCase { found: 'q' })
        );
    }

    #[test]
    fn exhausting_program_is_fatal() {
        let (result, _) = run("consume\nconsume", "hi");
        let err = result.unwrap_err();
        assert_eq!(err.failure_reason(), Some(&FailureReason::ProgramExhausted));
        assert_eq!(err.line_number(), Some(2));
    }

    #[test]
    fn checkpoint_rolls_back_both_streams() {
        let src = "consume\npush\n  consume\n  finish\nomit\nconsume\nassert (ab)\nfinish";
        // 'x' fails the assert: output "xz" rolls back to "x" and the input
        // rewinds to just after the first consume.
        assert_eq!(run(src, "xyzx"), (Ok("xy".into()), 2));
    }

    #[test]
    fn push_body_never_runs_without_failure() {
        let src = "push\n  omit\n  finish\nconsume\nfinish";
        assert_eq!(run(src, "ab"), (Ok("a".into()), 1));
    }

    #[test]
    fn pop_narrows_recovery_to_outer_checkpoint() {
        let src = "push\n  omit\n  omit\n  finish\nconsume\npush\n  consume\n  finish\npop\nassert (z)\nfinish";
        // The inner handler was popped, so the outer one runs from offset 0.
        assert_eq!(run(src, "abc"), (Ok(String::new()), 2));
    }

    #[test]
    fn pop_without_checkpoint_is_ignored() {
        assert_eq!(run("pop\nconsume\nfinish", "a"), (Ok("a".into()), 1));
    }

    #[test]
    fn recovery_unwinds_select_frames() {
        let src = "push\n  consume\n  finish\nselect\n  case (a)\n    consume\n    assert (q)\nfinish";
        assert_eq!(run(src, "ab"), (Ok("a".into()), 1));
    }

    #[test]
    fn failure_inside_recovery_body_uses_next_checkpoint() {
        let src = "push\n  omit\n  finish\npush\n  assert (q)\n  consume\n  finish\nassert (q)\nfinish";
        assert_eq!(run(src, "ab"), (Ok(String::new()), 1));
    }

    #[test]
    fn checkpoint_from_exited_case_body_still_recovers() {
        // Registered at depth 2 inside the case; fires after that frame is gone.
        let src = "select\n  case (a)\n    push\n      omit\n      finish\n    consume\nconsume\nassert (z)\nfinish";
        assert_eq!(run(src, "abc"), (Ok(String::new()), 1));
    }
}
