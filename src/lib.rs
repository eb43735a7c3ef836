//! # tspi
//!
//! A token scanner pseudocode interpreter: a small indentation-sensitive
//! language whose programs move characters from an input stream to an output
//! stream, assert what comes next, branch on the next character and register
//! recovery points that roll both streams back on failure.
//!
//! ```text
//! source text → chunker → line tree → parser → program → interpreter → outputs
//! ```
//!
//! ```
//! let program = tspi::parse("consume\nconsume\nfinish").unwrap();
//! assert_eq!(tspi::run_all(&program, "hello"), vec!["he", "ll", "o"]);
//! ```

pub use crate::ast::{Case, Instruction, Op, Program};
pub use crate::errors::{ErrorCategory, ErrorKind, FailureReason, SourceContext, TspiError};
pub use crate::runtime::{run_all, run_once, run_report, InputCursor, RunReport, Runs, StrCursor};
pub use crate::syntax::parser::parse;
pub use crate::syntax::CharSet;

pub mod ast;
pub mod cli;
pub mod disassembler;
pub mod engine;
pub mod errors;
pub mod repl;
pub mod runtime;
pub mod syntax;
