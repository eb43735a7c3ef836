//! Runtime module for the tspi language
//!
//! - [`cursor`]: the seekable input abstraction a run reads from
//! - [`interpreter`]: one run, through `finish` or an unrecovered failure
//! - [`driver`]: repeated runs over a whole input text

pub mod cursor;
pub mod driver;
pub mod interpreter;

pub use cursor::{InputCursor, StrCursor};
pub use driver::{run_all, run_report, RunReport, Runs};
pub use interpreter::{run_once, Checkpoint, Frame, Interpreter};
