//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use tspi::{InputCursor, Program, StrCursor, TspiError};

/// Parse `source`, panicking with the rendered error on failure.
pub fn program(source: &str) -> Program {
    tspi::parse(source).unwrap_or_else(|e| panic!("program failed to parse: {e}\n{source}"))
}

/// One run from offset zero, returning the result and where the cursor
/// was left.
pub fn run_from_start(source: &str, input: &str) -> (Result<String, TspiError>, usize) {
    let program = program(source);
    let mut cursor = StrCursor::new(input);
    let result = tspi::run_once(&program, &mut cursor);
    (result, cursor.tell())
}

/// Path to a bundled demo program.
pub fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name)
}

/// Write `contents` to a uniquely named file in the system temp dir.
pub fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tspi-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).expect("failed to write scratch file");
    path
}
