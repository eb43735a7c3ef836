//! The instruction tree a tspi program parses into.
//!
//! Instructions are immutable once built. Each one remembers the source line
//! it came from so run-time failures can point back at the program text.

use serde::Serialize;

use crate::syntax::{CharSet, LineRef};

/// The top-level instruction sequence of a parsed program.
pub type Program = Vec<Instruction>;

#[derive(Debug, Clone, Serialize)]
pub struct Instruction {
    pub line: LineRef,
    pub op: Op,
}

/// Source position is not part of an instruction's identity: two trees that
/// differ only in where their lines sat compare equal.
impl PartialEq for Instruction {
    fn eq(&self, other: &Self) -> bool {
        self.op == other.op
    }
}

impl Eq for Instruction {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// `consume` (`drop: false`) or `omit` (`drop: true`).
    Move { drop: bool },
    Finish,
    Assert { charset: CharSet },
    /// Cases in declaration order; the first whose charset matches wins.
    Select { cases: Vec<Case> },
    /// Register `body` as the recovery point for later failures. The body is
    /// not run here.
    Push { body: Vec<Instruction> },
    /// Discard the most recently registered recovery point.
    Pop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Case {
    pub charset: CharSet,
    pub body: Vec<Instruction>,
}

impl Instruction {
    pub fn new(line: LineRef, op: Op) -> Self {
        Self { line, op }
    }

    /// The surface keyword this instruction was written with.
    pub fn keyword(&self) -> &'static str {
        match &self.op {
            Op::Move { drop: false } => "consume",
            Op::Move { drop: true } => "omit",
            Op::Finish => "finish",
            Op::Assert { .. } => "assert",
            Op::Select { .. } => "select",
            Op::Push { .. } => "push",
            Op::Pop => "pop",
        }
    }
}
