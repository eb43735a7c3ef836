//! Syntax module for the tspi language
//!
//! Source text is turned into a program in two steps. The [`chunker`] splits
//! the text into lines, lexes each one into [`Token`]s and nests lines by
//! indentation into a tree of [`LineRecord`]s. The [`parser`] then turns that
//! tree into typed [`crate::ast::Instruction`]s.

use serde::Serialize;

pub mod charset;
pub mod chunker;
pub mod parser;

pub use charset::CharSet;

/// Represents a span in the source code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Where an instruction came from: its 1-based line number and the byte span
/// of the line's content (indentation excluded).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Default)]
pub struct LineRef {
    pub number: usize,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    CharSet(CharSet),
}

impl Token {
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(word) => Some(word),
            Token::CharSet(_) => None,
        }
    }

    pub fn as_charset(&self) -> Option<&CharSet> {
        match self {
            Token::CharSet(set) => Some(set),
            Token::Word(_) => None,
        }
    }
}

/// One non-empty source line with the lines indented beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    pub line: LineRef,
    pub tokens: Vec<Token>,
    pub body: Vec<LineRecord>,
}

impl LineRecord {
    pub fn number(&self) -> usize {
        self.line.number
    }
}
