//! Line chunker and lexer.
//!
//! Splits program text into lines, lexes each line into tokens and nests the
//! lines into a tree by indentation. Indentation is the raw count of leading
//! whitespace characters; tabs and spaces are not normalised against each
//! other.
//!
//! The lexer is permissive on purpose: characters that start no token are
//! skipped without a diagnostic, and a charset literal with no closing `)`
//! runs to the end of the line.

use std::mem;

use crate::errors::{ErrorKind, TspiError};
use crate::syntax::{CharSet, LineRecord, LineRef, Span, Token};

/// Chunk program text into its tree of line records.
pub fn chunk(text: &str) -> Result<Vec<LineRecord>, TspiError> {
    let mut scopes = ScopeStack::new();
    let mut offset = 0;

    for (index, raw) in text.split('\n').enumerate() {
        let line_start = offset;
        offset += raw.len() + 1;

        let content = raw.trim_start();
        let tokens = lex_line(content);
        if tokens.is_empty() {
            // Blank and comment-only lines take no part in nesting.
            continue;
        }

        let indent = raw.chars().count() - content.chars().count();
        let line = LineRef {
            number: index + 1,
            span: Span {
                start: line_start + (raw.len() - content.len()),
                end: line_start + raw.trim_end().len(),
            },
        };

        scopes.enter(indent, line)?;
        scopes.push(LineRecord {
            line,
            tokens,
            body: Vec::new(),
        });
    }

    Ok(scopes.finish())
}

// ============================================================================
// INDENTATION
// ============================================================================

/// Records collected at one indentation level.
#[derive(Debug)]
struct Scope {
    indent: usize,
    records: Vec<LineRecord>,
}

impl Scope {
    fn new(indent: usize) -> Self {
        Self {
            indent,
            records: Vec::new(),
        }
    }
}

/// The innermost open scope plus every scope enclosing it. The root scope
/// sits at indentation 0 and is never closed before [`ScopeStack::finish`].
#[derive(Debug)]
struct ScopeStack {
    current: Scope,
    outer: Vec<Scope>,
}

impl ScopeStack {
    fn new() -> Self {
        Self {
            current: Scope::new(0),
            outer: Vec::new(),
        }
    }

    /// Make the scope at `indent` current, opening or closing scopes as the
    /// indentation demands.
    fn enter(&mut self, indent: usize, line: LineRef) -> Result<(), TspiError> {
        if indent > self.current.indent {
            if self.current.records.is_empty() {
                return Err(TspiError::syntax(ErrorKind::UnexpectedIndent, line));
            }
            let parent = mem::replace(&mut self.current, Scope::new(indent));
            self.outer.push(parent);
        } else if indent < self.current.indent {
            while indent < self.current.indent && self.close() {}
            if self.current.indent != indent {
                return Err(TspiError::syntax(ErrorKind::MismatchedIndent, line));
            }
        }
        Ok(())
    }

    fn push(&mut self, record: LineRecord) {
        self.current.records.push(record);
    }

    /// Close the current scope, handing its records to the last record of
    /// the enclosing scope as that record's body.
    fn close(&mut self) -> bool {
        let Some(parent) = self.outer.pop() else {
            return false;
        };
        let body = mem::replace(&mut self.current, parent).records;
        if let Some(owner) = self.current.records.last_mut() {
            owner.body = body;
        }
        true
    }

    fn finish(mut self) -> Vec<LineRecord> {
        while self.close() {}
        self.current.records
    }
}

// ============================================================================
// LEXER
// ============================================================================

/// Lex one line with its indentation already stripped.
fn lex_line(content: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = content.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ';' => break,
            '(' => {
                chars.next();
                let mut set = CharSet::new();
                while let Some(c) = chars.next() {
                    match c {
                        ')' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                set.insert(escaped);
                            }
                        }
                        _ => set.insert(c),
                    }
                }
                tokens.push(Token::CharSet(set));
            }
            c if c.is_alphabetic() => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if !c.is_alphabetic() {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
            _ => {
                chars.next();
            }
        }
    }

    tokens
}
