//! tspi Parser
//!
//! Converts the chunker's line tree into the instruction tree. Every line
//! starts with a command word; `push` and `select` take their nested lines as
//! a body, everything else ignores what is indented beneath it.

use tracing::warn;

use crate::ast::{Case, Instruction, Op, Program};
use crate::errors::{ErrorKind, TspiError};
use crate::syntax::{chunker, CharSet, LineRecord, Token};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse tspi source text into a program.
pub fn parse(source_text: &str) -> Result<Program, TspiError> {
    let records = chunker::chunk(source_text)?;
    parse_lines(&records)
}

/// Parse a sequence of sibling lines.
pub fn parse_lines(records: &[LineRecord]) -> Result<Vec<Instruction>, TspiError> {
    records.iter().map(parse_line).collect()
}

// ============================================================================
// INSTRUCTION BUILDERS
// ============================================================================

fn parse_line(record: &LineRecord) -> Result<Instruction, TspiError> {
    let word = command_word(record)?;

    let op = match word {
        "consume" => Op::Move { drop: false },
        "omit" => Op::Move { drop: true },
        "finish" => Op::Finish,
        "pop" => Op::Pop,
        "assert" => Op::Assert {
            charset: charset_argument(record, word)?,
        },
        "push" => {
            return Ok(Instruction::new(
                record.line,
                Op::Push {
                    body: parse_lines(&record.body)?,
                },
            ))
        }
        "select" => {
            return Ok(Instruction::new(
                record.line,
                Op::Select {
                    cases: parse_cases(&record.body)?,
                },
            ))
        }
        other => {
            return Err(TspiError::syntax(
                ErrorKind::UnrecognisedInstruction {
                    word: other.to_string(),
                },
                record.line,
            ))
        }
    };

    if !record.body.is_empty() {
        warn!(
            line = record.number(),
            instruction = word,
            "ignoring indented lines under an instruction that takes no body"
        );
    }
    Ok(Instruction::new(record.line, op))
}

/// Build the ordered case list of a `select`. A charset written twice keeps
/// its first position and takes the later body.
fn parse_cases(records: &[LineRecord]) -> Result<Vec<Case>, TspiError> {
    let mut cases: Vec<Case> = Vec::with_capacity(records.len());

    for record in records {
        match record.tokens.first() {
            Some(Token::Word(word)) if word == "case" => {}
            Some(Token::Word(word)) => {
                return Err(TspiError::syntax(
                    ErrorKind::ExpectedCase {
                        found: Some(word.clone()),
                    },
                    record.line,
                ))
            }
            _ => {
                return Err(TspiError::syntax(
                    ErrorKind::ExpectedCase { found: None },
                    record.line,
                ))
            }
        }

        let charset = charset_argument(record, "case")?;
        let body = parse_lines(&record.body)?;
        match cases.iter_mut().find(|case| case.charset == charset) {
            Some(existing) => existing.body = body,
            None => cases.push(Case { charset, body }),
        }
    }

    Ok(cases)
}

// ============================================================================
// TOKEN ACCESS
// ============================================================================

fn command_word(record: &LineRecord) -> Result<&str, TspiError> {
    record
        .tokens
        .first()
        .and_then(Token::as_word)
        .ok_or_else(|| TspiError::syntax(ErrorKind::ExpectedCommand, record.line))
}

/// The charset that must follow the command word.
fn charset_argument(record: &LineRecord, after: &str) -> Result<CharSet, TspiError> {
    record
        .tokens
        .get(1)
        .and_then(Token::as_charset)
        .cloned()
        .ok_or_else(|| {
            TspiError::syntax(
                ErrorKind::MissingCharset {
                    after: after.to_string(),
                },
                record.line,
            )
        })
}
