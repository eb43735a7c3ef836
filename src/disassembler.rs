//! Renders a parsed program back into indented surface syntax.
//!
//! Rendering reproduces structure, not the original text: comments, blank
//! lines and charset member order are not preserved, but parsing the
//! rendered text yields an equal program.

use crate::ast::{Instruction, Op};

/// Spaces per nesting level in rendered source.
pub const INDENT_WIDTH: usize = 4;

/// One rendered line and its nesting depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub depth: usize,
    pub text: String,
}

/// Render a program as `(depth, text)` lines in program order.
pub fn render(program: &[Instruction]) -> Vec<RenderedLine> {
    let mut lines = Vec::new();
    render_many(program, 0, &mut lines);
    lines
}

fn render_many(instructions: &[Instruction], depth: usize, lines: &mut Vec<RenderedLine>) {
    for instruction in instructions {
        render_single(instruction, depth, lines);
    }
}

fn render_single(instruction: &Instruction, depth: usize, lines: &mut Vec<RenderedLine>) {
    let text = match &instruction.op {
        Op::Assert { charset } => format!("assert {}", charset),
        _ => instruction.keyword().to_string(),
    };
    lines.push(RenderedLine { depth, text });

    match &instruction.op {
        Op::Push { body } => render_many(body, depth + 1, lines),
        Op::Select { cases } => {
            for case in cases {
                lines.push(RenderedLine {
                    depth: depth + 1,
                    text: format!("case {}", case.charset),
                });
                render_many(&case.body, depth + 2, lines);
            }
        }
        Op::Move { .. } | Op::Finish | Op::Assert { .. } | Op::Pop => {}
    }
}

/// Render a program as source text that parses back to an equal program.
pub fn to_source(program: &[Instruction]) -> String {
    render(program)
        .into_iter()
        .map(|line| format!("{}{}\n", " ".repeat(line.depth * INDENT_WIDTH), line.text))
        .collect()
}

/// Numbered listing for debugging: `"<n> | <indented text>"`, with the
/// number column two wider than the digits of the line count.
pub fn listing(program: &[Instruction]) -> String {
    let lines = render(program);
    let width = lines.len().to_string().len() + 2;

    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            format!(
                "{:>width$} | {}{}\n",
                index + 1,
                " ".repeat(line.depth * INDENT_WIDTH),
                line.text,
                width = width
            )
        })
        .collect()
}
