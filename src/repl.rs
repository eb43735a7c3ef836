//! tspi REPL (Read-Run-Print Loop)
//!
//! Loads one program and runs it over each line of input typed at the
//! prompt, printing every run's output. `:reload` re-reads the program file.

use std::io::{self, Write};
use std::path::PathBuf;

use termcolor::ColorChoice;

use crate::{cli::output, engine::ExecutionPipeline, errors::print_error, runtime};

/// REPL state that persists across inputs
pub struct ReplState {
    pipeline: ExecutionPipeline,
    program: Option<crate::Program>,
    color: ColorChoice,
}

impl ReplState {
    pub fn new(pipeline: ExecutionPipeline, color: ColorChoice) -> Self {
        let mut state = Self {
            pipeline,
            program: None,
            color,
        };
        state.reparse();
        state
    }

    /// Run the loaded program over one line of input.
    pub fn run_line(&self, input: &str) -> Result<(), ()> {
        let Some(program) = &self.program else {
            eprintln!("No program loaded; fix it and use :reload");
            return Err(());
        };
        let mut report = runtime::run_report(program, input);
        report.failure = report
            .failure
            .map(|e| e.with_source(self.pipeline.source()));
        output::print_report(&report, self.color);
        match report.failure {
            Some(_) => Err(()),
            None => Ok(()),
        }
    }

    fn reparse(&mut self) {
        self.program = match self.pipeline.parse() {
            Ok(program) => Some(program),
            Err(e) => {
                print_error(e);
                None
            }
        };
    }

    fn reload(&mut self) {
        let path = PathBuf::from(&self.pipeline.source().name);
        match ExecutionPipeline::from_path(&path) {
            Ok(pipeline) => {
                self.pipeline = pipeline;
                self.reparse();
                if self.program.is_some() {
                    println!("Reloaded {}", path.display());
                }
            }
            Err(e) => print_error(e),
        }
    }
}

/// Main REPL entry point
pub fn run_repl(pipeline: ExecutionPipeline, color: ColorChoice) {
    println!("tspi REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type input text to scan it; :help for help, :quit to exit");
    println!();

    let mut repl_state = ReplState::new(pipeline, color);

    loop {
        print!("tspi> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF (Ctrl+D)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim_end_matches(['\n', '\r']);

                if line.starts_with(':') {
                    match handle_repl_command(line, &mut repl_state) {
                        ReplCommand::Continue => continue,
                        ReplCommand::Quit => break,
                    }
                }

                let _ = repl_state.run_line(line);
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }
}

/// REPL command results
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Continue,
    Quit,
}

/// Handle special REPL commands that start with ':'
fn handle_repl_command(command: &str, state: &mut ReplState) -> ReplCommand {
    match command.to_ascii_lowercase().as_str() {
        ":help" | ":h" => {
            println!("tspi REPL Commands:");
            println!("  :help, :h     Show this help");
            println!("  :quit, :q     Exit the REPL");
            println!("  :reload, :r   Re-read the program file");
            println!();
            println!("Any other line is fed to the program as input.");
            ReplCommand::Continue
        }
        ":quit" | ":q" => ReplCommand::Quit,
        ":reload" | ":r" => {
            state.reload();
            ReplCommand::Continue
        }
        _ => {
            println!(
                "Unknown command: {}. Type :help for available commands.",
                command
            );
            ReplCommand::Continue
        }
    }
}
