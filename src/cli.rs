//! tspi command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use termcolor::ColorChoice;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::{
    cli::args::{Command, InputArgs, TspiArgs},
    disassembler,
    engine::ExecutionPipeline,
    errors::{print_error, TspiError},
    repl,
};

pub mod args;
pub mod output;

/// Extension of tspi program files.
pub const PROGRAM_EXTENSION: &str = "tspi";

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = TspiArgs::parse();
    init_logging(args.verbose);
    let color = ColorChoice::from(args.color);

    match args.command {
        Command::Run { file, input, json } => {
            let pipeline = load_or_exit(&file);
            let text = read_input_or_exit(&input);
            let report = pipeline.run(&text).unwrap_or_else(|e| exit_with(e));
            if json {
                let encoded = output::report_to_json(&report).unwrap_or_else(|e| exit_with(e));
                println!("{}", encoded);
            } else {
                output::print_report(&report, color);
            }
            if report.failure.is_some() {
                process::exit(1);
            }
        }

        Command::Once { file, input } => {
            let pipeline = load_or_exit(&file);
            let text = read_input_or_exit(&input);
            let run = pipeline.run_once(&text).unwrap_or_else(|e| exit_with(e));
            output::print_single(&run.output, run.position, color);
        }

        Command::Disasm { file } => {
            let program = load_or_exit(&file).parse().unwrap_or_else(|e| exit_with(e));
            print!("{}", disassembler::listing(&program));
        }

        Command::Ast { file } => {
            let program = load_or_exit(&file).parse().unwrap_or_else(|e| exit_with(e));
            let encoded = serde_json::to_string_pretty(&program)
                .map_err(|e| TspiError::io(format!("cannot encode program: {}", e)))
                .unwrap_or_else(|e| exit_with(e));
            println!("{}", encoded);
        }

        Command::Check { path } => {
            if !check_programs(&path, color) {
                process::exit(1);
            }
        }

        Command::Repl { file } => {
            let pipeline = load_or_exit(&file);
            repl::run_repl(pipeline, color);
        }
    }
}

// ============================================================================
// PROGRAM CHECKING
// ============================================================================

/// Recursively collects program files under `root`, sorted for
/// deterministic output. A file path is returned as-is.
pub fn discover_programs(root: &Path) -> Result<Vec<PathBuf>, TspiError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry =
            entry.map_err(|e| TspiError::io(format!("failed to walk directory: {}", e)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == PROGRAM_EXTENSION) || path == root {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Parse every program under `root`; true when all of them parse.
fn check_programs(root: &Path, color: ColorChoice) -> bool {
    let files = discover_programs(root).unwrap_or_else(|e| exit_with(e));
    let mut passed = 0;
    let mut failed = 0;

    for file in files {
        let result = ExecutionPipeline::from_path(&file).and_then(|p| p.parse());
        match result {
            Ok(_) => {
                passed += 1;
                output::print_check_ok(&file.display().to_string(), color);
            }
            Err(e) => {
                failed += 1;
                print_error(e);
            }
        }
    }

    output::print_check_summary(passed, failed, color);
    failed == 0
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env("TSPI_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

fn load_or_exit(path: &Path) -> ExecutionPipeline {
    ExecutionPipeline::from_path(path).unwrap_or_else(|e| exit_with(e))
}

fn read_input_or_exit(input: &InputArgs) -> String {
    match (&input.input, &input.input_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => ExecutionPipeline::read_file(path).unwrap_or_else(|e| exit_with(e)),
        (None, None) => String::new(),
    }
}

fn exit_with(error: TspiError) -> ! {
    print_error(error);
    process::exit(1);
}
