//! Defines the command-line arguments and subcommands for the tspi CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "tspi",
    version,
    about = "Token scanner pseudocode interpreter: scan and transform text with backtracking programs."
)]
pub struct TspiArgs {
    #[command(subcommand)]
    pub command: Command,

    /// When to color output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Raise log verbosity (-v debug, -vv trace). `TSPI_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a program repeatedly over the whole input, printing each run's output.
    Run {
        /// The path to the tspi program.
        #[arg(required = true)]
        file: PathBuf,
        #[command(flatten)]
        input: InputArgs,
        /// Print the outputs and any failure as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run a program once from the start of the input.
    Once {
        /// The path to the tspi program.
        #[arg(required = true)]
        file: PathBuf,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print a numbered listing of the parsed program.
    Disasm {
        /// The path to the tspi program.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Print the parsed instruction tree as JSON.
    Ast {
        /// The path to the tspi program.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Parse every `.tspi` file under a path and report syntax errors.
    Check {
        /// A program file or a directory to search.
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Feed input lines from stdin to a program interactively.
    Repl {
        /// The path to the tspi program.
        #[arg(required = true)]
        file: PathBuf,
    },
}

/// Where the input text comes from.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Input text given inline.
    #[arg(short, long)]
    pub input: Option<String>,
    /// Read the input text from a file.
    #[arg(long, value_name = "PATH")]
    pub input_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for termcolor::ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => termcolor::ColorChoice::Auto,
            ColorMode::Always => termcolor::ColorChoice::Always,
            ColorMode::Never => termcolor::ColorChoice::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        TspiArgs::command().debug_assert();
    }

    #[test]
    fn input_sources_are_exclusive() {
        let parsed = TspiArgs::try_parse_from(["tspi", "run", "p.tspi", "-i", "abc"]).unwrap();
        match parsed.command {
            Command::Run { input, json, .. } => {
                assert_eq!(input.input.as_deref(), Some("abc"));
                assert!(!json);
            }
            other => panic!("unexpected command {:?}", other),
        }
        let both = TspiArgs::try_parse_from([
            "tspi",
            "run",
            "p.tspi",
            "-i",
            "abc",
            "--input-file",
            "in.txt",
        ]);
        assert!(both.is_err());
        assert!(TspiArgs::try_parse_from(["tspi", "run", "p.tspi"]).is_err());
    }
}
