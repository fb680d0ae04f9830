//! Defines the command-line arguments and subcommands for the sparqlfmt CLI.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::syntax::DialectChoice;

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages and above
    Info,
    /// Debug messages and above (verbose)
    Debug,
    /// All messages including trace (very verbose)
    Trace,
    /// Disable all logging
    Off,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "sparqlfmt",
    version,
    about = "Parse SPARQL 1.1 queries and updates and print them in canonical layout."
)]
pub struct SparqlfmtArgs {
    /// Log level; overrides RUST_LOG
    #[arg(short = 'l', long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Configuration file; defaults to ./sparqlfmt.yaml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl SparqlfmtArgs {
    /// Explicit level from the flags, if any. `--log-level` wins over `-v`.
    pub fn level_filter(&self) -> Option<log::LevelFilter> {
        match (self.log_level, self.verbose) {
            (Some(level), _) => Some(level.to_level_filter()),
            (None, true) => Some(log::LevelFilter::Debug),
            (None, false) => None,
        }
    }
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a query or update in canonical layout.
    Format {
        /// Input file; standard input when absent or `-`.
        file: Option<PathBuf>,
        /// Grammar to parse with.
        #[arg(short, long, value_enum)]
        dialect: Option<DialectChoice>,
        /// Show a diff against the input instead of the output; exit 1 if they differ.
        #[arg(long)]
        check: bool,
        /// Re-parse the output and fail if the tree changed.
        #[arg(long)]
        verify: bool,
    },
    /// Print the parse tree.
    Tree {
        /// Input file; standard input when absent or `-`.
        file: Option<PathBuf>,
        /// Grammar to parse with.
        #[arg(short, long, value_enum)]
        dialect: Option<DialectChoice>,
        /// Emit JSON instead of an indented outline.
        #[arg(long)]
        json: bool,
    },
    /// Print the dialect the keyword heuristic picks.
    Guess {
        /// Input file; standard input when absent or `-`.
        file: Option<PathBuf>,
    },
    /// Check parse, format, parse on every .rq, .ru and .sparql file in a directory.
    Roundtrip {
        /// Directory to search.
        #[arg(default_value = "tests")]
        path: PathBuf,
    },
}
