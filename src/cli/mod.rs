//! The sparqlfmt command-line interface.
//!
//! Settings resolve in three layers: built-in defaults, then the
//! configuration file, then command-line flags.

use std::{
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use walkdir::WalkDir;

use crate::cli::args::{Command, SparqlfmtArgs};
use crate::cli::output::FileReport;
use crate::config::Config;
use crate::diagnostics::SparqlError;
use crate::engine::{read_input, read_source, Engine};
use crate::syntax::{guess_dialect, DialectChoice};

pub mod args;
pub mod output;

/// Extensions picked up by `roundtrip`.
const SPARQL_EXTENSIONS: &[&str] = &["rq", "ru", "sparql"];

/// The main entry point for the CLI.
pub fn run() {
    let args = SparqlfmtArgs::parse();
    init_log(args.level_filter());

    match execute(args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            output::print_error(e);
            process::exit(1);
        }
    }
}

fn init_log(level: Option<log::LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    let _ = builder
        .format_level(true)
        .format_target(false)
        .format_timestamp(None)
        .try_init();
}

/// Runs one command. `Ok(false)` means the command completed but found a
/// difference or a failure.
fn execute(args: SparqlfmtArgs) -> Result<bool, SparqlError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = Config::discover(args.config.as_deref(), &cwd)?;

    match args.command {
        Command::Format {
            file,
            dialect,
            check,
            verify,
        } => {
            let config = Config {
                dialect: dialect.unwrap_or(config.dialect),
                verify: verify || config.verify,
                ..config
            };
            handle_format(file.as_deref(), Engine::new(config), check)
        }
        Command::Tree {
            file,
            dialect,
            json,
        } => {
            let config = Config {
                dialect: dialect.unwrap_or(config.dialect),
                ..config
            };
            handle_tree(file.as_deref(), Engine::new(config), json)
        }
        Command::Guess { file } => {
            let (_, text) = read_input(file.as_deref())?;
            println!("{}", guess_dialect(&text));
            Ok(true)
        }
        Command::Roundtrip { path } => handle_roundtrip(&path, Engine::new(config)),
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn handle_format(file: Option<&Path>, engine: Engine, check: bool) -> Result<bool, SparqlError> {
    let (name, text) = read_input(file)?;
    let formatted = engine.format(&text).map_err(|e| e.with_source_name(&name))?;
    if !check {
        print!("{formatted}");
        return Ok(true);
    }
    if formatted == text {
        log::info!("{name} is already formatted");
        return Ok(true);
    }
    output::print_changes(&text, &formatted)
        .map_err(|e| SparqlError::io("cannot write to standard output", e))?;
    Ok(false)
}

fn handle_tree(file: Option<&Path>, engine: Engine, json: bool) -> Result<bool, SparqlError> {
    let (name, text) = read_input(file)?;
    let (dialect, tree) = engine.parse(&text).map_err(|e| e.with_source_name(&name))?;
    log::debug!("{name} parsed as {dialect}");
    if json {
        let rendered = serde_json::to_string_pretty(&tree)
            .map_err(|e| SparqlError::io("cannot serialize the tree", e.into()))?;
        println!("{rendered}");
    } else {
        print!("{}", tree.outline());
    }
    Ok(true)
}

fn handle_roundtrip(root: &Path, engine: Engine) -> Result<bool, SparqlError> {
    let files = discover_sparql_files(root);
    if files.is_empty() {
        log::warn!("no .rq, .ru or .sparql files under {}", root.display());
    }
    let reports: Vec<FileReport> = files
        .iter()
        .map(|path| check_file(path, &engine))
        .collect();
    let failed = output::report_files(&reports)
        .map_err(|e| SparqlError::io("cannot write to standard output", e))?;
    Ok(failed == 0)
}

fn check_file(path: &Path, engine: &Engine) -> FileReport {
    let file = path.display().to_string();
    let result = read_source(path).and_then(|text| engine.round_trip_as(&text, DialectChoice::TryBoth));
    match result {
        Ok(trip) => match trip.describe_difference() {
            None => FileReport::Pass { file },
            Some(difference) => FileReport::Fail {
                file,
                reason: format!("trees differ: {difference}"),
            },
        },
        Err(e) => FileReport::Fail {
            file,
            reason: e.to_string(),
        },
    }
}

/// All SPARQL files under `root`, sorted by path.
pub fn discover_sparql_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| SPARQL_EXTENSIONS.contains(&ext))
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}
