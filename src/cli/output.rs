//! Handles all user-facing output for the CLI.
//!
//! Colour is used only when standard output is a terminal.

use std::io::{self, IsTerminal, Write};

use difference::{Changeset, Difference};
use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::diagnostics::SparqlError;

/// Outcome of one file in a `roundtrip` run.
#[derive(Debug)]
pub enum FileReport {
    Pass { file: String },
    Fail { file: String, reason: String },
}

fn stdout() -> StandardStream {
    let choice = if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints a line diff from `before` to `after`.
pub fn print_changes(before: &str, after: &str) -> io::Result<()> {
    let mut out = stdout();
    let changeset = Changeset::new(before, after, "\n");
    print_diff(&mut out, &changeset.diffs)?;
    out.reset()
}

/// Prints per-file results and a summary line. Returns the failure count.
pub fn report_files(reports: &[FileReport]) -> io::Result<usize> {
    let mut out = stdout();
    let mut failed = 0;
    for report in reports {
        match report {
            FileReport::Pass { file } => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                write!(out, "✓")?;
                out.reset()?;
                writeln!(out, " {file}")?;
            }
            FileReport::Fail { file, reason } => {
                failed += 1;
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                write!(out, "✗")?;
                out.reset()?;
                writeln!(out, " {file}")?;
                for line in reason.lines() {
                    writeln!(out, "    {line}")?;
                }
            }
        }
    }

    let passed = reports.len() - failed;
    writeln!(out)?;
    write!(out, "Round-trip summary: total {}, ", reports.len())?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "passed {passed}")?;
    out.reset()?;
    write!(out, ", ")?;
    if failed > 0 {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
    }
    writeln!(out, "failed {failed}")?;
    out.reset()?;
    Ok(failed)
}

/// Renders an error with the graphical `miette` handler on stderr.
pub fn print_error(error: SparqlError) {
    eprintln!("{:?}", Report::new(error));
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_diff(out: &mut StandardStream, diffs: &[Difference]) -> io::Result<()> {
    for diff in diffs {
        match diff {
            Difference::Same(ref x) => {
                out.reset()?;
                for line in x.lines() {
                    writeln!(out, " {line}")?;
                }
            }
            Difference::Add(ref x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                for line in x.lines() {
                    writeln!(out, "+{line}")?;
                }
            }
            Difference::Rem(ref x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                for line in x.lines() {
                    writeln!(out, "-{line}")?;
                }
            }
        }
    }
    Ok(())
}
