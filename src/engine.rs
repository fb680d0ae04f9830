//! Formatting pipeline: parse, serialize and optionally verify.
//!
//! [`Engine`] binds a [`Config`] to a pair of dialect parsers. The free
//! functions [`format`] and [`round_trip`] run the same pipeline with the
//! default limits and the shared parser singletons.

use std::{
    io::Read,
    path::Path,
    time::Instant,
};

use crate::config::Config;
use crate::diagnostics::{to_error_source, ErrorContext, SparqlError};
use crate::serializer::format_tree;
use crate::syntax::{parser, Dialect, DialectChoice, DialectParser, Node, Token};

/// Result of parse, format and re-parse on one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTrip {
    pub dialect: Dialect,
    pub original: Node,
    pub formatted: String,
    pub reparsed: Node,
}

impl RoundTrip {
    pub fn is_equal(&self) -> bool {
        self.original == self.reparsed
    }

    /// First token where the two trees disagree, if any.
    pub fn first_difference(&self) -> Option<(Option<&Token>, Option<&Token>)> {
        if self.is_equal() {
            return None;
        }
        let mut left = self.original.tokens();
        let mut right = self.reparsed.tokens();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Some((None, None)),
                (a, b) if a != b => return Some((a, b)),
                _ => {}
            }
        }
    }

    /// One-line description of where the trees disagree.
    pub fn describe_difference(&self) -> Option<String> {
        let show = |t: Option<&Token>| t.map_or("end of input".to_string(), |t| format!("`{}`", t.text));
        match self.first_difference()? {
            (None, None) => Some("same tokens, different tree shape".to_string()),
            (expected, found) => Some(format!(
                "expected {}, found {}",
                show(expected),
                show(found)
            )),
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
    query: DialectParser,
    update: DialectParser,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self {
            query: DialectParser::with_max_nesting(Dialect::Query, config.max_nesting),
            update: DialectParser::with_max_nesting(Dialect::Update, config.max_nesting),
            config,
        }
    }

    fn parser(&self, dialect: Dialect) -> &DialectParser {
        match dialect {
            Dialect::Query => &self.query,
            Dialect::Update => &self.update,
        }
    }

    /// Parses with the configured dialect selection.
    pub fn parse(&self, text: &str) -> Result<(Dialect, Node), SparqlError> {
        self.parse_as(text, self.config.dialect)
    }

    pub fn parse_as(&self, text: &str, choice: DialectChoice) -> Result<(Dialect, Node), SparqlError> {
        parser::select(text, choice, &self.query, &self.update)
    }

    /// Formats text in canonical layout. With `verify` set the output is
    /// re-parsed and a changed tree is an error.
    pub fn format(&self, text: &str) -> Result<String, SparqlError> {
        self.format_as(text, self.config.dialect)
    }

    pub fn format_as(&self, text: &str, choice: DialectChoice) -> Result<String, SparqlError> {
        if self.config.verify {
            let trip = self.round_trip_as(text, choice)?;
            return verified(trip);
        }
        let (_, tree) = self.parse_as(text, choice)?;
        render(&tree)
    }

    pub fn round_trip(&self, text: &str) -> Result<RoundTrip, SparqlError> {
        self.round_trip_as(text, self.config.dialect)
    }

    /// Parses, formats and re-parses the output with the dialect that
    /// accepted the input.
    pub fn round_trip_as(&self, text: &str, choice: DialectChoice) -> Result<RoundTrip, SparqlError> {
        let (dialect, original) = self.parse_as(text, choice)?;
        let formatted = render(&original)?;
        let reparsed = self.parser(dialect).parse(&formatted).map_err(|e| {
            let message = format!("formatted {dialect} text does not parse: {e}");
            SparqlError::RoundTrip {
                message,
                ctx: ErrorContext {
                    source: Some(to_error_source(&formatted)),
                    span: None,
                    help: Some("this is a formatter defect; please report it with the input".into()),
                },
            }
        })?;
        Ok(RoundTrip {
            dialect,
            original,
            formatted,
            reparsed,
        })
    }
}

fn render(tree: &Node) -> Result<String, SparqlError> {
    let started = Instant::now();
    let text = format_tree(tree)?;
    log::debug!("formatted {} bytes in {:?}", text.len(), started.elapsed());
    Ok(text)
}

fn verified(trip: RoundTrip) -> Result<String, SparqlError> {
    match trip.describe_difference() {
        None => Ok(trip.formatted),
        Some(difference) => Err(SparqlError::RoundTrip {
            message: format!("formatted text parses to a different tree: {difference}"),
            ctx: ErrorContext {
                source: Some(to_error_source(&trip.formatted)),
                span: None,
                help: None,
            },
        }),
    }
}

// ============================================================================
// CONVENIENCE FUNCTIONS
// ============================================================================

/// Formats text with default limits.
pub fn format(text: &str, choice: DialectChoice) -> Result<String, SparqlError> {
    let (_, tree) = parser::parse_with(text, choice)?;
    render(&tree)
}

/// Parse, format and re-parse with default limits.
pub fn round_trip(text: &str, choice: DialectChoice) -> Result<RoundTrip, SparqlError> {
    Engine::default().round_trip_as(text, choice)
}

// ============================================================================
// INPUT
// ============================================================================

/// Reads a source file.
pub fn read_source(path: &Path) -> Result<String, SparqlError> {
    std::fs::read_to_string(path)
        .map_err(|e| SparqlError::io(format!("cannot read {}", path.display()), e))
}

/// Reads `path`, or standard input when the path is absent or `-`.
pub fn read_input(path: Option<&Path>) -> Result<(String, String), SparqlError> {
    match path {
        Some(path) if path != Path::new("-") => {
            Ok((path.display().to_string(), read_source(path)?))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| SparqlError::io("cannot read standard input", e))?;
            Ok(("<stdin>".to_string(), text))
        }
    }
}
