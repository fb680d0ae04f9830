//! SPARQL Parser - grammar entry points
//!
//! Turns query or update text into a concrete syntax tree. Purely syntactic:
//! no variable scoping, type checking or other semantic analysis.

use std::time::Instant;

use once_cell::sync::Lazy;
use pest::error::{Error, ErrorVariant, InputLocation};
use pest::Parser;
use pest_derive::Parser;

use crate::diagnostics::{locate, to_error_source, ErrorContext, SparqlError, Span};
use crate::syntax::dialect::{guess_dialect, Dialect, DialectChoice};
use crate::syntax::tree::{self, Node};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
pub struct SparqlGrammar;

/// Bracket nesting accepted by the default parsers.
///
/// Nested parentheses in expressions are the deepest rule chain per bracket;
/// this many still parse on a 2 MiB thread stack in an unoptimised build.
/// Deeper limits depend on the caller's stack size, and input that exhausts
/// it fails with [`SparqlError::StackLimit`].
pub const DEFAULT_MAX_NESTING: usize = 128;

/// Messages pest reports when its own resource guards stop a parse.
const ENGINE_LIMIT_MESSAGES: &[&str] = &["stack limit reached", "call limit reached"];

static QUERY_PARSER: Lazy<DialectParser> = Lazy::new(|| DialectParser::new(Dialect::Query));
static UPDATE_PARSER: Lazy<DialectParser> = Lazy::new(|| DialectParser::new(Dialect::Update));

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses text rooted at `query_unit`.
pub fn parse_query(text: &str) -> Result<Node, SparqlError> {
    DialectParser::query().parse(text)
}

/// Parses text rooted at `update_unit`.
pub fn parse_update(text: &str) -> Result<Node, SparqlError> {
    DialectParser::update().parse(text)
}

/// Parses text with an explicitly chosen dialect.
pub fn parse(text: &str, dialect: Dialect) -> Result<Node, SparqlError> {
    DialectParser::for_dialect(dialect).parse(text)
}

/// Guesses the dialect from keywords, falling back to the other one on failure.
pub fn parse_guessed(text: &str) -> Result<(Dialect, Node), SparqlError> {
    parse_with(text, DialectChoice::Guess)
}

/// Tries the query grammar, then the update grammar.
pub fn parse_try_both(text: &str) -> Result<(Dialect, Node), SparqlError> {
    parse_with(text, DialectChoice::TryBoth)
}

/// Parses text with any dialect selection strategy, reporting the dialect used.
pub fn parse_with(text: &str, choice: DialectChoice) -> Result<(Dialect, Node), SparqlError> {
    select(text, choice, DialectParser::query(), DialectParser::update())
}

// ============================================================================
// DIALECT PARSERS
// ============================================================================

/// A parser bound to one grammar entry point.
#[derive(Debug, Clone)]
pub struct DialectParser {
    dialect: Dialect,
    max_nesting: usize,
}

impl DialectParser {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_max_nesting(dialect, DEFAULT_MAX_NESTING)
    }

    pub fn with_max_nesting(dialect: Dialect, max_nesting: usize) -> Self {
        Self {
            dialect,
            max_nesting,
        }
    }

    /// The process-wide query parser.
    pub fn query() -> &'static DialectParser {
        &QUERY_PARSER
    }

    /// The process-wide update parser.
    pub fn update() -> &'static DialectParser {
        &UPDATE_PARSER
    }

    pub fn for_dialect(dialect: Dialect) -> &'static DialectParser {
        match dialect {
            Dialect::Query => Self::query(),
            Dialect::Update => Self::update(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn max_nesting(&self) -> usize {
        self.max_nesting
    }

    pub fn parse(&self, text: &str) -> Result<Node, SparqlError> {
        check_nesting(text, self.max_nesting)?;

        let started = Instant::now();
        let mut pairs = SparqlGrammar::parse(self.dialect.start_rule(), text)
            .map_err(|e| convert_parse_error(e, text, self.dialect))?;
        let root = pairs.next().ok_or_else(|| {
            syntax_error(text, self.dialect, 0, "parser produced no tree".to_string(), vec![])
        })?;
        let node = tree::build(root);

        log::debug!(
            "parsed {} bytes as {} in {:?} (tree depth {})",
            text.len(),
            self.dialect,
            started.elapsed(),
            node.depth()
        );
        Ok(node)
    }
}

/// Runs one dialect selection strategy against a pair of parsers.
pub(crate) fn select(
    text: &str,
    choice: DialectChoice,
    query: &DialectParser,
    update: &DialectParser,
) -> Result<(Dialect, Node), SparqlError> {
    let pick = |dialect: Dialect| match dialect {
        Dialect::Query => query,
        Dialect::Update => update,
    };
    match choice {
        DialectChoice::Query => query.parse(text).map(|node| (Dialect::Query, node)),
        DialectChoice::Update => update.parse(text).map(|node| (Dialect::Update, node)),
        DialectChoice::Guess => {
            let guessed = guess_dialect(text);
            log::debug!("guessed dialect: {guessed}");
            with_fallback(text, pick(guessed), pick(guessed.other()))
        }
        DialectChoice::TryBoth => with_fallback(text, query, update),
    }
}

/// Parses with `first`, retrying with `second` on a syntax error.
///
/// When both fail the second error is returned.
fn with_fallback(
    text: &str,
    first: &DialectParser,
    second: &DialectParser,
) -> Result<(Dialect, Node), SparqlError> {
    match first.parse(text) {
        Ok(node) => Ok((first.dialect(), node)),
        Err(SparqlError::Syntax { message, .. }) => {
            log::warn!(
                "{} grammar rejected the input ({message}); retrying as {}",
                first.dialect(),
                second.dialect()
            );
            second.parse(text).map(|node| (second.dialect(), node))
        }
        Err(other) => Err(other),
    }
}

// ============================================================================
// NESTING GUARD
// ============================================================================

/// Rejects text whose bracket nesting exceeds `limit`.
///
/// String literals, IRIs and comments are skipped. The count is an upper bound
/// on the nesting the grammar would see.
pub fn check_nesting(text: &str, limit: usize) -> Result<(), SparqlError> {
    let (depth, offset) = max_nesting(text);
    if depth <= limit {
        return Ok(());
    }
    let position = locate(text, offset);
    Err(SparqlError::NestingLimit {
        depth,
        limit,
        position,
        ctx: ErrorContext::with_source_and_span(to_error_source(text), Span::point(offset))
            .with_help("raise `max_nesting` in the configuration to accept deeper input"),
    })
}

/// Deepest bracket nesting in `text` and the offset where it is first reached.
pub fn max_nesting(text: &str) -> (usize, usize) {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut deepest = (0usize, 0usize);
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'(' | b'[' => {
                depth += 1;
                if depth > deepest.0 {
                    deepest = (depth, i);
                }
                i += 1;
            }
            b'}' | b')' | b']' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b'#' => i = skip_line(bytes, i),
            b'"' | b'\'' => i = skip_string(bytes, i),
            b'<' => i = skip_iri(bytes, i),
            b'\\' => i += 2,
            _ => i += 1,
        }
    }
    deepest
}

fn skip_line(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .map_or(bytes.len(), |n| start + n)
}

fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let long = bytes.len() >= start + 3 && bytes[start + 1] == quote && bytes[start + 2] == quote;
    let mut i = if long { start + 3 } else { start + 1 };
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote && !long => return i + 1,
            b if b == quote && bytes.len() >= i + 3 && bytes[i + 1] == quote && bytes[i + 2] == quote => {
                return i + 3
            }
            b'\n' | b'\r' if !long => return i,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Skips `<...>` when it looks like an IRI reference; a comparison operator
/// only advances one byte.
fn skip_iri(bytes: &[u8], start: usize) -> usize {
    for (n, &b) in bytes[start + 1..].iter().enumerate() {
        match b {
            b'>' => return start + n + 2,
            b'<' | b'"' | b'{' | b'}' | b'|' | b'^' | b'`' | 0..=0x20 => return start + 1,
            _ => {}
        }
    }
    start + 1
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn convert_parse_error(error: Error<Rule>, text: &str, dialect: Dialect) -> SparqlError {
    let offset = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };

    let (message, expected) = match error.variant {
        ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
            let mut names: Vec<String> = positives.iter().map(|r| format!("{r:?}")).collect();
            names.sort();
            names.dedup();
            (format!("expected {}", names.join(", ")), names)
        }
        ErrorVariant::ParsingError { .. } => ("unexpected input".to_string(), Vec::new()),
        ErrorVariant::CustomError { message }
            if ENGINE_LIMIT_MESSAGES.contains(&message.as_str()) =>
        {
            return SparqlError::StackLimit {
                message,
                dialect,
                depth: max_nesting(text).0,
                position: locate(text, offset),
                ctx: ErrorContext::with_source_and_span(to_error_source(text), Span::point(offset))
                    .with_help(
                        "reduce the nesting of this input or parse it on a thread with a larger stack",
                    ),
            };
        }
        ErrorVariant::CustomError { message } => (message, Vec::new()),
    };

    syntax_error(text, dialect, offset, message, expected)
}

fn syntax_error(
    text: &str,
    dialect: Dialect,
    offset: usize,
    message: String,
    expected: Vec<String>,
) -> SparqlError {
    let help = match dialect {
        Dialect::Query => "if this is an update, select the update dialect or use try-both",
        Dialect::Update => "if this is a query, select the query dialect or use try-both",
    };
    SparqlError::Syntax {
        message,
        dialect,
        position: locate(text, offset),
        expected,
        ctx: ErrorContext::with_source_and_span(to_error_source(text), Span::point(offset))
            .with_help(help),
    }
}
