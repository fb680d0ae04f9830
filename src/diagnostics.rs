//! Unified, `miette`-based diagnostics for sparqlfmt.
//!
//! Every failure the library or the command-line driver can report is a
//! [`SparqlError`]. Parse failures carry the named source and the failing
//! position so that `miette` can render them with a label; serializer contract
//! violations carry the offending production instead, since they describe a
//! defect rather than bad input.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::serializer::ContractViolation;
use crate::syntax::Dialect;

pub type SourceArc = Arc<NamedSource<String>>;

/// A byte range in the source text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }
}

/// Type-safe error classification that corresponds to [`SparqlError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Text does not match the selected grammar
    Syntax,
    /// Bracket nesting deeper than the configured limit
    NestingLimit,
    /// Serializer met a tree shape it has no layout for
    Contract,
    /// Formatted text re-parsed to a different tree
    RoundTrip,
    /// File system failures of the driver
    Io,
    /// Unreadable or invalid configuration
    Config,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Syntax => "Syntax",
            ErrorType::NestingLimit => "NestingLimit",
            ErrorType::Contract => "Contract",
            ErrorType::RoundTrip => "RoundTrip",
            ErrorType::Io => "Io",
            ErrorType::Config => "Config",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The source the error points into (if any).
    pub source: Option<SourceArc>,
    /// The primary span for this error (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Where a parse failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Error)]
pub enum SparqlError {
    #[error("Syntax error in {dialect} text at {}:{}: {message}", .position.line, .position.column)]
    Syntax {
        message: String,
        dialect: Dialect,
        position: Position,
        /// Names of the rules the grammar would have accepted.
        expected: Vec<String>,
        ctx: ErrorContext,
    },
    #[error("Nesting limit exceeded: depth {depth} is deeper than {limit}")]
    NestingLimit {
        depth: usize,
        limit: usize,
        position: Position,
        ctx: ErrorContext,
    },
    /// The grammar engine ran out of native stack before reaching the end of
    /// the input. Reported with the nesting class so callers treat it the
    /// same way as [`SparqlError::NestingLimit`].
    #[error(
        "Parser stack exhausted in {dialect} text at {}:{} (bracket depth {depth}): {message}",
        .position.line,
        .position.column
    )]
    StackLimit {
        message: String,
        dialect: Dialect,
        depth: usize,
        position: Position,
        ctx: ErrorContext,
    },
    #[error("Serializer contract violation: {0}")]
    Contract(#[from] ContractViolation),
    #[error("Round-trip mismatch: {message}")]
    RoundTrip {
        message: String,
        ctx: ErrorContext,
    },
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl SparqlError {
    fn get_ctx(&self) -> Option<&ErrorContext> {
        match self {
            SparqlError::Syntax { ctx, .. } => Some(ctx),
            SparqlError::NestingLimit { ctx, .. } => Some(ctx),
            SparqlError::StackLimit { ctx, .. } => Some(ctx),
            SparqlError::RoundTrip { ctx, .. } => Some(ctx),
            SparqlError::Config { ctx, .. } => Some(ctx),
            SparqlError::Contract(_) | SparqlError::Io { .. } => None,
        }
    }

    /// Returns the type-safe error classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            SparqlError::Syntax { .. } => ErrorType::Syntax,
            SparqlError::NestingLimit { .. } | SparqlError::StackLimit { .. } => {
                ErrorType::NestingLimit
            }
            SparqlError::Contract(_) => ErrorType::Contract,
            SparqlError::RoundTrip { .. } => ErrorType::RoundTrip,
            SparqlError::Io { .. } => ErrorType::Io,
            SparqlError::Config { .. } => ErrorType::Config,
        }
    }

    /// Position of a syntax or nesting error.
    pub fn position(&self) -> Option<Position> {
        match self {
            SparqlError::Syntax { position, .. }
            | SparqlError::NestingLimit { position, .. }
            | SparqlError::StackLimit { position, .. } => Some(*position),
            _ => None,
        }
    }

    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        SparqlError::Io {
            message: message.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        SparqlError::Config {
            message: message.into(),
            ctx: ErrorContext::none(),
            source: None,
        }
    }

    /// Replaces the anonymous source attached at parse time with a named one.
    pub fn with_source_name(mut self, name: &str) -> Self {
        if let Some(ctx) = self.ctx_mut() {
            if let Some(source) = ctx.source.take() {
                let text = source.inner().clone();
                ctx.source = Some(Arc::new(NamedSource::new(name, text)));
            }
        }
        self
    }

    fn ctx_mut(&mut self) -> Option<&mut ErrorContext> {
        match self {
            SparqlError::Syntax { ctx, .. } => Some(ctx),
            SparqlError::NestingLimit { ctx, .. } => Some(ctx),
            SparqlError::StackLimit { ctx, .. } => Some(ctx),
            SparqlError::RoundTrip { ctx, .. } => Some(ctx),
            SparqlError::Config { ctx, .. } => Some(ctx),
            SparqlError::Contract(_) | SparqlError::Io { .. } => None,
        }
    }
}

impl Diagnostic for SparqlError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self.error_type() {
            ErrorType::Syntax => "sparqlfmt::syntax",
            ErrorType::NestingLimit => "sparqlfmt::nesting",
            ErrorType::Contract => "sparqlfmt::contract",
            ErrorType::RoundTrip => "sparqlfmt::roundtrip",
            ErrorType::Io => "sparqlfmt::io",
            ErrorType::Config => "sparqlfmt::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        if let SparqlError::Contract(_) = self {
            return Some(Box::new(
                "the grammar and the serializer disagree about this production; please report it",
            ));
        }
        self.get_ctx()?
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()?
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx()?;
        let span = ctx.span?;
        let text = match self {
            SparqlError::Syntax { message, .. } => message.clone(),
            SparqlError::NestingLimit { limit, .. } => format!("nesting exceeds {limit} here"),
            SparqlError::StackLimit { message, .. } => message.clone(),
            SparqlError::RoundTrip { message, .. } => message.clone(),
            SparqlError::Config { message, .. } => message.clone(),
            SparqlError::Contract(_) | SparqlError::Io { .. } => return None,
        };
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        Some(Box::new(std::iter::once(LabeledSpan::new(
            Some(text),
            span.start,
            len,
        ))))
    }
}

/// Wraps source text for use in error contexts.
pub fn to_error_source<S: AsRef<str>>(source: S) -> SourceArc {
    Arc::new(NamedSource::new("input", source.as_ref().to_string()))
}

/// Converts a byte offset into a one-based line and column.
pub fn locate(text: &str, offset: usize) -> Position {
    let offset = offset.min(text.len());
    let before = &text[..floor_char_boundary(text, offset)];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(newline) => before[newline + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    Position {
        offset,
        line,
        column,
    }
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use miette::Report;

    use super::*;

    #[test]
    fn locate_counts_lines_and_columns() {
        let text = "SELECT *\nWHERE {\n  ?s\n}";
        assert_eq!(
            locate(text, 0),
            Position {
                offset: 0,
                line: 1,
                column: 1
            }
        );
        let pos = locate(text, text.find("?s").unwrap());
        assert_eq!((pos.line, pos.column), (3, 3));
    }

    #[test]
    fn locate_clamps_past_the_end() {
        let pos = locate("ab", 10);
        assert_eq!((pos.offset, pos.line, pos.column), (2, 1, 3));
    }

    #[test]
    fn syntax_errors_render_with_label_and_help() {
        let src = to_error_source("SELECT WHERE");
        let err = SparqlError::Syntax {
            message: "expected var".to_string(),
            dialect: Dialect::Query,
            position: locate("SELECT WHERE", 7),
            expected: vec!["var".to_string()],
            ctx: ErrorContext::with_source_and_span(src, Span::point(7))
                .with_help("a SELECT clause needs at least one variable"),
        };
        assert_eq!(err.error_type(), ErrorType::Syntax);
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("expected var"));
        assert!(output.contains("at least one variable"));
        assert!(output.contains("sparqlfmt::syntax"));
    }

    #[test]
    fn renaming_the_source_keeps_the_text() {
        let err = SparqlError::RoundTrip {
            message: "trees differ".to_string(),
            ctx: ErrorContext::with_source_and_span(to_error_source("ASK {}"), Span::point(0)),
        }
        .with_source_name("query.rq");
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("query.rq"));
    }

    #[test]
    fn io_errors_have_no_labels() {
        let err = SparqlError::io(
            "missing.rq",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.error_type(), ErrorType::Io);
        assert!(err.labels().is_none());
        assert!(err.position().is_none());
    }
}
