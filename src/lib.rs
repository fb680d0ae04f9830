//! sparqlfmt: a parser and canonical pretty-printer for SPARQL 1.1 queries
//! and updates.
//!
//! Formatting never changes meaning: for any text `t` the grammar accepts,
//! parsing `format(t)` yields the same tree as parsing `t`.
//!
//! ```
//! use sparqlfmt::{format, DialectChoice};
//!
//! let text = format("select ?s where{?s a ?o}", DialectChoice::Guess).unwrap();
//! assert_eq!(text, "select ?s\nwhere {\n  ?s a ?o .\n}\n");
//! ```

pub use crate::diagnostics::{ErrorContext, ErrorType, SparqlError};
pub use crate::engine::{format, round_trip, Engine, RoundTrip};
pub use crate::serializer::{format_tree, ContractViolation};
pub use crate::syntax::{
    guess_dialect, parse, parse_guessed, parse_query, parse_try_both, parse_update, parse_with,
    Child, Dialect, DialectChoice, DialectParser, Node, Rule, Token,
};

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod serializer;
pub mod syntax;
