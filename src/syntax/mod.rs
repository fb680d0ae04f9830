//! Grammar, parse tree and parser entry points.

pub mod dialect;
pub mod parser;
pub mod tree;

pub use dialect::{guess_dialect, Dialect, DialectChoice};
pub use parser::{
    parse, parse_guessed, parse_query, parse_try_both, parse_update, parse_with, DialectParser,
    Rule, DEFAULT_MAX_NESTING,
};
pub use tree::{Child, Node, Token};
