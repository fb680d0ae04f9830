//! The two grammar entry points and the strategies for choosing between them.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::syntax::Rule;

/// A grammar start point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Query,
    Update,
}

impl Dialect {
    pub fn start_rule(self) -> Rule {
        match self {
            Dialect::Query => Rule::query_unit,
            Dialect::Update => Rule::update_unit,
        }
    }

    pub fn other(self) -> Dialect {
        match self {
            Dialect::Query => Dialect::Update,
            Dialect::Update => Dialect::Query,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Query => "query",
            Dialect::Update => "update",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a caller selects the dialect for a piece of text.
///
/// - `Query` / `Update`: explicit, one parse, errors point at the chosen grammar.
/// - `Guess`: keyword heuristic first, then the other dialect if that parse fails.
/// - `TryBoth`: query grammar first, then update; pays a second parse on update text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DialectChoice {
    Query,
    Update,
    #[default]
    Guess,
    TryBoth,
}

impl From<Dialect> for DialectChoice {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Query => DialectChoice::Query,
            Dialect::Update => DialectChoice::Update,
        }
    }
}

lazy_static! {
    static ref UPDATE_KEYWORDS: Regex =
        Regex::new(r"(?i)\b(LOAD|CLEAR|DROP|CREATE|ADD|MOVE|COPY|INSERT|DELETE|USING)\b")
            .expect("update keyword pattern is valid");
}

/// Classifies text by searching for update-only keywords.
///
/// Best effort: a keyword inside a string literal or IRI still counts.
pub fn guess_dialect(text: &str) -> Dialect {
    if UPDATE_KEYWORDS.is_match(text) {
        Dialect::Update
    } else {
        Dialect::Query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_update_keywords_case_insensitively() {
        assert_eq!(guess_dialect("load <a> into graph <b>"), Dialect::Update);
        assert_eq!(guess_dialect("INSERT DATA { <a> <b> <c> }"), Dialect::Update);
        assert_eq!(guess_dialect("Delete WHERE { ?s ?p ?o }"), Dialect::Update);
        assert_eq!(guess_dialect("WITH <g> DELETE { ?s ?p ?o } USING <x> WHERE {}"), Dialect::Update);
    }

    #[test]
    fn defaults_to_query() {
        assert_eq!(guess_dialect("SELECT * WHERE { ?s ?p ?o }"), Dialect::Query);
        assert_eq!(guess_dialect(""), Dialect::Query);
    }

    #[test]
    fn keywords_must_be_whole_words() {
        assert_eq!(guess_dialect("SELECT ?address WHERE { ?s <p> ?address }"), Dialect::Query);
        assert_eq!(guess_dialect("SELECT ?created { ?s ?p ?created }"), Dialect::Query);
    }

    #[test]
    fn keywords_in_literals_still_count() {
        assert_eq!(guess_dialect(r#"ASK { ?s ?p "drop" }"#), Dialect::Update);
    }

    #[test]
    fn start_rules_differ() {
        assert_eq!(Dialect::Query.start_rule(), Rule::query_unit);
        assert_eq!(Dialect::Update.start_rule(), Rule::update_unit);
        assert_eq!(Dialect::Query.other(), Dialect::Update);
    }
}
