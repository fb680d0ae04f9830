//! Shared helpers for the integration suites.

#![allow(dead_code)]

use std::path::PathBuf;

use sparqlfmt::{format_tree, parse, parse_try_both, Dialect, Node};

/// Parses `text`, formats it, re-parses the output with the same dialect and
/// asserts both trees are equal. Returns the formatted text.
pub fn assert_round_trip(text: &str) -> String {
    let (dialect, original) = parse_try_both(text)
        .unwrap_or_else(|e| panic!("input does not parse: {e}\n---\n{text}"));
    check(text, dialect, &original)
}

/// As [`assert_round_trip`], with an explicit dialect.
pub fn assert_round_trip_as(text: &str, dialect: Dialect) -> String {
    let original = parse(text, dialect)
        .unwrap_or_else(|e| panic!("input does not parse as {dialect}: {e}\n---\n{text}"));
    check(text, dialect, &original)
}

fn check(text: &str, dialect: Dialect, original: &Node) -> String {
    let formatted = format_tree(original).expect("formatter accepts every parsed tree");
    let reparsed = parse(&formatted, dialect).unwrap_or_else(|e| {
        panic!("formatted text does not parse: {e}\n--- input\n{text}\n--- output\n{formatted}")
    });
    assert_eq!(
        original, &reparsed,
        "tree changed\n--- input\n{text}\n--- output\n{formatted}"
    );
    let again = format_tree(&reparsed).expect("formatter accepts its own output");
    assert_eq!(formatted, again, "formatting is not idempotent");
    formatted
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).unwrap_or_else(|e| panic!("fixture {name}: {e}"))
}
