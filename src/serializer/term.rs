//! Layouts for variables, IRIs and literals.
//!
//! Terms are single tokens emitted exactly as matched, so these layouts only
//! check that the expected alternative is present.

use crate::syntax::{Node, Rule};

use super::cursor::Cursor;
use super::plan::{Layout, Plan};

/// A production whose only child is one of `alternatives`.
pub(super) fn single<'t>(node: &'t Node, alternatives: &[Rule]) -> Layout<'t> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.child(cursor.next(alternatives)?);
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn var_or_term(node: &Node) -> Layout<'_> {
    single(node, &[Rule::var, Rule::graph_term])
}

pub(super) fn var_or_iri(node: &Node) -> Layout<'_> {
    single(node, &[Rule::var, Rule::iri])
}

pub(super) fn graph_term(node: &Node) -> Layout<'_> {
    single(
        node,
        &[
            Rule::iri,
            Rule::rdf_literal,
            Rule::numeric_literal,
            Rule::boolean_literal,
            Rule::blank_node,
            Rule::NIL,
        ],
    )
}

pub(super) fn var(node: &Node) -> Layout<'_> {
    single(node, &[Rule::VAR1, Rule::VAR2])
}

pub(super) fn iri(node: &Node) -> Layout<'_> {
    single(node, &[Rule::IRIREF, Rule::PNAME_LN, Rule::PNAME_NS])
}

pub(super) fn blank_node(node: &Node) -> Layout<'_> {
    single(node, &[Rule::BLANK_NODE_LABEL, Rule::ANON])
}

/// `"chat"@fr` or `"5"^^xsd:int`, suffix glued to the string.
pub(super) fn rdf_literal(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.node(cursor.node(Rule::string)?);
    if let Some(tag) = cursor.opt(&[Rule::LANGTAG]) {
        plan.child(tag);
    } else if let Some(datatype) = cursor.opt_node(Rule::iri) {
        plan.text("^^").node(datatype);
    }
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn string(node: &Node) -> Layout<'_> {
    single(
        node,
        &[
            Rule::STRING_LITERAL_LONG1,
            Rule::STRING_LITERAL_LONG2,
            Rule::STRING_LITERAL1,
            Rule::STRING_LITERAL2,
        ],
    )
}

pub(super) fn boolean_literal(node: &Node) -> Layout<'_> {
    single(node, &[Rule::TRUE, Rule::FALSE])
}

pub(super) fn numeric_literal(node: &Node) -> Layout<'_> {
    single(
        node,
        &[
            Rule::numeric_literal_unsigned,
            Rule::numeric_literal_positive,
            Rule::numeric_literal_negative,
        ],
    )
}

pub(super) fn numeric_literal_unsigned(node: &Node) -> Layout<'_> {
    single(node, &[Rule::DOUBLE, Rule::DECIMAL, Rule::INTEGER])
}

pub(super) fn numeric_literal_positive(node: &Node) -> Layout<'_> {
    single(
        node,
        &[
            Rule::DOUBLE_POSITIVE,
            Rule::DECIMAL_POSITIVE,
            Rule::INTEGER_POSITIVE,
        ],
    )
}

pub(super) fn numeric_literal_negative(node: &Node) -> Layout<'_> {
    single(
        node,
        &[
            Rule::DOUBLE_NEGATIVE,
            Rule::DECIMAL_NEGATIVE,
            Rule::INTEGER_NEGATIVE,
        ],
    )
}

#[cfg(test)]
mod tests {
    use crate::serializer::format_tree;
    use crate::syntax::parse_query;

    fn fmt(text: &str) -> String {
        format_tree(&parse_query(text).unwrap()).unwrap()
    }

    #[test]
    fn literal_suffixes_are_glued() {
        assert_eq!(
            fmt("ASK { ?s ?p \"chat\" @fr }"),
            "ASK {\n  ?s ?p \"chat\"@fr .\n}\n"
        );
        assert_eq!(
            fmt("ASK { ?s ?p '5' ^^ <http://www.w3.org/2001/XMLSchema#int> }"),
            "ASK {\n  ?s ?p '5'^^<http://www.w3.org/2001/XMLSchema#int> .\n}\n"
        );
    }

    #[test]
    fn terms_keep_their_spelling() {
        assert_eq!(
            fmt("ASK { $s ?p 1.0e3, -.5, +7, true, _:b0, [ ], ( ) }"),
            "ASK {\n  $s ?p 1.0e3, -.5, +7, true, _:b0, [ ], ( ) .\n}\n"
        );
    }
}
