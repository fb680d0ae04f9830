//! Property path layouts. Paths are printed without inner spaces.

use crate::syntax::{Node, Rule};

use super::cursor::Cursor;
use super::plan::{Layout, Plan};
use super::term::single;

pub(super) fn verb_path(node: &Node) -> Layout<'_> {
    single(node, &[Rule::path_alternative])
}

pub(super) fn verb_simple(node: &Node) -> Layout<'_> {
    single(node, &[Rule::var])
}

pub(super) fn path_alternative(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let branches = cursor.rest(&[Rule::path_sequence])?;
    let mut plan = Plan::new();
    plan.glued(branches, "|");
    Ok(plan)
}

pub(super) fn path_sequence(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let steps = cursor.rest(&[Rule::path_elt_or_inverse])?;
    let mut plan = Plan::new();
    plan.glued(steps, "/");
    Ok(plan)
}

pub(super) fn path_elt_or_inverse(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    if let Some(inverse) = cursor.opt(&[Rule::INVERSE]) {
        plan.child(inverse);
    }
    plan.node(cursor.node(Rule::path_elt)?);
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn path_elt(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.node(cursor.node(Rule::path_primary)?);
    if let Some(modifier) = cursor.opt(&[Rule::PATH_MOD]) {
        plan.child(modifier);
    }
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn path_primary(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    let child = cursor.next(&[
        Rule::iri,
        Rule::A,
        Rule::path_negated_property_set,
        Rule::path_alternative,
    ])?;
    match child.rule() {
        Rule::path_negated_property_set => {
            plan.text("!").child(child);
        }
        Rule::path_alternative => {
            plan.text("(").child(child).text(")");
        }
        _ => {
            plan.child(child);
        }
    }
    cursor.finish()?;
    Ok(plan)
}

/// `!p`, `!(p|^q)`, or `!()` for the empty set.
pub(super) fn path_negated_property_set(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let members = cursor.rest(&[Rule::path_one_in_property_set])?;
    let mut plan = Plan::new();
    match members.as_slice() {
        [] => {
            plan.text("()");
        }
        [only] => {
            plan.child(only);
        }
        _ => {
            plan.text("(").glued(members, "|").text(")");
        }
    }
    Ok(plan)
}

pub(super) fn path_one_in_property_set(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    if let Some(inverse) = cursor.opt(&[Rule::INVERSE]) {
        plan.child(inverse);
    }
    plan.child(cursor.next(&[Rule::iri, Rule::A])?);
    cursor.finish()?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use crate::serializer::format_tree;
    use crate::syntax::parse_query;

    fn pattern(body: &str) -> String {
        let text = format!("ASK {{ {body} }}");
        let out = format_tree(&parse_query(&text).unwrap()).unwrap();
        out.trim_start_matches("ASK {\n  ")
            .trim_end_matches(" .\n}\n")
            .to_string()
    }

    #[test]
    fn operators_are_glued() {
        assert_eq!(
            pattern("?s ( :a | ^ :b ) / :c * ?o"),
            "?s (:a|^:b)/:c* ?o"
        );
    }

    #[test]
    fn zero_or_one_keeps_following_variable() {
        assert_eq!(pattern("?s :p? ?o"), "?s :p? ?o");
        assert_eq!(pattern("?s :p ?o"), "?s :p ?o");
    }

    #[test]
    fn negated_sets() {
        assert_eq!(pattern("?s !( :a ) ?o"), "?s !:a ?o");
        assert_eq!(pattern("?s !( a | ^ :b ) ?o"), "?s !(a|^:b) ?o");
        assert_eq!(pattern("?s !() ?o"), "?s !() ?o");
    }
}
