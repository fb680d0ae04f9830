//! Graph pattern, inline data and triple layouts.

use crate::syntax::{Node, Rule};

use super::cursor::Cursor;
use super::plan::{Layout, Plan};
use super::term::single;

const GRAPH_NODE_PATH: &[Rule] = &[Rule::graph_node_path];
const OBJECT_LISTS: &[Rule] = &[Rule::object_list, Rule::object_list_path];

/// Every child in order, single spaces between.
pub(super) fn spaced<'t>(node: &'t Node, allowed: &[Rule]) -> Layout<'t> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.spaced(cursor.rest(allowed)?);
    Ok(plan)
}

// ============================================================================
// GROUPS
// ============================================================================

pub(super) fn group_graph_pattern(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    let body = cursor.next(&[Rule::sub_select, Rule::group_graph_pattern_sub])?;
    plan.block(body.as_node());
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn group_graph_pattern_sub(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.lines(cursor.rest(&[Rule::triples_block, Rule::graph_pattern_not_triples])?);
    Ok(plan)
}

pub(super) fn triples_block(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.statements(cursor.rest(&[Rule::triples_same_subject_path])?);
    Ok(plan)
}

pub(super) fn graph_pattern_not_triples(node: &Node) -> Layout<'_> {
    single(
        node,
        &[
            Rule::group_or_union_graph_pattern,
            Rule::optional_graph_pattern,
            Rule::minus_graph_pattern,
            Rule::graph_graph_pattern,
            Rule::service_graph_pattern,
            Rule::filter,
            Rule::bind,
            Rule::inline_data,
        ],
    )
}

pub(super) fn group_or_union_graph_pattern(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::group_graph_pattern, Rule::UNION])
}

pub(super) fn optional_graph_pattern(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::OPTIONAL, Rule::group_graph_pattern])
}

pub(super) fn minus_graph_pattern(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::MINUS, Rule::group_graph_pattern])
}

pub(super) fn graph_graph_pattern(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::GRAPH, Rule::var_or_iri, Rule::group_graph_pattern])
}

pub(super) fn service_graph_pattern(node: &Node) -> Layout<'_> {
    spaced(
        node,
        &[
            Rule::SERVICE,
            Rule::SILENT,
            Rule::var_or_iri,
            Rule::group_graph_pattern,
        ],
    )
}

pub(super) fn filter(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::FILTER, Rule::constraint])
}

pub(super) fn constraint(node: &Node) -> Layout<'_> {
    single(
        node,
        &[
            Rule::bracketted_expression,
            Rule::built_in_call,
            Rule::function_call,
        ],
    )
}

/// `BIND(?a + 1 AS ?b)`
pub(super) fn bind(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.token(cursor.token(Rule::BIND)?)
        .text("(")
        .node(cursor.node(Rule::expression)?)
        .space()
        .token(cursor.token(Rule::AS)?)
        .space()
        .node(cursor.node(Rule::var)?)
        .text(")");
    cursor.finish()?;
    Ok(plan)
}

// ============================================================================
// INLINE DATA
// ============================================================================

pub(super) fn inline_data(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::VALUES, Rule::data_block])
}

pub(super) fn data_block(node: &Node) -> Layout<'_> {
    single(node, &[Rule::inline_data_one_var, Rule::inline_data_full])
}

/// `?x { 1 2 UNDEF }`
pub(super) fn inline_data_one_var(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.node(cursor.node(Rule::var)?).space();
    let values = cursor.rest(&[Rule::data_block_value])?;
    if values.is_empty() {
        plan.text("{}");
    } else {
        plan.text("{").space().spaced(values).space().text("}");
    }
    Ok(plan)
}

/// `(?a ?b) {` then one row per line, including empty `()` rows.
pub(super) fn inline_data_full(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    let header = cursor.next(&[Rule::NIL, Rule::var])?;
    if header.rule() == Rule::NIL {
        plan.child(header);
    } else {
        let mut vars = vec![header];
        vars.extend(cursor.many(&[Rule::var]));
        plan.text("(").spaced(vars).text(")");
    }
    plan.space();
    let rows = cursor.rest(&[Rule::NIL, Rule::data_block_row])?;
    if rows.is_empty() {
        plan.text("{}");
        return Ok(plan);
    }
    plan.text("{").indent();
    for row in rows {
        plan.newline().child(row);
    }
    plan.dedent().newline().text("}");
    Ok(plan)
}

pub(super) fn data_block_row(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.text("(")
        .spaced(cursor.rest(&[Rule::data_block_value])?)
        .text(")");
    Ok(plan)
}

pub(super) fn data_block_value(node: &Node) -> Layout<'_> {
    single(
        node,
        &[
            Rule::iri,
            Rule::rdf_literal,
            Rule::numeric_literal,
            Rule::boolean_literal,
            Rule::UNDEF,
        ],
    )
}

// ============================================================================
// TRIPLES
// ============================================================================

/// Subject, then its property list if it has one (`[ :p 1 ]` may stand alone).
fn subject_and_properties<'t>(node: &'t Node, subjects: &[Rule], properties: Rule) -> Layout<'t> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.child(cursor.next(subjects)?);
    if let Some(list) = cursor.opt_node(properties) {
        plan.space().node(list);
    }
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn triples_same_subject(node: &Node) -> Layout<'_> {
    subject_and_properties(
        node,
        &[Rule::var_or_term, Rule::triples_node],
        Rule::property_list_not_empty,
    )
}

pub(super) fn triples_same_subject_path(node: &Node) -> Layout<'_> {
    subject_and_properties(
        node,
        &[Rule::var_or_term, Rule::triples_node_path],
        Rule::property_list_path_not_empty,
    )
}

/// Predicate-object pairs; each pair after the first goes on its own
/// indented line after ` ;`.
fn property_list<'t>(node: &'t Node, verbs: &[Rule]) -> Layout<'t> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    let mut pairs = 0;
    while !cursor.is_done() {
        let verb = cursor.next(verbs)?;
        let objects = cursor.next(OBJECT_LISTS)?;
        if pairs == 1 {
            plan.indent();
        }
        if pairs > 0 {
            plan.space().text(";").newline();
        }
        plan.child(verb).space().child(objects);
        pairs += 1;
    }
    if pairs > 1 {
        plan.dedent();
    }
    Ok(plan)
}

pub(super) fn property_list_not_empty(node: &Node) -> Layout<'_> {
    property_list(node, &[Rule::verb])
}

pub(super) fn property_list_path_not_empty(node: &Node) -> Layout<'_> {
    property_list(node, &[Rule::verb_path, Rule::verb_simple])
}

pub(super) fn verb(node: &Node) -> Layout<'_> {
    single(node, &[Rule::var_or_iri, Rule::A])
}

fn object_list_of<'t>(node: &'t Node, objects: &[Rule]) -> Layout<'t> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.listed(cursor.rest(objects)?);
    Ok(plan)
}

pub(super) fn object_list(node: &Node) -> Layout<'_> {
    object_list_of(node, &[Rule::graph_node])
}

pub(super) fn object_list_path(node: &Node) -> Layout<'_> {
    object_list_of(node, GRAPH_NODE_PATH)
}

pub(super) fn graph_node(node: &Node) -> Layout<'_> {
    single(node, &[Rule::var_or_term, Rule::triples_node])
}

pub(super) fn graph_node_path(node: &Node) -> Layout<'_> {
    single(node, &[Rule::var_or_term, Rule::triples_node_path])
}

pub(super) fn triples_node(node: &Node) -> Layout<'_> {
    single(node, &[Rule::collection, Rule::blank_node_property_list])
}

pub(super) fn triples_node_path(node: &Node) -> Layout<'_> {
    single(
        node,
        &[Rule::collection_path, Rule::blank_node_property_list_path],
    )
}

fn collection_of<'t>(node: &'t Node, members: &[Rule]) -> Layout<'t> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.text("(").spaced(cursor.rest(members)?).text(")");
    Ok(plan)
}

pub(super) fn collection(node: &Node) -> Layout<'_> {
    collection_of(node, &[Rule::graph_node])
}

pub(super) fn collection_path(node: &Node) -> Layout<'_> {
    collection_of(node, GRAPH_NODE_PATH)
}

fn bracketed_properties<'t>(node: &'t Node, list: Rule) -> Layout<'t> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.text("[")
        .indent()
        .newline()
        .node(cursor.node(list)?)
        .dedent()
        .newline()
        .text("]");
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn blank_node_property_list(node: &Node) -> Layout<'_> {
    bracketed_properties(node, Rule::property_list_not_empty)
}

pub(super) fn blank_node_property_list_path(node: &Node) -> Layout<'_> {
    bracketed_properties(node, Rule::property_list_path_not_empty)
}

#[cfg(test)]
mod tests {
    use crate::serializer::format_tree;
    use crate::syntax::parse_query;

    fn fmt(text: &str) -> String {
        format_tree(&parse_query(text).unwrap()).unwrap()
    }

    #[test]
    fn property_lists_break_after_semicolons() {
        assert_eq!(
            fmt("ASK { ?s a :C ; :p 1 , 2 ; :q ?o . ?o :r ?x }"),
            "ASK {\n  ?s a :C ;\n    :p 1, 2 ;\n    :q ?o .\n  ?o :r ?x .\n}\n"
        );
    }

    #[test]
    fn blank_node_property_lists_nest() {
        assert_eq!(
            fmt("ASK { [ :p [ :q 1 ] ] :r (1 ?x) }"),
            "ASK {\n  [\n    :p [\n      :q 1\n    ]\n  ] :r (1 ?x) .\n}\n"
        );
    }

    #[test]
    fn union_optional_filter_bind() {
        assert_eq!(
            fmt("ASK { { ?s ?p ?o } UNION { ?o ?p ?s } OPTIONAL { ?s :q ?x } FILTER(?x) BIND(?x + 1 AS ?y) }"),
            "ASK {\n  {\n    ?s ?p ?o .\n  } UNION {\n    ?o ?p ?s .\n  }\n  OPTIONAL {\n    ?s :q ?x .\n  }\n  FILTER (?x)\n  BIND(?x + 1 AS ?y)\n}\n"
        );
    }

    #[test]
    fn empty_groups_collapse() {
        assert_eq!(fmt("ASK { }"), "ASK {}\n");
        assert_eq!(fmt("ASK { OPTIONAL { } }"), "ASK {\n  OPTIONAL {}\n}\n");
    }

    #[test]
    fn values_rows_keep_empty_tuples() {
        assert_eq!(
            fmt("ASK { VALUES (?a ?b) { (1 UNDEF) () (<x> \"y\") } }"),
            "ASK {\n  VALUES (?a ?b) {\n    (1 UNDEF)\n    ()\n    (<x> \"y\")\n  }\n}\n"
        );
        assert_eq!(
            fmt("ASK { VALUES () { () () } }"),
            "ASK {\n  VALUES () {\n    ()\n    ()\n  }\n}\n"
        );
        assert_eq!(fmt("ASK { VALUES ?x { 1 2 } }"), "ASK {\n  VALUES ?x { 1 2 }\n}\n");
        assert_eq!(fmt("ASK { VALUES ?x { } }"), "ASK {\n  VALUES ?x {}\n}\n");
    }
}
