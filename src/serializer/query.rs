//! Layouts for the prologue, query forms and solution modifiers.

use crate::syntax::{Node, Rule};

use super::cursor::Cursor;
use super::pattern::spaced;
use super::plan::{Layout, Plan};
use super::term::single;

const FORMS: &[Rule] = &[
    Rule::select_query,
    Rule::construct_query,
    Rule::describe_query,
    Rule::ask_query,
];

pub(super) fn query_unit(node: &Node) -> Layout<'_> {
    single(node, &[Rule::query])
}

/// One declaration per line, then a blank line before the body.
pub(super) fn prologue(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    let decls = cursor.rest(&[Rule::base_decl, Rule::prefix_decl])?;
    if !decls.is_empty() {
        plan.lines(decls).blank_line();
    }
    Ok(plan)
}

pub(super) fn base_decl(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::BASE, Rule::IRIREF])
}

pub(super) fn prefix_decl(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::PREFIX, Rule::PNAME_NS, Rule::IRIREF])
}

pub(super) fn query(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.node(cursor.node(Rule::prologue)?)
        .child(cursor.next(FORMS)?);
    trailing_values(&mut plan, cursor.node(Rule::values_clause)?);
    cursor.finish()?;
    Ok(plan)
}

fn trailing_values<'t>(plan: &mut Plan<'t>, values: &'t Node) {
    if !values.is_empty() {
        plan.newline().node(values);
    }
}

/// Dataset clauses each on their own line.
fn datasets<'t>(plan: &mut Plan<'t>, cursor: &mut Cursor<'t>) -> usize {
    let clauses = cursor.many(&[Rule::dataset_clause]);
    let count = clauses.len();
    for clause in clauses {
        plan.newline().child(clause);
    }
    count
}

pub(super) fn select_query(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.node(cursor.node(Rule::select_clause)?);
    datasets(&mut plan, &mut cursor);
    plan.newline()
        .node(cursor.node(Rule::where_clause)?)
        .node(cursor.node(Rule::solution_modifier)?);
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn sub_select(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.node(cursor.node(Rule::select_clause)?)
        .newline()
        .node(cursor.node(Rule::where_clause)?)
        .node(cursor.node(Rule::solution_modifier)?);
    trailing_values(&mut plan, cursor.node(Rule::values_clause)?);
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn select_clause(node: &Node) -> Layout<'_> {
    spaced(
        node,
        &[
            Rule::SELECT,
            Rule::DISTINCT,
            Rule::REDUCED,
            Rule::STAR,
            Rule::var,
            Rule::select_binding,
        ],
    )
}

/// `(COUNT(*) AS ?n)`
pub(super) fn select_binding(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.text("(")
        .node(cursor.node(Rule::expression)?)
        .space()
        .token(cursor.token(Rule::AS)?)
        .space()
        .node(cursor.node(Rule::var)?)
        .text(")");
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn construct_query(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.token(cursor.token(Rule::CONSTRUCT)?);
    if let Some(template) = cursor.opt_node(Rule::construct_template) {
        plan.space().node(template);
        datasets(&mut plan, &mut cursor);
        plan.newline().node(cursor.node(Rule::where_clause)?);
    } else {
        if datasets(&mut plan, &mut cursor) > 0 {
            plan.newline();
        } else {
            plan.space();
        }
        plan.node(cursor.node(Rule::construct_where)?);
    }
    plan.node(cursor.node(Rule::solution_modifier)?);
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn construct_template(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.block(cursor.opt_node(Rule::construct_triples));
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn construct_where(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.token(cursor.token(Rule::WHERE)?)
        .space()
        .block(cursor.opt_node(Rule::triples_template));
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn construct_triples(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.statements(cursor.rest(&[Rule::triples_same_subject])?);
    Ok(plan)
}

pub(super) fn describe_query(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.token(cursor.token(Rule::DESCRIBE)?);
    for target in cursor.many(&[Rule::STAR, Rule::var_or_iri]) {
        plan.space().child(target);
    }
    datasets(&mut plan, &mut cursor);
    if let Some(where_clause) = cursor.opt_node(Rule::where_clause) {
        plan.newline().node(where_clause);
    }
    plan.node(cursor.node(Rule::solution_modifier)?);
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn ask_query(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.token(cursor.token(Rule::ASK)?);
    if datasets(&mut plan, &mut cursor) > 0 {
        plan.newline();
    } else {
        plan.space();
    }
    plan.node(cursor.node(Rule::where_clause)?)
        .node(cursor.node(Rule::solution_modifier)?);
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn dataset_clause(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::FROM, Rule::NAMED, Rule::iri])
}

pub(super) fn where_clause(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::WHERE, Rule::group_graph_pattern])
}

// ============================================================================
// SOLUTION MODIFIERS
// ============================================================================

/// Each present clause starts a new line.
pub(super) fn solution_modifier(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    let clauses = cursor.rest(&[
        Rule::group_clause,
        Rule::having_clause,
        Rule::order_clause,
        Rule::limit_offset_clauses,
    ])?;
    for clause in clauses {
        plan.newline().child(clause);
    }
    Ok(plan)
}

pub(super) fn group_clause(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::GROUP, Rule::BY, Rule::group_condition])
}

pub(super) fn group_condition(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    if let Some(expression) = cursor.opt_node(Rule::expression) {
        plan.text("(").node(expression);
        if let Some(alias) = cursor.opt(&[Rule::AS]) {
            plan.space()
                .child(alias)
                .space()
                .node(cursor.node(Rule::var)?);
        }
        plan.text(")");
    } else {
        plan.child(cursor.next(&[Rule::built_in_call, Rule::function_call, Rule::var])?);
    }
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn having_clause(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::HAVING, Rule::constraint])
}

pub(super) fn order_clause(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::ORDER, Rule::BY, Rule::order_condition])
}

/// `DESC(?x)`, a constraint, or a bare variable.
pub(super) fn order_condition(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    if let Some(direction) = cursor.opt(&[Rule::ASC, Rule::DESC]) {
        plan.child(direction)
            .node(cursor.node(Rule::bracketted_expression)?);
    } else {
        plan.child(cursor.next(&[Rule::constraint, Rule::var])?);
    }
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn limit_offset_clauses(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.lines(cursor.rest(&[Rule::limit_clause, Rule::offset_clause])?);
    Ok(plan)
}

pub(super) fn limit_clause(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::LIMIT, Rule::INTEGER])
}

pub(super) fn offset_clause(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::OFFSET, Rule::INTEGER])
}

pub(super) fn values_clause(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    if let Some(values) = cursor.opt(&[Rule::VALUES]) {
        plan.child(values)
            .space()
            .node(cursor.node(Rule::data_block)?);
    }
    cursor.finish()?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use crate::serializer::format_tree;
    use crate::syntax::parse_query;

    fn fmt(text: &str) -> String {
        format_tree(&parse_query(text).unwrap()).unwrap()
    }

    #[test]
    fn prologue_is_separated_by_a_blank_line() {
        assert_eq!(
            fmt("BASE <http://b/> PREFIX ex: <http://e/> SELECT * { ?s ?p ?o }"),
            "BASE <http://b/>\nPREFIX ex: <http://e/>\n\nSELECT *\n{\n  ?s ?p ?o .\n}\n"
        );
    }

    #[test]
    fn select_with_modifiers() {
        assert_eq!(
            fmt("select distinct ?s (count(distinct ?o) as ?n) from <g> where { ?s ?p ?o } group by ?s having (?n > 1) order by desc(?n) ?s limit 5 offset 10"),
            "select distinct ?s (count(distinct ?o) as ?n)\nfrom <g>\nwhere {\n  ?s ?p ?o .\n}\ngroup by ?s\nhaving (?n > 1)\norder by desc(?n) ?s\nlimit 5\noffset 10\n"
        );
    }

    #[test]
    fn other_query_forms() {
        assert_eq!(
            fmt("CONSTRUCT { ?s <p> ?o } WHERE { ?s <q> ?o }"),
            "CONSTRUCT {\n  ?s <p> ?o .\n}\nWHERE {\n  ?s <q> ?o .\n}\n"
        );
        assert_eq!(
            fmt("CONSTRUCT WHERE { ?s <q> ?o }"),
            "CONSTRUCT WHERE {\n  ?s <q> ?o .\n}\n"
        );
        assert_eq!(fmt("DESCRIBE <a> ?b"), "DESCRIBE <a> ?b\n");
        assert_eq!(fmt("ASK FROM <g> { }"), "ASK\nFROM <g>\n{}\n");
    }

    #[test]
    fn trailing_values_and_sub_selects() {
        assert_eq!(
            fmt("SELECT ?x { { SELECT ?x { ?x ?p ?o } LIMIT 1 } } VALUES ?x { <a> }"),
            "SELECT ?x\n{\n  {\n    SELECT ?x\n    {\n      ?x ?p ?o .\n    }\n    LIMIT 1\n  }\n}\nVALUES ?x { <a> }\n"
        );
    }
}
