//! Layouts for update requests: operations, graph references and quad bodies.

use crate::syntax::{Child, Node, Rule};

use super::cursor::Cursor;
use super::pattern::spaced;
use super::plan::{Layout, Plan};
use super::term::single;

const GRAPH_MANAGEMENT: &[Rule] = &[
    Rule::SILENT,
    Rule::iri,
    Rule::INTO,
    Rule::graph_ref,
    Rule::graph_ref_all,
    Rule::graph_or_default,
    Rule::TO,
];

pub(super) fn update_unit(node: &Node) -> Layout<'_> {
    single(node, &[Rule::update])
}

/// Operations separated by ` ;`. Every prologue after the first marks one
/// separator, so a trailing `;` is kept even when nothing follows it.
pub(super) fn update(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.node(cursor.node(Rule::prologue)?);
    if let Some(first) = cursor.opt_node(Rule::update1) {
        plan.node(first);
        while let Some(prologue) = cursor.opt_node(Rule::prologue) {
            plan.space().text(";").newline().node(prologue);
            match cursor.opt_node(Rule::update1) {
                Some(operation) => {
                    plan.node(operation);
                }
                None => break,
            }
        }
    }
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn update1(node: &Node) -> Layout<'_> {
    single(
        node,
        &[
            Rule::load_op,
            Rule::clear_op,
            Rule::drop_op,
            Rule::add_op,
            Rule::move_op,
            Rule::copy_op,
            Rule::create_op,
            Rule::insert_data,
            Rule::delete_data,
            Rule::delete_where,
            Rule::modify,
        ],
    )
}

// ============================================================================
// GRAPH MANAGEMENT
// ============================================================================

fn graph_operation<'t>(node: &'t Node, keyword: Rule) -> Layout<'t> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.token(cursor.token(keyword)?);
    for child in cursor.rest(GRAPH_MANAGEMENT)? {
        plan.space().child(child);
    }
    Ok(plan)
}

pub(super) fn load_op(node: &Node) -> Layout<'_> {
    graph_operation(node, Rule::LOAD)
}

pub(super) fn clear_op(node: &Node) -> Layout<'_> {
    graph_operation(node, Rule::CLEAR)
}

pub(super) fn drop_op(node: &Node) -> Layout<'_> {
    graph_operation(node, Rule::DROP_KW)
}

pub(super) fn create_op(node: &Node) -> Layout<'_> {
    graph_operation(node, Rule::CREATE)
}

pub(super) fn add_op(node: &Node) -> Layout<'_> {
    graph_operation(node, Rule::ADD)
}

pub(super) fn move_op(node: &Node) -> Layout<'_> {
    graph_operation(node, Rule::MOVE)
}

pub(super) fn copy_op(node: &Node) -> Layout<'_> {
    graph_operation(node, Rule::COPY)
}

pub(super) fn graph_or_default(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::DEFAULT, Rule::GRAPH, Rule::iri])
}

pub(super) fn graph_ref(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::GRAPH, Rule::iri])
}

pub(super) fn graph_ref_all(node: &Node) -> Layout<'_> {
    single(
        node,
        &[Rule::graph_ref, Rule::DEFAULT, Rule::NAMED, Rule::ALL],
    )
}

// ============================================================================
// GRAPH UPDATES
// ============================================================================

pub(super) fn insert_data(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::INSERT, Rule::DATA, Rule::quad_data])
}

pub(super) fn delete_data(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::DELETE, Rule::DATA, Rule::quad_data])
}

pub(super) fn delete_where(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::DELETE, Rule::WHERE, Rule::quad_pattern])
}

/// `WITH`, the templates, each `USING` and the `WHERE` pattern start lines of
/// their own.
pub(super) fn modify(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    if let Some(with) = cursor.opt(&[Rule::WITH]) {
        plan.child(with)
            .space()
            .node(cursor.node(Rule::iri)?)
            .newline();
    }
    for clause in cursor.many(&[Rule::delete_clause, Rule::insert_clause, Rule::using_clause]) {
        plan.child(clause).newline();
    }
    plan.token(cursor.token(Rule::WHERE)?)
        .space()
        .node(cursor.node(Rule::group_graph_pattern)?);
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn delete_clause(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::DELETE, Rule::quad_pattern])
}

pub(super) fn insert_clause(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::INSERT, Rule::quad_pattern])
}

pub(super) fn using_clause(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::USING, Rule::NAMED, Rule::iri])
}

// ============================================================================
// QUADS
// ============================================================================

fn quad_block(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.block(Some(cursor.node(Rule::quads)?));
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn quad_pattern(node: &Node) -> Layout<'_> {
    quad_block(node)
}

pub(super) fn quad_data(node: &Node) -> Layout<'_> {
    quad_block(node)
}

pub(super) fn quads(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.lines(cursor.rest(&[Rule::triples_template, Rule::quads_not_triples])?);
    Ok(plan)
}

/// `GRAPH <g> { ... }`
pub(super) fn quads_not_triples(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.token(cursor.token(Rule::GRAPH)?)
        .space()
        .node(cursor.node(Rule::var_or_iri)?)
        .space()
        .block(cursor.opt_node(Rule::triples_template));
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn triples_template(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    let triples: Vec<&Child> = cursor.rest(&[Rule::triples_same_subject])?;
    plan.statements(triples);
    Ok(plan)
}
