//! Canonical pretty-printer for parse trees.
//!
//! Serialization runs an explicit worklist instead of recursing: expanding a
//! node replaces it with the steps of its production's layout, pushed in
//! reverse so they are emitted in order. Memory grows with the size of the
//! pending work, never with the call stack, so arbitrarily long or deep trees
//! serialize safely.
//!
//! Every production has exactly one layout function, selected by an exhaustive
//! `match` on [`Rule`]. Adding a rule to the grammar without teaching the
//! serializer about it is a compile error; a node whose children do not fit its
//! layout is reported as a [`ContractViolation`].

use std::time::Instant;

use crate::syntax::{Node, Rule};

mod cursor;
mod emitter;
mod expr;
mod path;
mod pattern;
mod plan;
mod query;
mod term;
mod update;

pub use cursor::ContractViolation;

use emitter::Emitter;
use plan::{Layout, Step};

/// Renders a tree rooted at `query_unit` or `update_unit` (or any production
/// below them) in canonical layout.
///
/// The output ends with a newline unless it is empty.
pub fn format_tree(root: &Node) -> Result<String, ContractViolation> {
    let started = Instant::now();
    let mut emitter = Emitter::new();
    let mut work: Vec<Step<'_>> = vec![Step::Node(root)];
    let mut peak = work.len();

    while let Some(step) = work.pop() {
        match step {
            Step::Node(node) => {
                let steps = layout(node)?.into_steps();
                work.extend(steps.into_iter().rev());
                peak = peak.max(work.len());
            }
            Step::Token(token) => emitter.word(&token.text),
            Step::Text(text) => emitter.word(text),
            Step::Space => emitter.space(),
            Step::Newline => emitter.newline(),
            Step::BlankLine => emitter.blank_line(),
            Step::Indent => emitter.indent(),
            Step::Dedent => emitter.dedent(),
        }
    }

    let out = emitter.finish();
    log::trace!("serializer worklist peaked at {peak} steps");
    log::debug!(
        "serialized {:?} to {} bytes in {:?}",
        root.rule(),
        out.len(),
        started.elapsed()
    );
    Ok(out)
}

fn layout(node: &Node) -> Layout<'_> {
    match node.rule() {
        Rule::query_unit => query::query_unit(node),
        Rule::update_unit => update::update_unit(node),
        Rule::prologue => query::prologue(node),
        Rule::base_decl => query::base_decl(node),
        Rule::prefix_decl => query::prefix_decl(node),
        Rule::query => query::query(node),
        Rule::select_query => query::select_query(node),
        Rule::sub_select => query::sub_select(node),
        Rule::select_clause => query::select_clause(node),
        Rule::select_binding => query::select_binding(node),
        Rule::construct_query => query::construct_query(node),
        Rule::construct_template => query::construct_template(node),
        Rule::construct_where => query::construct_where(node),
        Rule::construct_triples => query::construct_triples(node),
        Rule::describe_query => query::describe_query(node),
        Rule::ask_query => query::ask_query(node),
        Rule::dataset_clause => query::dataset_clause(node),
        Rule::where_clause => query::where_clause(node),
        Rule::solution_modifier => query::solution_modifier(node),
        Rule::group_clause => query::group_clause(node),
        Rule::group_condition => query::group_condition(node),
        Rule::having_clause => query::having_clause(node),
        Rule::order_clause => query::order_clause(node),
        Rule::order_condition => query::order_condition(node),
        Rule::limit_offset_clauses => query::limit_offset_clauses(node),
        Rule::limit_clause => query::limit_clause(node),
        Rule::offset_clause => query::offset_clause(node),
        Rule::values_clause => query::values_clause(node),
        Rule::update => update::update(node),
        Rule::update1 => update::update1(node),
        Rule::load_op => update::load_op(node),
        Rule::clear_op => update::clear_op(node),
        Rule::drop_op => update::drop_op(node),
        Rule::create_op => update::create_op(node),
        Rule::add_op => update::add_op(node),
        Rule::move_op => update::move_op(node),
        Rule::copy_op => update::copy_op(node),
        Rule::insert_data => update::insert_data(node),
        Rule::delete_data => update::delete_data(node),
        Rule::delete_where => update::delete_where(node),
        Rule::modify => update::modify(node),
        Rule::delete_clause => update::delete_clause(node),
        Rule::insert_clause => update::insert_clause(node),
        Rule::using_clause => update::using_clause(node),
        Rule::graph_or_default => update::graph_or_default(node),
        Rule::graph_ref => update::graph_ref(node),
        Rule::graph_ref_all => update::graph_ref_all(node),
        Rule::quad_pattern => update::quad_pattern(node),
        Rule::quad_data => update::quad_data(node),
        Rule::quads => update::quads(node),
        Rule::quads_not_triples => update::quads_not_triples(node),
        Rule::triples_template => update::triples_template(node),
        Rule::group_graph_pattern => pattern::group_graph_pattern(node),
        Rule::group_graph_pattern_sub => pattern::group_graph_pattern_sub(node),
        Rule::triples_block => pattern::triples_block(node),
        Rule::graph_pattern_not_triples => pattern::graph_pattern_not_triples(node),
        Rule::group_or_union_graph_pattern => pattern::group_or_union_graph_pattern(node),
        Rule::optional_graph_pattern => pattern::optional_graph_pattern(node),
        Rule::minus_graph_pattern => pattern::minus_graph_pattern(node),
        Rule::graph_graph_pattern => pattern::graph_graph_pattern(node),
        Rule::service_graph_pattern => pattern::service_graph_pattern(node),
        Rule::filter => pattern::filter(node),
        Rule::constraint => pattern::constraint(node),
        Rule::function_call => expr::function_call(node),
        Rule::bind => pattern::bind(node),
        Rule::inline_data => pattern::inline_data(node),
        Rule::data_block => pattern::data_block(node),
        Rule::inline_data_one_var => pattern::inline_data_one_var(node),
        Rule::inline_data_full => pattern::inline_data_full(node),
        Rule::data_block_row => pattern::data_block_row(node),
        Rule::data_block_value => pattern::data_block_value(node),
        Rule::triples_same_subject => pattern::triples_same_subject(node),
        Rule::property_list_not_empty => pattern::property_list_not_empty(node),
        Rule::verb => pattern::verb(node),
        Rule::object_list => pattern::object_list(node),
        Rule::graph_node => pattern::graph_node(node),
        Rule::triples_node => pattern::triples_node(node),
        Rule::collection => pattern::collection(node),
        Rule::blank_node_property_list => pattern::blank_node_property_list(node),
        Rule::triples_same_subject_path => pattern::triples_same_subject_path(node),
        Rule::property_list_path_not_empty => pattern::property_list_path_not_empty(node),
        Rule::verb_path => path::verb_path(node),
        Rule::verb_simple => path::verb_simple(node),
        Rule::object_list_path => pattern::object_list_path(node),
        Rule::graph_node_path => pattern::graph_node_path(node),
        Rule::triples_node_path => pattern::triples_node_path(node),
        Rule::collection_path => pattern::collection_path(node),
        Rule::blank_node_property_list_path => pattern::blank_node_property_list_path(node),
        Rule::path_alternative => path::path_alternative(node),
        Rule::path_sequence => path::path_sequence(node),
        Rule::path_elt_or_inverse => path::path_elt_or_inverse(node),
        Rule::path_elt => path::path_elt(node),
        Rule::path_primary => path::path_primary(node),
        Rule::path_negated_property_set => path::path_negated_property_set(node),
        Rule::path_one_in_property_set => path::path_one_in_property_set(node),
        Rule::expression => expr::expression(node),
        Rule::conditional_and_expression => expr::conditional_and_expression(node),
        Rule::relational_expression => expr::relational_expression(node),
        Rule::additive_expression => expr::additive_expression(node),
        Rule::signed_term => expr::signed_term(node),
        Rule::multiplicative_expression => expr::multiplicative_expression(node),
        Rule::unary_expression => expr::unary_expression(node),
        Rule::primary_expression => expr::primary_expression(node),
        Rule::bracketted_expression => expr::bracketted_expression(node),
        Rule::iri_or_function => expr::iri_or_function(node),
        Rule::arg_list => expr::arg_list(node),
        Rule::expression_list => expr::expression_list(node),
        Rule::built_in_call => expr::built_in_call(node),
        Rule::aggregate => expr::aggregate(node),
        Rule::substring_expression => expr::substring_expression(node),
        Rule::str_replace_expression => expr::str_replace_expression(node),
        Rule::regex_expression => expr::regex_expression(node),
        Rule::exists_func => expr::exists_func(node),
        Rule::not_exists_func => expr::not_exists_func(node),
        Rule::var_or_term => term::var_or_term(node),
        Rule::var_or_iri => term::var_or_iri(node),
        Rule::graph_term => term::graph_term(node),
        Rule::var => term::var(node),
        Rule::iri => term::iri(node),
        Rule::blank_node => term::blank_node(node),
        Rule::rdf_literal => term::rdf_literal(node),
        Rule::string => term::string(node),
        Rule::boolean_literal => term::boolean_literal(node),
        Rule::numeric_literal => term::numeric_literal(node),
        Rule::numeric_literal_unsigned => term::numeric_literal_unsigned(node),
        Rule::numeric_literal_positive => term::numeric_literal_positive(node),
        Rule::numeric_literal_negative => term::numeric_literal_negative(node),
        Rule::BASE
        | Rule::PREFIX
        | Rule::SELECT
        | Rule::DISTINCT
        | Rule::REDUCED
        | Rule::AS
        | Rule::CONSTRUCT
        | Rule::DESCRIBE
        | Rule::ASK
        | Rule::WHERE
        | Rule::FROM
        | Rule::NAMED
        | Rule::GROUP
        | Rule::BY
        | Rule::HAVING
        | Rule::ORDER
        | Rule::ASC
        | Rule::DESC
        | Rule::LIMIT
        | Rule::OFFSET
        | Rule::VALUES
        | Rule::UNDEF
        | Rule::UNION
        | Rule::OPTIONAL
        | Rule::MINUS
        | Rule::GRAPH
        | Rule::SERVICE
        | Rule::SILENT
        | Rule::FILTER
        | Rule::BIND
        | Rule::NOT
        | Rule::IN
        | Rule::EXISTS
        | Rule::TRUE
        | Rule::FALSE
        | Rule::A
        | Rule::LOAD
        | Rule::INTO
        | Rule::CLEAR
        | Rule::DROP_KW
        | Rule::CREATE
        | Rule::ADD
        | Rule::MOVE
        | Rule::COPY
        | Rule::TO
        | Rule::INSERT
        | Rule::DELETE
        | Rule::DATA
        | Rule::WITH
        | Rule::USING
        | Rule::DEFAULT
        | Rule::ALL
        | Rule::FUNC_UNARY
        | Rule::FUNC_BINARY
        | Rule::FUNC_TERNARY
        | Rule::FUNC_NULLARY
        | Rule::FUNC_VARIADIC
        | Rule::BNODE
        | Rule::SUBSTR
        | Rule::REPLACE
        | Rule::REGEX
        | Rule::COUNT
        | Rule::AGG_FUNC
        | Rule::GROUP_CONCAT
        | Rule::SEPARATOR_KW
        | Rule::STAR
        | Rule::RELATIONAL_OP
        | Rule::ADDITIVE_OP
        | Rule::MULTIPLICATIVE_OP
        | Rule::UNARY_OP
        | Rule::INVERSE
        | Rule::PATH_MOD
        | Rule::IRIREF
        | Rule::PNAME_NS
        | Rule::PNAME_LN
        | Rule::BLANK_NODE_LABEL
        | Rule::VAR1
        | Rule::VAR2
        | Rule::VARNAME
        | Rule::LANGTAG
        | Rule::INTEGER
        | Rule::DECIMAL
        | Rule::DOUBLE
        | Rule::INTEGER_POSITIVE
        | Rule::DECIMAL_POSITIVE
        | Rule::DOUBLE_POSITIVE
        | Rule::INTEGER_NEGATIVE
        | Rule::DECIMAL_NEGATIVE
        | Rule::DOUBLE_NEGATIVE
        | Rule::EXPONENT
        | Rule::STRING_LITERAL1
        | Rule::STRING_LITERAL2
        | Rule::STRING_LITERAL_LONG1
        | Rule::STRING_LITERAL_LONG2
        | Rule::ECHAR
        | Rule::UCHAR
        | Rule::NIL
        | Rule::ANON
        | Rule::PN_CHARS_BASE
        | Rule::PN_CHARS_U
        | Rule::PN_CHARS
        | Rule::PN_PREFIX
        | Rule::PN_LOCAL
        | Rule::PLX
        | Rule::PERCENT
        | Rule::PN_LOCAL_ESC
        | Rule::WHITESPACE
        | Rule::COMMENT
        | Rule::kw_end
        | Rule::EOI => Err(ContractViolation::NotAProduction { rule: node.rule() }),
    }
}
