//! Expression layouts: operators spaced, calls glued to their argument lists.

use crate::syntax::tree::is_numeric;
use crate::syntax::{Child, Node, Rule};

use super::cursor::Cursor;
use super::plan::{Layout, Plan};
use super::term::single;

const FUNC_NAMES: &[Rule] = &[Rule::FUNC_UNARY, Rule::FUNC_BINARY, Rule::FUNC_TERNARY];

/// Operands joined by an operator the tree keeps implicit, such as `||`.
fn chain<'t>(node: &'t Node, operand: Rule, op: &'static str) -> Layout<'t> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    for (i, child) in cursor.rest(&[operand])?.into_iter().enumerate() {
        if i > 0 {
            plan.space().text(op).space();
        }
        plan.child(child);
    }
    Ok(plan)
}

/// Every child in order, single spaces between.
fn spaced<'t>(node: &'t Node, allowed: &[Rule]) -> Layout<'t> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.spaced(cursor.rest(allowed)?);
    Ok(plan)
}

/// `(a, b, c)` from the remaining expression children.
fn arguments<'t>(plan: &mut Plan<'t>, cursor: &mut Cursor<'t>) -> Result<(), super::ContractViolation> {
    let args = cursor.rest(&[Rule::expression])?;
    plan.text("(").listed(args).text(")");
    Ok(())
}

pub(super) fn expression(node: &Node) -> Layout<'_> {
    chain(node, Rule::conditional_and_expression, "||")
}

pub(super) fn conditional_and_expression(node: &Node) -> Layout<'_> {
    chain(node, Rule::relational_expression, "&&")
}

pub(super) fn relational_expression(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.node(cursor.node(Rule::additive_expression)?);
    if let Some(op) = cursor.opt(&[Rule::RELATIONAL_OP]) {
        plan.space()
            .child(op)
            .space()
            .node(cursor.node(Rule::additive_expression)?);
    } else if !cursor.is_done() {
        if let Some(not) = cursor.opt(&[Rule::NOT]) {
            plan.space().child(not);
        }
        plan.space()
            .token(cursor.token(Rule::IN)?)
            .space()
            .node(cursor.node(Rule::expression_list)?);
    }
    cursor.finish()?;
    Ok(plan)
}

/// `?a + ?b`, and `?a -5` where the sign belongs to the literal.
pub(super) fn additive_expression(node: &Node) -> Layout<'_> {
    spaced(
        node,
        &[
            Rule::multiplicative_expression,
            Rule::signed_term,
            Rule::ADDITIVE_OP,
        ],
    )
}

pub(super) fn signed_term(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.child(cursor.next(&[
        Rule::numeric_literal_positive,
        Rule::numeric_literal_negative,
    ])?);
    let tail = cursor.rest(&[Rule::MULTIPLICATIVE_OP, Rule::unary_expression])?;
    for child in tail {
        plan.space().child(child);
    }
    Ok(plan)
}

pub(super) fn multiplicative_expression(node: &Node) -> Layout<'_> {
    spaced(node, &[Rule::unary_expression, Rule::MULTIPLICATIVE_OP])
}

/// `!?x`, `-?x`; a numeric operand is set apart so `- 5` stays a unary minus.
pub(super) fn unary_expression(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    let op = cursor.opt(&[Rule::UNARY_OP]);
    let operand = cursor.node(Rule::primary_expression)?;
    if let Some(op) = op {
        plan.child(op);
        if operand.first_token().is_some_and(|t| is_numeric(t.rule)) {
            plan.space();
        }
    }
    plan.node(operand);
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn primary_expression(node: &Node) -> Layout<'_> {
    single(
        node,
        &[
            Rule::bracketted_expression,
            Rule::built_in_call,
            Rule::iri_or_function,
            Rule::rdf_literal,
            Rule::numeric_literal,
            Rule::boolean_literal,
            Rule::var,
        ],
    )
}

pub(super) fn bracketted_expression(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.text("(").node(cursor.node(Rule::expression)?).text(")");
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn iri_or_function(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.node(cursor.node(Rule::iri)?);
    if let Some(args) = cursor.opt_node(Rule::arg_list) {
        plan.node(args);
    }
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn function_call(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.node(cursor.node(Rule::iri)?)
        .node(cursor.node(Rule::arg_list)?);
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn arg_list(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    if let Some(nil) = cursor.opt(&[Rule::NIL]) {
        plan.child(nil);
        cursor.finish()?;
        return Ok(plan);
    }
    plan.text("(");
    if let Some(distinct) = cursor.opt(&[Rule::DISTINCT]) {
        plan.child(distinct).space();
    }
    plan.listed(cursor.rest(&[Rule::expression])?).text(")");
    Ok(plan)
}

pub(super) fn expression_list(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    if let Some(nil) = cursor.opt(&[Rule::NIL]) {
        plan.child(nil);
        cursor.finish()?;
    } else {
        arguments(&mut plan, &mut cursor)?;
    }
    Ok(plan)
}

pub(super) fn built_in_call(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    let head = cursor.next(&[
        Rule::aggregate,
        Rule::FUNC_UNARY,
        Rule::FUNC_BINARY,
        Rule::FUNC_TERNARY,
        Rule::FUNC_NULLARY,
        Rule::FUNC_VARIADIC,
        Rule::BNODE,
        Rule::substring_expression,
        Rule::str_replace_expression,
        Rule::regex_expression,
        Rule::exists_func,
        Rule::not_exists_func,
    ])?;
    plan.child(head);
    match head {
        Child::Token(name) if FUNC_NAMES.contains(&name.rule) => {
            arguments(&mut plan, &mut cursor)?;
        }
        Child::Token(name) if name.rule == Rule::FUNC_NULLARY => {
            plan.child(cursor.next(&[Rule::NIL])?);
        }
        Child::Token(name) if name.rule == Rule::FUNC_VARIADIC => {
            plan.node(cursor.node(Rule::expression_list)?);
        }
        Child::Token(_) => {
            // BNODE takes one bracketted expression or NIL
            match cursor.opt(&[Rule::NIL]) {
                Some(nil) => {
                    plan.child(nil);
                }
                None => arguments(&mut plan, &mut cursor)?,
            }
        }
        Child::Node(_) => {}
    }
    cursor.finish()?;
    Ok(plan)
}

/// `COUNT(DISTINCT *)`, `GROUP_CONCAT(?x; SEPARATOR = ",")`.
pub(super) fn aggregate(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.child(cursor.next(&[Rule::COUNT, Rule::AGG_FUNC, Rule::GROUP_CONCAT])?)
        .text("(");
    if let Some(distinct) = cursor.opt(&[Rule::DISTINCT]) {
        plan.child(distinct).space();
    }
    plan.child(cursor.next(&[Rule::STAR, Rule::expression])?);
    if let Some(separator) = cursor.opt(&[Rule::SEPARATOR_KW]) {
        plan.text(";")
            .space()
            .child(separator)
            .space()
            .text("=")
            .space()
            .node(cursor.node(Rule::string)?);
    }
    plan.text(")");
    cursor.finish()?;
    Ok(plan)
}

fn named_call<'t>(node: &'t Node, name: Rule) -> Layout<'t> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.token(cursor.token(name)?);
    arguments(&mut plan, &mut cursor)?;
    Ok(plan)
}

pub(super) fn substring_expression(node: &Node) -> Layout<'_> {
    named_call(node, Rule::SUBSTR)
}

pub(super) fn str_replace_expression(node: &Node) -> Layout<'_> {
    named_call(node, Rule::REPLACE)
}

pub(super) fn regex_expression(node: &Node) -> Layout<'_> {
    named_call(node, Rule::REGEX)
}

pub(super) fn exists_func(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.token(cursor.token(Rule::EXISTS)?)
        .space()
        .node(cursor.node(Rule::group_graph_pattern)?);
    cursor.finish()?;
    Ok(plan)
}

pub(super) fn not_exists_func(node: &Node) -> Layout<'_> {
    let mut cursor = Cursor::new(node);
    let mut plan = Plan::new();
    plan.token(cursor.token(Rule::NOT)?)
        .space()
        .token(cursor.token(Rule::EXISTS)?)
        .space()
        .node(cursor.node(Rule::group_graph_pattern)?);
    cursor.finish()?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use crate::serializer::format_tree;
    use crate::syntax::parse_query;

    fn filter(expr: &str) -> String {
        let text = format!("ASK {{ FILTER ( {expr} ) }}");
        let out = format_tree(&parse_query(&text).unwrap()).unwrap();
        out.trim_start_matches("ASK {\n  FILTER (")
            .trim_end_matches(")\n}\n")
            .to_string()
    }

    #[test]
    fn binary_operators_are_spaced() {
        assert_eq!(filter("?a<3&&?b>=?c||!?d"), "?a < 3 && ?b >= ?c || !?d");
        assert_eq!(filter("?a*2+?b/4"), "?a * 2 + ?b / 4");
    }

    #[test]
    fn signs_stay_with_their_literals() {
        assert_eq!(filter("?a -5"), "?a -5");
        assert_eq!(filter("?a - 5"), "?a - 5");
        assert_eq!(filter("- 5 = -5"), "- 5 = -5");
        assert_eq!(filter("-?x"), "-?x");
    }

    #[test]
    fn calls_are_glued() {
        assert_eq!(
            filter("REGEX( STR( ?x ) , \"^a\" , \"i\" )"),
            "REGEX(STR(?x), \"^a\", \"i\")"
        );
        assert_eq!(filter("bound(?x) && now( ) > ?t"), "bound(?x) && now( ) > ?t");
        assert_eq!(filter("<http://f>( DISTINCT ?x , 2 )"), "<http://f>(DISTINCT ?x, 2)");
        assert_eq!(filter("COALESCE(?x, 1) IN ( 1 , 2 )"), "COALESCE(?x, 1) IN (1, 2)");
        assert_eq!(filter("?x NOT IN ()"), "?x NOT IN ()");
    }

    #[test]
    fn exists_keeps_its_pattern() {
        assert_eq!(
            filter("NOT EXISTS { ?s ?p ?o }"),
            "NOT EXISTS {\n    ?s ?p ?o .\n  }"
        );
    }
}
