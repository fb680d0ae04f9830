//! Concrete syntax tree produced by the parser.
//!
//! Every interior node carries the production that matched it and its ordered
//! children; every leaf carries the terminal rule and the exact matched text.
//! Two trees are equal when they have the same shape and the same token text,
//! which is what round-trip checks compare. Spans are deliberately not stored
//! so that trees parsed from differently formatted text can compare equal.

use std::fmt;

use pest::iterators::{Pair, Pairs};
use serde::{Serialize, Serializer};

use crate::syntax::Rule;

/// One production instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    #[serde(serialize_with = "serialize_rule")]
    rule: Rule,
    children: Vec<Child>,
}

/// One terminal match with its source spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(serialize_with = "serialize_rule")]
    pub rule: Rule,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Child {
    Node(Node),
    Token(Token),
}

impl Child {
    pub fn rule(&self) -> Rule {
        match self {
            Child::Node(node) => node.rule,
            Child::Token(token) => token.rule,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Child::Node(node) => Some(node),
            Child::Token(_) => None,
        }
    }
}

impl Node {
    pub fn new(rule: Rule, children: Vec<Child>) -> Self {
        Self { rule, children }
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child nodes, skipping tokens.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(Child::as_node)
    }

    /// All tokens below this node in document order.
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens {
            stack: vec![self.children.iter()],
        }
    }

    pub fn first_token(&self) -> Option<&Token> {
        self.tokens().next()
    }

    /// Token texts joined by single spaces.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for token in self.tokens() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&token.text);
        }
        out
    }

    /// Indented one-line-per-element rendering used by the `tree` command.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(usize, &Child)> = Vec::new();
        out.push_str(&format!("{:?}\n", self.rule));
        for child in self.children.iter().rev() {
            stack.push((1, child));
        }
        while let Some((depth, child)) = stack.pop() {
            let pad = "  ".repeat(depth);
            match child {
                Child::Token(token) => {
                    out.push_str(&format!("{pad}{:?} {:?}\n", token.rule, token.text));
                }
                Child::Node(node) => {
                    out.push_str(&format!("{pad}{:?}\n", node.rule));
                    for grandchild in node.children.iter().rev() {
                        stack.push((depth + 1, grandchild));
                    }
                }
            }
        }
        out
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(1usize, self)];
        while let Some((depth, node)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.nodes().map(|child| (depth + 1, child)));
        }
        deepest
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.outline())
    }
}

/// Depth-first token iterator, see [`Node::tokens`].
pub struct Tokens<'a> {
    stack: Vec<std::slice::Iter<'a, Child>>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a Token;

    fn next(&mut self) -> Option<&'a Token> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(Child::Token(token)) => return Some(token),
                Some(Child::Node(node)) => self.stack.push(node.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

// ============================================================================
// CONVERSION FROM PEST PAIRS
// ============================================================================

struct Frame<'i> {
    rule: Rule,
    children: Vec<Child>,
    pending: Pairs<'i, Rule>,
}

impl<'i> Frame<'i> {
    fn open(pair: Pair<'i, Rule>) -> Self {
        Self {
            rule: pair.as_rule(),
            children: Vec::new(),
            pending: pair.into_inner(),
        }
    }

    fn close(self) -> Node {
        Node::new(self.rule, self.children)
    }
}

/// Builds a tree from the root pair of a successful parse.
///
/// Walks the pair tree with an explicit stack, so input nesting depth costs
/// heap rather than call stack.
pub(crate) fn build(root: Pair<'_, Rule>) -> Node {
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut current = Frame::open(root);
    loop {
        match current.pending.next() {
            Some(pair) if pair.as_rule() == Rule::EOI => {}
            Some(pair) if is_terminal(pair.as_rule()) => {
                current.children.push(Child::Token(Token {
                    rule: pair.as_rule(),
                    text: pair.as_str().to_owned(),
                }));
            }
            Some(pair) => {
                let parent = std::mem::replace(&mut current, Frame::open(pair));
                stack.push(parent);
            }
            None => {
                let node = current.close();
                match stack.pop() {
                    Some(parent) => {
                        current = parent;
                        current.children.push(Child::Node(node));
                    }
                    None => return node,
                }
            }
        }
    }
}

/// Rules that become [`Token`] leaves.
pub fn is_terminal(rule: Rule) -> bool {
    matches!(
        rule,
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
    )
}

/// Numeric terminals, signed or not.
pub fn is_numeric(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::INTEGER
            | Rule::DECIMAL
            | Rule::DOUBLE
            | Rule::INTEGER_POSITIVE
            | Rule::DECIMAL_POSITIVE
            | Rule::DOUBLE_POSITIVE
            | Rule::INTEGER_NEGATIVE
            | Rule::DECIMAL_NEGATIVE
            | Rule::DOUBLE_NEGATIVE
    )
}

fn serialize_rule<S: Serializer>(rule: &Rule, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{rule:?}"))
}
