//! Layout plans: what one production expands to on the serializer worklist.

use crate::syntax::{Child, Node, Token};

use super::cursor::ContractViolation;

/// One unit of serializer work.
///
/// `Node` items are expanded by their production's layout; everything else is
/// handed to the emitter as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step<'t> {
    Node(&'t Node),
    Token(&'t Token),
    /// Punctuation the tree keeps implicit, such as braces and separators.
    Text(&'static str),
    Space,
    Newline,
    BlankLine,
    Indent,
    Dedent,
}

pub(crate) type Layout<'t> = Result<Plan<'t>, ContractViolation>;

/// Ordered steps produced by one layout function.
#[derive(Debug, Default)]
pub(crate) struct Plan<'t> {
    steps: Vec<Step<'t>>,
}

impl<'t> Plan<'t> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn into_steps(self) -> Vec<Step<'t>> {
        self.steps
    }

    pub fn child(&mut self, child: &'t Child) -> &mut Self {
        match child {
            Child::Node(node) => self.node(node),
            Child::Token(token) => self.token(token),
        }
    }

    pub fn node(&mut self, node: &'t Node) -> &mut Self {
        self.steps.push(Step::Node(node));
        self
    }

    pub fn token(&mut self, token: &'t Token) -> &mut Self {
        self.steps.push(Step::Token(token));
        self
    }

    pub fn text(&mut self, text: &'static str) -> &mut Self {
        self.steps.push(Step::Text(text));
        self
    }

    pub fn space(&mut self) -> &mut Self {
        self.steps.push(Step::Space);
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.steps.push(Step::Newline);
        self
    }

    pub fn blank_line(&mut self) -> &mut Self {
        self.steps.push(Step::BlankLine);
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.steps.push(Step::Indent);
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.steps.push(Step::Dedent);
        self
    }

    /// Children separated by single spaces.
    pub fn spaced<I>(&mut self, children: I) -> &mut Self
    where
        I: IntoIterator<Item = &'t Child>,
    {
        self.separated(children, &[Step::Space])
    }

    /// Children glued together by `sep`, as in `a|b` or `a/b`.
    pub fn glued<I>(&mut self, children: I, sep: &'static str) -> &mut Self
    where
        I: IntoIterator<Item = &'t Child>,
    {
        self.separated(children, &[Step::Text(sep)])
    }

    /// Children as a comma list, `a, b, c`.
    pub fn listed<I>(&mut self, children: I) -> &mut Self
    where
        I: IntoIterator<Item = &'t Child>,
    {
        self.separated(children, &[Step::Text(","), Step::Space])
    }

    /// Children one per line.
    pub fn lines<I>(&mut self, children: I) -> &mut Self
    where
        I: IntoIterator<Item = &'t Child>,
    {
        self.separated(children, &[Step::Newline])
    }

    /// Children one per line, each closed by ` .`.
    pub fn statements<I>(&mut self, children: I) -> &mut Self
    where
        I: IntoIterator<Item = &'t Child>,
    {
        for (i, child) in children.into_iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.child(child).space().text(".");
        }
        self
    }

    /// A braced, indented body; `{}` when there is nothing inside.
    pub fn block(&mut self, body: Option<&'t Node>) -> &mut Self {
        match body {
            Some(body) if !body.is_empty() => self
                .text("{")
                .indent()
                .newline()
                .node(body)
                .dedent()
                .newline()
                .text("}"),
            _ => self.text("{}"),
        }
    }

    fn separated<I>(&mut self, children: I, sep: &[Step<'t>]) -> &mut Self
    where
        I: IntoIterator<Item = &'t Child>,
    {
        for (i, child) in children.into_iter().enumerate() {
            if i > 0 {
                self.steps.extend_from_slice(sep);
            }
            self.child(child);
        }
        self
    }
}
