//! Checked, left-to-right access to the children of one node.
//!
//! Layout functions never index into a child list. They walk it with a
//! [`Cursor`] that names the rules acceptable at each step, so a tree shape the
//! layout does not know about surfaces as a [`ContractViolation`] instead of a
//! panic or silently dropped output.

use thiserror::Error;

use crate::syntax::{Child, Node, Rule, Token};

/// The serializer met a tree it has no layout for.
///
/// Always a defect: the grammar produced a shape the serializer was not taught.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("`{parent:?}` has an unexpected `{found:?}` child at index {index} (expected one of {expected:?})")]
    UnexpectedChild {
        parent: Rule,
        found: Rule,
        index: usize,
        expected: Vec<Rule>,
    },
    #[error("`{parent:?}` is missing a child at index {index} (expected one of {expected:?})")]
    MissingChild {
        parent: Rule,
        index: usize,
        expected: Vec<Rule>,
    },
    #[error("`{rule:?}` is a terminal or trivia rule, not a production")]
    NotAProduction { rule: Rule },
}

pub(crate) struct Cursor<'t> {
    parent: Rule,
    children: &'t [Child],
    index: usize,
}

impl<'t> Cursor<'t> {
    pub fn new(node: &'t Node) -> Self {
        Self {
            parent: node.rule(),
            children: node.children(),
            index: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.index >= self.children.len()
    }

    /// Takes the next child, which must be one of `expected`.
    pub fn next(&mut self, expected: &[Rule]) -> Result<&'t Child, ContractViolation> {
        match self.children.get(self.index) {
            Some(child) if expected.contains(&child.rule()) => {
                self.index += 1;
                Ok(child)
            }
            Some(child) => Err(ContractViolation::UnexpectedChild {
                parent: self.parent,
                found: child.rule(),
                index: self.index,
                expected: expected.to_vec(),
            }),
            None => Err(ContractViolation::MissingChild {
                parent: self.parent,
                index: self.index,
                expected: expected.to_vec(),
            }),
        }
    }

    pub fn node(&mut self, rule: Rule) -> Result<&'t Node, ContractViolation> {
        let index = self.index;
        match self.next(&[rule])? {
            Child::Node(node) => Ok(node),
            Child::Token(token) => Err(self.misplaced(token.rule, index, rule)),
        }
    }

    pub fn token(&mut self, rule: Rule) -> Result<&'t Token, ContractViolation> {
        let index = self.index;
        match self.next(&[rule])? {
            Child::Token(token) => Ok(token),
            Child::Node(node) => Err(self.misplaced(node.rule(), index, rule)),
        }
    }

    /// Takes the next child only if it is one of `expected`.
    pub fn opt(&mut self, expected: &[Rule]) -> Option<&'t Child> {
        let child = self.children.get(self.index)?;
        if expected.contains(&child.rule()) {
            self.index += 1;
            Some(child)
        } else {
            None
        }
    }

    pub fn opt_node(&mut self, rule: Rule) -> Option<&'t Node> {
        match self.children.get(self.index) {
            Some(Child::Node(node)) if node.rule() == rule => {
                self.index += 1;
                Some(node)
            }
            _ => None,
        }
    }

    /// Takes children while they are one of `expected`.
    pub fn many(&mut self, expected: &[Rule]) -> Vec<&'t Child> {
        let mut taken = Vec::new();
        while let Some(child) = self.opt(expected) {
            taken.push(child);
        }
        taken
    }

    /// Takes every remaining child; each must be one of `expected`.
    pub fn rest(&mut self, expected: &[Rule]) -> Result<Vec<&'t Child>, ContractViolation> {
        let mut taken = Vec::new();
        while !self.is_done() {
            taken.push(self.next(expected)?);
        }
        Ok(taken)
    }

    /// Fails if any child was left unconsumed.
    pub fn finish(self) -> Result<(), ContractViolation> {
        match self.children.get(self.index) {
            Some(child) => Err(ContractViolation::UnexpectedChild {
                parent: self.parent,
                found: child.rule(),
                index: self.index,
                expected: Vec::new(),
            }),
            None => Ok(()),
        }
    }

    fn misplaced(&self, found: Rule, index: usize, expected: Rule) -> ContractViolation {
        ContractViolation::UnexpectedChild {
            parent: self.parent,
            found,
            index,
            expected: vec![expected],
        }
    }
}
