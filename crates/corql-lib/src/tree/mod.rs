//! Generic parse trees handed to the walkers.
//!
//! Every source language is parsed by an external grammar into nodes that
//! carry a category label, their literal text, and ordered children.
//! [`ParseTree`] is the read-only view the walkers need; [`ParseNode`] is an
//! owned implementation, built directly or read from the bracketed notation
//! in [`notation`].

pub mod notation;


use std::borrow::Cow;
use std::fmt;

pub use notation::NotationError;

/// Read-only access to one node of an externally produced parse tree.
///
/// Leaves (terminals) report their literal as both category and text.
pub trait ParseTree: Sized {
    fn category(&self) -> &str;

    /// Concatenated text of all leaves below this node.
    fn text(&self) -> Cow<'_, str>;

    fn child_count(&self) -> usize;

    fn child(&self, index: usize) -> Option<&Self>;

    fn children(&self) -> impl Iterator<Item = &Self> {
        (0..self.child_count()).filter_map(|i| self.child(i))
    }

    fn is_leaf(&self) -> bool {
        self.child_count() == 0
    }

    fn is(&self, category: &str) -> bool {
        self.category() == category
    }

    /// First direct child with the given category.
    fn first_child(&self, category: &str) -> Option<&Self> {
        self.children().find(|c| c.is(category))
    }

    /// All direct children with the given category, in order.
    fn children_with<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Self> {
        self.children().filter(move |c| c.is(category))
    }

    fn has_child(&self, category: &str) -> bool {
        self.first_child(category).is_some()
    }

    /// Number of leading direct children with the given category.
    fn leading_count(&self, category: &str) -> usize {
        self.children().take_while(|c| c.is(category)).count()
    }

    /// Depth-first search below this node (excluding itself).
    fn find_descendant(&self, category: &str) -> Option<&Self> {
        for child in self.children() {
            if child.is(category) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(category) {
                return Some(found);
            }
        }
        None
    }

    /// Children that are not leaves, skipping punctuation and keywords.
    fn inner_children(&self) -> impl Iterator<Item = &Self> {
        self.children().filter(|c| !c.is_leaf())
    }
}

/// Owned parse tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode {
    category: String,
    text: String,
    children: Vec<ParseNode>,
}

impl ParseNode {
    /// Terminal whose category and text are both `literal`.
    pub fn leaf(literal: impl Into<String>) -> Self {
        let literal = literal.into();
        Self {
            category: literal.clone(),
            text: literal,
            children: Vec::new(),
        }
    }

    /// Rule node; its text is the concatenation of the children's texts.
    pub fn inner(category: impl Into<String>, children: Vec<ParseNode>) -> Self {
        let text = children.iter().map(|c| c.text.as_str()).collect();
        Self {
            category: category.into(),
            text,
            children,
        }
    }

    /// Reads a tree from its bracketed notation.
    pub fn parse(notation: &str) -> Result<Self, NotationError> {
        notation::parse(notation)
    }
}

impl ParseTree for ParseNode {
    fn category(&self) -> &str {
        &self.category
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }
}

/// Strips one pair of matching surrounding quotes, if present.
pub(crate) fn unquote(text: &str) -> String {
    let text = text.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.to_owned();
        }
    }
    text.to_owned()
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.children.is_empty() && self.category == self.text {
            return notation::write_literal(f, &self.text);
        }
        f.write_str("(")?;
        notation::write_literal(f, &self.category)?;
        for child in &self.children {
            write!(f, " {child}")?;
        }
        f.write_str(")")
    }
}
