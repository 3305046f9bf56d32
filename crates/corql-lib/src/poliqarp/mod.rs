//! Token/sequence language front end.
//!
//! Queries are sequences of segments: tokens (`[base=Haus & pos=NN]`),
//! spans (`<s>`), classes (`{1:[]}`), position operators
//! (`contains(<s>, [Mann])`), focus (`focus(1: ...)`), and `|` alternatives.

mod terms;


use corql_core::{Frame, Group, Operation, Reference, SYNTHETIC_CLASS_FLOOR, Span, Token};

use crate::WalkResult;
use crate::context::{Context, Walk};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::tree::ParseTree;

/// Compiles a token/sequence parse tree.
pub fn compile<T: ParseTree>(tree: &T) -> WalkResult {
    let mut walker = PoliqarpWalker::default();
    walker.visit(|this| this.walk(tree));
    if walker.diagnostics.has_errors() {
        return (None, walker.diagnostics);
    }
    (walker.ctx.finish(), walker.diagnostics)
}

#[derive(Default)]
struct PoliqarpWalker {
    ctx: Context,
    diagnostics: Diagnostics,
}

impl Walk for PoliqarpWalker {
    fn context(&mut self) -> &mut Context {
        &mut self.ctx
    }
}

impl PoliqarpWalker {
    fn walk<T: ParseTree>(&mut self, node: &T) {
        if node.is_leaf() {
            return;
        }
        match node.category() {
            "query" | "sequence" => {
                let segments: Vec<&T> = node.inner_children().collect();
                self.sequence(&segments);
            }
            "token" => self.ctx.attach(token(node), 0),
            "span" => self.ctx.attach(span(node), 0),
            "disjunction" => self.disjunction(node),
            "class" => self.class(node),
            "position" => self.position(node),
            "focus" | "shrink" => self.focus(node),
            _ => {
                for child in node.inner_children() {
                    self.walk(child);
                }
            }
        }
    }

    /// Two or more segments fold into one flat sequence.
    fn sequence<T: ParseTree>(&mut self, segments: &[&T]) {
        match segments {
            [] => {}
            [single] => self.walk(*single),
            _ => self.visit(|this| {
                this.ctx.open_container(Group::sequence());
                for segment in segments {
                    this.visit(|this| this.walk(*segment));
                }
            }),
        }
    }

    fn disjunction<T: ParseTree>(&mut self, node: &T) {
        self.visit(|this| {
            this.ctx.open_container(Group::disjunction());
            for alternative in node.inner_children() {
                this.visit(|this| this.walk(alternative));
            }
        });
    }

    /// `{` (classId `:`)? segment+ `}`
    fn class<T: ParseTree>(&mut self, node: &T) {
        let Some(id) = self.class_id(node) else {
            return;
        };
        let mut group = Group::new(Operation::Class);
        group.class_out = Some(id);

        let segments: Vec<&T> = node.inner_children().filter(|c| !c.is("classId")).collect();
        self.visit(|this| {
            this.ctx.open_container(group);
            this.sequence(&segments);
        });
    }

    /// posOp `(` segment `,` segment `)`
    fn position<T: ParseTree>(&mut self, node: &T) {
        let op = node
            .first_child("posOp")
            .map(|op| op.text().to_lowercase())
            .unwrap_or_default();
        let frames = match op.as_str() {
            "contains" => vec![Frame::IsAround],
            "startswith" => vec![Frame::StartsWith],
            "endswith" => vec![Frame::EndsWith],
            "matches" => vec![Frame::Matches],
            "overlaps" => vec![Frame::OverlapsLeft, Frame::OverlapsRight],
            _ => {
                self.diagnostics
                    .report(DiagnosticKind::UnknownQueryElement)
                    .message(format!("Unknown position operator '{op}'."))
                    .emit();
                return;
            }
        };

        self.visit(|this| {
            this.ctx.open_container(Group::position(frames));
            for operand in node.inner_children().filter(|c| !c.is("posOp")) {
                this.visit(|this| this.walk(operand));
            }
        });
    }

    /// `focus` `(` (classId `:`)? segment `)`
    fn focus<T: ParseTree>(&mut self, node: &T) {
        let Some(id) = self.class_id(node) else {
            return;
        };
        let segments: Vec<&T> = node.inner_children().filter(|c| !c.is("classId")).collect();
        self.visit(|this| {
            this.ctx.open_container(Reference::focus(id));
            this.sequence(&segments);
        });
    }

    /// Explicit class number, 0 when absent; `None` after reporting.
    fn class_id<T: ParseTree>(&mut self, node: &T) -> Option<u32> {
        let Some(class) = node.first_child("classId") else {
            return Some(0);
        };
        let text = class.text();
        match text.trim().parse::<u32>() {
            Ok(id) if id < SYNTHETIC_CLASS_FLOOR => Some(id),
            _ => {
                self.diagnostics
                    .report(DiagnosticKind::InvalidClassReference)
                    .message(text.trim())
                    .emit();
                None
            }
        }
    }
}

/// `!`* `[` (term | termGroup)? `]`, or a bare `key flag?`.
fn token<T: ParseTree>(node: &T) -> Token {
    let negations = node.children_with("!").count();
    let wrap = if let Some(term) = node.first_child("term") {
        terms::term(term)
    } else if let Some(group) = node.first_child("termGroup") {
        terms::term_group(group)
    } else if let Some(key) = node.first_child("key") {
        terms::orth(key, node.first_child("flag"))
    } else {
        return Token::new();
    };
    Token::wrapping(terms::negate(wrap, negations))
}

/// `<` (foundry `/`)? (layer `=`)? key `>`
fn span<T: ParseTree>(node: &T) -> Span {
    let foundry = node.first_child("foundry").map(|f| f.text().into_owned());
    let mut span = Span::new().maybe_foundry(foundry);
    if let Some(layer) = node.first_child("layer") {
        span = span.layer(layer.text());
    }
    if let Some(key) = node.first_child("key") {
        span = span.key(key.text());
    }
    span
}
