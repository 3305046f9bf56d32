//! Federated-search language (FCS-QL 2.0).
//!
//! Every term is a regular expression over one of three layers (`text`,
//! `lemma`, `pos`), optionally qualified by an annotation source. Like the
//! library-style language, the protocol reports one diagnostic per request.

mod expression;


use corql_core::{Frame, Group, Span, Token};

use crate::WalkResult;
use crate::context::{Context, Walk};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::query::CompileOptions;
use crate::tree::ParseTree;

pub const VERSION: &str = "2.0";

/// Requires version 2.0 to be given explicitly.
pub fn check_version(options: &CompileOptions, diagnostics: &mut Diagnostics) {
    match options.version.as_deref() {
        None => diagnostics.report(DiagnosticKind::MissingVersion).emit(),
        Some(VERSION) => {}
        Some(_) => diagnostics
            .report(DiagnosticKind::UnsupportedVersion)
            .message(VERSION)
            .emit(),
    }
}

/// Compiles an FCS-QL parse tree.
pub fn compile<T: ParseTree>(tree: &T) -> WalkResult {
    let mut walker = FcsqlWalker::default();
    walker.visit(|this| this.walk(tree));
    if walker.diagnostics.has_errors() {
        return (None, walker.diagnostics);
    }
    (walker.ctx.finish(), walker.diagnostics)
}

#[derive(Default)]
struct FcsqlWalker {
    ctx: Context,
    diagnostics: Diagnostics,
}

impl Walk for FcsqlWalker {
    fn context(&mut self) -> &mut Context {
        &mut self.ctx
    }
}

impl FcsqlWalker {
    fn walk<T: ParseTree>(&mut self, node: &T) {
        if node.is_leaf() || self.diagnostics.has_errors() {
            return;
        }
        match node.category() {
            "query" => self.query(node),
            "querySequence" => self.group(node, Group::sequence()),
            "queryDisjunction" => self.group(node, Group::disjunction()),
            "segment" => self.segment(node),
            "regexp" => {
                let term = expression::implicit(node, &mut self.diagnostics);
                if let Some(term) = term {
                    self.ctx.attach(Token::wrapping(term), 0);
                }
            }
            _ => {
                for child in node.inner_children() {
                    self.walk(child);
                }
            }
        }
    }

    /// mainQuery (`within` withinScope)?
    fn query<T: ParseTree>(&mut self, node: &T) {
        let operands: Vec<&T> = node.inner_children().filter(|c| !c.is("within")).collect();
        let Some(within) = node.first_child("within") else {
            for operand in operands {
                self.walk(operand);
            }
            return;
        };

        let scope = within
            .find_descendant("withinScope")
            .map(|s| s.text().trim().to_owned())
            .unwrap_or_default();
        let Some(span) = scope_span(&scope) else {
            self.diagnostics
                .report(DiagnosticKind::UnsupportedQueryElement)
                .message(format!("Within scope {scope} is unsupported."))
                .emit();
            return;
        };

        self.visit(|this| {
            this.ctx.open_container(Group::position(vec![Frame::IsAround]));
            this.ctx.attach(span, 0);
            for operand in operands {
                this.visit(|this| this.walk(operand));
            }
        });
    }

    fn group<T: ParseTree>(&mut self, node: &T, group: Group) {
        self.visit(|this| {
            this.ctx.open_container(group);
            for operand in node.inner_children() {
                this.visit(|this| this.walk(operand));
            }
        });
    }

    /// `[` expression? `]`
    fn segment<T: ParseTree>(&mut self, node: &T) {
        let Some(body) = node.inner_children().next() else {
            self.ctx.attach(Token::new(), 0);
            return;
        };
        if let Some(wrap) = expression::expression(body, 0, &mut self.diagnostics) {
            self.ctx.attach(Token::wrapping(wrap), 0);
        }
    }
}

/// Base annotation span for a `within` scope.
fn scope_span(scope: &str) -> Option<Span> {
    let layer = match scope {
        "s" | "sentence" => "s",
        "p" | "paragraph" => "p",
        "text" => "t",
        _ => return None,
    };
    Some(Span::new().foundry("base").layer(layer).key(layer))
}
