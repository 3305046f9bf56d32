//! Library-style boolean language.
//!
//! Only term-only searches and `and`/`or` combinations are accepted. The
//! protocol answers with a single diagnostic, so walking stops at the first
//! error.


use corql_core::{Boundary, Distance, Group, Match, Term, Token};

use crate::WalkResult;
use crate::context::{Context, Walk};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::query::CompileOptions;
use crate::tree::{ParseTree, unquote};

pub const VERSIONS: [&str; 2] = ["1.1", "1.2"];
pub const DEFAULT_VERSION: &str = "1.2";

const INDEXES: [&str; 2] = ["cql.serverChoice", "words"];
const COMPARITORS: [&str; 3] = ["=", "exact", "scr"];

/// Rejects protocol versions other than 1.1 and 1.2; absent means 1.2.
pub fn check_version(options: &CompileOptions, diagnostics: &mut Diagnostics) {
    let version = options.version.as_deref().unwrap_or(DEFAULT_VERSION);
    if !VERSIONS.contains(&version) {
        diagnostics
            .report(DiagnosticKind::UnsupportedVersion)
            .message("1.1 and 1.2")
            .emit();
    }
}

/// Compiles a CQL parse tree.
pub fn compile<T: ParseTree>(tree: &T, options: &CompileOptions) -> WalkResult {
    let mut walker = CqlWalker {
        ctx: Context::new(),
        diagnostics: Diagnostics::new(),
        case_sensitive: options.case_sensitive,
    };
    walker.visit(|this| this.walk(tree));
    if walker.diagnostics.has_errors() {
        return (None, walker.diagnostics);
    }
    (walker.ctx.finish(), walker.diagnostics)
}

struct CqlWalker {
    ctx: Context,
    diagnostics: Diagnostics,
    case_sensitive: bool,
}

impl Walk for CqlWalker {
    fn context(&mut self) -> &mut Context {
        &mut self.ctx
    }
}

impl CqlWalker {
    fn walk<T: ParseTree>(&mut self, node: &T) {
        if node.is_leaf() || self.diagnostics.has_errors() {
            return;
        }
        match node.category() {
            "searchClause" => self.search_clause(node),
            "triple" => self.triple(node),
            "prefixAssignment" | "sortedQuery" | "sortSpec" => self.unsupported(),
            _ => {
                for child in node.inner_children() {
                    self.walk(child);
                }
            }
        }
    }

    /// `(` cqlQuery `)` | (index relation)? term
    fn search_clause<T: ParseTree>(&mut self, node: &T) {
        if let Some(nested) = node.first_child("cqlQuery") {
            self.walk(nested);
            return;
        }
        if let Some(index) = node.first_child("index") {
            let index = index.text();
            if !INDEXES.contains(&index.trim()) {
                self.diagnostics
                    .report(DiagnosticKind::UnsupportedIndex)
                    .message(index.trim())
                    .emit();
                return;
            }
        }

        if let Some(relation) = node.first_child("relation") {
            if let Some(comparitor) = relation.first_child("comparitor") {
                let comparitor = comparitor.text();
                if !COMPARITORS.contains(&comparitor.trim()) {
                    self.diagnostics
                        .report(DiagnosticKind::UnsupportedRelation)
                        .message(comparitor.trim())
                        .emit();
                    return;
                }
            }
            if let Some(modifier) = relation.find_descendant("modifier") {
                self.diagnostics
                    .report(DiagnosticKind::UnsupportedRelationModifier)
                    .message(modifier_name(modifier))
                    .emit();
                return;
            }
        }

        let term = node
            .first_child("term")
            .map(|t| unquote(&t.text()))
            .unwrap_or_default();
        let words: Vec<&str> = term.split_whitespace().collect();
        match words.as_slice() {
            [] => self
                .diagnostics
                .report(DiagnosticKind::EmptyQuery)
                .message("term")
                .emit(),
            [word] => {
                let token = self.word(word);
                self.ctx.attach(token, 0);
            }
            _ => self.visit(|this| {
                this.ctx.open_container(Group::sequence());
                for word in &words {
                    let token = this.word(word);
                    this.ctx.attach(token, 0);
                }
            }),
        }
    }

    /// operand boolean operand
    fn triple<T: ParseTree>(&mut self, node: &T) {
        let Some(boolean) = node.first_child("boolean") else {
            self.unsupported();
            return;
        };
        if let Some(modifier) = boolean.find_descendant("modifier") {
            self.diagnostics
                .report(DiagnosticKind::UnsupportedRelationModifier)
                .message(modifier_name(modifier))
                .emit();
            return;
        }

        let operator = boolean
            .children()
            .next()
            .map(|op| op.text().to_lowercase())
            .unwrap_or_default();
        let group = match operator.as_str() {
            "and" => Group::sequence()
                .in_order(false)
                .distance(Distance::new("s", Boundary::exact(0))),
            "or" => Group::disjunction(),
            _ => {
                self.unsupported();
                return;
            }
        };

        self.visit(|this| {
            this.ctx.open_container(group);
            for operand in node.inner_children().filter(|c| !c.is("boolean")) {
                this.visit(|this| this.walk(operand));
            }
        });
    }

    fn word(&self, word: &str) -> Token {
        let mut term = Term::new().key(word).layer("orth").matching(Match::Eq);
        if !self.case_sensitive {
            term = term.case_insensitive(true);
        }
        Token::wrapping(term)
    }

    fn unsupported(&mut self) {
        self.diagnostics
            .report(DiagnosticKind::UnsupportedQueryElement)
            .emit();
    }
}

/// `/name` or `/name=value`, reported by name.
fn modifier_name<T: ParseTree>(modifier: &T) -> String {
    match modifier.first_child("modifierName") {
        Some(name) => name.text().trim().to_owned(),
        None => modifier.text().trim().trim_start_matches('/').to_owned(),
    }
}
