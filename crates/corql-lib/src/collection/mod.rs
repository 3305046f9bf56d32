//! Boolean metadata filter language.
//!
//! A filter is a tree of `&`/`|` relations over field constraints such as
//! `author = Goethe` or `pubDate since 1820`. Each relation becomes a
//! `docGroup`, each constraint a `doc`.

#[cfg(test)]
mod collection_tests;

use std::sync::LazyLock;

use corql_core::{BoolRelation, Doc, DocGroup, Match, TermType};
use regex::Regex;

use crate::WalkResult;
use crate::context::{Context, Walk};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::invariants::ensure_pattern;
use crate::tree::{ParseTree, unquote};

/// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    ensure_pattern(Regex::new(r"^[0-9]{4}(?:-([0-9]{2})(?:-([0-9]{2}))?)?$"))
});

/// Compiles a filter parse tree.
pub fn compile<T: ParseTree>(tree: &T) -> WalkResult {
    let mut walker = CollectionWalker::default();
    walker.visit(|this| this.walk(tree));
    if walker.diagnostics.has_errors() {
        return (None, walker.diagnostics);
    }
    (walker.ctx.finish(), walker.diagnostics)
}

#[derive(Default)]
struct CollectionWalker {
    ctx: Context,
    diagnostics: Diagnostics,
}

impl Walk for CollectionWalker {
    fn context(&mut self) -> &mut Context {
        &mut self.ctx
    }
}

/// Which children of a constraint node carry the operator and the value.
#[derive(Clone, Copy)]
enum Constraint {
    Plain,
    Date,
}

impl CollectionWalker {
    fn walk<T: ParseTree>(&mut self, node: &T) {
        if node.is_leaf() {
            return;
        }
        match node.category() {
            "relation" => self.relation(node),
            "constraint" => self.constraint(node, Constraint::Plain),
            "dateconstraint" => self.constraint(node, Constraint::Date),
            _ => {
                for child in node.inner_children() {
                    self.walk(child);
                }
            }
        }
    }

    /// operand relOp operand
    fn relation<T: ParseTree>(&mut self, node: &T) {
        let relation = match node.first_child("relOp") {
            Some(op) if op.text().contains('|') => BoolRelation::Or,
            _ => BoolRelation::And,
        };
        self.visit(|this| {
            this.ctx.open_container(DocGroup::new(relation));
            for operand in node.inner_children().filter(|c| !c.is("relOp")) {
                this.visit(|this| this.walk(operand));
            }
        });
    }

    fn constraint<T: ParseTree>(&mut self, node: &T, constraint: Constraint) {
        let (op_category, value_category) = match constraint {
            Constraint::Plain => ("operator", "value"),
            Constraint::Date => ("dateOp", "date"),
        };
        let key = node
            .first_child("field")
            .map(|f| f.text().trim().to_owned())
            .unwrap_or_default();
        let op = node
            .first_child(op_category)
            .map(|op| op.text().trim().to_owned())
            .unwrap_or_default();

        let Some(match_op) = match_operator(&op) else {
            self.diagnostics
                .report(DiagnosticKind::UnknownQueryElement)
                .message(format!("Unknown operator '{op}'."))
                .emit();
            return;
        };

        let (value, value_type) = match (constraint, node.first_child(value_category)) {
            (Constraint::Date, Some(date)) => (unquote(&date.text()), Some(TermType::Date)),
            (Constraint::Plain, Some(value)) => parse_value(value),
            (_, None) => (String::new(), None),
        };

        if value_type == Some(TermType::Date) && !is_date(&value) {
            self.diagnostics
                .report(DiagnosticKind::IncompatibleOperatorAndOperand)
                .message(format!("'{value}' is not a valid date."))
                .emit();
            return;
        }

        if value_type != Some(TermType::Date) && !match_op.is_string_operator() {
            self.diagnostics
                .report(DiagnosticKind::IncompatibleOperatorAndOperand)
                .emit();
            return;
        }

        if value_type.is_none() && is_date(&value) {
            self.diagnostics
                .report(DiagnosticKind::DateLikeString)
                .message(format!(
                    "The collection query contains a value that looks like a date ('{value}') \
                     and an operator that is only defined for strings ('{op}'). The value is \
                     interpreted as a string, use a date operator to ensure the value is \
                     treated as a date"
                ))
                .emit();
        }

        tracing::trace!(%key, ?match_op, "doc constraint");
        self.ctx
            .attach(Doc::new(key, value, match_op).typed(value_type), 0);
    }
}

fn match_operator(op: &str) -> Option<Match> {
    let match_op = match op {
        "<" => Match::Lt,
        ">" => Match::Gt,
        "<=" => Match::Leq,
        ">=" => Match::Geq,
        "=" | "in" | "on" => Match::Eq,
        "!=" => Match::Ne,
        "~" => Match::Contains,
        "!~" => Match::Containsnot,
        "until" => Match::Leq,
        "since" => Match::Geq,
        _ => return None,
    };
    Some(match_op)
}

/// `/regex/`, a quoted multiword string, or a single word.
fn parse_value<T: ParseTree>(value: &T) -> (String, Option<TermType>) {
    if let Some(regex) = value.find_descendant("regex") {
        let text = regex.text();
        let text = text.trim();
        let pattern = text
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
            .unwrap_or(text);
        return (pattern.to_owned(), Some(TermType::Regex));
    }
    if let Some(multiword) = value.first_child("multiword") {
        let words: Vec<String> = multiword
            .children()
            .filter(|w| !w.is("\"") && !w.is("'"))
            .map(|w| w.text().into_owned())
            .collect();
        return (words.join(" "), None);
    }
    (unquote(&value.text()), None)
}

/// Matches the date pattern with month at most 12 and day at most 31.
fn is_date(value: &str) -> bool {
    let Some(captures) = DATE.captures(value) else {
        return false;
    };
    let within = |index: usize, max: u32| {
        captures
            .get(index)
            .is_none_or(|m| m.as_str().parse::<u32>().is_ok_and(|n| n <= max))
    };
    within(1, 12) && within(2, 31)
}
