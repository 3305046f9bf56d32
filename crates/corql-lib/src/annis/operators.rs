//! Binary operators between node references.

use corql_core::{
    BoolRelation, Boundary, Frame, Match, Relation, Term, TermExpr, TermGroup, TermType,
};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::tree::ParseTree;

/// Categories that denote an operator inside a relation chain.
pub(super) const OPERATORS: &[&str] = &[
    "precedence",
    "near",
    "dominance",
    "pointing",
    "commonParent",
    "spanRelation",
    "identity",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Operator {
    Sequence {
        in_order: bool,
        distance: Option<Boundary>,
    },
    Dominance {
        relation: Relation,
        anchor: Option<Frame>,
    },
    Pointing(Relation),
    CommonParent(Boundary),
    Frames(Vec<Frame>),
}

pub(super) fn is_operator<T: ParseTree>(node: &T) -> bool {
    OPERATORS.contains(&node.category())
}

/// Reads one operator node; reports and returns `None` when it is unusable.
pub(super) fn parse_operator<T: ParseTree>(
    node: &T,
    diagnostics: &mut Diagnostics,
) -> Option<Operator> {
    match node.category() {
        "precedence" | "near" => {
            let distance = if node.has_child("*") {
                Some(Boundary::at_least(0))
            } else {
                range_spec(node, diagnostics)?
            };
            Some(Operator::Sequence {
                in_order: node.is("precedence"),
                distance,
            })
        }
        "dominance" => {
            let boundary = if node.has_child("*") {
                Boundary::at_least(0)
            } else {
                range_spec(node, diagnostics)?.unwrap_or(Boundary::exact(1))
            };
            let constituent = Term::new().layer("c");
            let wrap = match edge_labels(node) {
                Some(mut labels) => {
                    labels.push(constituent.into());
                    TermGroup::with_operands(BoolRelation::And, labels).into()
                }
                None => TermExpr::from(constituent),
            };
            let anchor = match node.first_child("edgeAnchor") {
                None => None,
                Some(anchor) => Some(edge_anchor(anchor, diagnostics)?),
            };
            Some(Operator::Dominance {
                relation: Relation::new(wrap).bounded(Some(boundary)),
                anchor,
            })
        }
        "pointing" => {
            let (foundry, layer) = match node.first_child("qName") {
                Some(name) => split_qualified(&name.text()),
                None => {
                    diagnostics
                        .report(DiagnosticKind::UnknownQueryElement)
                        .message("Pointing relation without a type.")
                        .emit();
                    return None;
                }
            };
            let base = Term::new().maybe_foundry(foundry).layer(layer);
            let wrap = pointing_wrap(node, base);
            let boundary = if node.has_child("*") {
                Some(Boundary::at_least(0))
            } else {
                range_spec(node, diagnostics)?
            };
            Some(Operator::Pointing(Relation::new(wrap).bounded(boundary)))
        }
        "commonParent" => {
            let boundary = if node.has_child("*") {
                Boundary::at_least(1)
            } else {
                Boundary::exact(1)
            };
            Some(Operator::CommonParent(boundary))
        }
        "spanRelation" => {
            let text = node.text();
            match frames(text.trim()) {
                Some(frames) => Some(Operator::Frames(frames)),
                None => {
                    diagnostics
                        .report(DiagnosticKind::UnknownQueryElement)
                        .message(format!("Unknown operator '{text}'."))
                        .emit();
                    None
                }
            }
        }
        _ => {
            diagnostics
                .report(DiagnosticKind::UnsupportedFeature)
                .message(format!("Operator '{}' is unsupported.", node.text()))
                .emit();
            None
        }
    }
}

/// Frames of a span relation operator.
pub(super) fn frames(operator: &str) -> Option<Vec<Frame>> {
    let frames = match operator {
        "_=_" => vec![Frame::Matches],
        "_i_" => vec![Frame::IsAround],
        "_l_" => vec![Frame::StartsWith, Frame::Matches],
        "_r_" => vec![Frame::EndsWith, Frame::Matches],
        "_o_" => vec![Frame::OverlapsLeft, Frame::OverlapsRight],
        "_ol_" => vec![Frame::OverlapsLeft],
        "_or_" => vec![Frame::OverlapsRight],
        _ => return None,
    };
    Some(frames)
}

fn edge_anchor<T: ParseTree>(node: &T, diagnostics: &mut Diagnostics) -> Option<Frame> {
    let text = node.text();
    match text.trim_start_matches('@') {
        "l" => Some(Frame::StartsWith),
        "r" => Some(Frame::EndsWith),
        other => {
            diagnostics
                .report(DiagnosticKind::UnknownQueryElement)
                .message(format!("Unknown edge anchor '@{other}'."))
                .emit();
            None
        }
    }
}

/// `Some(None)` when the operator carries no range; `None` after reporting.
fn range_spec<T: ParseTree>(node: &T, diagnostics: &mut Diagnostics) -> Option<Option<Boundary>> {
    let Some(spec) = node.first_child("rangeSpec") else {
        return Some(None);
    };
    parse_range(&spec.text(), diagnostics).map(Some)
}

/// `n` or `min,max`.
pub(super) fn parse_range(text: &str, diagnostics: &mut Diagnostics) -> Option<Boundary> {
    let text = text.trim();
    let (min, max) = match text.split_once(',') {
        Some((min, max)) => (min.trim().parse::<u32>(), max.trim().parse::<u32>()),
        None => (text.parse::<u32>(), text.parse::<u32>()),
    };
    let (Ok(min), Ok(max)) = (min, max) else {
        diagnostics
            .report(DiagnosticKind::UnknownQueryElement)
            .message(format!("Invalid range '{text}'."))
            .emit();
        return None;
    };
    let boundary = Boundary::range(min, max);
    if boundary.is_none() {
        diagnostics
            .report(DiagnosticKind::InvalidBoundary)
            .message(format!("{min},{max}"))
            .emit();
    }
    boundary
}

/// Terms of an `[...]` edge specification, in order.
fn edge_labels<T: ParseTree>(node: &T) -> Option<Vec<TermExpr>> {
    let spec = node.first_child("edgeSpec")?;
    let labels: Vec<TermExpr> = spec
        .children_with("edgeAnno")
        .map(|anno| annotation_term(anno).into())
        .collect();
    (!labels.is_empty()).then_some(labels)
}

fn pointing_wrap<T: ParseTree>(node: &T, base: Term) -> TermExpr {
    let Some(spec) = node.first_child("edgeSpec") else {
        return base.into();
    };
    let mut terms: Vec<TermExpr> = spec
        .children_with("edgeAnno")
        .map(|anno| {
            let label = annotation_term(anno);
            let mut term = base.clone();
            term.key = label.key;
            term.match_op = label.match_op;
            term.term_type = label.term_type;
            term.into()
        })
        .collect();
    match terms.len() {
        0 => base.into(),
        1 => terms.remove(0),
        _ => TermGroup::with_operands(BoolRelation::And, terms).into(),
    }
}

/// `qName textOp textSpec` inside an edge specification.
fn annotation_term<T: ParseTree>(anno: &T) -> Term {
    let (foundry, layer) = anno
        .first_child("qName")
        .map(|q| split_qualified(&q.text()))
        .unwrap_or((None, String::new()));
    let mut term = Term::new().maybe_foundry(foundry).layer(layer);
    if let Some(spec) = anno.first_child("textSpec") {
        let (value, regex) = text_spec(&spec.text());
        term = term.key(value).matching(text_op(anno));
        if regex {
            term = term.typed(TermType::Regex);
        }
    }
    term
}

/// `foundry/layer` or `layer`.
pub(super) fn split_qualified(name: &str) -> (Option<String>, String) {
    match name.split_once('/') {
        Some((foundry, layer)) => (Some(foundry.to_owned()), layer.to_owned()),
        None => (None, name.to_owned()),
    }
}

/// Value of a `textSpec` and whether it is a regex.
pub(super) fn text_spec(text: &str) -> (String, bool) {
    let strip = |quote: char| {
        text.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
            .map(str::to_owned)
    };
    if let Some(regex) = strip('/') {
        return (regex, true);
    }
    if let Some(exact) = strip('"') {
        return (exact, false);
    }
    (text.to_owned(), false)
}

/// Match of the node's `textOp` child, `eq` when absent.
pub(super) fn text_op<T: ParseTree>(node: &T) -> Match {
    match node.first_child("textOp").map(|op| op.text().trim().to_owned()) {
        Some(op) if op == "!=" => Match::Ne,
        _ => Match::Eq,
    }
}
