//! Terms and boolean term groups inside `[...]`.

use corql_core::{BoolRelation, Match, Term, TermExpr, TermGroup, TermType};

use crate::tree::{ParseTree, unquote};

/// `!`* (foundry `/`)? (layer termOp)? key flag?
pub(super) fn term<T: ParseTree>(node: &T) -> TermExpr {
    let negations = node.children_with("!").count();
    let foundry = node.first_child("foundry").map(|f| f.text().into_owned());
    let layer = match node.first_child("layer").map(|l| l.text().into_owned()) {
        Some(layer) if layer == "base" => "lemma".to_owned(),
        Some(layer) => layer,
        None => "orth".to_owned(),
    };
    let op = match node.first_child("termOp").map(|op| op.text().into_owned()) {
        Some(op) if op == "!=" => Match::Ne,
        _ => Match::Eq,
    };

    let base = Term::new().maybe_foundry(foundry).layer(layer).matching(op);
    let term = match node.first_child("key") {
        Some(key) => keyed(base, key, node.first_child("flag")),
        None => base,
    };
    term.negate_by(negations).into()
}

/// Orthographic term for a bare `key flag?` token.
pub(super) fn orth<T: ParseTree>(key: &T, flag: Option<&T>) -> TermExpr {
    let base = Term::new().layer("orth").matching(Match::Eq);
    keyed(base, key, flag).into()
}

fn keyed<T: ParseTree>(term: Term, key: &T, flag: Option<&T>) -> Term {
    let (value, regex) = match key.find_descendant("regex") {
        Some(regex) => (unquote(&regex.text()), true),
        None => (unquote(&key.text()), false),
    };
    let mut term = term.key(value);
    if regex {
        term = term.typed(TermType::Regex);
    }
    match flag {
        Some(flag) => apply_flags(term, &flag.text()),
        None => term,
    }
}

/// `i`/`I` set case sensitivity; `x` turns the key into a substring regex.
fn apply_flags(mut term: Term, flags: &str) -> Term {
    for flag in flags.trim_start_matches('/').chars() {
        match flag {
            'i' => term = term.case_insensitive(true),
            'I' => term = term.case_insensitive(false),
            'x' => {
                let key = term.key.take().unwrap_or_default();
                let pattern = if term.term_type == Some(TermType::Regex) {
                    key
                } else {
                    regex::escape(&key)
                };
                term = term.key(format!(".*?{pattern}.*?")).typed(TermType::Regex);
            }
            _ => {}
        }
    }
    term
}

/// `operand boolOp operand`, where operands are terms or groups.
///
/// A parenthesised operand stays nested; an unparenthesised group with the
/// same operator is flattened into this one.
pub(super) fn term_group<T: ParseTree>(node: &T) -> TermExpr {
    let relation = match node.first_child("boolOp") {
        Some(op) if op.text().contains('|') => BoolRelation::Or,
        _ => BoolRelation::And,
    };

    let mut group = TermGroup::new(relation);
    let mut parenthesised = false;
    for child in node.children() {
        match child.category() {
            "(" => parenthesised = true,
            "term" => {
                group.push(term(child));
                parenthesised = false;
            }
            "termGroup" => {
                match term_group(child) {
                    TermExpr::TermGroup(inner) if !parenthesised && inner.relation == relation => {
                        group.operands.extend(inner.operands)
                    }
                    inner => group.push(inner),
                }
                parenthesised = false;
            }
            _ => {}
        }
    }

    let negations = node.children_with("!").count();
    negate(group.into(), negations)
}

/// Negation parity over a whole expression, pushed down to the terms.
pub(super) fn negate(expr: TermExpr, negations: usize) -> TermExpr {
    if negations % 2 == 0 {
        return expr;
    }
    match expr {
        TermExpr::Term(term) => term.negate_by(1).into(),
        TermExpr::TermGroup(group) => {
            let relation = match group.relation {
                BoolRelation::And => BoolRelation::Or,
                BoolRelation::Or => BoolRelation::And,
            };
            let operands = group.operands.into_iter().map(|e| negate(e, 1)).collect();
            TermGroup::with_operands(relation, operands).into()
        }
    }
}
