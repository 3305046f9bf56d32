//! Segment expressions: qualified layer terms and their boolean combinations.

use corql_core::{BoolRelation, Match, Term, TermExpr, TermGroup, TermType};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::tree::{ParseTree, unquote};

/// Layer and foundry used for bare regular expressions.
const IMPLICIT_LAYER: &str = "orth";
const IMPLICIT_FOUNDRY: &str = "opennlp";

/// Builds the term expression for `node`, pushing `negations` down to the
/// terms. `None` after reporting a diagnostic.
pub(super) fn expression<T: ParseTree>(
    node: &T,
    negations: usize,
    diagnostics: &mut Diagnostics,
) -> Option<TermExpr> {
    match node.category() {
        "expression" => term(node, negations, diagnostics).map(Into::into),
        "expressionNot" => {
            let inner = operand(node, diagnostics)?;
            expression(inner, negations + 1, diagnostics)
        }
        "expressionAnd" => group(node, BoolRelation::And, negations, diagnostics),
        "expressionOr" => group(node, BoolRelation::Or, negations, diagnostics),
        _ => {
            let inner = operand(node, diagnostics)?;
            expression(inner, negations, diagnostics)
        }
    }
}

/// The single operand of a wrapper node such as `!` or `( )`.
fn operand<'a, T: ParseTree>(node: &'a T, diagnostics: &mut Diagnostics) -> Option<&'a T> {
    let inner = node.inner_children().next();
    if inner.is_none() {
        diagnostics
            .report(DiagnosticKind::UnknownQueryElement)
            .message(format!("Expression '{}' has no operand.", node.text().trim()))
            .emit();
    }
    inner
}

/// Bare `"regex"` in place of a segment.
pub(super) fn implicit<T: ParseTree>(
    regexp: &T,
    diagnostics: &mut Diagnostics,
) -> Option<TermExpr> {
    let term = Term::new()
        .key(pattern(regexp))
        .foundry(IMPLICIT_FOUNDRY)
        .layer(IMPLICIT_LAYER)
        .typed(TermType::Regex)
        .matching(Match::Eq);
    let term = apply_flags(term, regexp.children_with("regexpFlag"), diagnostics)?;
    Some(term.into())
}

/// Operands of a same-relation chain. Negation flips the relation.
fn group<T: ParseTree>(
    node: &T,
    relation: BoolRelation,
    negations: usize,
    diagnostics: &mut Diagnostics,
) -> Option<TermExpr> {
    let relation = match (relation, negations % 2) {
        (BoolRelation::And, 1) => BoolRelation::Or,
        (BoolRelation::Or, 1) => BoolRelation::And,
        (relation, _) => relation,
    };
    let mut group = TermGroup::new(relation);
    for child in node.inner_children() {
        match expression(child, negations, diagnostics)? {
            TermExpr::TermGroup(inner)
                if inner.relation == relation && !child.is("expressionGroup") =>
            {
                group.operands.extend(inner.operands)
            }
            operand => group.push(operand),
        }
    }
    Some(group.into())
}

/// (qualifier `:`)? identifier operator regexp
fn term<T: ParseTree>(node: &T, negations: usize, diagnostics: &mut Diagnostics) -> Option<Term> {
    let identifier = node
        .first_child("identifier")
        .map(|i| i.text().trim().to_owned())
        .unwrap_or_default();
    let qualifier = node.first_child("qualifier").map(|q| q.text().trim().to_owned());
    let (foundry, layer) = match resolve_layer(qualifier.as_deref(), &identifier) {
        Ok(resolved) => resolved,
        Err(message) => {
            diagnostics
                .report(DiagnosticKind::UnsupportedQueryElement)
                .message(message)
                .emit();
            return None;
        }
    };

    let op = node
        .first_child("operator")
        .map(|op| op.text().trim().to_owned())
        .unwrap_or_else(|| "=".to_owned());
    let match_op = match op.as_str() {
        "=" => Match::Eq,
        "!=" => Match::Ne,
        _ => {
            diagnostics
                .report(DiagnosticKind::UnsupportedRelation)
                .message(op)
                .emit();
            return None;
        }
    };

    let regexp = node.first_child("regexp");
    let key = regexp.map(pattern).unwrap_or_default();
    let term = Term::new()
        .key(key)
        .foundry(foundry)
        .layer(layer)
        .typed(TermType::Regex)
        .matching(match_op)
        .negate_by(negations);

    let flags = regexp
        .into_iter()
        .flat_map(|r| r.children_with("regexpFlag"))
        .chain(node.children_with("regexpFlag"));
    apply_flags(term, flags, diagnostics)
}

/// Maps `qualifier:identifier` to `(foundry, layer)`, or the unsupported part.
fn resolve_layer(
    qualifier: Option<&str>,
    identifier: &str,
) -> Result<(&'static str, &'static str), String> {
    let layer = match identifier {
        "text" => "orth",
        "lemma" => "l",
        "pos" => "p",
        _ => return Err(format!("Layer {identifier} is unsupported.")),
    };
    let Some(qualifier) = qualifier else {
        let foundry = if identifier == "text" { "opennlp" } else { "tt" };
        return Ok((foundry, layer));
    };

    let (foundry, layers): (&'static str, &[&str]) = match qualifier {
        "opennlp" => ("opennlp", &["text"]),
        "tt" => ("tt", &["lemma", "pos"]),
        "mate" => ("mate", &["lemma", "pos"]),
        "cnx" => ("cnx", &["lemma", "pos"]),
        _ => return Err(format!("Qualifier {qualifier} is unsupported.")),
    };
    if !layers.contains(&identifier) {
        return Err(format!(
            "Layer {identifier} with qualifier {qualifier} is unsupported."
        ));
    }
    Ok((foundry, layer))
}

/// The quoted pattern of a `regexp` node.
fn pattern<T: ParseTree>(regexp: &T) -> String {
    let quoted: String = regexp
        .children()
        .filter(|c| !c.is("regexpFlag"))
        .map(|c| c.text().into_owned())
        .collect();
    unquote(&quoted)
}

/// `c`/`i` ignore case, `C`/`I` respect it; `l` and `d` are rejected.
fn apply_flags<'a, T: ParseTree + 'a>(
    mut term: Term,
    flags: impl Iterator<Item = &'a T>,
    diagnostics: &mut Diagnostics,
) -> Option<Term> {
    for flag in flags {
        for c in flag.text().trim_start_matches('/').chars() {
            match c {
                'c' | 'i' => term = term.case_insensitive(true),
                'C' | 'I' => term = term.case_insensitive(false),
                'l' | 'd' => {
                    let name = if c == 'l' {
                        "LITERAL_MATCHING"
                    } else {
                        "IGNORE_DIACRITICS"
                    };
                    diagnostics
                        .report(DiagnosticKind::UnsupportedQueryElement)
                        .message(format!("Regexflag: {name} is unsupported."))
                        .emit();
                    return None;
                }
                _ => {}
            }
        }
    }
    Some(term)
}
