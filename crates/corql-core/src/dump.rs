//! Deterministic indented rendering of an IR tree.
//!
//! One line per operand-bearing node, leaves inline:
//!
//! ```text
//! group relation relation=[c] boundary=1..1
//!   span c=NP
//!   token [orth=Mann]
//! ```

use std::fmt::Write;

use crate::node::{
    BoolRelation, Doc, Group, IrNode, Match, Operation, Reference, Span, Term, TermExpr,
    TermType, Token,
};

/// Renders `node` and its operands, two spaces per nesting level.
pub fn dump(node: &IrNode) -> String {
    let mut out = String::new();
    dump_node(node, 0, &mut out);
    out
}

fn dump_node(node: &IrNode, depth: usize, out: &mut String) {
    if !out.is_empty() {
        out.push('\n');
    }
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(&header(node));
    for operand in node.operands() {
        dump_node(operand, depth + 1, out);
    }
}

fn header(node: &IrNode) -> String {
    match node {
        IrNode::Token(token) => token_header(token),
        IrNode::Span(span) => span_header(span),
        IrNode::Group(group) => group_header(group),
        IrNode::Reference(reference) => reference_header(reference),
        IrNode::Doc(doc) => doc_header(doc),
        IrNode::DocGroup(group) => format!("docGroup {}", bool_name(group.relation)),
    }
}

fn token_header(token: &Token) -> String {
    let mut s = String::from("token");
    if let Some(wrap) = &token.wrap {
        s.push(' ');
        s.push_str(&term_expr(wrap));
    }
    if let Some(attr) = &token.attr {
        let _ = write!(s, " attr={}", term_expr(attr));
    }
    s
}

fn span_header(span: &Span) -> String {
    let mut s = String::from("span");
    let body = qualified(
        span.foundry.as_deref(),
        span.layer.as_deref(),
        span.key.as_deref(),
        span.match_op,
        false,
    );
    if !body.is_empty() {
        s.push(' ');
        s.push_str(&body);
    }
    if let Some(attr) = &span.attr {
        let _ = write!(s, " attr={}", term_expr(attr));
    }
    s
}

fn group_header(group: &Group) -> String {
    let op = match group.operation {
        Operation::Sequence => "sequence",
        Operation::Relation => "relation",
        Operation::Position => "position",
        Operation::Disjunction => "disjunction",
        Operation::Class => "class",
    };
    let mut s = format!("group {op}");
    if let Some(in_order) = group.in_order {
        let _ = write!(s, " inOrder={in_order}");
    }
    if !group.frames.is_empty() {
        let frames: Vec<_> = group.frames.iter().map(|f| f.name()).collect();
        let _ = write!(s, " frames={}", frames.join(","));
    }
    if !group.distances.is_empty() {
        let distances: Vec<_> = group.distances.iter().map(|d| d.to_string()).collect();
        let _ = write!(s, " distances={}", distances.join(","));
    }
    if let Some(class) = group.class_out {
        let _ = write!(s, " classOut={class}");
    }
    if let Some(relation) = &group.relation {
        let _ = write!(s, " relation={}", term_expr(&relation.wrap));
        if let Some(boundary) = relation.boundary {
            let _ = write!(s, " boundary={boundary}");
        }
    }
    s
}

fn reference_header(reference: &Reference) -> String {
    let classes: Vec<_> = reference.class_ref.iter().map(|c| c.to_string()).collect();
    format!("focus classRef={}", classes.join(","))
}

fn doc_header(doc: &Doc) -> String {
    let mut s = format!("doc {}{}", doc.key, doc.match_op.symbol());
    match doc.value_type {
        Some(TermType::Regex) => {
            let _ = write!(s, "/{}/", doc.value);
        }
        Some(TermType::Date) => {
            let _ = write!(s, "{} date", doc.value);
        }
        None => s.push_str(&doc.value),
    }
    s
}

fn term_expr(expr: &TermExpr) -> String {
    match expr {
        TermExpr::Term(term) => format!("[{}]", term_body(term)),
        TermExpr::TermGroup(group) => {
            let mut s = format!("({}", bool_name(group.relation));
            for operand in &group.operands {
                s.push(' ');
                s.push_str(&term_expr(operand));
            }
            s.push(')');
            s
        }
    }
}

fn term_body(term: &Term) -> String {
    let regex = term.term_type == Some(TermType::Regex);
    let mut parts = Vec::new();
    let main = qualified(
        term.foundry.as_deref(),
        term.layer.as_deref(),
        term.key.as_deref(),
        term.match_op,
        regex,
    );
    if !main.is_empty() {
        parts.push(main);
    }
    if let Some(value) = &term.value {
        parts.push(format!("value={value}"));
    }
    if term.term_type == Some(TermType::Date) {
        parts.push("date".to_owned());
    }
    match term.case_insensitive {
        Some(true) => parts.push("ci".to_owned()),
        Some(false) => parts.push("cs".to_owned()),
        None => {}
    }
    if term.root == Some(true) {
        parts.push("root".to_owned());
    }
    if let Some(arity) = term.arity {
        parts.push(format!("arity={arity}"));
    }
    if let Some(tokenarity) = term.tokenarity {
        parts.push(format!("tokenarity={tokenarity}"));
    }
    parts.join(" ")
}

/// `foundry/layer=key`, with the key printed as `/key/` for regexes.
fn qualified(
    foundry: Option<&str>,
    layer: Option<&str>,
    key: Option<&str>,
    match_op: Option<Match>,
    regex: bool,
) -> String {
    let mut s = String::new();
    if let Some(foundry) = foundry {
        s.push_str(foundry);
        s.push('/');
    }
    if let Some(layer) = layer {
        s.push_str(layer);
    }
    if let Some(key) = key {
        s.push_str(match_op.unwrap_or(Match::Eq).symbol());
        if regex {
            let _ = write!(s, "/{key}/");
        } else {
            s.push_str(key);
        }
    }
    s
}

fn bool_name(relation: BoolRelation) -> &'static str {
    match relation {
        BoolRelation::And => "and",
        BoolRelation::Or => "or",
    }
}
