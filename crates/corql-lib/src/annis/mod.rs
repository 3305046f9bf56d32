//! Graph-constraint language front end.
//!
//! A query is a disjunction of conjunctions. Each conjunction declares nodes
//! (`cat="NP"`, `tok`, `"Mann"`), relates them with binary operators
//! (`#1 > #2`, `#1 . #2`, `#1 _i_ #2`), and constrains single nodes with
//! unary attributes (`#1:root`). Nodes are numbered by declaration order and
//! may carry an explicit label (`x#cat="NP"`, referenced as `#x`).
//!
//! Conjunctions are folded into a single IR tree by the [`resolver`].

mod operators;
pub mod resolver;

#[cfg(test)]
mod resolver_tests;

use indexmap::IndexMap;

use corql_core::{Group, IrNode, Match, Relation, Span, Term, TermType, Token};

use crate::WalkResult;
use crate::context::{Context, Walk};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::tree::ParseTree;

use operators::{
    Operator, is_operator, parse_operator, parse_range, split_qualified, text_op, text_spec,
};
use resolver::{EdgeKind, Graph, Unresolved, VarId};

/// Compiles a graph-constraint parse tree.
pub fn compile<T: ParseTree>(tree: &T) -> WalkResult {
    let mut walker = AnnisWalker::default();
    walker.visit(|this| this.walk_top(tree));
    walker.finish()
}

#[derive(Default)]
struct AnnisWalker {
    ctx: Context,
    diagnostics: Diagnostics,
}

impl Walk for AnnisWalker {
    fn context(&mut self) -> &mut Context {
        &mut self.ctx
    }
}

impl AnnisWalker {
    fn walk_top<T: ParseTree>(&mut self, tree: &T) {
        let mut branches = Vec::new();
        collect_branches(tree, &mut branches);

        match branches.as_slice() {
            [] => self.diagnostics.report(DiagnosticKind::EmptyQuery).emit(),
            [branch] => {
                if let Some(node) = self.branch(*branch) {
                    self.ctx.attach(node, 0);
                }
            }
            _ => {
                self.ctx.open_container(Group::disjunction());
                for &branch in &branches {
                    if let Some(node) = self.branch(branch) {
                        self.ctx.attach(node, 0);
                    }
                }
            }
        }
    }

    /// Resolves one conjunction with its own variable table.
    fn branch<T: ParseTree>(&mut self, conjunction: &T) -> Option<IrNode> {
        let mut builder = Conjunction::default();
        builder.walk(conjunction, &mut self.diagnostics);
        let graph = builder.into_graph(&mut self.diagnostics)?;

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "resolving conjunction"
        );

        match resolver::resolve(graph, &mut self.ctx) {
            Ok(node) => Some(node),
            Err(Unresolved::SelfRelation { .. }) => {
                self.diagnostics
                    .report(DiagnosticKind::UnknownQueryElement)
                    .message("A node cannot be related to itself.")
                    .emit();
                None
            }
            Err(unresolved) => {
                tracing::debug!(?unresolved, "conjunction is not connected");
                self.diagnostics.report(DiagnosticKind::UnboundRelation).emit();
                None
            }
        }
    }

    fn finish(self) -> WalkResult {
        if self.diagnostics.has_errors() {
            return (None, self.diagnostics);
        }
        (self.ctx.finish(), self.diagnostics)
    }
}

fn collect_branches<'a, T: ParseTree>(node: &'a T, out: &mut Vec<&'a T>) {
    if node.is("andTopExpr") {
        out.push(node);
        return;
    }
    for child in node.inner_children() {
        collect_branches(child, out);
    }
}

/// Variable reference, resolved once the whole conjunction is read.
#[derive(Debug, Clone)]
enum VarRef {
    Id(VarId),
    Name(String),
}

/// Declarations, edges, and unary constraints of one conjunction.
#[derive(Default)]
struct Conjunction {
    graph: Graph,
    names: IndexMap<String, VarId>,
    declared: usize,
    edges: Vec<(VarRef, VarRef, EdgeKind)>,
    unaries: Vec<(VarRef, Term)>,
}

impl Conjunction {
    fn walk<T: ParseTree>(&mut self, node: &T, diagnostics: &mut Diagnostics) {
        for child in node.children() {
            match child.category() {
                "variableExpr" => {
                    self.declare(child, diagnostics);
                }
                "relationExpr" => self.relation_chain(child, diagnostics),
                "unaryExpr" => self.unary(child, diagnostics),
                "metaExpr" => diagnostics
                    .report(DiagnosticKind::UnsupportedFeature)
                    .message("Meta constraints are unsupported.")
                    .emit(),
                _ if child.is_leaf() => {}
                _ => self.walk(child, diagnostics),
            }
        }
    }

    fn declare<T: ParseTree>(&mut self, node: &T, diagnostics: &mut Diagnostics) -> VarId {
        let id = self.graph.add_node(declaration(node, diagnostics));
        self.declared += 1;
        self.names.insert(self.declared.to_string(), id);
        if let Some(label) = node.first_child("label") {
            let name = label.text().trim_end_matches('#').to_owned();
            self.names.insert(name, id);
        }
        id
    }

    /// `operand (operator operand)+`, one edge per operator.
    fn relation_chain<T: ParseTree>(&mut self, node: &T, diagnostics: &mut Diagnostics) {
        let mut items = Vec::new();
        chain_items(node, &mut items);

        let mut left: Option<VarRef> = None;
        let mut operator: Option<Option<Operator>> = None;
        let mut parent: Option<VarId> = None;

        for item in items {
            if is_operator(item) {
                operator = Some(parse_operator(item, diagnostics));
                continue;
            }

            let operand = if item.is("varRef") {
                VarRef::Name(var_name(item))
            } else {
                VarRef::Id(self.declare(item, diagnostics))
            };

            match (left.take(), operator.take()) {
                (Some(prev), Some(Some(op))) => {
                    self.push_operator(prev, op, operand.clone(), &mut parent)
                }
                (_, Some(None)) => parent = None,
                _ => {}
            }
            left = Some(operand);
        }
    }

    fn push_operator(
        &mut self,
        left: VarRef,
        operator: Operator,
        right: VarRef,
        parent: &mut Option<VarId>,
    ) {
        let kind = match operator {
            Operator::Sequence { in_order, distance } => EdgeKind::Sequence { in_order, distance },
            Operator::Dominance {
                relation,
                anchor: None,
            } => EdgeKind::Relation(relation),
            Operator::Dominance {
                relation,
                anchor: Some(frame),
            } => EdgeKind::Anchored { relation, frame },
            Operator::Pointing(relation) => EdgeKind::Relation(relation),
            Operator::Frames(frames) => EdgeKind::Position(frames),
            Operator::CommonParent(boundary) => {
                // Consecutive `$` share one synthetic parent.
                let relation = Relation::new(Term::new().layer("c")).bounded(Some(boundary));
                let shared = match *parent {
                    Some(shared) => shared,
                    None => {
                        let shared = self.graph.add_node(Span::new());
                        self.edges.push((
                            VarRef::Id(shared),
                            left,
                            EdgeKind::Relation(relation.clone()),
                        ));
                        *parent = Some(shared);
                        shared
                    }
                };
                self.edges
                    .push((VarRef::Id(shared), right, EdgeKind::Relation(relation)));
                return;
            }
        };
        *parent = None;
        self.edges.push((left, right, kind));
    }

    /// `#n:root`, `#n:arity=min,max`, `#n:tokenarity=min,max`.
    fn unary<T: ParseTree>(&mut self, node: &T, diagnostics: &mut Diagnostics) {
        let Some(var) = node.first_child("varRef") else {
            diagnostics
                .report(DiagnosticKind::UnknownQueryElement)
                .message(format!("Unary constraint '{}' names no node.", node.text()))
                .emit();
            return;
        };
        let op = node
            .first_child("unaryOp")
            .map(|op| op.text().trim().to_owned())
            .unwrap_or_default();

        let term = match op.as_str() {
            "root" => Term::new().root(),
            "arity" | "tokenarity" => {
                let Some(spec) = node.first_child("rangeSpec") else {
                    diagnostics
                        .report(DiagnosticKind::UnknownQueryElement)
                        .message(format!("Missing range for {op}."))
                        .emit();
                    return;
                };
                let Some(boundary) = parse_range(&spec.text(), diagnostics) else {
                    return;
                };
                if op == "arity" {
                    Term::new().arity(boundary)
                } else {
                    Term::new().tokenarity(boundary)
                }
            }
            _ => {
                diagnostics
                    .report(DiagnosticKind::UnknownQueryElement)
                    .message(format!("Unknown unary operator '{op}'."))
                    .emit();
                return;
            }
        };
        self.unaries.push((VarRef::Name(var_name(var)), term));
    }

    /// Resolves names and attaches unary constraints; `None` after reporting.
    fn into_graph(self, diagnostics: &mut Diagnostics) -> Option<Graph> {
        let Conjunction {
            mut graph,
            names,
            edges,
            unaries,
            ..
        } = self;

        let mut lookup = |var: &VarRef| match var {
            VarRef::Id(id) => Some(*id),
            VarRef::Name(name) => {
                let found = names.get(name).copied();
                if found.is_none() {
                    diagnostics
                        .report(DiagnosticKind::UndefinedVariable)
                        .message(format!("#{name}"))
                        .emit();
                }
                found
            }
        };

        let mut complete = true;
        for (left, right, kind) in edges {
            match (lookup(&left), lookup(&right)) {
                (Some(left), Some(right)) => graph.add_edge(left, right, kind),
                _ => complete = false,
            }
        }

        for (var, term) in unaries {
            let Some(id) = lookup(&var) else {
                complete = false;
                continue;
            };
            if let Some(attr) = graph.node_mut(id).and_then(IrNode::attr_mut) {
                *attr = Some(match attr.take() {
                    Some(existing) => existing.and(term),
                    None => term.into(),
                });
            }
        }

        if !complete {
            return None;
        }
        if graph.node_count() == 0 {
            diagnostics.report(DiagnosticKind::EmptyQuery).emit();
            return None;
        }
        Some(graph)
    }
}

/// Operands and operators of a relation chain, unwrapping grouping rules.
fn chain_items<'a, T: ParseTree>(node: &'a T, out: &mut Vec<&'a T>) {
    for child in node.children() {
        if child.is("varRef") || child.is("variableExpr") || is_operator(child) {
            out.push(child);
        } else if !child.is_leaf() {
            chain_items(child, out);
        }
    }
}

fn var_name<T: ParseTree>(node: &T) -> String {
    node.text().trim().trim_start_matches('#').to_owned()
}

/// Layer alias and whether the layer annotates tokens rather than spans.
fn map_layer(layer: &str) -> (&str, bool) {
    match layer {
        "cat" | "c" => ("c", false),
        "pos" | "p" => ("p", true),
        "lemma" | "l" => ("l", true),
        "morph" | "m" => ("m", true),
        "orth" => ("orth", true),
        other => (other, false),
    }
}

fn declaration<T: ParseTree>(node: &T, diagnostics: &mut Diagnostics) -> IrNode {
    let negations = node.children_with("!").count();
    let spec = node.first_child("textSpec").map(|s| text_spec(&s.text()));
    let op = text_op(node);

    if node.has_child("tok") {
        return match spec {
            Some((value, regex)) => {
                Token::wrapping(token_term(None, "orth", value, op, regex).negate_by(negations))
                    .into()
            }
            None => Token::new().into(),
        };
    }
    if node.has_child("node") {
        return Span::new().into();
    }

    let Some(name) = node.first_child("qName") else {
        if let Some((value, regex)) = spec {
            let term = token_term(None, "orth", value, op, regex).negate_by(negations);
            return Token::wrapping(term).into();
        }
        diagnostics
            .report(DiagnosticKind::UnknownQueryElement)
            .message(format!("Unknown node declaration '{}'.", node.text()))
            .emit();
        return Token::new().into();
    };

    let (foundry, written) = split_qualified(&name.text());
    let (layer, on_tokens) = map_layer(&written);
    match spec {
        None if on_tokens => Span::new().maybe_foundry(foundry).layer(written.as_str()).into(),
        None => Span::new().maybe_foundry(foundry).layer(layer).into(),
        Some((value, regex)) if on_tokens => {
            Token::wrapping(token_term(foundry, layer, value, op, regex).negate_by(negations))
                .into()
        }
        Some((value, _)) => Span::new()
            .maybe_foundry(foundry)
            .layer(layer)
            .key(value)
            .matching(op.with_parity(negations))
            .into(),
    }
}

fn token_term(foundry: Option<String>, layer: &str, value: String, op: Match, regex: bool) -> Term {
    let term = Term::new()
        .maybe_foundry(foundry)
        .layer(layer)
        .key(value)
        .matching(op);
    if regex {
        term.typed(TermType::Regex)
    } else {
        term
    }
}
