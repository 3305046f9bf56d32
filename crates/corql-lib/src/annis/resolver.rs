//! Relation graph resolver.
//!
//! A conjunction declares nodes and relates them pairwise. The IR can only
//! nest, so the edges are folded one at a time into a single tree: each fold
//! combines the structure built so far with one more edge. A node that takes
//! part in several edges is wrapped in a synthetic class when it is placed,
//! and later edges point back at it with a focus reference over that class.
//!
//! Edges are tried in source order. An edge whose endpoints are both still
//! unplaced is postponed until one of them is placed by another edge. If the
//! worklist stalls, the declarations are not connected and resolution fails.

use corql_core::{Boundary, Distance, Frame, Group, IrNode, Reference, Relation};

use crate::context::Context;
use crate::invariants::{ensure_placed, ensure_structure, ensure_unplaced};

pub type VarId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeKind {
    /// `.` (ordered) and `^` (unordered), with an optional word distance.
    Sequence {
        in_order: bool,
        distance: Option<Boundary>,
    },
    /// Dominance, pointing, and the expanded common-parent edges.
    Relation(Relation),
    Position(Vec<Frame>),
    /// Dominance whose child must start or end the parent.
    Anchored { relation: Relation, frame: Frame },
}

impl EdgeKind {
    fn name(&self) -> &'static str {
        match self {
            EdgeKind::Sequence { .. } => "sequence",
            EdgeKind::Relation(_) => "relation",
            EdgeKind::Position(_) => "position",
            EdgeKind::Anchored { .. } => "anchored",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub left: VarId,
    pub right: VarId,
    pub kind: EdgeKind,
}

/// Declarations and edges of one conjunction.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<IrNode>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: impl Into<IrNode>) -> VarId {
        self.nodes.push(node.into());
        self.nodes.len() - 1
    }

    pub fn add_edge(&mut self, left: VarId, right: VarId, kind: EdgeKind) {
        self.edges.push(Edge { left, right, kind });
    }

    pub fn node_mut(&mut self, id: VarId) -> Option<&mut IrNode> {
        self.nodes.get_mut(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Why a graph could not be folded into one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unresolved {
    /// Edges left over once no pending edge touches the structure.
    Disconnected { pending: usize },
    /// Declarations that no edge reaches.
    Unplaced { count: usize },
    /// An edge from a variable to itself.
    SelfRelation { var: VarId },
}

/// Folds `graph` into one IR node, drawing synthetic classes from `ctx`.
pub fn resolve(graph: Graph, ctx: &mut Context) -> Result<IrNode, Unresolved> {
    let Graph { nodes, edges } = graph;

    if edges.is_empty() {
        return match <[IrNode; 1]>::try_from(nodes) {
            Ok([node]) => Ok(node),
            Err(nodes) => Err(Unresolved::Unplaced { count: nodes.len() }),
        };
    }

    if let Some(edge) = edges.iter().find(|e| e.left == e.right) {
        return Err(Unresolved::SelfRelation { var: edge.left });
    }

    let mut remaining = vec![0usize; nodes.len()];
    for edge in &edges {
        remaining[edge.left] += 1;
        remaining[edge.right] += 1;
    }

    let mut resolver = Resolver {
        ctx,
        classes: vec![None; nodes.len()],
        nodes: nodes.into_iter().map(Some).collect(),
        remaining,
        structure: None,
    };

    let mut pending = edges;
    let first = pending.remove(0);
    resolver.fold(first);

    while !pending.is_empty() {
        let Some(index) = pending
            .iter()
            .position(|e| resolver.is_placed(e.left) || resolver.is_placed(e.right))
        else {
            break;
        };
        if index > 0 {
            tracing::trace!(postponed = index, "edges postponed until an endpoint is placed");
        }
        let edge = pending.remove(index);
        resolver.fold(edge);
    }

    if !pending.is_empty() {
        return Err(Unresolved::Disconnected {
            pending: pending.len(),
        });
    }

    let unplaced = resolver.nodes.iter().filter(|n| n.is_some()).count();
    if unplaced > 0 {
        return Err(Unresolved::Unplaced { count: unplaced });
    }

    Ok(ensure_structure(resolver.structure))
}

struct Resolver<'a> {
    ctx: &'a mut Context,
    /// Declarations not yet placed; `None` once placed.
    nodes: Vec<Option<IrNode>>,
    /// Edges each variable still takes part in.
    remaining: Vec<usize>,
    classes: Vec<Option<u32>>,
    structure: Option<IrNode>,
}

impl Resolver<'_> {
    fn is_placed(&self, var: VarId) -> bool {
        self.nodes[var].is_none()
    }

    fn fold(&mut self, edge: Edge) {
        let Edge { left, right, kind } = edge;
        self.remaining[left] -= 1;
        self.remaining[right] -= 1;

        let anchored = matches!(kind, EdgeKind::Anchored { .. });
        let mut structure = self.structure.take();
        let left_operand = self.operand(left, false, &mut structure);
        let right_operand = self.operand(right, anchored, &mut structure);

        tracing::debug!(
            left,
            right,
            kind = kind.name(),
            left_class = ?self.classes[left],
            right_class = ?self.classes[right],
            "folding edge"
        );

        let folded = match kind {
            EdgeKind::Sequence { in_order, distance } => {
                let mut group = Group::sequence().in_order(in_order);
                if let Some(boundary) = distance {
                    group = group.distance(Distance::words(boundary));
                }
                group.operand(left_operand).operand(right_operand)
            }
            EdgeKind::Relation(relation) => Group::relation(relation)
                .operand(left_operand)
                .operand(right_operand),
            EdgeKind::Position(frames) => Group::position(frames)
                .operand(left_operand)
                .operand(right_operand),
            EdgeKind::Anchored { relation, frame } => {
                let class = ensure_placed(self.classes[right]);
                let inner = Group::relation(relation)
                    .operand(left_operand)
                    .operand(right_operand);
                Group::position(vec![frame])
                    .operand(inner)
                    .operand(Reference::focus(class))
            }
        };

        self.structure = Some(folded.into());
    }

    /// Places `var`, or refers back to it if it is already placed.
    ///
    /// The first reference in a fold carries `structure` as its operand.
    fn operand(&mut self, var: VarId, force_class: bool, structure: &mut Option<IrNode>) -> IrNode {
        if self.is_placed(var) {
            let class = ensure_placed(self.classes[var]);
            let reference = match structure.take() {
                Some(built) => Reference::focus(class).operand(built),
                None => Reference::focus(class),
            };
            return reference.into();
        }

        let node = ensure_unplaced(self.nodes[var].take());
        if self.remaining[var] == 0 && !force_class {
            return node;
        }
        let class = self.ctx.next_class();
        self.classes[var] = Some(class);
        Group::class(class, node).into()
    }
}
