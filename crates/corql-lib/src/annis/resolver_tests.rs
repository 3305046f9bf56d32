use corql_core::{Boundary, Frame, Relation, Span, Term, dump};

use super::resolver::{EdgeKind, Graph, Unresolved, resolve};
use crate::context::Context;

fn cat(value: &str) -> Span {
    Span::new().layer("c").key(value)
}

fn dominance() -> EdgeKind {
    EdgeKind::Relation(Relation::new(Term::new().layer("c")).bounded(Some(Boundary::exact(1))))
}

fn precedence() -> EdgeKind {
    EdgeKind::Sequence {
        in_order: true,
        distance: None,
    }
}

fn resolved(graph: Graph) -> String {
    let mut ctx = Context::new();
    dump(&resolve(graph, &mut ctx).unwrap())
}

#[test]
fn single_declaration_without_edges() {
    let mut graph = Graph::new();
    graph.add_node(cat("NP"));

    insta::assert_snapshot!(resolved(graph), @"span c=NP");
}

#[test]
fn two_declarations_without_edges() {
    let mut graph = Graph::new();
    graph.add_node(cat("NP"));
    graph.add_node(cat("VP"));

    let mut ctx = Context::new();
    assert_eq!(
        resolve(graph, &mut ctx),
        Err(Unresolved::Unplaced { count: 2 })
    );
}

#[test]
fn single_edge_needs_no_class() {
    let mut graph = Graph::new();
    let np = graph.add_node(cat("NP"));
    let vp = graph.add_node(cat("VP"));
    graph.add_edge(np, vp, dominance());

    insta::assert_snapshot!(resolved(graph), @r"
    group relation relation=[c] boundary=1..1
      span c=NP
      span c=VP
    ");
}

#[test]
fn path_wraps_inner_nodes_once() {
    let mut graph = Graph::new();
    let cp = graph.add_node(cat("CP"));
    let vp = graph.add_node(cat("VP"));
    let np = graph.add_node(cat("NP"));
    graph.add_edge(cp, vp, dominance());
    graph.add_edge(vp, np, dominance());

    insta::assert_snapshot!(resolved(graph), @r"
    group relation relation=[c] boundary=1..1
      focus classRef=129
        group relation relation=[c] boundary=1..1
          span c=CP
          group class classOut=129
            span c=VP
      span c=NP
    ");
}

#[test]
fn path_of_n_edges_allocates_n_minus_one_classes() {
    let mut graph = Graph::new();
    let vars: Vec<_> = ["A", "B", "C", "D", "E"]
        .into_iter()
        .map(|v| graph.add_node(cat(v)))
        .collect();
    for pair in vars.windows(2) {
        graph.add_edge(pair[0], pair[1], precedence());
    }

    let mut ctx = Context::new();
    resolve(graph, &mut ctx).unwrap();
    // Four edges, three inner nodes: 129, 130, 131.
    assert_eq!(ctx.next_class(), 132);
}

#[test]
fn both_endpoints_placed() {
    let mut graph = Graph::new();
    let np = graph.add_node(cat("NP"));
    let v = graph.add_node(cat("V"));
    let p = graph.add_node(cat("P"));
    graph.add_edge(np, v, dominance());
    graph.add_edge(np, p, dominance());
    graph.add_edge(v, p, precedence());

    insta::assert_snapshot!(resolved(graph), @r"
    group sequence inOrder=true
      focus classRef=130
        group relation relation=[c] boundary=1..1
          focus classRef=129
            group relation relation=[c] boundary=1..1
              group class classOut=129
                span c=NP
              group class classOut=130
                span c=V
          group class classOut=131
            span c=P
      focus classRef=131
    ");
}

#[test]
fn postponed_edge_waits_for_an_endpoint() {
    let mut graph = Graph::new();
    let a = graph.add_node(cat("A"));
    let b = graph.add_node(cat("B"));
    let c = graph.add_node(cat("C"));
    let d = graph.add_node(cat("D"));
    graph.add_edge(a, b, precedence());
    graph.add_edge(c, d, precedence());
    graph.add_edge(a, c, dominance());

    insta::assert_snapshot!(resolved(graph), @r"
    group sequence inOrder=true
      focus classRef=130
        group relation relation=[c] boundary=1..1
          focus classRef=129
            group sequence inOrder=true
              group class classOut=129
                span c=A
              span c=B
          group class classOut=130
            span c=C
      span c=D
    ");
}

#[test]
fn disconnected_edges() {
    let mut graph = Graph::new();
    let a = graph.add_node(cat("A"));
    let b = graph.add_node(cat("B"));
    let c = graph.add_node(cat("C"));
    let d = graph.add_node(cat("D"));
    graph.add_edge(a, b, precedence());
    graph.add_edge(c, d, precedence());

    let mut ctx = Context::new();
    assert_eq!(
        resolve(graph, &mut ctx),
        Err(Unresolved::Disconnected { pending: 1 })
    );
}

#[test]
fn declaration_outside_every_edge() {
    let mut graph = Graph::new();
    let a = graph.add_node(cat("A"));
    let b = graph.add_node(cat("B"));
    graph.add_node(cat("C"));
    graph.add_edge(a, b, precedence());

    let mut ctx = Context::new();
    assert_eq!(
        resolve(graph, &mut ctx),
        Err(Unresolved::Unplaced { count: 1 })
    );
}

#[test]
fn self_relation() {
    let mut graph = Graph::new();
    let a = graph.add_node(cat("A"));
    graph.add_edge(a, a, dominance());

    let mut ctx = Context::new();
    assert_eq!(
        resolve(graph, &mut ctx),
        Err(Unresolved::SelfRelation { var: a })
    );
}

#[test]
fn position_edge_between_placed_nodes() {
    let mut graph = Graph::new();
    let np = graph.add_node(cat("NP"));
    let vp = graph.add_node(cat("VP"));
    graph.add_edge(np, vp, dominance());
    graph.add_edge(np, vp, EdgeKind::Position(vec![Frame::StartsWith, Frame::Matches]));

    insta::assert_snapshot!(resolved(graph), @r"
    group position frames=startsWith,matches
      focus classRef=129
        group relation relation=[c] boundary=1..1
          group class classOut=129
            span c=NP
          group class classOut=130
            span c=VP
      focus classRef=130
    ");
}

#[test]
fn anchored_edge_wraps_the_child() {
    let mut graph = Graph::new();
    let np = graph.add_node(cat("NP"));
    let det = graph.add_node(cat("DET"));
    graph.add_edge(
        np,
        det,
        EdgeKind::Anchored {
            relation: Relation::new(Term::new().layer("c")).bounded(Some(Boundary::exact(1))),
            frame: Frame::StartsWith,
        },
    );

    insta::assert_snapshot!(resolved(graph), @r"
    group position frames=startsWith
      group relation relation=[c] boundary=1..1
        span c=NP
        group class classOut=129
          span c=DET
      focus classRef=129
    ");
}

#[test]
fn class_numbers_continue_across_resolutions() {
    let mut ctx = Context::new();
    for expected in [129, 130] {
        let mut graph = Graph::new();
        let a = graph.add_node(cat("A"));
        let b = graph.add_node(cat("B"));
        let c = graph.add_node(cat("C"));
        graph.add_edge(a, b, precedence());
        graph.add_edge(b, c, precedence());
        let node = resolve(graph, &mut ctx).unwrap();
        assert!(dump(&node).contains(&format!("classOut={expected}")));
    }
}

#[test]
fn resolution_is_deterministic() {
    let build = || {
        let mut graph = Graph::new();
        let a = graph.add_node(cat("A"));
        let b = graph.add_node(cat("B"));
        let c = graph.add_node(cat("C"));
        graph.add_edge(a, b, dominance());
        graph.add_edge(a, c, precedence());
        graph
    };
    assert_eq!(resolved(build()), resolved(build()));
}
