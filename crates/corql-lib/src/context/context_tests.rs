use corql_core::{Group, IrNode, Reference, Span, Term, Token, dump};

use super::Context;

fn span(key: &str) -> Span {
    Span::new().layer("c").key(key)
}

#[test]
fn leaf_becomes_root() {
    let mut ctx = Context::new();
    ctx.attach(span("NP"), 0);

    let root = ctx.finish().unwrap();
    insta::assert_snapshot!(dump(&root), @"span c=NP");
}

#[test]
fn first_top_level_node_stays_root() {
    let mut ctx = Context::new();
    ctx.attach(span("NP"), 0);
    ctx.attach(span("VP"), 0);
    ctx.visit(|ctx| ctx.open_container(Group::sequence()));

    insta::assert_snapshot!(dump(&ctx.finish().unwrap()), @"span c=NP");
}

#[test]
fn empty_context_has_no_root() {
    let ctx = Context::new();
    assert!(!ctx.has_root());
    assert!(ctx.finish().is_none());
}

#[test]
fn operands_follow_attach_order() {
    let mut ctx = Context::new();
    ctx.visit(|ctx| {
        ctx.open_container(Group::sequence());
        ctx.attach(span("NP"), 0);
        ctx.attach(span("VP"), 0);
    });

    insta::assert_snapshot!(dump(&ctx.finish().unwrap()), @r"
    group sequence
      span c=NP
      span c=VP
    ");
}

#[test]
fn visit_closes_only_its_own_containers() {
    let mut ctx = Context::new();
    ctx.visit(|ctx| {
        ctx.open_container(Group::disjunction());
        ctx.visit(|ctx| {
            ctx.open_container(Group::sequence());
            ctx.open_container(Group::class(1, Token::new()));
            assert_eq!(ctx.depth(), 3);
        });
        assert_eq!(ctx.depth(), 1);
        ctx.attach(Token::wrapping(Term::key_eq("orth", "Baum")), 0);
    });
    assert_eq!(ctx.depth(), 0);

    insta::assert_snapshot!(dump(&ctx.finish().unwrap()), @r"
    group disjunction
      group sequence
        group class classOut=1
          token
      token [orth=Baum]
    ");
}

#[test]
fn opened_container_keeps_its_slot() {
    let mut ctx = Context::new();
    ctx.visit(|ctx| {
        ctx.open_container(Group::sequence());
        ctx.visit(|ctx| {
            ctx.open_container(Reference::focus(2));
            // Fills the outer sequence while the reference is still open.
            ctx.attach(span("VP"), 1);
            ctx.attach(span("NP"), 0);
        });
    });

    insta::assert_snapshot!(dump(&ctx.finish().unwrap()), @r"
    group sequence
      focus classRef=2
        span c=NP
      span c=VP
    ");
}

#[test]
fn class_counter_starts_above_user_range() {
    let mut ctx = Context::new();
    assert_eq!(ctx.next_class(), 129);
    assert_eq!(ctx.next_class(), 130);
}

#[test]
#[should_panic(expected = "context: attached an operand to a span")]
fn opening_leaf_panics() {
    let mut ctx = Context::new();
    ctx.visit(|ctx| {
        ctx.open_container(IrNode::Span(span("NP")));
    });
}
