//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use corql_core::IrNode;

#[inline]
pub fn assert_container(node: &IrNode) {
    assert!(
        node.is_container(),
        "context: attached an operand to a {} (only group, reference, and docGroup take operands)",
        node.type_name()
    );
}

#[inline]
pub fn ensure_frame<T>(frame: Option<T>) -> T {
    frame.expect("context: no open visit frame (every walker step runs inside visit)")
}

#[inline]
pub fn assert_can_close(open: usize, count: usize) {
    assert!(
        count <= open,
        "context: closing {count} containers with only {open} open (pop counts track openings)"
    );
}

#[inline]
pub fn assert_depth(open: usize, depth: usize) {
    assert!(
        depth < open,
        "context: attach depth {depth} with only {open} open containers"
    );
}

#[inline]
pub fn ensure_slot<T>(slot: Option<T>) -> T {
    slot.expect("context: slot materialized twice (each slot has exactly one parent)")
}

#[inline]
pub fn assert_balanced_frames(frames: usize) {
    assert_eq!(
        frames, 1,
        "context: finish called inside an unfinished visit (visit frames are always popped)"
    );
}

#[inline]
pub fn ensure_placed<T>(class: Option<T>) -> T {
    class.expect(
        "resolver: referenced endpoint has no class \
         (endpoints with pending edges are wrapped when placed)",
    )
}

#[inline]
pub fn ensure_unplaced<T>(node: Option<T>) -> T {
    node.expect("resolver: declaration placed twice (placed endpoints become references)")
}

#[inline]
pub fn ensure_structure<T>(structure: Option<T>) -> T {
    structure.expect("resolver: nothing folded (the first edge always folds)")
}

#[inline]
pub fn ensure_pattern(pattern: Result<regex::Regex, regex::Error>) -> regex::Regex {
    pattern.expect("collection: built-in pattern failed to compile (it is a literal)")
}
