//! Per-compilation serialization context.
//!
//! Walkers build the IR top-down: containers are opened before their operands
//! are known, and operands are appended in walk order. Every container holds
//! its place in the parent from the moment it is opened, so a group that is
//! opened first stays first even if it is filled last.
//!
//! Containers are closed by bookkeeping, not by tree shape: each [`visit`]
//! frame counts the containers opened inside it and closes exactly those when
//! the frame ends.
//!
//! [`visit`]: Context::visit

#[cfg(test)]
mod context_tests;

use corql_core::{IrNode, SYNTHETIC_CLASS_FLOOR};

use crate::invariants::{
    assert_balanced_frames, assert_can_close, assert_container, assert_depth, ensure_frame,
    ensure_slot,
};

type SlotId = usize;

#[derive(Debug)]
struct Slot {
    node: IrNode,
    children: Vec<SlotId>,
}

#[derive(Debug)]
pub struct Context {
    slots: Vec<Option<Slot>>,
    /// Open containers, innermost last.
    open: Vec<SlotId>,
    /// Containers opened per visit frame, innermost last.
    pop_counts: Vec<usize>,
    root: Option<SlotId>,
    class_counter: u32,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            open: Vec::new(),
            pop_counts: vec![0],
            root: None,
            class_counter: SYNTHETIC_CLASS_FLOOR,
        }
    }

    /// Opens `node` as the new innermost container.
    ///
    /// The node takes its operand slot in the enclosing container right away,
    /// or becomes the root when nothing is open and no root exists yet.
    pub fn open_container(&mut self, node: impl Into<IrNode>) {
        let node = node.into();
        assert_container(&node);
        let id = self.place(node, 0);
        self.open.push(id);
        *ensure_frame(self.pop_counts.last_mut()) += 1;
    }

    /// Appends `node` to the container `depth` entries below the innermost one.
    pub fn attach(&mut self, node: impl Into<IrNode>, depth: usize) {
        self.place(node.into(), depth);
    }

    fn place(&mut self, node: IrNode, depth: usize) -> SlotId {
        let id = self.slots.len();
        self.slots.push(Some(Slot {
            node,
            children: Vec::new(),
        }));

        if self.open.is_empty() {
            match self.root {
                None => self.root = Some(id),
                Some(root) => tracing::warn!(root, ignored = id, "second top-level node dropped"),
            }
            return id;
        }

        assert_depth(self.open.len(), depth);
        let parent = self.open[self.open.len() - 1 - depth];
        let parent = ensure_slot(self.slots[parent].as_mut());
        assert_container(&parent.node);
        parent.children.push(id);
        id
    }

    /// Runs `f` in a fresh frame and closes the containers it opened.
    pub fn visit<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.enter_frame();
        let result = f(self);
        self.leave_frame();
        result
    }

    pub(crate) fn enter_frame(&mut self) {
        self.pop_counts.push(0);
    }

    pub(crate) fn leave_frame(&mut self) {
        let count = ensure_frame(self.pop_counts.pop());
        assert_can_close(self.open.len(), count);
        let keep = self.open.len() - count;
        self.open.truncate(keep);
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    /// Next synthetic class number; the first one is 129.
    pub fn next_class(&mut self) -> u32 {
        self.class_counter += 1;
        self.class_counter
    }

    /// Materializes the tree rooted at the first top-level node.
    ///
    /// Later top-level nodes have no parent and are not part of the result.
    pub fn finish(mut self) -> Option<IrNode> {
        assert_balanced_frames(self.pop_counts.len());
        let root = self.root?;
        Some(self.materialize(root))
    }

    fn materialize(&mut self, id: SlotId) -> IrNode {
        let Slot { mut node, children } = ensure_slot(self.slots[id].take());
        if children.is_empty() {
            return node;
        }
        let operands: Vec<IrNode> = children.into_iter().map(|c| self.materialize(c)).collect();
        if let Some(slot) = node.operands_mut() {
            slot.extend(operands);
        }
        node
    }
}

/// Walkers that drive a [`Context`].
pub(crate) trait Walk {
    fn context(&mut self) -> &mut Context;

    /// Like [`Context::visit`], but hands the whole walker to `f`.
    fn visit<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T
    where
        Self: Sized,
    {
        self.context().enter_frame();
        let result = f(self);
        self.context().leave_frame();
        result
    }
}
