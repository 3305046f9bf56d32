#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Intermediate representation produced by every corql front-end.
//!
//! The IR is a nested tree of [`IrNode`] values. Field names and the `@type`
//! tag are part of the contract with the downstream search engine, so the
//! serde attributes in this crate must not be renamed casually.
//!
//! Two layers:
//! - **Model**: the node structs and their enums (`node`, `boundary`)
//! - **Rendering**: a deterministic indented dump for diagnostics and tests (`dump`)

mod boundary;
mod dump;
mod node;

#[cfg(test)]
mod boundary_tests;

pub use boundary::{Boundary, Distance};
pub use dump::dump;
pub use node::{
    BoolRelation, Doc, DocGroup, Frame, Group, IrNode, Match, Operation, Reference,
    ReferenceOperation, Relation, Span, Term, TermExpr, TermGroup, TermType, Token,
};

/// Lowest class number handed out to synthetic classes.
///
/// User-visible classes live strictly below this value.
pub const SYNTHETIC_CLASS_FLOOR: u32 = 128;
