//! corql: compiles corpus query languages into one query IR.
//!
//! Five front ends share the IR in [`corql_core`]: a graph-constraint
//! language (`annis`), a token/sequence language (`poliqarp`), a boolean
//! metadata filter language (`collection`), a library-style boolean
//! language (`cql`), and a federated-search language (`fcsql`).
//!
//! Parsing is done by external grammars. The compiler consumes their parse
//! trees through [`ParseTree`], or reads them from the bracketed notation in
//! [`tree::notation`].
//!
//! # Example
//!
//! ```
//! use corql_lib::{Compiler, Language, ParseNode, Request};
//!
//! let tree = ParseNode::parse(
//!     r#"(start (expr (constraint (field title) (operator =) (value Baum))))"#,
//! )
//! .unwrap();
//!
//! let result = Compiler::new(Language::Collection).compile_tree("title = Baum", &tree);
//! let request = Request::from_result(&result);
//! assert!(request.errors.is_empty());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod annis;
pub mod collection;
pub mod context;
pub mod cql;
pub mod diagnostics;
pub mod fcsql;
pub mod poliqarp;
pub mod query;
pub mod tree;

mod invariants;

#[cfg(test)]
pub mod test_utils;

use corql_core::IrNode;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use query::{
    CompileOptions, Compiled, Compiler, Language, Request, Root, TreeSupplier,
};
pub use tree::{NotationError, ParseNode, ParseTree};

/// What one front end produces: the IR root (absent on failure) and every
/// diagnostic reported on the way, warnings included.
pub type WalkResult = (Option<IrNode>, Diagnostics);

/// Errors that can occur during compilation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// No parse tree could be produced, or the raw query was rejected before walking.
    #[error("query parsing failed with {} errors", .0.error_count())]
    Syntax(Diagnostics),

    #[error("query compilation failed with {} errors", .0.error_count())]
    Semantic(Diagnostics),

    #[error("'{0}' is not a supported query language")]
    UnknownLanguage(String),
}

impl Error {
    /// Everything reported, in order; warnings included.
    pub fn diagnostics(&self) -> Diagnostics {
        match self {
            Error::Syntax(diagnostics) | Error::Semantic(diagnostics) => diagnostics.clone(),
            Error::UnknownLanguage(tag) => {
                let mut diagnostics = Diagnostics::new();
                diagnostics
                    .report(DiagnosticKind::UnknownLanguage)
                    .message(tag.as_str())
                    .emit();
                diagnostics
            }
        }
    }
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, Error>;
