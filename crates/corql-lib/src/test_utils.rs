//! Test utilities and snapshot macros.

use crate::{Compiler, Error, ParseNode};

impl Compiler {
    /// Compiles `tree` (bracketed notation) and dumps the IR, panicking on errors.
    pub fn expect_ir(&self, query: &str, tree: &str) -> String {
        let tree = ParseNode::parse(tree).expect("test tree notation must be valid");
        match self.compile_tree(query, &tree) {
            Ok(compiled) => {
                let mut out = compiled.dump();
                if !compiled.warnings().is_empty() {
                    out.push_str("\n---\n");
                    out.push_str(&compiled.warnings().render());
                }
                out
            }
            Err(error) => panic!(
                "Expected valid query, got error:\n{}",
                error.diagnostics().render()
            ),
        }
    }

    /// Compiles `tree` and renders the diagnostics, panicking on success.
    pub fn expect_invalid(&self, query: &str, tree: &str) -> String {
        let tree = ParseNode::parse(tree).expect("test tree notation must be valid");
        match self.compile_tree(query, &tree) {
            Ok(compiled) => panic!("Expected invalid query, got valid:\n{}", compiled.dump()),
            Err(error) => error.diagnostics().render(),
        }
    }

    /// Like [`expect_invalid`](Self::expect_invalid), for errors raised before walking.
    pub fn expect_syntax_error(&self, query: &str, tree: &str) -> String {
        let tree = ParseNode::parse(tree).expect("test tree notation must be valid");
        match self.compile_tree(query, &tree) {
            Err(Error::Syntax(diagnostics)) => diagnostics.render(),
            Err(error) => panic!("Expected syntax error, got:\n{error}"),
            Ok(compiled) => panic!("Expected syntax error, got valid:\n{}", compiled.dump()),
        }
    }
}

/// Snapshot test for the IR dump of a query.
#[macro_export]
macro_rules! shot_ir {
    ($compiler:expr, $query:literal, $tree:literal, @$snapshot:tt) => {{
        let output = $compiler.expect_ir($query, indoc::indoc!($tree));
        insta::assert_snapshot!(output, @$snapshot);
    }};
}

/// Snapshot test for error diagnostics.
#[macro_export]
macro_rules! shot_error {
    ($compiler:expr, $query:literal, $tree:literal, @$snapshot:tt) => {{
        let output = $compiler.expect_invalid($query, indoc::indoc!($tree));
        insta::assert_snapshot!(output, @$snapshot);
    }};
}
