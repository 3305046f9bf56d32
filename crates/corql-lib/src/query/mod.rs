//! Query compiler facade.
//!
//! [`Compiler`] holds the language and options; each call gets its own
//! context, so one compiler can serve concurrent requests.
//!
//! Stages: version check → empty check → bracket balance → parse tree → walk.
//! Anything that fails before a tree exists is a syntax error; failures while
//! walking are semantic errors.

mod balance;
mod language;
mod options;
mod request;

#[cfg(test)]
mod query_tests;

pub use language::Language;
pub use options::CompileOptions;
pub use request::Request;

use corql_core::IrNode;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::tree::ParseTree;
use crate::{Error, Result, annis, collection, cql, fcsql, poliqarp};

/// Produces the parse tree for a query, or the grammar's error message.
pub trait TreeSupplier {
    type Tree: ParseTree;

    fn supply(self, query: &str) -> std::result::Result<Self::Tree, String>;
}

impl<F, T> TreeSupplier for F
where
    F: FnOnce(&str) -> std::result::Result<T, String>,
    T: ParseTree,
{
    type Tree = T;

    fn supply(self, query: &str) -> std::result::Result<T, String> {
        self(query)
    }
}

/// Where a successful result is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root {
    Query(IrNode),
    Collection(IrNode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    root: Root,
    warnings: Diagnostics,
}

impl Compiled {
    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn node(&self) -> &IrNode {
        match &self.root {
            Root::Query(node) | Root::Collection(node) => node,
        }
    }

    pub fn into_node(self) -> IrNode {
        match self.root {
            Root::Query(node) | Root::Collection(node) => node,
        }
    }

    pub fn warnings(&self) -> &Diagnostics {
        &self.warnings
    }

    pub fn dump(&self) -> String {
        corql_core::dump(self.node())
    }
}

#[derive(Debug, Clone)]
pub struct Compiler {
    language: Language,
    options: CompileOptions,
}

impl Compiler {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            options: CompileOptions::default(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.options.version = Some(version.into());
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.options.case_sensitive = false;
        self
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Checks the raw query, asks `supplier` for its tree, and walks it.
    pub fn compile<S: TreeSupplier>(&self, query: &str, supplier: S) -> Result<Compiled> {
        self.precheck(query)?;
        let tree = supplier
            .supply(query)
            .map_err(|message| self.syntax_error(&message))?;
        self.walk(&tree)
    }

    /// Like [`compile`](Self::compile), for a tree that is already built.
    pub fn compile_tree<T: ParseTree>(&self, query: &str, tree: &T) -> Result<Compiled> {
        self.precheck(query)?;
        self.walk(tree)
    }

    fn precheck(&self, query: &str) -> Result<()> {
        tracing::debug!(language = %self.language, len = query.len(), "compiling query");

        let mut diagnostics = Diagnostics::new();
        match self.language {
            Language::Cql => cql::check_version(&self.options, &mut diagnostics),
            Language::Fcsql => fcsql::check_version(&self.options, &mut diagnostics),
            _ => {}
        }
        if diagnostics.has_errors() {
            return Err(Error::Syntax(diagnostics));
        }

        if query.trim().is_empty() {
            diagnostics.report(DiagnosticKind::EmptyQuery).emit();
            return Err(Error::Syntax(diagnostics));
        }

        balance::check(query, self.language.has_slash_regexes())
            .map_err(|message| self.syntax_error(&format!("{message}.")))
    }

    fn syntax_error(&self, message: &str) -> Error {
        let kind = match self.language {
            Language::Fcsql => DiagnosticKind::QueryCannotBeProcessed,
            _ => DiagnosticKind::MalformedQuery,
        };
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(kind).message(message).emit();
        Error::Syntax(diagnostics)
    }

    fn walk<T: ParseTree>(&self, tree: &T) -> Result<Compiled> {
        let (root, diagnostics) = match self.language {
            Language::Annis => annis::compile(tree),
            Language::Poliqarp => poliqarp::compile(tree),
            Language::Collection => collection::compile(tree),
            Language::Cql => cql::compile(tree, &self.options),
            Language::Fcsql => fcsql::compile(tree),
        };

        if diagnostics.has_errors() {
            return Err(Error::Semantic(diagnostics));
        }
        let Some(root) = root else {
            let mut diagnostics = diagnostics;
            diagnostics.report(DiagnosticKind::EmptyQuery).emit();
            return Err(Error::Semantic(diagnostics));
        };

        let (_, warnings) = diagnostics.partition();
        let root = if self.language.is_filter() {
            Root::Collection(root)
        } else {
            Root::Query(root)
        };
        Ok(Compiled { root, warnings })
    }
}
