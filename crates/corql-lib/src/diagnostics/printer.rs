//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use super::Diagnostics;

/// Builder for rendering diagnostics with various options.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    query: Option<&'s str>,
    language: Option<&'s str>,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            query: None,
            language: None,
        }
    }

    /// Echo the offending query under each diagnostic.
    pub fn query(mut self, query: &'s str) -> Self {
        self.query = Some(query);
        self
    }

    pub fn language(mut self, language: &'s str) -> Self {
        self.language = Some(language);
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{diag}")?;
            match (self.language, self.query) {
                (Some(language), Some(query)) => write!(w, "\n  --> {language}: {query}")?,
                (None, Some(query)) => write!(w, "\n  --> {query}")?,
                _ => {}
            }
        }
        Ok(())
    }
}
