use std::fmt;

use crate::{Diagnostic, ErrorKind};

/// Collection of diagnostics produced by one compilation.
///
/// `Diagnostics` is passed by reference into every pass. It accumulates
/// semantic diagnostics in report order and counts syntax errors handed over
/// by the parser. Nothing in it is global: its lifetime is one compilation.
///
/// # Examples
///
/// ```rust
/// use xidl_core::{Diagnostics, ErrorKind};
///
/// let mut diagnostics = Diagnostics::new();
/// diagnostics.report(ErrorKind::UnresolvedType, 4, "N.Missing");
///
/// assert!(diagnostics.error_exists(ErrorKind::UnresolvedType, "N.Missing", 4));
/// assert_eq!(diagnostics.semantic_error_count(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
    syntax_errors: usize,
}

impl Diagnostics {
    /// Creates a new, empty diagnostics collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a semantic error of `kind` at `line` against `symbol`.
    pub fn report(&mut self, kind: ErrorKind, line: u32, symbol: impl Into<String>) {
        self.push(Diagnostic::new(kind, line, symbol));
    }

    /// Records a prepared diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(
            kind = %diagnostic.kind,
            line = diagnostic.line,
            symbol = %diagnostic.symbol,
            "semantic error"
        );
        self.diagnostics.push(diagnostic);
    }

    /// Adds syntax errors reported by the parser.
    pub fn add_syntax_errors(&mut self, count: usize) {
        self.syntax_errors += count;
    }

    /// Returns true if a diagnostic with exactly this kind, symbol and line was reported.
    pub fn error_exists(&self, kind: ErrorKind, symbol: &str, line: u32) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == kind && d.line == line && d.symbol == symbol)
    }

    /// Number of diagnostics of `kind`.
    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    /// Number of semantic errors reported.
    pub fn semantic_error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Number of syntax errors reported by the parser.
    pub fn syntax_error_count(&self) -> usize {
        self.syntax_errors
    }

    /// Returns true if any syntax or semantic error was reported.
    pub fn has_errors(&self) -> bool {
        self.syntax_errors > 0 || !self.diagnostics.is_empty()
    }

    /// Returns an iterator over semantic diagnostics in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Returns true if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty() && self.syntax_errors == 0
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection() {
        let d = Diagnostics::new();
        assert!(d.is_empty());
        assert!(!d.has_errors());
        assert_eq!(d.semantic_error_count(), 0);
        assert_eq!(d.syntax_error_count(), 0);
    }

    #[test]
    fn error_exists_requires_exact_match() {
        let mut d = Diagnostics::new();
        d.report(ErrorKind::DuplicateNamespaceMember, 3, "N.E");
        assert!(d.error_exists(ErrorKind::DuplicateNamespaceMember, "N.E", 3));
        assert!(!d.error_exists(ErrorKind::DuplicateNamespaceMember, "N.E", 4));
        assert!(!d.error_exists(ErrorKind::DuplicateNamespaceMember, "E", 3));
        assert!(!d.error_exists(ErrorKind::UnresolvedType, "N.E", 3));
    }

    #[test]
    fn counts_per_kind() {
        let mut d = Diagnostics::new();
        d.report(ErrorKind::CannotOverloadMethod, 2, "Paint");
        d.report(ErrorKind::CannotOverloadMethod, 3, "Paint");
        d.report(ErrorKind::StaticMemberOnly, 5, "Run");
        assert_eq!(d.count_of(ErrorKind::CannotOverloadMethod), 2);
        assert_eq!(d.semantic_error_count(), 3);
    }

    #[test]
    fn syntax_errors_count_separately() {
        let mut d = Diagnostics::new();
        d.add_syntax_errors(2);
        assert!(d.has_errors());
        assert_eq!(d.syntax_error_count(), 2);
        assert_eq!(d.semantic_error_count(), 0);
    }

    #[test]
    fn display_lists_each_diagnostic() {
        let mut d = Diagnostics::new();
        d.report(ErrorKind::UnresolvedType, 1, "N.A");
        d.report(ErrorKind::UnresolvedType, 2, "N.B");
        let text = d.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("N.B"));
    }
}
