//! Diagnostics — structured findings emitted by the rule engine.
//!
//! A diagnostic is never an exception: semantic legacy-pattern findings are
//! collected and returned, and only the two structural error kinds
//! ([`SyntaxError`](crate::syntax::SyntaxError), recovered per construct,
//! and [`ModelError`](super::ModelError), aborting one file) exist outside
//! this module.

use std::sync::Arc;

use crate::base::{FileId, LineCol};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: FileId,
    /// Start line (0-indexed).
    pub start_line: u32,
    /// Start column (0-indexed).
    pub start_col: u32,
    /// End line (0-indexed).
    pub end_line: u32,
    /// End column (0-indexed).
    pub end_col: u32,
    /// Severity level.
    pub severity: Severity,
    /// Rule identifier (e.g. "ownership-type-mismatch").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// Optional related information.
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RelatedInfo {
    /// The file containing this info.
    pub file: FileId,
    /// Line number.
    pub line: u32,
    /// Column number.
    pub col: u32,
    /// The message.
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a diagnostic with an explicit severity.
    pub fn new(
        severity: Severity,
        file: FileId,
        loc: LineCol,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            file,
            start_line: loc.line,
            start_col: loc.col,
            end_line: loc.line,
            end_col: loc.col,
            severity,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(file: FileId, loc: LineCol, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, file, loc, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(file: FileId, loc: LineCol, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, file, loc, message)
    }

    /// Create a new info diagnostic.
    pub fn info(file: FileId, loc: LineCol, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Info, file, loc, message)
    }

    /// Set the span (range) for this diagnostic.
    pub fn with_span(mut self, end: LineCol) -> Self {
        self.end_line = end.line;
        self.end_col = end.col;
        self
    }

    /// Set the rule identifier.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Add related information.
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during analysis of one file.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Get all diagnostics collected so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_warning() {
        let diag = Diagnostic::warning(FileId::new(0), LineCol::new(10, 5), "test warning");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.start_line, 10);
        assert_eq!(diag.start_col, 5);
    }

    #[test]
    fn test_diagnostic_with_code() {
        let diag = Diagnostic::warning(FileId::new(0), LineCol::new(0, 0), "test")
            .with_code("ownership-type-mismatch");
        assert_eq!(diag.code.as_deref(), Some("ownership-type-mismatch"));
    }

    #[test]
    fn test_diagnostic_with_related() {
        let diag = Diagnostic::warning(FileId::new(0), LineCol::new(4, 0), "undeclared")
            .with_related(RelatedInfo {
                file: FileId::new(0),
                line: 1,
                col: 0,
                message: Arc::from("interface declared here"),
            });
        assert_eq!(diag.related.len(), 1);
        assert_eq!(diag.related[0].line, 1);
    }

    #[test]
    fn test_collector_counts() {
        let mut collector = DiagnosticCollector::new();
        collector.add(Diagnostic::error(FileId::new(0), LineCol::new(0, 0), "e"));
        collector.add(Diagnostic::warning(FileId::new(0), LineCol::new(0, 0), "w1"));
        collector.add(Diagnostic::warning(FileId::new(0), LineCol::new(1, 0), "w2"));

        assert_eq!(collector.error_count(), 1);
        assert_eq!(collector.warning_count(), 2);
        assert!(collector.has_errors());
    }

    #[test]
    fn test_collector_take_empties() {
        let mut collector = DiagnosticCollector::new();
        collector.add(Diagnostic::info(FileId::new(0), LineCol::new(0, 0), "i"));

        let taken = collector.take();
        assert_eq!(taken.len(), 1);
        assert!(collector.diagnostics().is_empty());
    }

    #[test]
    fn test_severity_to_lsp() {
        assert_eq!(Severity::Error.to_lsp(), 1);
        assert_eq!(Severity::Warning.to_lsp(), 2);
        assert_eq!(Severity::Info.to_lsp(), 3);
        assert_eq!(Severity::Hint.to_lsp(), 4);
    }
}
