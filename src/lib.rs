//! # objlint-base
//!
//! Core library for Objective-C interface parsing, symbol modeling, and
//! legacy-pattern analysis.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! analysis → Pipeline entry points and the parallel batch driver
//!   ↓
//! report   → Diagnostic dedup and stable ordering
//!   ↓
//! rules    → Stateless rule engine over the symbol model
//!   ↓
//! hir      → Symbol model, model builder, diagnostics, file store
//!   ↓
//! syntax   → Lexer (logos) + best-effort parser
//!   ↓
//! base     → Primitives (FileId, LineCol, LineIndex)
//! ```
//!
//! The core never touches the filesystem: callers hand in text blobs keyed
//! by [`FileId`] (usually through a [`FileStore`]) and get back an ordered
//! sequence of [`Diagnostic`] records. Semantic legacy-pattern findings are
//! always diagnostics, never errors; the only file-level failure is a
//! structurally impossible input ([`ModelError`]).
//!
//! ## Usage
//!
//! ```
//! use objlint::{AnalysisConfig, FileId, analyze_source};
//!
//! let text = "@interface T\n@property (nonatomic, assign) NSString *name;\n@end";
//! let diagnostics = analyze_source(FileId::new(0), text, &AnalysisConfig::default()).unwrap();
//! assert_eq!(diagnostics.len(), 1);
//! ```

/// Foundation types: FileId, LineCol, LineIndex
pub mod base;

/// Symbol model: declarations, diagnostics, file store
pub mod hir;

/// Rule engine: configuration, registry, rule implementations
pub mod rules;

/// Lexer and best-effort parser
pub mod syntax;

/// Diagnostic dedup and ordering
pub mod report;

/// Pipeline entry points
pub mod analysis;

// Re-export the analyzer surface
pub use analysis::{FileOutcome, analyze_source, analyze_store};
pub use base::{FileId, LineCol, LineIndex, TextRange, TextSize};
pub use hir::{Diagnostic, FileStore, HeaderFile, ModelError, Severity};
pub use rules::{AnalysisConfig, Rule};
pub use syntax::SyntaxError;
