//! Diagnostic reporting — dedup and stable ordering.
//!
//! Rendering, exit-code mapping and cross-file aggregation belong to the
//! external collaborator (CLI, editor plugin, CI reporter); this module
//! only fixes the sequence.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::base::FileId;
use crate::hir::{Diagnostic, Severity};

/// Deduplicate and stably order a diagnostic list.
///
/// Exact duplicates (same file, location, rule, severity and message) can
/// occur when a declaration is reachable through two model paths; only the
/// first survives. Diagnostics that differ in rule identifier or message
/// are always kept, even at the same location. The result is sorted by
/// (file, line, rule identifier); the sort is stable, so declaration order
/// and rule registration order break remaining ties.
pub fn finalize(diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    type Key = (FileId, u32, u32, Option<Arc<str>>, Severity, Arc<str>);
    let mut seen: FxHashSet<Key> = FxHashSet::default();

    let mut unique: Vec<Diagnostic> = Vec::with_capacity(diagnostics.len());
    for diag in diagnostics {
        let key = (
            diag.file,
            diag.start_line,
            diag.start_col,
            diag.code.clone(),
            diag.severity,
            diag.message.clone(),
        );
        if seen.insert(key) {
            unique.push(diag);
        }
    }

    unique.sort_by(|a, b| {
        (a.file, a.start_line, a.code.as_deref().unwrap_or(""))
            .cmp(&(b.file, b.start_line, b.code.as_deref().unwrap_or("")))
    });
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::LineCol;

    fn diag(line: u32, code: &str, message: &str) -> Diagnostic {
        Diagnostic::warning(FileId::new(0), LineCol::new(line, 0), message).with_code(code)
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let out = finalize(vec![
            diag(3, "a-rule", "same"),
            diag(3, "a-rule", "same"),
        ]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_different_messages_at_same_location_kept() {
        let out = finalize(vec![
            diag(3, "a-rule", "first finding"),
            diag(3, "a-rule", "second finding"),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_different_rules_at_same_location_kept() {
        let out = finalize(vec![
            diag(3, "b-rule", "msg"),
            diag(3, "a-rule", "msg"),
        ]);
        assert_eq!(out.len(), 2);
        // Sorted by rule identifier at the same line.
        assert_eq!(out[0].code.as_deref(), Some("a-rule"));
    }

    #[test]
    fn test_sorted_by_file_then_line() {
        let mut later = diag(1, "a-rule", "msg");
        later.file = FileId::new(1);
        let out = finalize(vec![later, diag(9, "a-rule", "msg"), diag(2, "a-rule", "msg")]);

        assert_eq!(out[0].start_line, 2);
        assert_eq!(out[1].start_line, 9);
        assert_eq!(out[2].file, FileId::new(1));
    }

    #[test]
    fn test_stable_for_identical_keys() {
        let out = finalize(vec![
            diag(3, "a-rule", "emitted first"),
            diag(3, "a-rule", "emitted second"),
        ]);
        assert_eq!(out[0].message.as_ref(), "emitted first");
    }
}
