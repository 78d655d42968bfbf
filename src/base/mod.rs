//! Foundation types for the objlint analyzer.
//!
//! This module provides the primitives used throughout the pipeline:
//! - [`FileId`] - Interned file identifiers
//! - [`TextRange`], [`TextSize`] - Byte positions in source text
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//!
//! This module has NO dependencies on other objlint modules.

mod file_id;
mod span;

pub use file_id::FileId;
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
