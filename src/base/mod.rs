//! Foundation types for the lgtnav toolchain.
//!
//! This module provides fundamental types used throughout the engine:
//! - [`FileUri`] - Cheap-clone file identity
//! - [`SourceText`] - Immutable, bounds-checked line snapshot of a file
//! - [`Position`], [`Range`] - Line/column positions (0-indexed)
//! - [`LineSpan`] - Inclusive line spans for clause/directive/entity boundaries
//! - [`SourceLocation`] - A range inside a specific file
//! - Logtalk vocabulary constants (directive tables, entity kinds)
//!
//! This module has NO dependencies on other lgtnav modules.

pub mod constants;
mod file;
mod position;

pub use file::{FileUri, SourceText};
pub use position::{LineSpan, Position, Range};

/// A range inside a specific file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub file: FileUri,
    pub range: Range,
}

impl SourceLocation {
    pub fn new(file: FileUri, range: Range) -> Self {
        Self { file, range }
    }

    /// A location that only pins down a line.
    pub fn line_level(file: FileUri, line: u32) -> Self {
        Self {
            file,
            range: Range::line_level(line),
        }
    }

    pub fn line(&self) -> u32 {
        self.range.start.line
    }
}
