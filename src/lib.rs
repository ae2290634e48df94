//! # lgtnav-base
//!
//! Structural boundary analysis, navigation and safe rename for Logtalk
//! source code.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Rename orchestration, location collection, edit planning, goto
//!   ↓
//! syntax    → Lexical classification, delimiters, indicators, boundaries
//!   ↓
//! base      → Primitives (FileUri, SourceText, Position, Range, LineSpan)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → ide)
// ============================================================================

/// Foundation types: FileUri, SourceText, Position, Range
pub mod base;

/// Syntax: heuristic scanners over lines and flattened text windows
pub mod syntax;

/// IDE features: rename, go-to-declaration, marker polling
pub mod ide;

// Re-export foundation types
pub use base::{FileUri, LineSpan, Position, Range, SourceLocation, SourceText};

// Re-export the rename surface
pub use ide::{
    EditSet, RenameEngine, RenameError, RenameOptions, RenameOutcome, Resolver, SourceProvider,
    TextEdit,
};
