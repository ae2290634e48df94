//! Syntax layer tests
//!
//! Tests for:
//! - Term, directive and entity boundaries
//! - Indicators and occurrence forms

pub mod tests_boundary;
pub mod tests_indicator;
