//! IDE feature tests
//!
//! Tests for:
//! - Rename (predicates, non-terminals, entities, variables)
//! - Go to declaration

pub mod tests_goto;
