//! Shared test helpers.

pub mod source_fixtures;
pub mod workspace;
