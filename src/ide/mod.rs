//! IDE features: navigation and rename for editor handlers.
//!
//! This module sits between the external resolver (a logic-engine backend
//! that knows where things are declared, defined and referenced) and the
//! editor. Each public entry point corresponds to one editor request.
//!
//! ## Design Principles
//!
//! 1. **Snapshot per request**: every file is read once per invocation
//! 2. **No editor types**: uses our own types, converted at the boundary
//! 3. **All or nothing**: edits for every file are planned before any is returned
//!
//! ## Usage
//!
//! ```ignore
//! use lgtnav::ide::{RenameEngine, RenameOptions};
//! use tokio_util::sync::CancellationToken;
//!
//! let engine = RenameEngine::new(&resolver, &workspace, RenameOptions::default());
//! let range = engine.prepare_rename(&doc, position).await;
//! let outcome = engine.rename(&doc, position, "total", &CancellationToken::new()).await?;
//! println!("{}", outcome.summary);
//! ```

mod error;
mod goto;
mod locations;
mod marker;
mod options;
mod planner;
mod rename;
mod resolver;
mod target;
pub mod text_utils;

pub use error::RenameError;
pub use goto::goto_declaration;
pub use locations::{
    CandidateLocation, Origin, collect_entity_locations, collect_predicate_locations,
    deduplicate, expand_clause_chains,
};
pub use marker::wait_for_marker;
pub use options::{MarkerOptions, RenameOptions};
pub use planner::{
    EditSet, SourceMap, TextEdit, apply_edits, plan_entity, plan_predicate, plan_variable,
};
pub use rename::{RenameEngine, RenameOutcome, RenameState, RenameSummary};
pub use resolver::{Resolver, Snapshots, SourceProvider};
pub use target::{RenameTarget, TargetAtCursor, classify_target};
pub use text_utils::{validate_atom_name, validate_variable_name};
