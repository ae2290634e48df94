//! Rename orchestration.
//!
//! A rename moves through a fixed sequence of states:
//!
//! ```text
//! Idle → TargetClassified → LocationsCollected → Deduplicated → EditsPlanned → Committed
//!   └──────────────┴───────────────┴──────────────────┴──────────────┴──────→ Failed
//! ```
//!
//! Every edit for every file is computed before anything is returned, so a
//! failure at any step leaves the workspace untouched.

use std::fmt;

use tokio_util::sync::CancellationToken;

use crate::base::{FileUri, Position, Range};

use super::error::RenameError;
use super::locations::{
    CandidateLocation, collect_entity_locations, collect_predicate_locations, deduplicate,
};
use super::options::RenameOptions;
use super::planner::{EditSet, plan_entity, plan_predicate, plan_variable};
use super::resolver::{Resolver, Snapshots, SourceProvider};
use super::target::{RenameTarget, TargetAtCursor, classify_target};
use super::text_utils::{validate_atom_name, validate_variable_name};

/// States of a single rename invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameState {
    Idle,
    TargetClassified,
    LocationsCollected,
    Deduplicated,
    EditsPlanned,
    Committed,
    Failed,
}

/// Counts reported to the user after a successful rename.
///
/// Advisory only: nothing re-checks them once the edits are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameSummary {
    pub edits: usize,
    pub files: usize,
}

impl fmt::Display for RenameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Renamed {} occurrence(s) in {} file(s)",
            self.edits, self.files
        )
    }
}

/// The result of a successful rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub target: RenameTarget,
    pub edits: EditSet,
    pub summary: RenameSummary,
}

/// Tracks and logs the state of one invocation.
#[derive(Debug)]
struct RenameRun {
    state: RenameState,
}

impl RenameRun {
    fn new() -> Self {
        Self {
            state: RenameState::Idle,
        }
    }

    fn advance(&mut self, next: RenameState) {
        tracing::debug!(from = ?self.state, state = ?next, "rename transition");
        self.state = next;
    }

    fn fail(&mut self, error: RenameError) -> RenameError {
        tracing::debug!(from = ?self.state, state = ?RenameState::Failed, %error, "rename failed");
        self.state = RenameState::Failed;
        error
    }
}

/// Rename capability over an external resolver and a source provider.
pub struct RenameEngine<'a, R, P> {
    resolver: &'a R,
    sources: &'a P,
    options: RenameOptions,
}

impl<'a, R: Resolver, P: SourceProvider> RenameEngine<'a, R, P> {
    pub fn new(resolver: &'a R, sources: &'a P, options: RenameOptions) -> Self {
        Self {
            resolver,
            sources,
            options,
        }
    }

    /// The range of the renameable name at `position`, or `None` when the
    /// cursor is over a comment, a string or anything else that cannot be
    /// renamed.
    pub async fn prepare_rename(&self, doc: &FileUri, position: Position) -> Option<Range> {
        let snapshots = Snapshots::new(self.sources);
        let source = match snapshots.get(doc).await {
            Ok(source) => source,
            Err(error) => {
                tracing::warn!(%doc, %error, "cannot prepare rename");
                return None;
            }
        };
        classify_target(&source, position).map(|at| at.range)
    }

    /// Rename the construct at `position` to `new_name`, returning the edits
    /// for every affected file or the reason nothing can be renamed.
    pub async fn rename(
        &self,
        doc: &FileUri,
        position: Position,
        new_name: &str,
        cancel: &CancellationToken,
    ) -> Result<RenameOutcome, RenameError> {
        let mut run = RenameRun::new();
        match self.execute(&mut run, doc, position, new_name, cancel).await {
            Ok(outcome) => {
                run.advance(RenameState::Committed);
                tracing::info!(
                    symbol = %outcome.target,
                    edits = outcome.summary.edits,
                    files = outcome.summary.files,
                    "{}",
                    outcome.summary
                );
                Ok(outcome)
            }
            Err(error) => Err(run.fail(error)),
        }
    }

    /// Like [`rename`](Self::rename), but logs the failure and returns `None`.
    pub async fn provide_rename_edits(
        &self,
        doc: &FileUri,
        position: Position,
        new_name: &str,
        cancel: &CancellationToken,
    ) -> Option<RenameOutcome> {
        match self.rename(doc, position, new_name, cancel).await {
            Ok(outcome) => Some(outcome),
            Err(error) => {
                tracing::warn!(%doc, line = position.line, column = position.column, %error, "rename failed");
                None
            }
        }
    }

    async fn execute(
        &self,
        run: &mut RenameRun,
        doc: &FileUri,
        position: Position,
        new_name: &str,
        cancel: &CancellationToken,
    ) -> Result<RenameOutcome, RenameError> {
        if cancel.is_cancelled() {
            return Err(RenameError::Cancelled);
        }
        let snapshots = Snapshots::new(self.sources);
        let source = snapshots.get(doc).await?;

        let TargetAtCursor { target, .. } =
            classify_target(&source, position).ok_or(RenameError::NothingToRename {
                file: doc.clone(),
                line: position.line,
                column: position.column,
            })?;
        match &target {
            RenameTarget::Variable { .. } => validate_variable_name(new_name)?,
            _ => validate_atom_name(new_name)?,
        }
        run.advance(RenameState::TargetClassified);
        tracing::debug!(symbol = %target, new_name, "rename target");

        let (target, edits) = match target {
            RenameTarget::Variable { name, scope } => {
                // Variables never leave their clause, directive or entity
                run.advance(RenameState::LocationsCollected);
                run.advance(RenameState::Deduplicated);
                let edits = plan_variable(&source, &name, scope, new_name, &self.options);
                (RenameTarget::Variable { name, scope }, edits)
            }
            RenameTarget::Predicate(indicator) => {
                let (indicator, locations) = collect_predicate_locations(
                    self.resolver,
                    &snapshots,
                    doc,
                    position,
                    &indicator,
                    &self.options,
                    cancel,
                )
                .await?;
                run.advance(RenameState::LocationsCollected);
                let locations = self.dedup(run, &snapshots, locations).await;
                let sources = snapshots.snapshot_map();
                let edits = plan_predicate(&indicator, &locations, &sources, new_name, &self.options);
                (RenameTarget::Predicate(indicator), edits)
            }
            RenameTarget::Entity { name, arity } => {
                let locations = collect_entity_locations(
                    self.resolver,
                    &snapshots,
                    doc,
                    position,
                    &name,
                    arity,
                    &self.options,
                    cancel,
                )
                .await?;
                run.advance(RenameState::LocationsCollected);
                let locations = self.dedup(run, &snapshots, locations).await;
                let sources = snapshots.snapshot_map();
                let edits = plan_entity(&name, arity, &locations, &sources, new_name);
                (RenameTarget::Entity { name, arity }, edits)
            }
        };

        if cancel.is_cancelled() {
            return Err(RenameError::Cancelled);
        }
        if edits.is_empty() {
            return Err(RenameError::no_locations(&target));
        }
        run.advance(RenameState::EditsPlanned);

        let summary = RenameSummary {
            edits: edits.edit_count(),
            files: edits.file_count(),
        };
        Ok(RenameOutcome {
            target,
            edits,
            summary,
        })
    }

    /// Deduplicate and load every file the locations touch.
    async fn dedup(
        &self,
        run: &mut RenameRun,
        snapshots: &Snapshots<'_, P>,
        locations: Vec<CandidateLocation>,
    ) -> Vec<CandidateLocation> {
        let locations = deduplicate(locations);
        run.advance(RenameState::Deduplicated);
        snapshots
            .load_all(locations.iter().map(|candidate| &candidate.location.file))
            .await;
        locations
    }
}
