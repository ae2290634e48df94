//! Contracts with the outside world: the external resolver that answers
//! declaration/definition/implementation/reference queries, and the
//! provider of file text.
//!
//! Both are asynchronous. The engine awaits them one at a time and never
//! holds a lock across an await.

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

use crate::base::{FileUri, Position, SourceLocation, SourceText};

use super::error::RenameError;
use super::options::RenameOptions;

/// The external resolver (a logic-engine backend in practice).
///
/// Locations may be precise or line-level (column 0 to column 0); callers
/// handle both.
#[allow(async_fn_in_trait)]
pub trait Resolver {
    async fn declaration(
        &self,
        file: &FileUri,
        position: Position,
    ) -> Result<Option<SourceLocation>, RenameError>;

    async fn definition(
        &self,
        file: &FileUri,
        position: Position,
    ) -> Result<Option<SourceLocation>, RenameError>;

    /// Zero, one or many implementations (e.g. objects implementing a protocol).
    async fn implementation(
        &self,
        file: &FileUri,
        position: Position,
    ) -> Result<Vec<SourceLocation>, RenameError>;

    async fn references(
        &self,
        file: &FileUri,
        position: Position,
        include_declaration: bool,
    ) -> Result<Vec<SourceLocation>, RenameError>;
}

/// Provides the current text of a file.
#[allow(async_fn_in_trait)]
pub trait SourceProvider {
    async fn read(&self, file: &FileUri) -> Result<String, RenameError>;
}

/// Run one resolver call: honour cancellation first, then bound its duration.
pub(crate) async fn bounded<T>(
    request: &'static str,
    options: &RenameOptions,
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T, RenameError>>,
) -> Result<T, RenameError> {
    if cancel.is_cancelled() {
        tracing::debug!(request, "cancelled before resolver call");
        return Err(RenameError::Cancelled);
    }
    match tokio::time::timeout(options.resolver_timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(RenameError::ResolverTimeout {
            request,
            after: options.resolver_timeout,
        }),
    }
}

/// Per-invocation cache of file snapshots.
///
/// The first read of a file is kept for the rest of the operation so every
/// step sees the same text.
pub struct Snapshots<'a, P> {
    provider: &'a P,
    cache: RwLock<FxHashMap<FileUri, Arc<SourceText>>>,
}

impl<'a, P: SourceProvider> Snapshots<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// Snapshot of `file`, reading it on first use.
    pub async fn get(&self, file: &FileUri) -> Result<Arc<SourceText>, RenameError> {
        if let Some(snapshot) = self.cached(file) {
            return Ok(snapshot);
        }
        let text = self.provider.read(file).await?;
        let snapshot = Arc::new(SourceText::new(file.clone(), &text));
        let mut cache = self.cache.write();
        Ok(cache.entry(file.clone()).or_insert(snapshot).clone())
    }

    pub fn cached(&self, file: &FileUri) -> Option<Arc<SourceText>> {
        self.cache.read().get(file).cloned()
    }

    /// Load every file in `files`, skipping (and logging) unreadable ones.
    pub async fn load_all<'f>(&self, files: impl IntoIterator<Item = &'f FileUri>) {
        for file in files {
            if let Err(error) = self.get(file).await {
                tracing::warn!(%file, %error, "skipping unreadable file");
            }
        }
    }

    /// All snapshots read so far.
    pub fn snapshot_map(&self) -> FxHashMap<FileUri, Arc<SourceText>> {
        self.cache.read().clone()
    }
}
