//! In-memory workspace and scripted resolver for driving the rename engine.

use std::time::Duration;

use lgtnav::base::{FileUri, Position, Range, SourceLocation};
use lgtnav::ide::{EditSet, RenameError, Resolver, SourceProvider, apply_edits};
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

/// Files held in memory, keyed by URI.
#[derive(Default)]
pub struct MemoryWorkspace {
    files: RwLock<FxHashMap<FileUri, String>>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, uri: &str, text: &str) -> Self {
        self.files.write().insert(FileUri::new(uri), text.to_string());
        self
    }

    pub fn text(&self, uri: &str) -> String {
        self.files
            .read()
            .get(&FileUri::new(uri))
            .cloned()
            .unwrap_or_else(|| panic!("no file {uri} in workspace"))
    }

    /// Apply every edit of `edits`, as an editor would.
    pub fn apply(&self, edits: &EditSet) {
        let mut files = self.files.write();
        for (file, file_edits) in edits.iter() {
            let text = files
                .get(file)
                .unwrap_or_else(|| panic!("edit for unknown file {file}"));
            let updated = apply_edits(text, file_edits);
            files.insert(file.clone(), updated);
        }
    }
}

impl SourceProvider for MemoryWorkspace {
    async fn read(&self, file: &FileUri) -> Result<String, RenameError> {
        self.files
            .read()
            .get(file)
            .cloned()
            .ok_or_else(|| RenameError::source(file, "not in workspace"))
    }
}

/// One resolver call, as recorded by [`ScriptedResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverCall {
    pub request: &'static str,
    pub file: FileUri,
    pub position: Position,
}

/// A resolver that returns fixed answers, whatever the position.
#[derive(Default)]
pub struct ScriptedResolver {
    declaration: Option<SourceLocation>,
    definition: Option<SourceLocation>,
    implementations: Vec<SourceLocation>,
    references: Vec<SourceLocation>,
    delay: Option<Duration>,
    failure: Option<String>,
    calls: Mutex<Vec<ResolverCall>>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declaration(mut self, location: SourceLocation) -> Self {
        self.declaration = Some(location);
        self
    }

    pub fn definition(mut self, location: SourceLocation) -> Self {
        self.definition = Some(location);
        self
    }

    pub fn implementation(mut self, location: SourceLocation) -> Self {
        self.implementations.push(location);
        self
    }

    pub fn reference(mut self, location: SourceLocation) -> Self {
        self.references.push(location);
        self
    }

    /// Make every call take `delay` before answering.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every call fail with `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ResolverCall> {
        self.calls.lock().clone()
    }

    pub fn requests(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(|call| call.request).collect()
    }

    async fn answer<T: Clone>(
        &self,
        request: &'static str,
        file: &FileUri,
        position: Position,
        value: &T,
    ) -> Result<T, RenameError> {
        self.calls.lock().push(ResolverCall {
            request,
            file: file.clone(),
            position,
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(message) => Err(RenameError::resolver(message.clone())),
            None => Ok(value.clone()),
        }
    }
}

impl Resolver for ScriptedResolver {
    async fn declaration(
        &self,
        file: &FileUri,
        position: Position,
    ) -> Result<Option<SourceLocation>, RenameError> {
        self.answer("declaration", file, position, &self.declaration)
            .await
    }

    async fn definition(
        &self,
        file: &FileUri,
        position: Position,
    ) -> Result<Option<SourceLocation>, RenameError> {
        self.answer("definition", file, position, &self.definition)
            .await
    }

    async fn implementation(
        &self,
        file: &FileUri,
        position: Position,
    ) -> Result<Vec<SourceLocation>, RenameError> {
        self.answer("implementation", file, position, &self.implementations)
            .await
    }

    async fn references(
        &self,
        file: &FileUri,
        position: Position,
        _include_declaration: bool,
    ) -> Result<Vec<SourceLocation>, RenameError> {
        self.answer("references", file, position, &self.references)
            .await
    }
}

/// A line-level location, as a backend reporting only lines returns.
pub fn line(file: &str, line: u32) -> SourceLocation {
    SourceLocation::line_level(FileUri::new(file), line)
}

/// A precise single-line location.
pub fn span(file: &str, line: u32, start: u32, end: u32) -> SourceLocation {
    SourceLocation::new(FileUri::new(file), Range::on_line(line, start, end))
}
