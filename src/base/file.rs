//! File identity and immutable text snapshots.

use std::fmt;
use std::sync::Arc;

/// Identity of a source file (usually a `file://` URI or a path).
///
/// Cheap to clone; ordering is lexicographic so edit sets come out sorted by file.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileUri(Arc<str>);

impl FileUri {
    pub fn new(uri: impl AsRef<str>) -> Self {
        Self(Arc::from(uri.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FileUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileUri({})", self.0)
    }
}

impl fmt::Display for FileUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileUri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FileUri {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

/// A read-only snapshot of one file's text, split into lines.
///
/// Every accessor is bounds-checked: line numbers coming back from the
/// resolver may be stale if the file changed between two awaited steps.
#[derive(Debug, Clone)]
pub struct SourceText {
    uri: FileUri,
    lines: Vec<String>,
}

impl SourceText {
    pub fn new(uri: FileUri, text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self { uri, lines }
    }

    pub fn uri(&self) -> &FileUri {
        &self.uri
    }

    pub fn line(&self, line: u32) -> Option<&str> {
        self.lines.get(line as usize).map(String::as_str)
    }

    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Index of the last line, or `None` for an impossible empty snapshot.
    pub fn last_line(&self) -> Option<u32> {
        self.line_count().checked_sub(1)
    }
}
