//! Error types for navigation and rename operations.

use std::time::Duration;

use thiserror::Error;

use crate::base::FileUri;

/// Errors that can occur while navigating or renaming.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The requested new name is not a valid atom or variable.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// The cursor is not over anything that can be renamed.
    #[error("Nothing to rename at {file}:{line}:{column}")]
    NothingToRename {
        file: FileUri,
        line: u32,
        column: u32,
    },

    /// No declaration, definition or reference could be found.
    #[error("No locations found for {target}")]
    NoLocationsFound { target: String },

    /// A location points past the end of its file's current text.
    #[error("Stale location {file}:{line} (file has {line_count} lines)")]
    StaleLocation {
        file: FileUri,
        line: u32,
        line_count: u32,
    },

    /// The resolver (or its completion marker) did not answer in time.
    #[error("Resolver request '{request}' timed out after {after:?}")]
    ResolverTimeout {
        request: &'static str,
        after: Duration,
    },

    /// The resolver reported a failure.
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// A file snapshot could not be read.
    #[error("Cannot read {file}: {message}")]
    Source { file: FileUri, message: String },

    /// IO error during marker housekeeping.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation was cancelled before it completed.
    #[error("Operation cancelled")]
    Cancelled,
}

impl RenameError {
    /// Create an invalid name error.
    pub fn invalid_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason,
        }
    }

    /// Create a no-locations error for a target description.
    pub fn no_locations(target: impl ToString) -> Self {
        Self::NoLocationsFound {
            target: target.to_string(),
        }
    }

    /// Create a resolver error.
    pub fn resolver(message: impl Into<String>) -> Self {
        Self::Resolver(message.into())
    }

    /// Create a source read error.
    pub fn source(file: &FileUri, message: impl Into<String>) -> Self {
        Self::Source {
            file: file.clone(),
            message: message.into(),
        }
    }
}
