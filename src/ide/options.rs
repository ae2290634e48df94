//! Rename and navigation options

use std::time::Duration;

/// Options for rename and navigation requests
#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// Upper bound for each awaited resolver call
    pub resolver_timeout: Duration,
    /// Extend definitions into the consecutive clauses that follow them
    pub expand_clause_chains: bool,
    /// Follow `dynamic/1`, `mode/2`, ... directives after a scope directive
    pub follow_sibling_directives: bool,
    /// Rename variable occurrences inside comments of the variable's scope
    pub rename_variables_in_comments: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            resolver_timeout: Duration::from_secs(10),
            expand_clause_chains: true,
            follow_sibling_directives: true,
            rename_variables_in_comments: true,
        }
    }
}

/// Options for polling a backend completion marker file
#[derive(Debug, Clone)]
pub struct MarkerOptions {
    /// Delay between two existence checks
    pub poll_interval: Duration,
    /// Give up after this long
    pub timeout: Duration,
    /// Delete the marker once it has been seen
    pub remove_after_read: bool,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            timeout: Duration::from_secs(10),
            remove_after_read: true,
        }
    }
}
