//! Error types for sgrep

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rule loading, tree building and path resolution.
///
/// Every variant is fatal for a run: the binary reports it and exits.
#[derive(Error, Debug)]
pub enum SgrepError {
    /// A directory could not be listed or a rule file could not be read
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rule pattern is not a valid glob
    #[error("Invalid pattern '{pattern}' in {rule_file}: {source}")]
    Pattern {
        rule_file: PathBuf,
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A queried path does not lie under the tree it was resolved against
    #[error("Path {path} is not covered by the rule tree (no node for '{segment}')")]
    TreeMismatch { path: PathBuf, segment: String },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// The external search tool could not be started
    #[error("Failed to run search tool '{program}': {source}")]
    SearchTool {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl SgrepError {
    /// Create a new I/O error tied to the offending path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new tree mismatch error
    pub fn tree_mismatch(path: impl Into<PathBuf>, segment: impl Into<String>) -> Self {
        Self::TreeMismatch {
            path: path.into(),
            segment: segment.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

/// Result type alias for sgrep operations
pub type Result<T> = std::result::Result<T, SgrepError>;
