//! sgrep - grep that honours per-directory ignore rules
//!
//! sgrep walks the directories being searched, and every directory above
//! them, looking for `.sgrep` rule files. Each rule file lists glob patterns
//! for files that should not be searched. The surviving file list is handed
//! to an external `grep`, whose output is relayed unchanged.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use sgrep::{FilteredFileScanner, RuleConfig};
//! use std::path::PathBuf;
//!
//! let scanner = FilteredFileScanner::new(RuleConfig::default());
//! let files = scanner.scan_all(&[PathBuf::from("./src")])?;
//! for file in files {
//!     println!("{}", file.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod ignore;

// Re-export commonly used types
pub use crate::core::error::{Result, SgrepError};

pub use config::{ColorMode, GlobalConfig, RuleConfig, SearchConfig};

pub use ignore::{
    builder::TreeBuilder, parser::RuleParser, resolver::should_exclude, rule::Rule,
    scanner::FilteredFileScanner, tree::DirectoryNode,
};

/// Current version of sgrep
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
