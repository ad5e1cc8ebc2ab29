//! Rule-file driven file filtering
//!
//! Any directory may hold a rule file (`.sgrep` by default) listing glob
//! patterns. A pattern applies to everything at or below the directory that
//! declares it, including directories above the search root: the tree built
//! here always reaches from the filesystem root down through the search root.

pub mod builder;
pub mod parser;
pub mod resolver;
pub mod rule;
pub mod scanner;
pub mod tree;

// Re-export commonly used items
pub use builder::TreeBuilder;
pub use parser::RuleParser;
pub use resolver::should_exclude;
pub use rule::Rule;
pub use scanner::FilteredFileScanner;
pub use tree::DirectoryNode;
