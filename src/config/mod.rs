//! Configuration management for sgrep
//!
//! Rule file naming and search tool defaults, stored in the platform config
//! directory as `sgrep/config.toml`

pub mod global_config;

// Re-export commonly used items
pub use global_config::{ColorMode, GlobalConfig, RuleConfig, SearchConfig};
