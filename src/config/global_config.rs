//! Global configuration management
//!
//! User defaults are stored in the platform config directory
//! (`~/.config/sgrep/config.toml` on Linux). Every value can be overridden on
//! the command line.

use crate::core::error::{Result, SgrepError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable that points at an alternative config file
pub const CONFIG_ENV_VAR: &str = "SGREP_CONFIG";

/// Global configuration for sgrep
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// How rule files are found and read
    pub rules: RuleConfig,
    /// How the external search tool is driven
    pub search: SearchConfig,
}

/// Rule file settings shared by the parser and the tree builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Name of the per-directory rule file
    pub filename: String,
    /// Everything from this character to end of line is a comment
    pub comment_marker: char,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            filename: ".sgrep".to_string(),
            comment_marker: '#',
        }
    }
}

/// External search tool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Program invoked to perform the text search
    pub grep_bin: String,
    /// Default color mode when --color is not given
    pub color: ColorMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            grep_bin: "grep".to_string(),
            color: ColorMode::Auto,
        }
    }
}

/// Color mode forwarded to the search tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve `Auto` against whether our stdout is a terminal.
    ///
    /// The search tool writes into a pipe, so it cannot make this call itself.
    pub fn resolve(self, stdout_is_tty: bool) -> ColorMode {
        match self {
            ColorMode::Auto if stdout_is_tty => ColorMode::Always,
            ColorMode::Auto => ColorMode::Never,
            other => other,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColorMode::Auto => "auto",
            ColorMode::Always => "always",
            ColorMode::Never => "never",
        };
        f.write_str(s)
    }
}

impl GlobalConfig {
    /// Load global configuration from disk
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file, falling back to defaults when it is absent
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|e| SgrepError::io(config_path, e))?;
        let config: GlobalConfig = toml::from_str(&content).map_err(|e| {
            SgrepError::configuration(format!(
                "Failed to parse {}: {}",
                config_path.display(),
                e
            ))
        })?;

        if config.rules.filename.is_empty() {
            return Err(SgrepError::configuration("rules.filename must not be empty"));
        }

        Ok(config)
    }

    /// Get the path to the global configuration file.
    ///
    /// Kept out of the home directory itself, where a `.sgrep` entry is a
    /// rule file.
    pub fn get_config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("", "", "sgrep").ok_or(SgrepError::HomeDirectoryNotFound)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
