//! Test utilities for sgrep tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory tree with automatic cleanup
pub struct TestTree {
    pub temp_dir: TempDir,
    root: PathBuf,
}

impl TestTree {
    /// Create a new empty tree in a canonical temporary directory
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = dunce::canonicalize(temp_dir.path())?;
        Ok(Self { temp_dir, root })
    }

    /// Canonical root of the tree
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` inside the tree
    pub fn join(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a file, creating parent directories as needed
    pub fn file(&self, relative: &str, content: &str) -> anyhow::Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a `.sgrep` rule file into `dir` (relative, "" for the root)
    pub fn rules(&self, dir: &str, content: &str) -> anyhow::Result<PathBuf> {
        let relative = if dir.is_empty() {
            ".sgrep".to_string()
        } else {
            format!("{}/.sgrep", dir)
        };
        self.file(&relative, content)
    }

    /// Create a directory
    pub fn dir(&self, relative: &str) -> anyhow::Result<PathBuf> {
        let path = self.join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }
}
