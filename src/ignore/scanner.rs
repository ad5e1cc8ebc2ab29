//! File scanner that turns search roots into the list of files to search

use crate::config::RuleConfig;
use crate::core::error::{Result, SgrepError};
use crate::ignore::builder::TreeBuilder;
use crate::ignore::resolver::should_exclude;
use crate::ignore::tree::DirectoryNode;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File scanner with rule-file filtering
#[derive(Debug, Clone)]
pub struct FilteredFileScanner {
    builder: TreeBuilder,
}

impl FilteredFileScanner {
    /// Create a new filtered file scanner
    pub fn new(config: RuleConfig) -> Self {
        Self {
            builder: TreeBuilder::new(config),
        }
    }

    /// The assembled tree for one search root, from the filesystem root down
    pub fn tree_for(&self, root: &Path) -> Result<DirectoryNode> {
        self.builder.generate_tree(root)
    }

    /// Absolute paths of every file under `root` that no rule excludes
    pub fn scan_directory(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let files = self.tree_for(root)?.collect_unfiltered_paths()?;
        tracing::debug!("{} files kept under {}", files.len(), root.display());
        Ok(files)
    }

    /// Scan multiple roots, concatenating results in order
    pub fn scan_all(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for root in roots {
            files.extend(self.scan_directory(root)?);
        }
        Ok(files)
    }

    /// Absolute paths of every file under the roots, without filtering
    pub fn list_all(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for root in roots {
            files.extend(self.tree_for(root)?.collect_all_paths());
        }
        Ok(files)
    }

    /// Keep the named files that no rule excludes.
    ///
    /// One rule chain is built per distinct parent directory. Only the parent
    /// is canonicalized, so a symlink is judged by the rules where the link
    /// lives, not where it points. Survivors are returned in input order,
    /// spelled as given.
    pub fn filter_named_files(&self, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut resolved = Vec::with_capacity(files.len());
        let mut trees: IndexMap<PathBuf, DirectoryNode> = IndexMap::new();

        for file in files {
            let (directory, absolute) = locate_named_file(file)?;

            if !trees.contains_key(&directory) {
                let tree = self.builder.build_upward(&directory)?;
                trees.insert(directory.clone(), tree);
            }
            resolved.push((file, absolute, directory));
        }

        let mut kept = Vec::new();
        for (file, absolute, directory) in resolved {
            let tree = &trees[&directory];
            if should_exclude(tree, &absolute)? {
                tracing::debug!("Skipping excluded file {}", file.display());
            } else {
                kept.push(file.clone());
            }
        }

        Ok(kept)
    }
}

/// Canonical parent directory of `file`, and the absolute path of `file`
/// inside it. The file itself may be a symlink and is not resolved.
fn locate_named_file(file: &Path) -> Result<(PathBuf, PathBuf)> {
    fs::symlink_metadata(file).map_err(|e| SgrepError::io(file, e))?;

    let name = file
        .file_name()
        .ok_or_else(|| SgrepError::tree_mismatch(file, file.to_string_lossy()))?;
    let parent = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let directory = dunce::canonicalize(parent).map_err(|e| SgrepError::io(parent, e))?;
    let absolute = directory.join(name);
    Ok((directory, absolute))
}

impl Default for FilteredFileScanner {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}
