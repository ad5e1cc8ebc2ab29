//! Builds the rule tree for a search root
//!
//! The tree has two halves. The downward half is the search root and
//! everything below it, listed from disk. The upward half is a linear chain
//! from the filesystem root to the search root's parent that only carries
//! rules. The downward half is spliced onto the bottom of the chain so that
//! every rule file from `/` down applies to the files being searched.

use crate::config::RuleConfig;
use crate::core::error::{Result, SgrepError};
use crate::ignore::parser::RuleParser;
use crate::ignore::tree::DirectoryNode;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Builds [`DirectoryNode`] trees from the filesystem
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    config: RuleConfig,
    parser: RuleParser,
}

impl TreeBuilder {
    pub fn new(config: RuleConfig) -> Self {
        let parser = RuleParser::new(&config);
        Self { config, parser }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Build the subtree for `root_path`: its rules, its files and all its
    /// subdirectories.
    ///
    /// Symlinks are never followed. A link to a directory is left out, any
    /// other link is listed as a file.
    pub fn build_downward(&self, root_path: &Path) -> Result<DirectoryNode> {
        let metadata = fs::metadata(root_path).map_err(|e| SgrepError::io(root_path, e))?;
        if !metadata.is_dir() {
            return Err(SgrepError::io(
                root_path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }

        let mut node = self.node_for(root_path)?;

        let listing = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        tracing::debug!("Listing {}", root_path.display());
        for entry in listing {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root_path).to_path_buf();
                SgrepError::io(path, e.into())
            })?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                node.push_child(self.build_downward(entry.path())?);
            } else if file_type.is_symlink() && entry.path().is_dir() {
                tracing::debug!("Skipping symlinked directory {}", entry.path().display());
            } else if entry.file_name() != self.config.filename.as_str() {
                node.push_file(entry.file_name());
            }
        }

        Ok(node)
    }

    /// Build the rule chain from the filesystem root down to `start_path`.
    ///
    /// Returns the outermost (filesystem root) node. Nodes carry rules only.
    pub fn build_upward(&self, start_path: &Path) -> Result<DirectoryNode> {
        let node = self.node_for(start_path)?;

        let parent = match start_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => return Ok(node),
        };

        let mut outermost = self.build_upward(parent)?;
        deepest_child_chain(&mut outermost).push_child(node);
        Ok(outermost)
    }

    /// Build the full tree for a search root: the ancestor chain with the
    /// downward subtree spliced onto its deepest node.
    pub fn generate_tree(&self, search_root_path: &Path) -> Result<DirectoryNode> {
        let search_root = dunce::canonicalize(search_root_path)
            .map_err(|e| SgrepError::io(search_root_path, e))?;

        let subtree = self.build_downward(&search_root)?;

        match search_root.parent() {
            Some(parent) => {
                let mut chain = self.build_upward(parent)?;
                deepest_child_chain(&mut chain).push_child(subtree);
                Ok(chain)
            }
            None => Ok(subtree),
        }
    }

    /// A node for `directory` with its rule file loaded, and nothing else
    fn node_for(&self, directory: &Path) -> Result<DirectoryNode> {
        let rule_file = directory.join(&self.config.filename);
        let rules = if rule_file.is_file() {
            self.parser.load_rule_file(&rule_file)?
        } else {
            Vec::new()
        };

        Ok(DirectoryNode::new(node_name(directory), rules))
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

/// Follow first children until reaching a node with none.
///
/// Only meaningful on the upward chain, where every node has at most one child.
pub fn deepest_child_chain(node: &mut DirectoryNode) -> &mut DirectoryNode {
    if node.children().is_empty() {
        node
    } else {
        deepest_child_chain(&mut node.children_mut()[0])
    }
}

/// The last path segment, or the whole path for a filesystem root
pub(crate) fn node_name(path: &Path) -> OsString {
    path.file_name().unwrap_or(path.as_os_str()).to_os_string()
}
