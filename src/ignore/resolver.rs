//! Resolve a single file path against a rule tree

use crate::core::error::{Result, SgrepError};
use crate::ignore::tree::DirectoryNode;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Decide whether any directory on the way to `absolute_path` excludes it.
///
/// The tree must span the path: its root is the filesystem root and every
/// directory segment of the path has a node. Anything else is a
/// [`SgrepError::TreeMismatch`].
pub fn should_exclude(tree_root: &DirectoryNode, absolute_path: &Path) -> Result<bool> {
    let segments = path_segments(absolute_path);

    // The last segment is the file itself and never names a node.
    let directory_count = match segments.len().checked_sub(1) {
        Some(count) if count > 0 => count,
        _ => {
            let segment = segments
                .first()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Err(SgrepError::tree_mismatch(absolute_path, segment));
        }
    };

    if segments[0].as_os_str() != tree_root.name() {
        return Err(SgrepError::tree_mismatch(
            absolute_path,
            segments[0].to_string_lossy(),
        ));
    }

    let mut node = tree_root;
    for index in 0..directory_count {
        let remainder: PathBuf = segments[index..].iter().collect();
        if node.is_filtered(&remainder)? {
            return Ok(true);
        }

        if index + 1 < directory_count {
            let next = &segments[index + 1];
            node = node
                .child(next)
                .ok_or_else(|| SgrepError::tree_mismatch(absolute_path, next.to_string_lossy()))?;
        }
    }

    Ok(false)
}

/// Split a path into segments, with the root anchor (`/`, or `C:\`) as the
/// first segment so it lines up with the name of the tree's root node.
fn path_segments(path: &Path) -> Vec<OsString> {
    let mut anchor = PathBuf::new();
    let mut segments = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => anchor.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir | Component::Normal(_) => {
                segments.push(component.as_os_str().to_os_string())
            }
        }
    }

    if !anchor.as_os_str().is_empty() {
        segments.insert(0, anchor.into_os_string());
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ignore::rule::Rule;

    /// `/` -> x -> y (rules) -> z -> b
    fn sample_tree(y_rules: &[&str]) -> DirectoryNode {
        let rules = y_rules
            .iter()
            .map(|p| Rule::new("/x/y/.sgrep", *p))
            .collect();

        let mut z = DirectoryNode::new("z", Vec::new());
        z.push_child(DirectoryNode::new("b", Vec::new()));
        let mut y = DirectoryNode::new("y", rules);
        y.push_child(z);
        let mut x = DirectoryNode::new("x", Vec::new());
        x.push_child(y);
        let mut root = DirectoryNode::new("/", Vec::new());
        root.push_child(x);
        root
    }

    #[cfg(unix)]
    #[test]
    fn test_ancestor_rule_excludes_deep_file() -> Result<()> {
        let tree = sample_tree(&["b/c*"]);

        assert!(should_exclude(&tree, Path::new("/x/y/z/b/c1.txt"))?);
        assert!(!should_exclude(&tree, Path::new("/x/y/z/b/d1.txt"))?);
        assert!(!should_exclude(&tree, Path::new("/x/y/z/c1.txt"))?);

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_rules_above_declaring_dir_do_not_apply() -> Result<()> {
        let tree = sample_tree(&["*.txt"]);

        // A file directly in x is above y, so y's rules never see it.
        assert!(!should_exclude(&tree, Path::new("/x/notes.txt"))?);
        assert!(should_exclude(&tree, Path::new("/x/y/notes.txt"))?);

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_node_is_tree_mismatch() {
        let tree = sample_tree(&[]);

        match should_exclude(&tree, Path::new("/x/other/file.txt")) {
            Err(SgrepError::TreeMismatch { segment, .. }) => assert_eq!(segment, "other"),
            other => panic!("Expected tree mismatch, got: {:?}", other),
        }
    }

    #[test]
    fn test_relative_path_is_tree_mismatch() {
        let tree = sample_tree(&[]);
        let result = should_exclude(&tree, Path::new("x/y/file.txt"));
        assert!(matches!(result, Err(SgrepError::TreeMismatch { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_bare_root_is_tree_mismatch() {
        let tree = sample_tree(&[]);
        assert!(should_exclude(&tree, Path::new("/")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_directory_resolves() -> Result<()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"d\xffir");
        let mut odd = DirectoryNode::new(raw, vec![Rule::new("/d/.sgrep", "*.tmp")]);
        odd.push_file("kept.txt");
        let mut root = DirectoryNode::new("/", Vec::new());
        root.push_child(odd);

        let dir = Path::new("/").join(raw);
        assert!(should_exclude(&root, &dir.join("x.tmp"))?);
        assert!(!should_exclude(&root, &dir.join("kept.txt"))?);

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_path_segments() {
        assert_eq!(path_segments(Path::new("/a/./b/c.txt")), vec!["/", "a", "b", "c.txt"]);
        assert_eq!(path_segments(Path::new("a/b")), vec!["a", "b"]);
    }
}
