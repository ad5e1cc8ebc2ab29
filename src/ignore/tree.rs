//! In-memory directory tree annotated with the rules declared at each level

use crate::core::error::Result;
use crate::ignore::rule::Rule;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// One directory in the rule tree.
///
/// `name` is the path segment relative to the parent. The filesystem root is
/// named by its own path (`/`), so joining names from the root down gives
/// absolute paths. Names are kept as the OS gave them so paths rebuilt from
/// the tree always exist on disk, whatever their encoding.
#[derive(Debug, Clone, Default)]
pub struct DirectoryNode {
    name: OsString,
    files: Vec<OsString>,
    children: Vec<DirectoryNode>,
    rules: Vec<Rule>,
}

impl DirectoryNode {
    /// Create an empty node carrying `rules`
    pub fn new(name: impl Into<OsString>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            children: Vec::new(),
            rules,
        }
    }

    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub fn files(&self) -> &[OsString] {
        &self.files
    }

    pub fn children(&self) -> &[DirectoryNode] {
        &self.children
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Find the immediate child called `name`
    pub fn child(&self, name: impl AsRef<OsStr>) -> Option<&DirectoryNode> {
        let name = name.as_ref();
        self.children.iter().find(|child| child.name == name)
    }

    pub(crate) fn push_file(&mut self, name: impl Into<OsString>) {
        self.files.push(name.into());
    }

    /// Append a child. Names stay unique: a second child with the same name
    /// replaces the first.
    pub(crate) fn push_child(&mut self, child: DirectoryNode) {
        match self.children.iter_mut().find(|c| c.name == child.name) {
            Some(existing) => *existing = child,
            None => self.children.push(child),
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<DirectoryNode> {
        &mut self.children
    }

    /// True if any rule declared at this level matches `candidate`
    pub fn is_filtered(&self, candidate: &Path) -> Result<bool> {
        for rule in &self.rules {
            if rule.matches(candidate)? {
                tracing::trace!(
                    "{} excluded by '{}' from {}",
                    candidate.display(),
                    rule.pattern(),
                    rule.source().display()
                );
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Every file below this node that no rule excludes.
    ///
    /// Paths are prefixed with this node's name and checked again at every
    /// level on the way up, so a rule can exclude files several directories
    /// below the one that declared it.
    pub fn collect_unfiltered_paths(&self) -> Result<Vec<PathBuf>> {
        let prefix = Path::new(&self.name);
        let mut paths = Vec::new();

        for file in &self.files {
            let path = prefix.join(file);
            if !self.is_filtered(&path)? {
                paths.push(path);
            }
        }

        for child in &self.children {
            for sub_path in child.collect_unfiltered_paths()? {
                let path = prefix.join(sub_path);
                if !self.is_filtered(&path)? {
                    paths.push(path);
                }
            }
        }

        Ok(paths)
    }

    /// Every file below this node, ignoring rules
    pub fn collect_all_paths(&self) -> Vec<PathBuf> {
        let prefix = Path::new(&self.name);
        let mut paths: Vec<PathBuf> = self.files.iter().map(|file| prefix.join(file)).collect();

        for child in &self.children {
            paths.extend(
                child
                    .collect_all_paths()
                    .into_iter()
                    .map(|sub_path| prefix.join(sub_path)),
            );
        }

        paths
    }

    /// Indented rendering of the tree, as produced by `Display`
    pub fn pretty_print(&self) -> String {
        self.to_string()
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "\t".repeat(depth);
        let name = self.name.to_string_lossy();
        if name.ends_with('/') || name.ends_with('\\') {
            writeln!(f, "{}{}", indent, name)?;
        } else {
            writeln!(f, "{}{}/", indent, name)?;
        }

        for file in &self.files {
            writeln!(f, "{}\t{}", indent, file.to_string_lossy())?;
        }

        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }

        Ok(())
    }
}

impl fmt::Display for DirectoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rules(patterns: &[&str]) -> Vec<Rule> {
        patterns
            .iter()
            .map(|p| Rule::new("/test/.sgrep", *p))
            .collect()
    }

    fn node(name: &str, patterns: &[&str], files: &[&str]) -> DirectoryNode {
        let mut node = DirectoryNode::new(name, rules(patterns));
        for file in files {
            node.push_file(*file);
        }
        node
    }

    #[test]
    fn test_is_filtered_any_rule() -> Result<()> {
        let node = node("root", &["*.log", "*py"], &[]);

        assert!(node.is_filtered(Path::new("root/app.log"))?);
        assert!(node.is_filtered(Path::new("root/b.py"))?);
        assert!(!node.is_filtered(Path::new("root/a.txt"))?);
        assert!(!DirectoryNode::new("empty", Vec::new()).is_filtered(Path::new("x.py"))?);

        Ok(())
    }

    #[test]
    fn test_collect_unfiltered_own_files() -> Result<()> {
        let root = node("root", &["*py"], &["a.txt", "b.py"]);
        assert_eq!(root.collect_unfiltered_paths()?, vec![PathBuf::from("root/a.txt")]);
        Ok(())
    }

    #[test]
    fn test_ancestor_rule_reaches_nested_files() -> Result<()> {
        let mut b = node("b", &[], &["c1.txt", "d.txt"]);
        b.push_file("c2.txt");
        let mut z = node("z", &[], &["top.txt"]);
        z.push_child(b);
        let mut y = node("y", &["b/c*"], &[]);
        y.push_child(z);

        assert_eq!(
            y.collect_unfiltered_paths()?,
            vec![PathBuf::from("y/z/top.txt"), PathBuf::from("y/z/b/d.txt")]
        );
        Ok(())
    }

    #[test]
    fn test_child_rules_do_not_leak_to_siblings() -> Result<()> {
        let quiet = node("quiet", &["*.txt"], &["hidden.txt"]);
        let loud = node("loud", &[], &["shown.txt"]);
        let mut root = node("root", &[], &["top.txt"]);
        root.push_child(quiet);
        root.push_child(loud);

        assert_eq!(
            root.collect_unfiltered_paths()?,
            vec![PathBuf::from("root/top.txt"), PathBuf::from("root/loud/shown.txt")]
        );
        Ok(())
    }

    #[test]
    fn test_collect_all_ignores_rules() {
        let mut root = node("root", &["*"], &["a.txt", "b.py"]);
        root.push_child(node("sub", &["*"], &["c.rs"]));

        assert_eq!(
            root.collect_all_paths(),
            vec![
                PathBuf::from("root/a.txt"),
                PathBuf::from("root/b.py"),
                PathBuf::from("root/sub/c.rs"),
            ]
        );
    }

    #[test]
    fn test_push_child_keeps_names_unique() {
        let mut root = node("root", &[], &[]);
        root.push_child(node("sub", &[], &["old.txt"]));
        root.push_child(node("sub", &[], &["new.txt"]));

        assert_eq!(root.children().len(), 1);
        assert_eq!(root.child("sub").unwrap().files(), &[OsString::from("new.txt")]);
        assert!(root.child("missing").is_none());
    }

    #[test]
    fn test_pretty_print() {
        let mut sub = node("sub", &[], &["c.rs"]);
        sub.push_child(node("deep", &[], &[]));
        let mut root = node("root", &[], &["a.txt"]);
        root.push_child(sub);

        assert_eq!(root.pretty_print(), "root/\n\ta.txt\n\tsub/\n\t\tc.rs\n\t\tdeep/\n");
        assert_eq!(node("/", &[], &[]).to_string(), "/\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_kept_verbatim() -> Result<()> {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"bad\xff.txt");
        let mut root = node("root", &["*.log"], &[]);
        root.push_file(raw);

        assert_eq!(root.collect_unfiltered_paths()?, vec![Path::new("root").join(raw)]);
        assert_eq!(root.pretty_print(), "root/\n\tbad\u{FFFD}.txt\n");
        Ok(())
    }

    #[test]
    fn test_bad_pattern_fails_collection() {
        let root = node("root", &["[oops"], &["a.txt"]);
        assert!(root.collect_unfiltered_paths().is_err());
    }
}
