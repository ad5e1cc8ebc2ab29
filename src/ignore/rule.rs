//! A single ignore rule read from a rule file

use crate::core::error::{Result, SgrepError};
use glob::{MatchOptions, Pattern};
use once_cell::unsync::OnceCell;
use std::path::{Component, Path, PathBuf};

/// Wildcards never cross a `/`, so `*py` only ever looks at one segment.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One ignore pattern plus the rule file that declared it
#[derive(Debug, Clone)]
pub struct Rule {
    /// Absolute path of the rule file this rule came from
    source: PathBuf,
    /// Pattern text with comments and surrounding whitespace removed
    pattern: String,
    /// Glob compiled on first use
    compiled: OnceCell<Pattern>,
}

impl Rule {
    /// Create a rule. `pattern` must already be trimmed and non-empty.
    pub fn new(source: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            pattern: pattern.into(),
            compiled: OnceCell::new(),
        }
    }

    /// The rule file this rule was declared in
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Raw pattern text
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check whether `candidate` is excluded by this rule.
    ///
    /// The glob is tried against every trailing run of the candidate's
    /// components: for `a/b/c.py` that is `c.py`, `b/c.py` and `a/b/c.py`.
    /// Root and prefix components never take part in matching.
    pub fn matches(&self, candidate: &Path) -> Result<bool> {
        let pattern = self.compiled()?;

        let segments: Vec<String> = candidate
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        for start in (0..segments.len()).rev() {
            let suffix = segments[start..].join("/");
            if pattern.matches_with(&suffix, MATCH_OPTIONS) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn compiled(&self) -> Result<&Pattern> {
        self.compiled
            .get_or_try_init(|| Pattern::new(&self.pattern))
            .map_err(|source| SgrepError::Pattern {
                rule_file: self.source.clone(),
                pattern: self.pattern.clone(),
                source,
            })
    }
}
