//! Rule file parser
//!
//! A rule file holds one pattern per line. Everything from the comment marker
//! to end of line is dropped, the remainder is trimmed, and blank results are
//! skipped. There is no escape for the marker, so a pattern cannot contain it.

use crate::config::RuleConfig;
use crate::core::error::{Result, SgrepError};
use crate::ignore::rule::Rule;
use std::fs;
use std::path::Path;

/// Turns rule file text into ordered [`Rule`]s
#[derive(Debug, Clone)]
pub struct RuleParser {
    comment_marker: char,
}

impl RuleParser {
    /// Create a parser using the comment marker from `config`
    pub fn new(config: &RuleConfig) -> Self {
        Self {
            comment_marker: config.comment_marker,
        }
    }

    /// Parse one line. Returns `None` for blank and comment-only lines.
    pub fn parse_line(&self, source_path: &Path, raw_line: &str) -> Option<Rule> {
        let uncommented = match raw_line.find(self.comment_marker) {
            Some(index) => &raw_line[..index],
            None => raw_line,
        };

        let pattern = uncommented.trim();
        if pattern.is_empty() {
            return None;
        }

        Some(Rule::new(source_path, pattern))
    }

    /// Parse rule file content, keeping line order
    pub fn parse_content(&self, source_path: &Path, content: &str) -> Vec<Rule> {
        content
            .lines()
            .filter_map(|line| self.parse_line(source_path, line))
            .collect()
    }

    /// Read and parse the rule file at `path`
    pub fn load_rule_file(&self, path: &Path) -> Result<Vec<Rule>> {
        let content = fs::read_to_string(path).map_err(|e| SgrepError::io(path, e))?;
        let rules = self.parse_content(path, &content);

        tracing::debug!("Loaded {} rules from {}", rules.len(), path.display());
        Ok(rules)
    }
}

impl Default for RuleParser {
    fn default() -> Self {
        Self::new(&RuleConfig::default())
    }
}
