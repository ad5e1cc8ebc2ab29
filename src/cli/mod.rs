//! Command-line interface for sgrep

use crate::config::{ColorMode, GlobalConfig, RuleConfig};
use clap::Parser;
use std::path::PathBuf;

pub mod search;

/// sgrep - grep that skips files listed in .sgrep rule files
#[derive(Parser, Debug)]
#[command(
    name = "sgrep",
    version,
    about = "Search files with grep, skipping anything excluded by .sgrep rule files",
    long_about = "sgrep collects the files under the given paths, drops every file matched by a \
                  .sgrep rule file in its directory or any directory above it, and runs grep \
                  over what is left."
)]
pub struct Cli {
    /// Text to search for
    pub pattern: String,

    /// Files or directories to search (default: current directory, recursively)
    pub paths: Vec<PathBuf>,

    /// Search directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Color output: auto, always, never
    #[arg(long, value_enum)]
    pub color: Option<ColorMode>,

    /// Print the files that would be searched instead of searching
    #[arg(long, conflicts_with_all = ["list_all", "print_tree"])]
    pub list_files: bool,

    /// Print every file under the paths, ignoring rules
    #[arg(long, conflicts_with = "print_tree")]
    pub list_all: bool,

    /// Print the rule tree assembled for each directory
    #[arg(long)]
    pub print_tree: bool,

    /// Search tool to run
    #[arg(long, value_name = "BIN", env = "SGREP_GREP")]
    pub grep: Option<String>,

    /// Name of the per-directory rule file
    #[arg(long, value_name = "NAME")]
    pub rule_file: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// What a run should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Run the search tool over the filtered files
    Search,
    /// Print the filtered file list
    ListFiles,
    /// Print every file, unfiltered
    ListAll,
    /// Print the assembled rule trees
    PrintTree,
}

/// Everything the search command needs, merged from config and flags
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub pattern: String,
    pub paths: Vec<PathBuf>,
    pub recursive: bool,
    /// Already resolved: never `Auto`
    pub color: ColorMode,
    pub grep_bin: String,
    pub rules: RuleConfig,
    pub mode: OutputMode,
}

impl SearchOptions {
    /// Merge parsed flags over the loaded configuration
    pub fn from_cli(cli: Cli, config: GlobalConfig, stdout_is_tty: bool) -> Self {
        let mode = if cli.list_files {
            OutputMode::ListFiles
        } else if cli.list_all {
            OutputMode::ListAll
        } else if cli.print_tree {
            OutputMode::PrintTree
        } else {
            OutputMode::Search
        };

        let mut rules = config.rules;
        if let Some(name) = cli.rule_file {
            rules.filename = name;
        }

        // No paths means "search here", which only makes sense recursively
        let (paths, recursive) = if cli.paths.is_empty() {
            (vec![PathBuf::from(".")], true)
        } else {
            (cli.paths, cli.recursive)
        };

        Self {
            pattern: cli.pattern,
            paths,
            recursive,
            color: cli
                .color
                .unwrap_or(config.search.color)
                .resolve(stdout_is_tty),
            grep_bin: cli.grep.unwrap_or(config.search.grep_bin),
            rules,
            mode,
        }
    }
}
