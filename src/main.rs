//! sgrep CLI
//!
//! Runs grep over the files that survive .sgrep rule filtering.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use sgrep::cli::{search, Cli, SearchOptions};
use sgrep::config::GlobalConfig;
use tracing_subscriber::EnvFilter;

/// Exit status for any fatal error, matching grep's "trouble" status
const ERROR_STATUS: i32 = 2;

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "sgrep: error:".red().bold(), e);
            std::process::exit(ERROR_STATUS);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = GlobalConfig::load()?;
    let options = SearchOptions::from_cli(cli, config, atty::is(atty::Stream::Stdout));
    tracing::debug!("Search options: {:?}", options);

    search::execute(&options)
}
