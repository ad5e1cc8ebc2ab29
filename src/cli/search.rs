//! Search command: filter files, then hand them to the search tool

use crate::cli::{OutputMode, SearchOptions};
use crate::core::error::SgrepError;
use crate::ignore::scanner::FilteredFileScanner;
use anyhow::Result;
use std::collections::HashSet;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

/// Exit status when no file is left to search: grep's "no lines selected"
pub const NO_MATCH_STATUS: i32 = 1;

/// Execute a search run. Returns the process exit status.
pub fn execute(options: &SearchOptions) -> Result<i32> {
    let scanner = FilteredFileScanner::new(options.rules.clone());
    let (directories, files): (Vec<PathBuf>, Vec<PathBuf>) =
        options.paths.iter().cloned().partition(|p| p.is_dir());

    match options.mode {
        OutputMode::PrintTree => {
            let mut stdout = io::stdout().lock();
            for directory in &directories {
                write!(stdout, "{}", scanner.tree_for(directory)?)?;
            }
            Ok(0)
        }
        OutputMode::ListAll => {
            let mut all = scanner.list_all(&directories)?;
            all.extend(files);
            print_paths(&all)?;
            Ok(0)
        }
        OutputMode::ListFiles => {
            print_paths(&collect_files(&scanner, options, &files)?)?;
            Ok(0)
        }
        OutputMode::Search => {
            let targets = collect_files(&scanner, options, &files)?;
            if targets.is_empty() {
                tracing::info!("Every file was excluded, nothing to search");
                return Ok(NO_MATCH_STATUS);
            }
            run_search_tool(options, &targets)
        }
    }
}

/// The final file list, following the order paths were given in.
///
/// Directories expand to their filtered contents when recursive and are
/// passed through untouched otherwise, leaving the search tool to report them.
fn collect_files(
    scanner: &FilteredFileScanner,
    options: &SearchOptions,
    named_files: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let kept: HashSet<PathBuf> = scanner.filter_named_files(named_files)?.into_iter().collect();

    let mut targets = Vec::new();
    for path in &options.paths {
        if kept.contains(path) {
            targets.push(path.clone());
        } else if path.is_dir() {
            if options.recursive {
                targets.extend(scanner.scan_directory(path)?);
            } else {
                targets.push(path.clone());
            }
        }
    }

    Ok(targets)
}

fn print_paths(paths: &[PathBuf]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for path in paths {
        writeln!(stdout, "{}", path.display())?;
    }
    Ok(())
}

/// Arguments for the search tool, in invocation order
pub fn search_tool_args(options: &SearchOptions, files: &[PathBuf]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![format!("--color={}", options.color).into()];
    if options.recursive {
        args.push("-H".into());
    }
    args.push("-e".into());
    args.push(options.pattern.clone().into());
    args.push("--".into());
    args.extend(files.iter().map(|f| f.clone().into_os_string()));
    args
}

/// Spawn the search tool and relay its output streams as they arrive
fn run_search_tool(options: &SearchOptions, files: &[PathBuf]) -> Result<i32> {
    let args = search_tool_args(options, files);
    tracing::debug!("Running {} over {} files", options.grep_bin, files.len());

    let mut child = Command::new(&options.grep_bin)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| SgrepError::SearchTool {
            program: options.grep_bin.clone(),
            source,
        })?;

    let child_stdout = child.stdout.take();
    let child_stderr = child.stderr.take();

    let stdout_relay = thread::spawn(move || -> io::Result<u64> {
        match child_stdout {
            Some(mut out) => io::copy(&mut out, &mut io::stdout()),
            None => Ok(0),
        }
    });
    let stderr_relay = thread::spawn(move || -> io::Result<u64> {
        match child_stderr {
            Some(mut err) => io::copy(&mut err, &mut io::stderr()),
            None => Ok(0),
        }
    });

    let status = child.wait()?;

    for relay in [stdout_relay, stderr_relay] {
        match relay.join() {
            Ok(Ok(_)) => {}
            // Reader went away (e.g. `| head`); nothing left to deliver
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => anyhow::bail!("output relay thread panicked"),
        }
    }

    Ok(status.code().unwrap_or(2))
}
