//! Command-line interface for quillpad.
//!
//! Runs the same find/replace session the editor uses against a file on
//! disk, without a window.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;

use crate::app::App;
use crate::editor::Document;
use crate::error::Result;
use crate::search::{Match, ReplaceOutcome};

/// quillpad - find and replace in plain-text files
#[derive(Debug, Parser)]
#[command(name = "quillpad")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log verbosity; overrides the QUILLPAD_LOG environment variable
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every match of PATTERN in FILE
    Find {
        file: PathBuf,
        pattern: String,

        /// Compare case-sensitively
        #[arg(short = 'c', long)]
        match_case: bool,
    },

    /// Replace one or all matches of PATTERN in FILE
    Replace {
        file: PathBuf,
        pattern: String,
        replacement: String,

        /// Compare case-sensitively
        #[arg(short = 'c', long)]
        match_case: bool,

        /// Replace every match
        #[arg(long)]
        all: bool,

        /// Replace only the N-th match (1-based, default 1)
        #[arg(long, value_name = "N", conflicts_with = "all")]
        nth: Option<usize>,

        /// Print the result instead of writing it
        #[arg(long)]
        dry_run: bool,

        /// Write the result here instead of overwriting FILE
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::OFF,
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

/// Execute a parsed command, writing user-facing output to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Command::Find {
            file,
            pattern,
            match_case,
        } => find(file, pattern, *match_case, out),
        Command::Replace {
            file,
            pattern,
            replacement,
            match_case,
            all,
            nth,
            dry_run,
            output,
        } => {
            let mut app = open(file)?;
            app.set_find_query(pattern, *match_case);
            let replaced = if *all {
                app.replace_all(replacement)
            } else {
                replace_nth(&mut app, replacement, nth.unwrap_or(1), out)?
            };

            if *dry_run {
                if let Some(doc) = app.active() {
                    out.write_all(doc.as_str().as_bytes())?;
                }
                return Ok(());
            }
            if replaced > 0 || output.is_some() {
                match output {
                    Some(path) => app.save_active_as(path.clone())?,
                    None => app.save_active()?,
                }
            }
            writeln!(out, "{}", plural(replaced, "replacement"))?;
            Ok(())
        }
    }
}

fn open(file: &Path) -> Result<App> {
    let mut app = App::new();
    app.open_file(file)?;
    Ok(app)
}

fn find(file: &Path, pattern: &str, match_case: bool, out: &mut impl Write) -> Result<()> {
    let mut app = open(file)?;
    app.set_find_query(pattern, match_case);

    let mut next = app.find_next();
    let total = app.find().status().map_or(0, |s| s.total);
    for _ in 0..total {
        let Some(m) = next else { break };
        if let Some(doc) = app.active() {
            print_match(doc, m, out)?;
        }
        next = app.find_next();
    }
    writeln!(out, "{}", plural(total, "match"))?;
    Ok(())
}

/// Step find-next `nth` times and replace where it lands.  Returns the
/// number of replacements (0 or 1).
fn replace_nth(app: &mut App, replacement: &str, nth: usize, out: &mut impl Write) -> Result<usize> {
    let nth = nth.max(1);
    if app.find_next().is_none() {
        return Ok(0);
    }
    let total = app.find().status().map_or(0, |s| s.total);
    if nth > total {
        writeln!(out, "only {} in file", plural(total, "match"))?;
        return Ok(0);
    }
    for _ in 1..nth {
        app.find_next();
    }
    Ok(match app.replace(replacement) {
        ReplaceOutcome::Replaced { .. } => 1,
        ReplaceOutcome::Skipped(reason) => {
            tracing::warn!("nothing replaced: {reason:?}");
            0
        }
    })
}

fn print_match(doc: &Document, m: Match, out: &mut impl Write) -> Result<()> {
    let (line, col) = doc.line_col(m.offset);
    let text: String = doc.as_str().chars().take(m.end()).skip(m.offset).collect();
    writeln!(out, "{line}:{col}: {text}")?;
    Ok(())
}

fn plural(n: usize, noun: &str) -> String {
    match (n, noun.ends_with("ch")) {
        (1, _) => format!("1 {noun}"),
        (_, true) => format!("{n} {noun}es"),
        (_, false) => format!("{n} {noun}s"),
    }
}
