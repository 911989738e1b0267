//! Command-line arguments for `crossword-sync`.
//!
//! Everything except the run date can also come from the config file or
//! the environment; flags given here win.

use std::path::PathBuf;

use clap::{builder::PossibleValuesParser, Parser, ValueEnum};
use crossword_core::{FailurePolicy, PublishDate};

/// Download today's crossword PDFs and publish them to Dropbox.
///
/// Safe to run repeatedly: files already in storage are skipped without
/// downloading.
///
/// ```sh
/// # Regular scheduled run
/// crossword-sync --config /etc/crossword.toml
///
/// # Backfill one source for a past day
/// crossword-sync --date 2024-03-15 --source nyt
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "CROSSWORD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run date (YYYY-MM-DD), defaults to today in the configured time zone
    #[arg(short, long)]
    pub date: Option<PublishDate>,

    /// Only process these sources (repeatable)
    #[arg(short, long = "source", value_parser = PossibleValuesParser::new(["nyt", "wsj"]))]
    pub sources: Vec<String>,

    /// What to do after a source fails: fail_fast or best_effort
    #[arg(long)]
    pub failure_policy: Option<FailurePolicy>,

    /// Log output format
    #[arg(long, env = "CROSSWORD_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}
