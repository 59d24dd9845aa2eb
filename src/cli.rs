//! Command-line interface definitions.
//!
//! # Example
//!
//! ```bash
//! # Find repeated blocks across two files
//! concordance scan src/a.rs src/b.rs
//!
//! # Only blocks of at least 4 lines, ignoring indentation, as JSON
//! concordance scan --min-parts 4 --trim --output json src/*.rs
//!
//! # Read from stdin
//! cat notes.txt | concordance scan -
//!
//! # Show the effective configuration
//! concordance config
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Find repeated blocks of consecutive lines.
///
/// Every run of lines that appears two or more times is reported once,
/// with the location of each repetition.
#[derive(Debug, Parser)]
#[command(name = "concordance")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors and results
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH", global = true, env = "CONCORDANCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search files for repeated blocks
    Scan(ScanArgs),
    /// Print the effective configuration as TOML
    Config,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Files to search, in order (`-` for stdin)
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Stop after this many blocks (0 = unlimited)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub max_blocks: Option<i64>,

    /// Ignore blocks with fewer lines than this (0 = any)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub min_parts: Option<i64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Strip leading and trailing whitespace before comparing
    #[arg(long)]
    pub trim: bool,

    /// Compare lines case-insensitively
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Treat runs of whitespace as a single space
    #[arg(short = 'w', long)]
    pub collapse_whitespace: bool,

    /// Apply Unicode NFC normalization before comparing
    #[arg(long)]
    pub normalize_unicode: bool,

    /// Allow blank lines to start blocks
    #[arg(long)]
    pub keep_blank: bool,

    /// Lines shorter than this may extend blocks but not start them
    #[arg(long, value_name = "N")]
    pub min_chars: Option<usize>,

    /// Regex for lines that may not start a block (repeatable)
    #[arg(long = "insignificant", value_name = "REGEX")]
    pub insignificant_patterns: Vec<String>,

    /// Regex for lines to remove from the search (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "REGEX")]
    pub exclude_patterns: Vec<String>,

    /// Print only block locations in text output
    #[arg(long)]
    pub no_lines: bool,
}

/// Output format for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
