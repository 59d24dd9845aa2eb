//! Concordance - repeated block finder
//!
//! Finds every run of consecutive elements (usually text lines) that occurs
//! two or more times in a sequence and groups the repetitions into blocks.
//! The [`engine`] is generic over elements and key derivation; the rest of
//! the crate wraps it into a command-line copy-paste detector.
//!
//! ```
//! use concordance::{Concordance, NeverCancel, SearchOptions};
//!
//! let lines = ["aaa", "bbb", "ccc", "aaa", "bbb"];
//! let outcome = Concordance::unfiltered(&lines).find_blocks(&SearchOptions::new(), &NeverCancel);
//! let block = &outcome.blocks[0];
//! assert_eq!(block.part_count(), 2);
//! assert_eq!(block.occurrence_count(), 2);
//! assert_eq!(*block.part_at(1, 1).unwrap(), "bbb");
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod lines;
pub mod logging;
pub mod options;
pub mod output;
pub mod progress;
pub mod signal;

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};

pub use engine::{
    Block, Cancellation, Classified, Concordance, IdentityFilter, KeyFilter, NeverCancel,
    SearchOutcome, SearchSummary,
};
pub use error::{ConcordanceError, ExitCode};
pub use options::SearchOptions;

use cli::{Cli, Commands, OutputFormat, ScanArgs};
use config::Config;
use input::Corpus;
use output::{CsvOutput, JsonOutput, Report, TextOutput};
use progress::Progress;

/// Run the command line application.
///
/// # Errors
///
/// Returns an error for invalid configuration, unreadable input, or failed
/// output. Cancellation is not an error; it yields [`ExitCode::Interrupted`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color || !io::stdout().is_terminal() {
        yansi::disable();
    }

    let mut config = Config::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(ExitCode::Success)
        }
        Commands::Scan(args) => {
            config.merge_scan_args(&args);
            run_scan(&args, &config, cli.quiet)
        }
    }
}

fn run_scan(args: &ScanArgs, config: &Config, quiet: bool) -> Result<ExitCode> {
    // Validate everything before touching the input.
    let mut options = config.search_options()?;
    let filter = config.line_filter()?;

    let corpus = Corpus::read_paths(&args.paths).context("Failed to read input")?;

    if config.output == OutputFormat::Text && io::stderr().is_terminal() {
        options = options.with_progress_callback(Arc::new(Progress::new(quiet)));
    }
    let handler = signal::install_handler()?;

    let outcome = Concordance::new(corpus.lines(), filter).find_blocks(&options, &handler);
    let report = Report::new(&outcome, &corpus);

    let exit_code = if outcome.summary.interrupted {
        ExitCode::Interrupted
    } else if report.is_empty() {
        ExitCode::NoBlocks
    } else {
        ExitCode::Success
    };

    let stdout = io::stdout().lock();
    match config.output {
        OutputFormat::Text => {
            let text = TextOutput::new(&report);
            let text = if config.show_lines {
                text
            } else {
                text.locations_only()
            };
            text.write_to(stdout)?;
        }
        OutputFormat::Json => JsonOutput::new(&report, exit_code).write_to(stdout)?,
        OutputFormat::Csv => CsvOutput::new(&report).write_to(stdout)?,
    }

    Ok(exit_code)
}
