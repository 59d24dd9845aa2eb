//! Output formatters for search results.
//!
//! This module provides different output formats for found blocks:
//! - Text for terminals
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! All formatters render a [`Report`], which resolves block positions back
//! to file names and line numbers.
//!
//! # Example
//!
//! ```
//! use concordance::engine::{Concordance, NeverCancel};
//! use concordance::input::Corpus;
//! use concordance::lines::{LineFilter, LineOptions};
//! use concordance::output::{JsonOutput, Report};
//! use concordance::error::ExitCode;
//! use concordance::SearchOptions;
//!
//! let mut corpus = Corpus::new();
//! corpus.push_text("a.rs", "let x = 1;\nlet y = 2;\nlet x = 1;\nlet y = 2;");
//! let filter = LineFilter::new(&LineOptions::default()).unwrap();
//! let outcome = Concordance::new(corpus.lines(), filter)
//!     .find_blocks(&SearchOptions::new(), &NeverCancel);
//!
//! let report = Report::new(&outcome, &corpus);
//! let output = JsonOutput::new(&report, ExitCode::Success);
//! assert_eq!(output.blocks.len(), 1);
//! ```

pub mod csv;
pub mod json;
pub mod text;

use serde::Serialize;

use crate::engine::{SearchOutcome, SearchSummary};
use crate::input::{Corpus, SourceLine};

// Re-export main types
pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::text::TextOutput;

/// Where one occurrence of a block lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportOccurrence {
    /// Source file name (`-` for stdin)
    pub source: String,
    /// First line number (1-based)
    pub start_line: usize,
    /// Last line number (inclusive)
    pub end_line: usize,
    /// Position of the first line in the combined sequence
    pub position: usize,
}

/// One block, resolved to sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportBlock {
    /// 1-based block number in discovery order
    pub id: usize,
    /// Lines per occurrence
    pub part_count: usize,
    /// Number of occurrences
    pub occurrence_count: usize,
    /// Text of the first occurrence
    pub lines: Vec<String>,
    /// Every occurrence
    pub occurrences: Vec<ReportOccurrence>,
}

/// Blocks and statistics ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Blocks in discovery order
    pub blocks: Vec<ReportBlock>,
    /// Search statistics
    pub summary: SearchSummary,
}

impl Report {
    /// Resolve `outcome` against the corpus it was searched in.
    #[must_use]
    pub fn new(outcome: &SearchOutcome<'_, SourceLine>, corpus: &Corpus) -> Self {
        let blocks = outcome
            .blocks
            .iter()
            .enumerate()
            .map(|(idx, block)| {
                let occurrences = block
                    .occurrence_starts()
                    .iter()
                    .map(|&start| {
                        let first = &corpus.lines()[start];
                        let last = &corpus.lines()[start + block.part_count() - 1];
                        ReportOccurrence {
                            source: corpus
                                .source_name(first.source)
                                .map(|p| p.display().to_string())
                                .unwrap_or_default(),
                            start_line: first.line_number,
                            end_line: last.line_number,
                            position: start,
                        }
                    })
                    .collect();
                ReportBlock {
                    id: idx + 1,
                    part_count: block.part_count(),
                    occurrence_count: block.occurrence_count(),
                    lines: block.parts().iter().map(|l| l.text.clone()).collect(),
                    occurrences,
                }
            })
            .collect();

        Self {
            blocks,
            summary: outcome.summary.clone(),
        }
    }

    /// Whether no block was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
