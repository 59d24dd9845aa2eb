//! JSON output formatter for search results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "blocks": [
//!     {
//!       "id": 1,
//!       "part_count": 2,
//!       "occurrence_count": 2,
//!       "lines": ["fn main() {", "    run();"],
//!       "occurrences": [
//!         { "source": "a.rs", "start_line": 1, "end_line": 2, "position": 0 }
//!       ]
//!     }
//!   ],
//!   "summary": { "total_elements": 20, "accepted_blocks": 1, "interrupted": false },
//!   "exit_code": 0,
//!   "exit_code_name": "CC000"
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use super::{Report, ReportBlock};
use crate::engine::SearchSummary;
use crate::error::ExitCode;

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Blocks in discovery order
    pub blocks: Vec<ReportBlock>,
    /// Search statistics
    pub summary: SearchSummary,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "CC000")
    pub exit_code_name: String,
}

impl JsonOutput {
    /// Create JSON output from a report and the run's exit code.
    #[must_use]
    pub fn new(report: &Report, exit_code: ExitCode) -> Self {
        Self {
            blocks: report.blocks.clone(),
            summary: report.summary.clone(),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)
    }
}
