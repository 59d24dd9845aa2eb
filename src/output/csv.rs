//! CSV output formatter for search results.
//!
//! One row is generated for each occurrence of each block.
//!
//! # Columns
//!
//! - `block_id`: 1-based block number in discovery order
//! - `part_count`: Lines per occurrence
//! - `occurrence_count`: Occurrences of the block
//! - `source`: File the occurrence lives in
//! - `start_line` / `end_line`: Inclusive line range
//! - `first_line`: Text of the block's first line

use std::io;

use serde::Serialize;
use thiserror::Error;

use super::Report;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    block_id: usize,
    part_count: usize,
    occurrence_count: usize,
    source: &'a str,
    start_line: usize,
    end_line: usize,
    first_line: &'a str,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    report: &'a Report,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for block in &self.report.blocks {
            let first_line = block.lines.first().map_or("", String::as_str);
            for occurrence in &block.occurrences {
                csv_writer.serialize(CsvRow {
                    block_id: block.id,
                    part_count: block.part_count,
                    occurrence_count: block.occurrence_count,
                    source: &occurrence.source,
                    start_line: occurrence.start_line,
                    end_line: occurrence.end_line,
                    first_line,
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
