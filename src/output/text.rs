//! Human-readable output for terminals.
//!
//! Colors come from `yansi` and follow its global switch, which the binary
//! turns off for `--no-color`, `NO_COLOR`, or non-terminal output.

use std::io::{self, Write};

use yansi::Paint;

use super::Report;

/// Terminal formatter.
pub struct TextOutput<'a> {
    report: &'a Report,
    show_lines: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter that prints each block's text.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self {
            report,
            show_lines: true,
        }
    }

    /// Print only block locations, without their text.
    #[must_use]
    pub fn locations_only(mut self) -> Self {
        self.show_lines = false;
        self
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for block in &self.report.blocks {
            writeln!(
                writer,
                "{} {} lines x {} occurrences",
                format!("Block {}:", block.id).bold(),
                block.part_count,
                block.occurrence_count
            )?;
            for occurrence in &block.occurrences {
                let range = if occurrence.start_line == occurrence.end_line {
                    occurrence.start_line.to_string()
                } else {
                    format!("{}-{}", occurrence.start_line, occurrence.end_line)
                };
                writeln!(writer, "  {}:{}", occurrence.source.cyan(), range)?;
            }
            if self.show_lines {
                for line in &block.lines {
                    writeln!(writer, "  {} {}", "|".dim(), line)?;
                }
            }
            writeln!(writer)?;
        }

        let summary = &self.report.summary;
        let status = if summary.interrupted {
            " (interrupted)".yellow().to_string()
        } else if summary.truncated {
            " (block limit reached)".yellow().to_string()
        } else {
            String::new()
        };
        writeln!(
            writer,
            "{} blocks covering {} of {} lines{}",
            summary.accepted_blocks.green().bold(),
            summary.covered_positions,
            summary.total_elements - summary.excluded_elements,
            status
        )
    }
}
