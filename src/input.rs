//! Reading input files into one element sequence.
//!
//! Files are concatenated in the order given. A boundary element separates
//! consecutive files; [`LineFilter`](crate::lines::LineFilter) excludes it,
//! so no block can run from the end of one file into the next.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{ConcordanceError, Result};

/// Name used for standard input.
pub const STDIN_NAME: &str = "-";

/// One line of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// Index of the file in [`Corpus::sources`]
    pub source: usize,
    /// 1-based line number; `0` marks a file boundary
    pub line_number: usize,
    /// Line text without its terminator
    pub text: String,
}

impl SourceLine {
    /// A line of text.
    pub fn new(source: usize, line_number: usize, text: impl Into<String>) -> Self {
        Self {
            source,
            line_number,
            text: text.into(),
        }
    }

    /// The separator placed between files.
    #[must_use]
    pub fn boundary() -> Self {
        Self {
            source: usize::MAX,
            line_number: 0,
            text: String::new(),
        }
    }

    /// Whether this element separates two files.
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.line_number == 0
    }
}

impl fmt::Display for SourceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The lines of every input file, in order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    sources: Vec<PathBuf>,
    lines: Vec<SourceLine>,
}

impl Corpus {
    /// An empty corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every path; `-` reads standard input.
    ///
    /// # Errors
    ///
    /// Returns [`ConcordanceError::Io`] for the first path that cannot be read.
    pub fn read_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut corpus = Self::new();
        for path in paths {
            let path = path.as_ref();
            if path.as_os_str() == STDIN_NAME {
                corpus.read_from(path, io::stdin().lock())?;
            } else {
                let file = File::open(path).map_err(|source| ConcordanceError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                corpus.read_from(path, file)?;
            }
        }
        log::debug!(
            "Read {} lines from {} sources",
            corpus.line_count(),
            corpus.sources.len()
        );
        Ok(corpus)
    }

    /// Append everything `reader` yields as one source named `name`.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConcordanceError::Io`] when reading fails.
    pub fn read_from(&mut self, name: impl AsRef<Path>, mut reader: impl Read) -> Result<()> {
        let name = name.as_ref();
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| ConcordanceError::Io {
                path: name.to_path_buf(),
                source,
            })?;
        self.push_text(name, &String::from_utf8_lossy(&bytes));
        Ok(())
    }

    /// Append `text` as one source named `name`.
    pub fn push_text(&mut self, name: impl Into<PathBuf>, text: &str) {
        if !self.sources.is_empty() {
            self.lines.push(SourceLine::boundary());
        }
        let source = self.sources.len();
        self.sources.push(name.into());
        self.lines.extend(
            text.lines()
                .enumerate()
                .map(|(i, line)| SourceLine::new(source, i + 1, line)),
        );
    }

    /// The element sequence, boundaries included.
    #[must_use]
    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    /// Names of the sources, in reading order.
    #[must_use]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Name of source `index`.
    #[must_use]
    pub fn source_name(&self, index: usize) -> Option<&Path> {
        self.sources.get(index).map(PathBuf::as_path)
    }

    /// Number of text lines, boundaries excluded.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len() - self.sources.len().saturating_sub(1)
    }

    /// Whether no source has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
