//! Text-line classification.
//!
//! [`LineFilter`] turns a raw line into a grouping key by optional
//! normalization steps, then decides significance and exclusion:
//!
//! - lines matching an `exclude_patterns` rule are dropped from the search
//! - blank lines, lines shorter than `min_significant_chars`, and lines
//!   matching an `insignificant_patterns` rule may extend a block but never
//!   start one
//!
//! # Example
//!
//! ```
//! use concordance::engine::KeyFilter;
//! use concordance::lines::{LineFilter, LineOptions};
//!
//! let options = LineOptions {
//!     trim: true,
//!     ignore_case: true,
//!     ..LineOptions::default()
//! };
//! let filter = LineFilter::new(&options).unwrap();
//! let verdict = filter.classify("  Return X;").unwrap();
//! assert_eq!(verdict.key, "return x;");
//! assert!(verdict.significant);
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::engine::{Classified, KeyFilter};
use crate::error::{ConcordanceError, Result};
use crate::input::SourceLine;

/// Line normalization and classification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineOptions {
    /// Strip leading and trailing whitespace
    pub trim: bool,
    /// Compare lines case-insensitively
    pub ignore_case: bool,
    /// Treat any run of whitespace as a single space
    pub collapse_whitespace: bool,
    /// Fold to Unicode NFC before comparing
    pub normalize_unicode: bool,
    /// Blank lines may not start a block
    pub blank_insignificant: bool,
    /// Lines with fewer characters (after normalization) may not start a block
    pub min_significant_chars: usize,
    /// Regexes for lines that may not start a block
    pub insignificant_patterns: Vec<String>,
    /// Regexes for lines removed from the search entirely
    pub exclude_patterns: Vec<String>,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            trim: false,
            ignore_case: false,
            collapse_whitespace: false,
            normalize_unicode: false,
            blank_insignificant: true,
            min_significant_chars: 0,
            insignificant_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

/// Compiled [`LineOptions`].
#[derive(Debug, Clone)]
pub struct LineFilter {
    options: LineOptions,
    insignificant: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl LineFilter {
    /// Compile the patterns in `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ConcordanceError::Pattern`] for the first invalid regex.
    pub fn new(options: &LineOptions) -> Result<Self> {
        Ok(Self {
            options: options.clone(),
            insignificant: compile(&options.insignificant_patterns)?,
            exclude: compile(&options.exclude_patterns)?,
        })
    }

    /// The settings this filter was built from.
    #[must_use]
    pub fn options(&self) -> &LineOptions {
        &self.options
    }

    /// Normalized key for `line`.
    #[must_use]
    pub fn normalize(&self, line: &str) -> String {
        let mut key: String = if self.options.normalize_unicode {
            line.nfc().collect()
        } else {
            line.to_string()
        };
        if self.options.collapse_whitespace {
            key = key.split_whitespace().collect::<Vec<_>>().join(" ");
        } else if self.options.trim {
            key = key.trim().to_string();
        }
        if self.options.ignore_case {
            key = key.to_lowercase();
        }
        key
    }

    fn classify_text(&self, line: &str) -> Option<Classified<String>> {
        let key = self.normalize(line);
        if self.exclude.iter().any(|re| re.is_match(&key)) {
            return None;
        }

        let blank = key.trim().is_empty();
        let significant = !(self.options.blank_insignificant && blank)
            && key.chars().count() >= self.options.min_significant_chars
            && !self.insignificant.iter().any(|re| re.is_match(&key));
        Some(Classified { key, significant })
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ConcordanceError::Pattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

impl KeyFilter<str> for LineFilter {
    type Key = String;

    fn classify(&self, element: &str) -> Option<Classified<String>> {
        self.classify_text(element)
    }
}

impl KeyFilter<String> for LineFilter {
    type Key = String;

    fn classify(&self, element: &String) -> Option<Classified<String>> {
        self.classify_text(element)
    }
}

impl KeyFilter<&str> for LineFilter {
    type Key = String;

    fn classify(&self, element: &&str) -> Option<Classified<String>> {
        self.classify_text(element)
    }
}

impl KeyFilter<SourceLine> for LineFilter {
    type Key = String;

    fn classify(&self, element: &SourceLine) -> Option<Classified<String>> {
        if element.is_boundary() {
            return None;
        }
        self.classify_text(&element.text)
    }
}
