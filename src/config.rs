//! Layered configuration.
//!
//! Settings are merged in this order, later layers winning:
//!
//! 1. Built-in defaults
//! 2. The platform config file (`~/.config/concordance/config.toml` on Linux)
//!    or the file given with `--config`
//! 3. `CONCORDANCE_*` environment variables (`__` separates nested keys,
//!    e.g. `CONCORDANCE_FILTER__TRIM=true`)
//! 4. Command-line flags
//!
//! ```toml
//! min_parts = 3
//! output = "json"
//!
//! [filter]
//! trim = true
//! exclude_patterns = ["^\\s*//"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{OutputFormat, ScanArgs};
use crate::error::ConcordanceError;
use crate::lines::{LineFilter, LineOptions};
use crate::options::SearchOptions;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CONCORDANCE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stop after this many blocks (0 = unlimited)
    pub max_blocks: i64,
    /// Dismiss blocks with fewer lines (0 = any)
    pub min_parts: i64,
    /// Output format
    pub output: OutputFormat,
    /// Print block text in text output
    pub show_lines: bool,
    /// Line classification
    pub filter: LineOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_blocks: 0,
            min_parts: 0,
            output: OutputFormat::Text,
            show_lines: true,
            filter: LineOptions::default(),
        }
    }
}

impl Config {
    /// Load defaults, the config file, and the environment.
    ///
    /// `explicit` replaces the platform config file; it must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` is missing or any layer fails to parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::load_from_path(Some(path))
            }
            None => Self::load_from_path(Self::default_path().as_deref()),
        }
    }

    /// Load defaults, an optional TOML file (skipped when absent), and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment value fails to parse.
    pub fn load_from_path(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Invalid configuration")
    }

    /// The platform-specific config file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "concordance", "concordance")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line overrides.
    pub fn merge_scan_args(&mut self, args: &ScanArgs) {
        if let Some(max_blocks) = args.max_blocks {
            self.max_blocks = max_blocks;
        }
        if let Some(min_parts) = args.min_parts {
            self.min_parts = min_parts;
        }
        if let Some(output) = args.output {
            self.output = output;
        }
        if args.no_lines {
            self.show_lines = false;
        }

        let filter = &mut self.filter;
        filter.trim |= args.trim;
        filter.ignore_case |= args.ignore_case;
        filter.collapse_whitespace |= args.collapse_whitespace;
        filter.normalize_unicode |= args.normalize_unicode;
        if args.keep_blank {
            filter.blank_insignificant = false;
        }
        if let Some(min_chars) = args.min_chars {
            filter.min_significant_chars = min_chars;
        }
        filter
            .insignificant_patterns
            .extend(args.insignificant_patterns.iter().cloned());
        filter
            .exclude_patterns
            .extend(args.exclude_patterns.iter().cloned());
    }

    /// Validated search limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConcordanceError::InvalidArgument`] for negative limits.
    pub fn search_options(&self) -> Result<SearchOptions, ConcordanceError> {
        SearchOptions::from_limits(self.max_blocks, self.min_parts)
    }

    /// Compiled line filter.
    ///
    /// # Errors
    ///
    /// Returns [`ConcordanceError::Pattern`] for an invalid regex.
    pub fn line_filter(&self) -> Result<LineFilter, ConcordanceError> {
        LineFilter::new(&self.filter)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration")
    }
}
