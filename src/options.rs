//! Search limits.

use std::sync::Arc;

use crate::error::{ConcordanceError, Result};
use crate::progress::ProgressCallback;

/// Limits and hooks for [`Concordance::find_blocks`](crate::engine::Concordance::find_blocks).
#[derive(Clone, Default)]
pub struct SearchOptions {
    /// Stop after this many accepted blocks; `0` means unlimited.
    pub max_blocks: usize,
    /// Dismiss blocks with fewer parts; `0` accepts any length.
    pub min_parts: usize,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for SearchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOptions")
            .field("max_blocks", &self.max_blocks)
            .field("min_parts", &self.min_parts)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl SearchOptions {
    /// Unlimited search accepting blocks of any length.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from signed settings (config files, environment).
    ///
    /// # Errors
    ///
    /// Returns [`ConcordanceError::InvalidArgument`] when either value is
    /// negative.
    pub fn from_limits(max_blocks: i64, min_parts: i64) -> Result<Self> {
        Ok(Self {
            max_blocks: non_negative("max_blocks", max_blocks)?,
            min_parts: non_negative("min_parts", min_parts)?,
            progress_callback: None,
        })
    }

    /// Stop after `max_blocks` accepted blocks (`0` = unlimited).
    #[must_use]
    pub fn with_max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks = max_blocks;
        self
    }

    /// Dismiss blocks shorter than `min_parts` (`0` = any length).
    #[must_use]
    pub fn with_min_parts(mut self, min_parts: usize) -> Self {
        self.min_parts = min_parts;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// The block limit, if any.
    #[must_use]
    pub fn block_limit(&self) -> Option<usize> {
        (self.max_blocks > 0).then_some(self.max_blocks)
    }

    /// Whether a finished block of `part_count` parts is kept.
    #[must_use]
    pub fn accepts(&self, part_count: usize) -> bool {
        part_count >= self.min_parts.max(1)
    }
}

fn non_negative(name: &'static str, value: i64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| ConcordanceError::invalid(name, format!("must not be negative, got {value}")))
}
