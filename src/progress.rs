//! Progress reporting utilities using indicatif.
//!
//! The search runs in two phases, `"aggregate"` (one step per input element)
//! and `"search"` (one step per key visited). [`Progress`] renders each as a
//! bar on stderr; quiet mode and machine-readable output disable it.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Phase name for the single aggregation pass.
pub const PHASE_AGGREGATE: &str = "aggregate";
/// Phase name for block discovery.
pub const PHASE_SEARCH: &str = "search";

/// Progress callback for the search phases.
///
/// Implement this trait to receive progress updates during a search.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (`"aggregate"` or `"search"`)
    /// * `total` - Total number of steps in the phase
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each step (1-based).
    fn on_progress(&self, current: usize);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use concordance::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        pb.set_style(Self::style());
        pb.set_message(match phase {
            PHASE_AGGREGATE => "Grouping lines".to_string(),
            PHASE_SEARCH => "Finding blocks".to_string(),
            other => other.to_string(),
        });
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(previous) = guard.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn on_progress(&self, current: usize) {
        if self.quiet {
            return;
        }
        self.with_bar(|pb| pb.set_position(current as u64));
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        let message = match phase {
            PHASE_AGGREGATE => "Grouping complete",
            PHASE_SEARCH => "Search complete",
            _ => "Done",
        };
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_with_message(message);
            }
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.with_bar(|pb| pb.set_message(message.to_string()));
    }
}
