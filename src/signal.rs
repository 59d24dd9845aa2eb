//! Ctrl+C handling for cooperative cancellation.
//!
//! A [`ShutdownHandler`] wraps an `AtomicBool` that the Ctrl+C hook sets.
//! It implements [`Cancellation`], so it can be handed straight to
//! [`Concordance::find_blocks`](crate::engine::Concordance::find_blocks):
//!
//! ```rust,no_run
//! use concordance::engine::Concordance;
//! use concordance::signal::install_handler;
//! use concordance::SearchOptions;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! let lines = ["a", "b", "a", "b"];
//! let outcome = Concordance::unfiltered(&lines).find_blocks(&SearchOptions::new(), &handler);
//! if outcome.summary.interrupted {
//!     eprintln!("partial result");
//! }
//! ```
//!
//! An interrupted run exits with code 130 (128 + SIGINT).

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::engine::Cancellation;

/// Shared cancellation flag set by Ctrl+C or [`request_shutdown`](Self::request_shutdown).
#[derive(Debug, Clone)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Manually request a shutdown.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get a clone of the flag for other threads.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Reset the flag to `false`.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Default for ShutdownHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancellation for ShutdownHandler {
    fn is_cancelled(&self) -> bool {
        self.is_shutdown_requested()
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install a Ctrl+C handler that sets the shutdown flag on interrupt.
///
/// `ctrlc` accepts only one hook per process, so later calls (e.g. from
/// tests driving `run_app` repeatedly) get the installed handler back with
/// its flag reset.
///
/// # Errors
///
/// Returns [`SignalError`] when the hook cannot be installed and no handler
/// exists yet.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    match ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let _ = writeln!(std::io::stderr(), "\nInterrupted. Returning blocks found so far...");
        let _ = std::io::stderr().flush();
        log::info!("Shutdown signal received");
    }) {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            Ok(handler)
        }
        Err(ctrlc::Error::MultipleHandlers) => {
            log::debug!("Ctrl+C handler already registered, using unhooked handler");
            let fallback = GLOBAL_HANDLER.get_or_init(ShutdownHandler::new);
            fallback.reset();
            Ok(fallback.clone())
        }
        Err(e) => Err(e.into()),
    }
}
