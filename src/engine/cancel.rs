//! Cooperative cancellation.
//!
//! The search polls a [`Cancellation`] between discrete steps. Nothing is
//! interrupted preemptively, so a cancelled search still returns only fully
//! accepted blocks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A token the search polls to learn whether it should stop.
pub trait Cancellation {
    /// Returns `true` once the search should stop.
    fn is_cancelled(&self) -> bool;
}

/// A token that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Cancellation for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl<C: Cancellation + ?Sized> Cancellation for Arc<C> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<C: Cancellation + ?Sized> Cancellation for &C {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Adapts a closure into a [`Cancellation`], e.g. for deadlines.
pub struct FnCancel<F>(pub F);

impl<F: Fn() -> bool> Cancellation for FnCancel<F> {
    fn is_cancelled(&self) -> bool {
        (self.0)()
    }
}
