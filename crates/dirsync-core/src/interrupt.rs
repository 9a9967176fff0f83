//! Cooperative interruption
//!
//! A signal handler requests the stop; the engine checks between actions
//! and the replicator between chunks, so partial copies are cleaned up
//! before the process exits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared stop flag
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    /// Create a flag that is not yet set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running sync to stop.
    ///
    /// Returns `true` if a stop had already been requested.
    pub fn request(&self) -> bool {
        self.0.swap(true, Ordering::SeqCst)
    }

    /// Whether a stop has been requested
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
