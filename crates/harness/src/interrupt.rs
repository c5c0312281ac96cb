// Rust guideline compliant 2026-03-02

//! Cooperative cancellation.
//!
//! One process-wide flag with a single transition, false to true. Every
//! long-running loop polls [`Interrupter::check_for_interrupt`] once per
//! iteration; the flag is typically armed by the SIGINT hook installed in
//! the binary. A blocked step delays cancellation until it returns -- that
//! is accepted, and a second SIGINT kills the process hard.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancellation was requested; unwind to the runner loop and stop cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("interrupted")]
pub struct Interrupted;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupter {
    interrupted: Arc<AtomicBool>,
}

impl Interrupter {
    /// Create a new, unarmed interrupter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the flag. Idempotent; safe from any thread, including a signal
    /// handler thread.
    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    /// Whether the flag has been armed.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// Cancellation point: fails with [`Interrupted`] once the flag is set.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted`] after [`interrupt`](Self::interrupt) has
    /// been called on any clone.
    pub fn check_for_interrupt(&self) -> Result<(), Interrupted> {
        if self.is_interrupted() { Err(Interrupted) } else { Ok(()) }
    }
}
