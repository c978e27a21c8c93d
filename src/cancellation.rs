//! A cooperative cancellation signal.
//!
//! Rust has no implicit per-task deadline the way a Go `context.Context`
//! does, so cancellation here is an explicit, cheaply-clonable flag checked
//! at the two checkpoints the design document calls out: once after the
//! top-level walk, and once before every resolver invocation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperative, request-scoped cancellation flag.
#[derive(Clone, Default)]
pub struct CancellationToken {
    tripped: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that has not been tripped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the token; visible to every clone.
    pub fn cancel(&self) {
        self.tripped.store(true, Ordering::SeqCst);
    }

    /// Whether the token has been tripped.
    pub fn is_cancelled(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }
}
