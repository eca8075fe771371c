//! Cooperative cancellation.
//!
//! A [`CancelToken`] is cloned into every pipeline stage and polled at the
//! stage's natural checkpoints: before each catalog query, at a fixed
//! combination interval during analysis, and before commit. Cancellation is
//! never pre-emptive; a request takes effect at the next poll point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Result, SearchError};

/// Cloneable cancellation flag shared between the caller and the worker.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from any thread, any number of times.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Poll point: fail with [`SearchError::Cancelled`] if requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(SearchError::Cancelled)
        } else {
            Ok(())
        }
    }
}
